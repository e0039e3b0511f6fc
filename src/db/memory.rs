// src/db/memory.rs
//
// Implementação em memória dos stores, usada pelos testes de serviço e de rota.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BusinessStore, ReviewStore, SocialCardStore, UserStore},
    models::{
        auth::{Session, User},
        business::{Business, NewBusiness, PlanTier, UpdateSettingsRequest},
        review::{NewReview, Review, ReviewQuery, ReviewRow, ReviewStatus, SentimentLabel},
        social_card::{NewSocialCard, SocialCard},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    sessions: Mutex<Vec<Session>>,
    businesses: Mutex<Vec<Business>>,
    reviews: Mutex<Vec<ReviewRow>>,
    social_cards: Mutex<Vec<SocialCard>>,
    // Simula o banco fora do ar nas leituras/escritas de reviews
    fail_reviews: AtomicBool,
    fail_social_cards: AtomicBool,
    review_inserts: AtomicUsize,
}

fn unavailable() -> AppError {
    AppError::DatabaseError(sqlx::Error::PoolTimedOut)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_business(&self, user_id: Uuid, name: &str, widget_id: &str) -> Business {
        let business = Business {
            id: Uuid::new_v4(),
            user_id,
            business_name: name.to_string(),
            business_url: "https://example.com".to_string(),
            logo_url: None,
            widget_id: widget_id.to_string(),
            plan: PlanTier::Free,
            created_at: Utc::now(),
        };
        self.businesses.lock().unwrap().push(business.clone());
        business
    }

    /// Insere uma review com status arbitrário. `age_minutes` controla a ordem por data.
    pub fn seed_review(
        &self,
        business_id: Uuid,
        rating: i32,
        status: ReviewStatus,
        age_minutes: i64,
    ) -> Review {
        let row = ReviewRow {
            id: Uuid::new_v4(),
            business_id,
            customer_name: format!("Cliente {rating}"),
            customer_email: "cliente@example.com".to_string(),
            rating,
            review_text: format!("Review nota {rating}"),
            photo_url: None,
            sentiment_score: None,
            sentiment_label: None,
            status,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        };
        self.reviews.lock().unwrap().push(row.clone());
        row.into()
    }

    pub fn reviews_snapshot(&self) -> Vec<ReviewRow> {
        self.reviews.lock().unwrap().clone()
    }

    pub fn social_cards_snapshot(&self) -> Vec<SocialCard> {
        self.social_cards.lock().unwrap().clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn review_insert_count(&self) -> usize {
        self.review_inserts.load(Ordering::SeqCst)
    }

    pub fn set_fail_reviews(&self, fail: bool) {
        self.fail_reviews.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_social_cards(&self, fail: bool) {
        self.fail_social_cards.store(fail, Ordering::SeqCst);
    }

    fn check_reviews(&self) -> Result<(), AppError> {
        if self.fail_reviews.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn update_business<F>(&self, business_id: Uuid, apply: F) -> Result<Business, AppError>
    where
        F: FnOnce(&mut Business),
    {
        let mut businesses = self.businesses.lock().unwrap();
        let business = businesses
            .iter_mut()
            .find(|b| b.id == business_id)
            .ok_or(AppError::BusinessNotFound)?;
        apply(business);
        Ok(business.clone())
    }

    fn update_review<F>(&self, business_id: Uuid, review_id: Uuid, apply: F) -> Result<Option<Review>, AppError>
    where
        F: FnOnce(&mut ReviewRow),
    {
        self.check_reviews()?;
        let mut reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter_mut()
            .find(|r| r.id == review_id && r.business_id == business_id)
            .map(|row| {
                apply(row);
                Review::from(row.clone())
            }))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        business: NewBusiness,
    ) -> Result<(User, Business), AppError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        let business = Business {
            id: Uuid::new_v4(),
            user_id: user.id,
            business_name: business.business_name,
            business_url: business.business_url,
            logo_url: None,
            widget_id: business.widget_id,
            plan: PlanTier::Free,
            created_at: now,
        };

        users.push(user.clone());
        self.businesses.lock().unwrap().push(business.clone());
        Ok((user, business))
    }

    async fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Session, AppError> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            expires_at,
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, session_id: Uuid) -> Result<Option<Session>, AppError> {
        Ok(self.sessions.lock().unwrap().iter().find(|s| s.id == session_id).cloned())
    }

    async fn delete_session(&self, session_id: Uuid) -> Result<(), AppError> {
        self.sessions.lock().unwrap().retain(|s| s.id != session_id);
        Ok(())
    }

    async fn delete_expired_sessions(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, AppError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.user_id != user_id || s.expires_at > now);
        Ok((before - sessions.len()) as u64)
    }
}

#[async_trait]
impl BusinessStore for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Business>, AppError> {
        Ok(self.businesses.lock().unwrap().iter().find(|b| b.user_id == user_id).cloned())
    }

    async fn find_by_widget_id(&self, widget_id: &str) -> Result<Option<Business>, AppError> {
        Ok(self.businesses.lock().unwrap().iter().find(|b| b.widget_id == widget_id).cloned())
    }

    async fn update_profile(
        &self,
        business_id: Uuid,
        input: &UpdateSettingsRequest,
    ) -> Result<Business, AppError> {
        self.update_business(business_id, |b| {
            b.business_name = input.business_name.clone();
            b.business_url = input.business_url.clone();
            b.logo_url = input.logo_url.clone();
        })
    }

    async fn update_logo(&self, business_id: Uuid, logo_url: &str) -> Result<Business, AppError> {
        self.update_business(business_id, |b| b.logo_url = Some(logo_url.to_string()))
    }

    async fn update_plan(&self, business_id: Uuid, plan: PlanTier) -> Result<Business, AppError> {
        self.update_business(business_id, |b| b.plan = plan)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn list(&self, business_id: Uuid, query: ReviewQuery) -> Result<Vec<Review>, AppError> {
        self.check_reviews()?;
        let mut rows: Vec<ReviewRow> = self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.business_id == business_id && query.matches(r))
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = query.limit {
            rows.truncate(limit.max(0) as usize);
        }
        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find(&self, business_id: Uuid, review_id: Uuid) -> Result<Option<Review>, AppError> {
        self.check_reviews()?;
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == review_id && r.business_id == business_id)
            .cloned()
            .map(Review::from))
    }

    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        self.check_reviews()?;
        let row = ReviewRow {
            id: Uuid::new_v4(),
            business_id: review.business_id,
            customer_name: review.customer_name,
            customer_email: review.customer_email,
            rating: review.rating,
            review_text: review.review_text,
            photo_url: review.photo_url,
            sentiment_score: None,
            sentiment_label: None,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        };
        self.reviews.lock().unwrap().push(row.clone());
        self.review_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(row.into())
    }

    async fn update_status(
        &self,
        business_id: Uuid,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<Review>, AppError> {
        self.update_review(business_id, review_id, |r| r.status = status)
    }

    async fn update_sentiment(
        &self,
        business_id: Uuid,
        review_id: Uuid,
        score: f64,
        label: SentimentLabel,
    ) -> Result<Option<Review>, AppError> {
        self.update_review(business_id, review_id, |r| {
            r.sentiment_score = Some(score);
            r.sentiment_label = Some(label);
        })
    }
}

#[async_trait]
impl SocialCardStore for MemoryStore {
    async fn insert(&self, card: NewSocialCard) -> Result<SocialCard, AppError> {
        if self.fail_social_cards.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        let card = SocialCard {
            id: Uuid::new_v4(),
            review_id: card.review_id,
            card_url: card.card_url,
            platform: card.platform,
            shared_count: 0,
            created_at: Utc::now(),
        };
        self.social_cards.lock().unwrap().push(card.clone());
        Ok(card)
    }
}
