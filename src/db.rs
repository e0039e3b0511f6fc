// src/db.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Session, User},
        business::{Business, NewBusiness, PlanTier, UpdateSettingsRequest},
        review::{NewReview, Review, ReviewQuery, ReviewStatus, SentimentLabel},
        social_card::{NewSocialCard, SocialCard},
    },
};

pub mod business_repo;
pub use business_repo::BusinessRepository;
pub mod review_repo;
pub use review_repo::ReviewRepository;
pub mod social_card_repo;
pub use social_card_repo::SocialCardRepository;
pub mod user_repo;
pub use user_repo::UserRepository;

#[cfg(test)]
pub mod memory;

// Contas e sessões (o "provedor de autenticação")
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
    /// Cria usuário e negócio juntos (tudo ou nada).
    async fn create_account(
        &self,
        email: &str,
        password_hash: &str,
        business: NewBusiness,
    ) -> Result<(User, Business), AppError>;
    async fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Session, AppError>;
    async fn find_session(&self, session_id: Uuid) -> Result<Option<Session>, AppError>;
    async fn delete_session(&self, session_id: Uuid) -> Result<(), AppError>;
    /// Remove as sessões vencidas do usuário. Devolve quantas saíram.
    async fn delete_expired_sessions(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, AppError>;
}

// Tabela `businesses`: leitura por dono ou pelo token público
#[async_trait]
pub trait BusinessStore: Send + Sync {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Business>, AppError>;
    async fn find_by_widget_id(&self, widget_id: &str) -> Result<Option<Business>, AppError>;
    async fn update_profile(
        &self,
        business_id: Uuid,
        input: &UpdateSettingsRequest,
    ) -> Result<Business, AppError>;
    async fn update_logo(&self, business_id: Uuid, logo_url: &str) -> Result<Business, AppError>;
    async fn update_plan(&self, business_id: Uuid, plan: PlanTier) -> Result<Business, AppError>;
}

// Tabela `reviews`: toda operação recebe o `business_id` do dono
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn list(&self, business_id: Uuid, query: ReviewQuery) -> Result<Vec<Review>, AppError>;
    async fn find(&self, business_id: Uuid, review_id: Uuid) -> Result<Option<Review>, AppError>;
    async fn insert(&self, review: NewReview) -> Result<Review, AppError>;
    async fn update_status(
        &self,
        business_id: Uuid,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<Review>, AppError>;
    /// Grava score e label num único UPDATE.
    async fn update_sentiment(
        &self,
        business_id: Uuid,
        review_id: Uuid,
        score: f64,
        label: SentimentLabel,
    ) -> Result<Option<Review>, AppError>;
}

// Tabela `social_cards`: só escrita
#[async_trait]
pub trait SocialCardStore: Send + Sync {
    async fn insert(&self, card: NewSocialCard) -> Result<SocialCard, AppError>;
}
