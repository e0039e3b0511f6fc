// src/services/dashboard_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::ReviewStore,
    models::{business::Business, dashboard::DashboardSummary, review::{Review, ReviewQuery, ReviewStatus}},
    services::intake_service::collection_url,
};

const RECENT_REVIEWS: usize = 5;

/// Média de todas as notas com uma casa decimal; 0 sem reviews.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    let mean = sum as f64 / reviews.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[derive(Clone)]
pub struct DashboardService {
    reviews: Arc<dyn ReviewStore>,
    public_base_url: String,
}

impl DashboardService {
    pub fn new(reviews: Arc<dyn ReviewStore>, public_base_url: String) -> Self {
        Self { reviews, public_base_url }
    }

    pub async fn get_summary(&self, business: &Business) -> Result<DashboardSummary, AppError> {
        // Uma leitura só; a lista já vem da mais nova para a mais antiga
        let reviews = self.reviews.list(business.id, ReviewQuery::all()).await?;

        let pending_reviews = reviews
            .iter()
            .filter(|r| r.status == ReviewStatus::Pending)
            .count();

        Ok(DashboardSummary {
            business_name: business.business_name.clone(),
            total_reviews: reviews.len(),
            average_rating: average_rating(&reviews),
            pending_reviews,
            recent_reviews: reviews.iter().take(RECENT_REVIEWS).cloned().collect(),
            collection_url: collection_url(&self.public_base_url, &business.widget_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use uuid::Uuid;

    #[tokio::test]
    async fn summary_counts_every_status() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        store.seed_review(business.id, 5, ReviewStatus::Approved, 6);
        store.seed_review(business.id, 4, ReviewStatus::Pending, 5);
        store.seed_review(business.id, 4, ReviewStatus::Rejected, 4);
        store.seed_review(business.id, 3, ReviewStatus::Pending, 3);
        store.seed_review(business.id, 5, ReviewStatus::Approved, 2);
        let newest = store.seed_review(business.id, 4, ReviewStatus::Approved, 1);

        // Outro negócio não entra na conta
        let other = store.add_business(Uuid::new_v4(), "Outro", "tok-2");
        store.seed_review(other.id, 1, ReviewStatus::Pending, 0);

        let summary = DashboardService::new(store.clone(), "https://proofviral.app".into())
            .get_summary(&business)
            .await
            .unwrap();

        assert_eq!(summary.total_reviews, 6);
        assert_eq!(summary.pending_reviews, 2);
        // 25 / 6 = 4.1666...
        assert_eq!(summary.average_rating, 4.2);
        assert_eq!(summary.recent_reviews.len(), 5);
        assert_eq!(summary.recent_reviews[0].id, newest.id);
        assert_eq!(summary.collection_url, "https://proofviral.app/review/tok");
    }

    #[tokio::test]
    async fn empty_business_has_zero_average() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");

        let summary = DashboardService::new(store.clone(), "http://localhost:3000".into())
            .get_summary(&business)
            .await
            .unwrap();
        assert_eq!(summary.total_reviews, 0);
        assert_eq!(summary.average_rating, 0.0);
        assert!(summary.recent_reviews.is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_propagated() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        store.set_fail_reviews(true);

        let result = DashboardService::new(store.clone(), "http://localhost:3000".into())
            .get_summary(&business)
            .await;
        assert!(matches!(result, Err(AppError::DatabaseError(_))));
    }
}
