// src/services/review_service.rs

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReviewStore,
    models::review::{Review, ReviewQuery, ReviewStatus, SentimentOutcome, StatusFilter},
    services::sentiment::{parse_analysis, SentimentAnalyzer},
};

/// Marca uma review como "em análise" enquanto o guard viver.
struct InFlight {
    set: Arc<DashMap<Uuid, ()>>,
    review_id: Uuid,
}

impl InFlight {
    fn acquire(set: &Arc<DashMap<Uuid, ()>>, review_id: Uuid) -> Option<Self> {
        match set.entry(review_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(Self { set: set.clone(), review_id })
            }
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.set.remove(&self.review_id);
    }
}

#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewStore>,
    analyzer: Arc<dyn SentimentAnalyzer>,
    in_flight: Arc<DashMap<Uuid, ()>>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewStore>, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        Self {
            reviews,
            analyzer,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    pub async fn list(&self, business_id: Uuid, filter: StatusFilter) -> Result<Vec<Review>, AppError> {
        let query = ReviewQuery {
            status: filter.as_status(),
            ..ReviewQuery::all()
        };
        self.reviews.list(business_id, query).await
    }

    /// Aprova ou rejeita. `pending` não é um destino válido.
    pub async fn moderate(
        &self,
        business_id: Uuid,
        review_id: Uuid,
        requested: ReviewStatus,
    ) -> Result<Review, AppError> {
        let action = requested.as_action().ok_or(AppError::InvalidStatusTransition)?;

        // Sem checagem de concorrência: a última escrita vence
        let target = action.target();
        let review = self
            .reviews
            .update_status(business_id, review_id, target)
            .await?
            .ok_or(AppError::ReviewNotFound)?;

        tracing::info!(%review_id, status = ?review.status, "📝 Review moderada");
        Ok(review)
    }

    pub async fn analyze_sentiment(
        &self,
        business_id: Uuid,
        review_id: Uuid,
    ) -> Result<SentimentOutcome, AppError> {
        let _guard = InFlight::acquire(&self.in_flight, review_id).ok_or(AppError::AnalysisInProgress)?;

        let review = self
            .reviews
            .find(business_id, review_id)
            .await?
            .ok_or(AppError::ReviewNotFound)?;

        let raw = self.analyzer.complete(&review.review_text).await?;
        let analysis = parse_analysis(&raw)?;

        // Score e label no mesmo UPDATE
        let review = self
            .reviews
            .update_sentiment(business_id, review_id, analysis.sentiment_score, analysis.sentiment_label)
            .await?
            .ok_or(AppError::ReviewNotFound)?;

        Ok(SentimentOutcome {
            review,
            key_themes: analysis.key_themes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryStore,
        models::review::{Sentiment, SentimentLabel},
        services::sentiment::MockSentimentAnalyzer,
    };
    use std::time::Duration;

    const GOOD_ANSWER: &str = r#"Sure! {"sentiment_score": 0.9, "sentiment_label": "positive", "key_themes": ["food", "staff", "price"]}"#;

    fn service(store: &Arc<MemoryStore>, analyzer: MockSentimentAnalyzer) -> ReviewService {
        ReviewService::new(store.clone(), Arc::new(analyzer))
    }

    #[tokio::test]
    async fn approve_is_idempotent_and_scoped() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        let review = store.seed_review(business.id, 5, ReviewStatus::Pending, 0);
        let reviews = service(&store, MockSentimentAnalyzer::new());

        let once = reviews.moderate(business.id, review.id, ReviewStatus::Approved).await.unwrap();
        let twice = reviews.moderate(business.id, review.id, ReviewStatus::Approved).await.unwrap();
        assert_eq!(once.status, ReviewStatus::Approved);
        assert_eq!(twice.status, ReviewStatus::Approved);

        let rejected = reviews.moderate(business.id, review.id, ReviewStatus::Rejected).await.unwrap();
        assert_eq!(rejected.status, ReviewStatus::Rejected);

        let other = Uuid::new_v4();
        let foreign = reviews.moderate(other, review.id, ReviewStatus::Approved).await;
        assert!(matches!(foreign, Err(AppError::ReviewNotFound)));
    }

    #[tokio::test]
    async fn pending_is_rejected_without_touching_the_store() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        let review = store.seed_review(business.id, 5, ReviewStatus::Approved, 0);
        let reviews = service(&store, MockSentimentAnalyzer::new());

        let result = reviews.moderate(business.id, review.id, ReviewStatus::Pending).await;
        assert!(matches!(result, Err(AppError::InvalidStatusTransition)));
        assert_eq!(store.reviews_snapshot()[0].status, ReviewStatus::Approved);
    }

    #[tokio::test]
    async fn list_filters_by_status_newest_first() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        let old = store.seed_review(business.id, 4, ReviewStatus::Pending, 30);
        let new = store.seed_review(business.id, 2, ReviewStatus::Pending, 1);
        store.seed_review(business.id, 5, ReviewStatus::Approved, 10);
        let reviews = service(&store, MockSentimentAnalyzer::new());

        let pending = reviews.list(business.id, StatusFilter::Pending).await.unwrap();
        assert_eq!(pending.iter().map(|r| r.id).collect::<Vec<_>>(), vec![new.id, old.id]);

        let all = reviews.list(business.id, StatusFilter::All).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn analysis_persists_score_and_label_together() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        let review = store.seed_review(business.id, 5, ReviewStatus::Approved, 0);

        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer
            .expect_complete()
            .times(1)
            .returning(|_| Ok(GOOD_ANSWER.to_string()));

        let outcome = service(&store, analyzer)
            .analyze_sentiment(business.id, review.id)
            .await
            .unwrap();

        assert_eq!(
            outcome.review.sentiment,
            Sentiment::Analyzed { score: 0.9, label: SentimentLabel::Positive }
        );
        assert_eq!(outcome.key_themes, vec!["food", "staff", "price"]);

        let row = &store.reviews_snapshot()[0];
        assert_eq!(row.sentiment_score, Some(0.9));
        assert_eq!(row.sentiment_label, Some(SentimentLabel::Positive));
    }

    #[tokio::test]
    async fn malformed_answer_persists_nothing() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        let review = store.seed_review(business.id, 5, ReviewStatus::Approved, 0);

        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer
            .expect_complete()
            .returning(|_| Ok(r#"{"sentiment_score": 2.0, "sentiment_label": "positive", "key_themes": []}"#.into()));

        let result = service(&store, analyzer).analyze_sentiment(business.id, review.id).await;
        assert!(matches!(result, Err(AppError::AnalysisFailed(_))));

        let row = &store.reviews_snapshot()[0];
        assert_eq!(row.sentiment_score, None);
        assert_eq!(row.sentiment_label, None);
    }

    #[tokio::test]
    async fn collaborator_error_is_an_analysis_failure() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        let review = store.seed_review(business.id, 5, ReviewStatus::Approved, 0);

        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer
            .expect_complete()
            .returning(|_| Err(AppError::AnalysisFailed("timeout".into())));

        let reviews = service(&store, analyzer);
        let result = reviews.analyze_sentiment(business.id, review.id).await;
        assert!(matches!(result, Err(AppError::AnalysisFailed(_))));

        // O guard foi liberado mesmo com erro
        assert!(reviews.in_flight.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn second_concurrent_analysis_of_the_same_review_is_refused() {
        let store = Arc::new(MemoryStore::new());
        let business = store.add_business(Uuid::new_v4(), "Acme", "tok");
        let review = store.seed_review(business.id, 5, ReviewStatus::Approved, 0);

        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let release_rx = std::sync::Mutex::new(release_rx);

        let mut analyzer = MockSentimentAnalyzer::new();
        analyzer.expect_complete().times(1).returning(move |_| {
            // Segura a primeira análise até o teste liberar
            let _ = release_rx.lock().unwrap().recv_timeout(Duration::from_secs(5));
            Ok(GOOD_ANSWER.to_string())
        });

        let reviews = service(&store, analyzer);
        let first = {
            let reviews = reviews.clone();
            let business_id = business.id;
            let review_id = review.id;
            tokio::spawn(async move { reviews.analyze_sentiment(business_id, review_id).await })
        };

        // Espera a primeira ocupar o slot
        while reviews.in_flight.is_empty() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let second = reviews.analyze_sentiment(business.id, review.id).await;
        assert!(matches!(second, Err(AppError::AnalysisInProgress)));

        release_tx.send(()).unwrap();
        assert!(first.await.unwrap().is_ok());
        assert!(reviews.in_flight.is_empty());
    }
}
