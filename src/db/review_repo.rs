// src/db/review_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ReviewStore,
    models::review::{NewReview, Review, ReviewQuery, ReviewRow, ReviewStatus, SentimentLabel},
};

#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewStore for ReviewRepository {
    async fn list(&self, business_id: Uuid, query: ReviewQuery) -> Result<Vec<Review>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM reviews WHERE business_id = ");
        builder.push_bind(business_id);

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status);
        }
        if let Some(rating) = query.rating {
            builder.push(" AND rating = ").push_bind(rating);
        }

        builder.push(" ORDER BY created_at DESC");

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ").push_bind(limit);
        }

        let rows = builder
            .build_query_as::<ReviewRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    async fn find(&self, business_id: Uuid, review_id: Uuid) -> Result<Option<Review>, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE id = $1 AND business_id = $2",
        )
        .bind(review_id)
        .bind(business_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Review::from))
    }

    async fn insert(&self, review: NewReview) -> Result<Review, AppError> {
        // O status não vem do cliente: toda review nasce 'pending'
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            INSERT INTO reviews (
                business_id, customer_name, customer_email, rating, review_text, photo_url, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(review.business_id)
        .bind(&review.customer_name)
        .bind(&review.customer_email)
        .bind(review.rating)
        .bind(&review.review_text)
        .bind(&review.photo_url)
        .bind(ReviewStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_status(
        &self,
        business_id: Uuid,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<Option<Review>, AppError> {
        // Sem checagem de versão: a última escrita vence
        let row = sqlx::query_as::<_, ReviewRow>(
            "UPDATE reviews SET status = $3 WHERE id = $1 AND business_id = $2 RETURNING *",
        )
        .bind(review_id)
        .bind(business_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Review::from))
    }

    async fn update_sentiment(
        &self,
        business_id: Uuid,
        review_id: Uuid,
        score: f64,
        label: SentimentLabel,
    ) -> Result<Option<Review>, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            r#"
            UPDATE reviews
            SET sentiment_score = $3, sentiment_label = $4
            WHERE id = $1 AND business_id = $2
            RETURNING *
            "#,
        )
        .bind(review_id)
        .bind(business_id)
        .bind(score)
        .bind(label)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Review::from))
    }
}
