// src/db/social_card_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::SocialCardStore,
    models::social_card::{NewSocialCard, SocialCard},
};

#[derive(Clone)]
pub struct SocialCardRepository {
    pool: PgPool,
}

impl SocialCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialCardStore for SocialCardRepository {
    async fn insert(&self, card: NewSocialCard) -> Result<SocialCard, AppError> {
        let card = sqlx::query_as::<_, SocialCard>(
            r#"
            INSERT INTO social_cards (review_id, card_url, platform, shared_count)
            VALUES ($1, $2, $3, 0)
            RETURNING *
            "#,
        )
        .bind(card.review_id)
        .bind(&card.card_url)
        .bind(card.platform)
        .fetch_one(&self.pool)
        .await?;

        Ok(card)
    }
}
