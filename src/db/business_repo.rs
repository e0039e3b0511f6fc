// src/db/business_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::BusinessStore,
    models::business::{Business, PlanTier, UpdateSettingsRequest},
};

#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessStore for BusinessRepository {
    // Um negócio por usuário: leitura de linha única pelo dono
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(business)
    }

    async fn find_by_widget_id(&self, widget_id: &str) -> Result<Option<Business>, AppError> {
        let business = sqlx::query_as::<_, Business>("SELECT * FROM businesses WHERE widget_id = $1")
            .bind(widget_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(business)
    }

    async fn update_profile(
        &self,
        business_id: Uuid,
        input: &UpdateSettingsRequest,
    ) -> Result<Business, AppError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses
            SET business_name = $2, business_url = $3, logo_url = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(business_id)
        .bind(&input.business_name)
        .bind(&input.business_url)
        .bind(&input.logo_url)
        .fetch_optional(&self.pool)
        .await?;

        business.ok_or(AppError::BusinessNotFound)
    }

    async fn update_logo(&self, business_id: Uuid, logo_url: &str) -> Result<Business, AppError> {
        let business = sqlx::query_as::<_, Business>(
            "UPDATE businesses SET logo_url = $2 WHERE id = $1 RETURNING *",
        )
        .bind(business_id)
        .bind(logo_url)
        .fetch_optional(&self.pool)
        .await?;

        business.ok_or(AppError::BusinessNotFound)
    }

    async fn update_plan(&self, business_id: Uuid, plan: PlanTier) -> Result<Business, AppError> {
        let business = sqlx::query_as::<_, Business>(
            "UPDATE businesses SET plan = $2 WHERE id = $1 RETURNING *",
        )
        .bind(business_id)
        .bind(plan)
        .fetch_optional(&self.pool)
        .await?;

        business.ok_or(AppError::BusinessNotFound)
    }
}
