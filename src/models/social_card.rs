// src/models/social_card.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "social_platform", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    #[default]
    Instagram,
    Twitter,
}

impl SocialPlatform {
    /// Dimensões do card em pixels CSS (o PNG sai em 2x).
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            SocialPlatform::Instagram => (1080, 1080),
            SocialPlatform::Twitter => (1200, 675),
        }
    }
}

// Registro "write-only": gravado a cada card gerado, nunca relido
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SocialCard {
    pub id: Uuid,
    pub review_id: Uuid,
    pub card_url: String,
    pub platform: SocialPlatform,
    // Inicializado em 0 e nunca incrementado
    pub shared_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSocialCard {
    pub review_id: Uuid,
    pub card_url: String,
    pub platform: SocialPlatform,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GenerateCardPayload {
    #[serde(default)]
    pub platform: SocialPlatform,
}
