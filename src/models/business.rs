// src/models/business.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "plan_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Enterprise,
}

// Um negócio por usuário
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    #[schema(ignore)]
    pub user_id: Uuid,
    #[schema(example = "Acme Inc.")]
    pub business_name: String,
    #[schema(example = "https://acme.com")]
    pub business_url: String,
    #[schema(example = "https://cdn.acme.com/logo.png")]
    pub logo_url: Option<String>,
    // Token público, usado pelo widget e pelo formulário sem autenticação
    #[schema(example = "1f0c2a4e-9a55-4a43-8d55-2f5f5b1c6e7d")]
    pub widget_id: String,
    pub plan: PlanTier,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBusiness {
    pub business_name: String,
    pub business_url: String,
    pub widget_id: String,
}

// Perfil exposto na página pública de coleta
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicBusiness {
    pub business_name: String,
    pub business_url: String,
    pub logo_url: Option<String>,
}

impl From<&Business> for PublicBusiness {
    fn from(business: &Business) -> Self {
        Self {
            business_name: business.business_name.clone(),
            business_url: business.business_url.clone(),
            logo_url: business.logo_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "Acme Inc.")]
    pub business_name: String,

    #[validate(url(message = "invalid_url"))]
    #[schema(example = "https://acme.com")]
    pub business_url: String,

    // Vazio ou ausente remove o logo
    #[schema(example = "https://acme.com/logo.png")]
    pub logo_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogoUploadResponse {
    pub logo_url: String,
}
