// src/models/billing.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::business::PlanTier;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanInfo {
    pub key: PlanTier,
    pub name: String,
    #[schema(example = "$49")]
    pub price: String,
    #[schema(example = "per month")]
    pub period: String,
    pub features: Vec<String>,
    pub popular: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingOverview {
    pub current_plan: PlanTier,
    pub plans: Vec<PlanInfo>,
    // Ainda não existe integração de pagamento: a troca de plano é só um update
    pub payment_provider_enabled: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePlanPayload {
    #[schema(example = "pro")]
    pub plan: PlanTier,
}
