// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::review::Review;

// Cards do topo + últimas reviews
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub business_name: String,
    pub total_reviews: usize,
    // Média de todas as notas, qualquer status, com uma casa decimal
    #[schema(example = 4.3)]
    pub average_rating: f64,
    pub pending_reviews: usize,
    pub recent_reviews: Vec<Review>,
    pub collection_url: String,
}
