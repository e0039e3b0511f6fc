// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "review_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// Ação do moderador. Não existe ação que volte uma review para `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    /// Status resultante. Aprovar/rejeitar vale a partir de qualquer estado,
    /// então o status atual não entra na conta.
    pub fn target(self) -> ReviewStatus {
        match self {
            ModerationAction::Approve => ReviewStatus::Approved,
            ModerationAction::Reject => ReviewStatus::Rejected,
        }
    }
}

impl ReviewStatus {
    /// Converte o status pedido pelo cliente numa ação de moderação.
    pub fn as_action(self) -> Option<ModerationAction> {
        match self {
            ReviewStatus::Approved => Some(ModerationAction::Approve),
            ReviewStatus::Rejected => Some(ModerationAction::Reject),
            ReviewStatus::Pending => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "sentiment_label", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(SentimentLabel::Positive),
            "neutral" => Some(SentimentLabel::Neutral),
            "negative" => Some(SentimentLabel::Negative),
            _ => None,
        }
    }
}

/// Estado da análise de sentimento. Score e label existem juntos ou não existem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Sentiment {
    NotAnalyzed,
    Analyzed {
        #[schema(example = 0.92)]
        score: f64,
        label: SentimentLabel,
    },
}

// --- Linhas do banco ---

// Formato da tabela `reviews` (colunas de sentimento anuláveis)
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub rating: i32,
    pub review_text: String,
    pub photo_url: Option<String>,
    pub sentiment_score: Option<f64>,
    pub sentiment_label: Option<SentimentLabel>,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    #[schema(ignore)]
    pub business_id: Uuid,
    #[schema(example = "John Doe")]
    pub customer_name: String,
    #[schema(example = "john@example.com")]
    pub customer_email: String,
    #[schema(example = 5)]
    pub rating: i32,
    #[schema(example = "Atendimento excelente!")]
    pub review_text: String,
    pub photo_url: Option<String>,
    pub sentiment: Sentiment,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        // Um par incompleto é tratado como "não analisado"
        let sentiment = match (row.sentiment_score, row.sentiment_label) {
            (Some(score), Some(label)) => Sentiment::Analyzed { score, label },
            _ => Sentiment::NotAnalyzed,
        };

        Self {
            id: row.id,
            business_id: row.business_id,
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            rating: row.rating,
            review_text: row.review_text,
            photo_url: row.photo_url,
            sentiment,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

// Inserção vinda do formulário público. O status não faz parte: é sempre `pending`.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub business_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub rating: i32,
    pub review_text: String,
    pub photo_url: Option<String>,
}

/// Filtros de leitura, sempre combinados com o `business_id` do dono.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewQuery {
    pub status: Option<ReviewStatus>,
    pub rating: Option<i32>,
    pub limit: Option<i64>,
}

impl ReviewQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// Só o que pode aparecer no widget público: aprovadas com nota 5.
    pub fn showcase(limit: i64) -> Self {
        Self {
            status: Some(ReviewStatus::Approved),
            rating: Some(5),
            limit: Some(limit),
        }
    }

    pub fn matches(&self, row: &ReviewRow) -> bool {
        self.status.is_none_or(|status| row.status == status)
            && self.rating.is_none_or(|rating| row.rating == rating)
    }
}

// --- Payloads ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Approved,
    Rejected,
}

impl StatusFilter {
    pub fn as_status(self) -> Option<ReviewStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(ReviewStatus::Pending),
            StatusFilter::Approved => Some(ReviewStatus::Approved),
            StatusFilter::Rejected => Some(ReviewStatus::Rejected),
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReviewsParams {
    #[serde(default)]
    pub status: StatusFilter,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    #[schema(example = "approved")]
    pub status: ReviewStatus,
}

/// Resultado da análise. `key_themes` é devolvido ao cliente mas não tem coluna no banco.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SentimentOutcome {
    pub review: Review,
    #[schema(example = json!(["atendimento", "preço", "rapidez"]))]
    pub key_themes: Vec<String>,
}
