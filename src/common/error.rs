// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erros internos. Cada variante tem um código estável usado para tradução.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Negócio não encontrado")]
    BusinessNotFound,

    #[error("Review não encontrada")]
    ReviewNotFound,

    #[error("Nota obrigatória")]
    RatingRequired,

    #[error("Nota fora do intervalo 1..5")]
    RatingOutOfRange,

    #[error("Foto maior que o limite")]
    PhotoTooLarge,

    #[error("Logo maior que o limite")]
    LogoTooLarge,

    #[error("Arquivo não é uma imagem suportada")]
    UnsupportedImage,

    #[error("Formulário multipart inválido: {0}")]
    InvalidMultipart(String),

    #[error("Status de moderação inválido")]
    InvalidStatusTransition,

    #[error("Falha na análise de sentimento: {0}")]
    AnalysisFailed(String),

    #[error("Análise já em andamento")]
    AnalysisInProgress,

    #[error("Falha ao gerar o social card: {0}")]
    CardGenerationFailed(String),

    #[error("Erro no armazenamento: {0}")]
    StorageError(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro de template: {0}")]
    TemplateError(#[from] askama::Error),
}

impl AppError {
    /// Código estável (chave de tradução e campo `code` da resposta).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::EmailAlreadyExists => "email_already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::InvalidToken => "invalid_token",
            AppError::UserNotFound => "user_not_found",
            AppError::BusinessNotFound => "business_not_found",
            AppError::ReviewNotFound => "review_not_found",
            AppError::RatingRequired => "rating_required",
            AppError::RatingOutOfRange => "rating_out_of_range",
            AppError::PhotoTooLarge => "photo_too_large",
            AppError::LogoTooLarge => "logo_too_large",
            AppError::UnsupportedImage => "unsupported_image",
            AppError::InvalidMultipart(_) => "invalid_multipart",
            AppError::InvalidStatusTransition => "invalid_status",
            AppError::AnalysisFailed(_) => "analysis_failed",
            AppError::AnalysisInProgress => "analysis_in_progress",
            AppError::CardGenerationFailed(_) => "card_generation_failed",
            AppError::StorageError(_) => "storage_error",
            _ => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::RatingRequired
            | AppError::RatingOutOfRange
            | AppError::UnsupportedImage
            | AppError::InvalidMultipart(_)
            | AppError::InvalidStatusTransition => StatusCode::BAD_REQUEST,
            AppError::PhotoTooLarge | AppError::LogoTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::EmailAlreadyExists | AppError::AnalysisInProgress => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound | AppError::BusinessNotFound | AppError::ReviewNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::AnalysisFailed(_) | AppError::CardGenerationFailed(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro interno na resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        // O detalhe dos erros 5xx e dos colaboradores fica só no log
        if status.is_server_error() {
            tracing::error!(code = self.code(), "🔥 {}", self);
        }

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(&e.code);
                            Value::String(store.translate(&locale.0, key))
                        })
                        .collect();
                    details.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        ApiError {
            status,
            code: self.code(),
            error: store.translate(&locale.0, self.code()),
            details,
        }
    }
}

// Erro "de fronteira": o que de fato vai para o cliente HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "code": self.code, "error": self.error, "details": details }),
            None => json!({ "code": self.code, "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
