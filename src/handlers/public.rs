// src/handlers/public.rs
//
// Rotas sem autenticação: página de coleta e envio de reviews.

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{
        business::PublicBusiness,
        intake::{ReviewSubmission, ReviewSubmissionForm, ThankYouResponse},
    },
};

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map(|value| value.trim().to_string())
        .map_err(|e| AppError::InvalidMultipart(e.to_string()))
}

/// Lê um arquivo do formulário. Campo presente mas vazio conta como ausente.
pub async fn field_file(field: Field<'_>) -> Result<Option<Bytes>, AppError> {
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::InvalidMultipart(e.to_string()))?;
    Ok((!data.is_empty()).then_some(data))
}

async fn read_submission(mut multipart: Multipart) -> Result<ReviewSubmission, AppError> {
    let mut submission = ReviewSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidMultipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "customerName" => submission.customer_name = field_text(field).await?,
            "customerEmail" => submission.customer_email = field_text(field).await?,
            "reviewText" => submission.review_text = field_text(field).await?,
            "rating" => {
                let raw = field_text(field).await?;
                // Vazio vira "sem nota"; texto não numérico também
                submission.rating = raw.parse().ok();
            }
            "photo" => submission.photo = field_file(field).await?,
            _ => {}
        }
    }
    Ok(submission)
}

// GET /api/public/businesses/{widget_id}
#[utoipa::path(
    get,
    path = "/api/public/businesses/{widget_id}",
    tag = "Public",
    params(("widget_id" = String, Path, description = "Token público do negócio")),
    responses(
        (status = 200, description = "Perfil público do negócio", body = PublicBusiness),
        (status = 404, description = "Negócio não encontrado")
    )
)]
pub async fn get_business(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(widget_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let business = app_state
        .intake_service
        .public_profile(&widget_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(business)))
}

// POST /api/public/businesses/{widget_id}/reviews
#[utoipa::path(
    post,
    path = "/api/public/businesses/{widget_id}/reviews",
    tag = "Public",
    params(("widget_id" = String, Path, description = "Token público do negócio")),
    request_body(content = ReviewSubmissionForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Review recebida (pendente de aprovação)", body = ThankYouResponse),
        (status = 400, description = "Formulário inválido"),
        (status = 404, description = "Negócio não encontrado"),
        (status = 413, description = "Foto maior que 5MB")
    )
)]
pub async fn submit_review(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(widget_id): Path<String>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let submission = read_submission(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let (business, _review) = app_state
        .intake_service
        .submit(&widget_id, submission)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = app_state.i18n_store.translate(&locale.0, "review_submitted");
    let thanks = app_state.intake_service.thank_you(&business, message);

    Ok((StatusCode::CREATED, Json(thanks)))
}
