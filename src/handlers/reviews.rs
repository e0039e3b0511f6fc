// src/handlers/reviews.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::SessionContext, i18n::Locale},
    models::{
        review::{ListReviewsParams, Review, SentimentOutcome, UpdateStatusPayload},
        social_card::GenerateCardPayload,
    },
    services::social_card::attachment_filename,
};

// GET /api/reviews
#[utoipa::path(
    get,
    path = "/api/reviews",
    tag = "Reviews",
    params(ListReviewsParams),
    responses(
        (status = 200, description = "Reviews do negócio, mais novas primeiro", body = Vec<Review>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_reviews(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Query(params): Query<ListReviewsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let reviews = app_state
        .review_service
        .list(session.business.id, params.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(reviews)))
}

// PATCH /api/reviews/{id}/status
#[utoipa::path(
    patch,
    path = "/api/reviews/{id}/status",
    tag = "Reviews",
    request_body = UpdateStatusPayload,
    params(("id" = Uuid, Path, description = "ID da review")),
    responses(
        (status = 200, description = "Review moderada", body = Review),
        (status = 400, description = "Status inválido (pending)"),
        (status = 404, description = "Review não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let review = app_state
        .review_service
        .moderate(session.business.id, review_id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(review)))
}

// POST /api/reviews/{id}/sentiment
#[utoipa::path(
    post,
    path = "/api/reviews/{id}/sentiment",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "ID da review")),
    responses(
        (status = 200, description = "Sentimento gravado", body = SentimentOutcome),
        (status = 404, description = "Review não encontrada"),
        (status = 409, description = "Análise já em andamento"),
        (status = 502, description = "Falha no serviço de IA")
    ),
    security(("api_jwt" = []))
)]
pub async fn analyze_sentiment(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(review_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = app_state
        .review_service
        .analyze_sentiment(session.business.id, review_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(outcome)))
}

// POST /api/reviews/{id}/social-card
#[utoipa::path(
    post,
    path = "/api/reviews/{id}/social-card",
    tag = "Reviews",
    request_body = GenerateCardPayload,
    params(("id" = Uuid, Path, description = "ID da review")),
    responses(
        (status = 200, description = "PNG do card para download", content_type = "image/png", body = Vec<u8>),
        (status = 404, description = "Review não encontrada"),
        (status = 502, description = "Falha ao gerar a imagem")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_social_card(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Path(review_id): Path<Uuid>,
    Json(payload): Json<GenerateCardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let png = app_state
        .social_card_service
        .generate(&session.business, review_id, payload.platform)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    // Registro do card em segundo plano; o download não espera
    let service = app_state.social_card_service.clone();
    let stored = png.clone();
    tokio::spawn(async move {
        service.record(review_id, payload.platform, stored).await;
    });

    let disposition = format!("attachment; filename=\"{}\"", attachment_filename(review_id));
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        png,
    ))
}
