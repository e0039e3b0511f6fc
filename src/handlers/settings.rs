// src/handlers/settings.rs

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::public::field_file,
    middleware::{auth::SessionContext, i18n::Locale},
    models::business::{Business, LogoUploadResponse, UpdateSettingsRequest},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "Settings",
    responses(
        (status = 200, description = "Perfil do negócio", body = Business),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(session: SessionContext) -> impl IntoResponse {
    (StatusCode::OK, Json(session.business))
}

// PUT /api/settings
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Perfil atualizado", body = Business),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = app_state
        .business_service
        .update_settings(session.business.id, payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(updated)))
}

async fn read_logo(mut multipart: Multipart) -> Result<bytes::Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidMultipart(e.to_string()))?
    {
        if field.name() == Some("logo") {
            if let Some(data) = field_file(field).await? {
                return Ok(data);
            }
        }
    }
    Err(AppError::InvalidMultipart("campo 'logo' ausente".into()))
}

// POST /api/settings/logo
#[utoipa::path(
    post,
    path = "/api/settings/logo",
    tag = "Settings",
    request_body(content = Vec<u8>, content_type = "multipart/form-data", description = "Campo `logo` com a imagem"),
    responses(
        (status = 200, description = "Logo salvo", body = LogoUploadResponse),
        (status = 400, description = "Arquivo ausente ou não é imagem"),
        (status = 413, description = "Logo maior que 2MB")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_logo(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let data = read_logo(multipart)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let logo_url = app_state
        .business_service
        .upload_logo(&session.business, data)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(LogoUploadResponse { logo_url })))
}
