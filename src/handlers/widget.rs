// src/handlers/widget.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    Json,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::SessionContext, i18n::Locale},
    models::widget::{EmbedInfo, WidgetView},
    services::widget::render_page,
};

const LOADER_JS: &str = include_str!("../../assets/widget.js");

// GET /api/public/widget/{widget_id}
#[utoipa::path(
    get,
    path = "/api/public/widget/{widget_id}",
    tag = "Widget",
    params(("widget_id" = String, Path, description = "Token público do negócio")),
    responses(
        (status = 200, description = "Estado do widget (vazio se o token não existir)", body = WidgetView)
    )
)]
pub async fn get_widget_data(
    State(app_state): State<AppState>,
    Path(widget_id): Path<String>,
) -> impl IntoResponse {
    let view = app_state.widget_service.load(&widget_id).await;
    (StatusCode::OK, Json(view))
}

// GET /widget/{widget_id}
#[utoipa::path(
    get,
    path = "/widget/{widget_id}",
    tag = "Widget",
    params(("widget_id" = String, Path, description = "Token público do negócio")),
    responses(
        (status = 200, description = "Widget em HTML para iframe", content_type = "text/html", body = String)
    )
)]
pub async fn render_widget(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(widget_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let view = app_state.widget_service.load(&widget_id).await;
    let html = render_page(&view).map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    Ok(Html(html))
}

// GET /widget.js
pub async fn widget_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=300"),
        ],
        LOADER_JS,
    )
}

// GET /api/widget
#[utoipa::path(
    get,
    path = "/api/widget",
    tag = "Widget",
    responses(
        (status = 200, description = "Link de coleta, código de incorporação e QR code", body = EmbedInfo),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_embed_info(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
) -> Result<impl IntoResponse, ApiError> {
    let info = app_state
        .business_service
        .embed_info(&session.business)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(info)))
}
