// src/handlers/billing.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{auth::SessionContext, i18n::Locale},
    models::billing::{BillingOverview, ChangePlanPayload},
};

// GET /api/billing
#[utoipa::path(
    get,
    path = "/api/billing",
    tag = "Billing",
    responses(
        (status = 200, description = "Plano atual e catálogo", body = BillingOverview),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_billing(State(app_state): State<AppState>, session: SessionContext) -> impl IntoResponse {
    (StatusCode::OK, Json(app_state.business_service.billing(&session.business)))
}

// PUT /api/billing/plan
#[utoipa::path(
    put,
    path = "/api/billing/plan",
    tag = "Billing",
    request_body = ChangePlanPayload,
    responses(
        (status = 200, description = "Plano alterado (sem cobrança)", body = BillingOverview),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn change_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    session: SessionContext,
    Json(payload): Json<ChangePlanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let overview = app_state
        .business_service
        .change_plan(&session.business, payload.plan)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(overview)))
}
