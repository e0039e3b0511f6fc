// src/app.rs

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

// Foto (5MB) + campos de texto com folga
const BODY_LIMIT: usize = 8 * 1024 * 1024;

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login));

    // Sessão obrigatória
    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::get_me))
        .route("/reviews", get(handlers::reviews::list_reviews))
        .route("/reviews/{id}/status", patch(handlers::reviews::update_status))
        .route("/reviews/{id}/sentiment", post(handlers::reviews::analyze_sentiment))
        .route("/reviews/{id}/social-card", post(handlers::reviews::generate_social_card))
        .route("/dashboard/summary", get(handlers::dashboard::get_summary))
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/settings/logo", post(handlers::settings::upload_logo))
        .route("/billing", get(handlers::billing::get_billing))
        .route("/billing/plan", put(handlers::billing::change_plan))
        .route("/widget", get(handlers::widget::get_embed_info))
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Widget e formulário rodam no site do cliente: CORS aberto
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let public_routes = Router::new()
        .route("/widget/{widget_id}", get(handlers::widget::get_widget_data))
        .route("/businesses/{widget_id}", get(handlers::public::get_business))
        .route("/businesses/{widget_id}/reviews", post(handlers::public::submit_review))
        .layer(cors);

    let storage = ServeDir::new(&app_state.config.storage_root);

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/public", public_routes)
        .nest("/api", session_routes)
        .route("/widget/{widget_id}", get(handlers::widget::render_widget))
        .route("/widget.js", get(handlers::widget::widget_script))
        .nest_service("/storage", storage)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
