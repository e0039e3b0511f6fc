// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::{auth::User, business::Business},
};

/// Contexto de sessão entregue explicitamente a cada handler do painel.
/// Criado no login/cadastro, destruído no logout (a linha em `sessions` some).
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub user: User,
    pub business: Business,
}

// Valida o Bearer token, confere a sessão e carrega o negócio do usuário
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

    let session = app_state
        .auth_service
        .resolve_session(bearer.token())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| ApiError {
                status: AppError::InvalidToken.status(),
                code: AppError::InvalidToken.code(),
                error: "Authentication token is invalid or missing.".into(),
                details: None,
            })
    }
}
