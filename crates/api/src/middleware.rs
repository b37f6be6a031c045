use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use filmapi_auth::JwtValidator;

use crate::app::errors;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Gate a route behind a bearer token.
///
/// Missing credentials are 401; a token that fails verification (bad
/// signature, expired, malformed) is 403. Token contents are never logged.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(|| {
        errors::json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "access denied, token not found")
    })?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::warn!(reason = %e, path = %req.uri().path(), "token verification failed");
        errors::json_error(StatusCode::FORBIDDEN, "invalid_token", "token is invalid or expired")
    })?;

    req.extensions_mut().insert(PrincipalContext::new(claims.user));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}
