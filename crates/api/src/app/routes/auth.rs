//! Registration, login and identity echo.
//!
//! Passwords are hashed and verified on the blocking pool; neither the
//! plaintext nor the hash is ever logged.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use filmapi_auth::{
    hash_password, verify_password, Identity, JwtIssuer, PasswordError, MIN_PASSWORD_LEN,
};
use filmapi_core::{NewUser, DEFAULT_ROLE};
use filmapi_infra::{StoreError, UserStore};

use crate::app::{dto, errors, services::AppServices};
use crate::app::routes::or_not_found;
use crate::context::PrincipalContext;
use crate::middleware::{auth_middleware, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/register", or_not_found(post(register)))
        .route("/login", or_not_found(post(login)))
        .route(
            "/me",
            or_not_found(get(me).route_layer(axum::middleware::from_fn_with_state(auth_state, auth_middleware))),
        )
}

fn credentials_required() -> Response {
    errors::json_error(
        StatusCode::BAD_REQUEST,
        "validation_error",
        format!("username and password (min {MIN_PASSWORD_LEN} chars) are required"),
    )
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CredentialsRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let Some((username, password)) = body.into_parts() else {
        return credentials_required();
    };

    let password_hash = match tokio::task::spawn_blocking(move || hash_password(&password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(PasswordError::TooShort)) => return credentials_required(),
        Ok(Err(e)) => return errors::internal_error(e),
        Err(join) => return errors::internal_error(join),
    };

    let new_user = NewUser {
        username,
        password_hash,
        role: DEFAULT_ROLE.to_string(),
    };

    match services.users.create_user(new_user).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, username = %user.username, "user registered");
            (
                StatusCode::CREATED,
                Json(dto::RegisteredUser {
                    id: user.id,
                    username: user.username,
                }),
            )
                .into_response()
        }
        Err(StoreError::Conflict(_)) => {
            errors::json_error(StatusCode::CONFLICT, "username_taken", "username is already taken")
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CredentialsRequest>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    let Some((username, password)) = body.into_parts() else {
        return credentials_required();
    };

    let invalid = || errors::json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid username or password");

    let user = match services.users.find_user_by_username(&username).await {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            tracing::info!(username = %username, "login rejected: unknown user");
            return invalid();
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let stored_hash = user.password_hash.clone();
    match tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash)).await {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => {
            tracing::info!(username = %username, "login rejected: wrong password");
            return invalid();
        }
        Ok(Err(e)) => return errors::internal_error(e),
        Err(join) => return errors::internal_error(join),
    }

    let (token, claims) = match services.jwt.issue(Identity::from(&user), Utc::now()) {
        Ok(issued) => issued,
        Err(e) => return errors::internal_error(e),
    };

    tracing::info!(user_id = %user.id, "login succeeded");
    (
        StatusCode::OK,
        Json(dto::TokenResponse {
            token,
            token_type: "Bearer",
            expires_at: claims.expires_at(),
        }),
    )
        .into_response()
}

pub async fn me(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(principal.identity().clone())
}
