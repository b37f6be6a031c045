use axum::{
    routing::{get, MethodRouter},
    Router,
};

use crate::app::errors;
use crate::middleware::AuthState;

pub mod auth;
pub mod directors;
pub mod movies;
pub mod records;
pub mod system;

/// Router for every endpoint. Write routes sit behind the auth middleware;
/// reads are public.
pub fn router(auth_state: AuthState) -> Router {
    Router::new()
        .route("/status", or_not_found(get(system::status)))
        .nest("/movies", movies::router(auth_state.clone()))
        .nest("/directors", directors::router(auth_state.clone()))
        .nest("/auth", auth::router(auth_state))
}

/// A known path with an unhandled method answers like an unknown path.
///
/// The fallback sits outside any `route_layer`, so it never asks for a token.
pub(crate) fn or_not_found(route: MethodRouter) -> MethodRouter {
    route.fallback(errors::route_not_found)
}
