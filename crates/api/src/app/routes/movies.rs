use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::{get, post, put},
    Json, Router,
};

use filmapi_core::Movie;

use crate::app::{dto, errors, services::AppServices};
use crate::app::routes::{or_not_found, records};
use crate::middleware::{auth_middleware, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let authenticated = axum::middleware::from_fn_with_state(auth_state, auth_middleware);

    Router::new()
        .route(
            "/",
            or_not_found(get(list_movies).merge(post(create_movie).route_layer(authenticated.clone()))),
        )
        .route(
            "/:id",
            or_not_found(
                get(get_movie).merge(put(replace_movie).delete(delete_movie).route_layer(authenticated)),
            ),
        )
}

pub async fn list_movies(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    records::list::<Movie>(&*services.movies).await
}

pub async fn get_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    records::get::<Movie>(&*services.movies, &id).await
}

pub async fn create_movie(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::MovieRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    records::create::<Movie>(&*services.movies, body.into_fields()).await
}

pub async fn replace_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::MovieRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    records::replace::<Movie>(&*services.movies, &id, body.into_fields()).await
}

pub async fn delete_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    records::delete::<Movie>(&*services.movies, &id).await
}
