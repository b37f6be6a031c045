use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    routing::{get, post, put},
    Json, Router,
};

use filmapi_core::Director;

use crate::app::{dto, errors, services::AppServices};
use crate::app::routes::{or_not_found, records};
use crate::middleware::{auth_middleware, AuthState};

pub fn router(auth_state: AuthState) -> Router {
    let authenticated = axum::middleware::from_fn_with_state(auth_state, auth_middleware);

    Router::new()
        .route(
            "/",
            or_not_found(get(list_directors).merge(post(create_director).route_layer(authenticated.clone()))),
        )
        .route(
            "/:id",
            or_not_found(
                get(get_director).merge(put(replace_director).delete(delete_director).route_layer(authenticated)),
            ),
        )
}

pub async fn list_directors(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    records::list::<Director>(&*services.directors).await
}

pub async fn get_director(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    records::get::<Director>(&*services.directors, &id).await
}

pub async fn create_director(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::DirectorRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    records::create::<Director>(&*services.directors, body.into_fields()).await
}

pub async fn replace_director(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::DirectorRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return errors::json_rejection_to_response(rejection),
    };
    records::replace::<Director>(&*services.directors, &id, body.into_fields()).await
}

pub async fn delete_director(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    records::delete::<Director>(&*services.directors, &id).await
}
