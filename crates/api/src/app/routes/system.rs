use axum::{response::IntoResponse, Json};

pub const SERVICE_NAME: &str = "film-api";

pub async fn status() -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "service": SERVICE_NAME,
    }))
}
