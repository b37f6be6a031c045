//! Consistent JSON error responses.
//!
//! Every error body is `{"error": <message>, "code": <machine code>}`.
//! Internal failures are logged in full here and reach the client only as a
//! generic message.

use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use filmapi_core::DomainError;
use filmapi_infra::StoreError;

const INTERNAL_MESSAGE: &str = "internal server error";

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
            "code": code,
        })),
    )
        .into_response()
}

/// The process-wide fallback for anything a handler could not classify.
pub fn internal_error(detail: impl core::fmt::Display) -> Response {
    tracing::error!(error = %detail, "unhandled server error");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", INTERNAL_MESSAGE)
}

pub fn store_error_to_response(err: StoreError) -> Response {
    match err {
        StoreError::NotFound(kind) => json_error(StatusCode::NOT_FOUND, "not_found", format!("{kind} not found")),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        StoreError::Internal(detail) => internal_error(detail),
    }
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id format"),
    }
}

/// Malformed JSON, wrong field types, or a missing JSON content type.
pub fn json_rejection_to_response(rejection: JsonRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
}

/// Router fallback for unmatched paths.
pub async fn route_not_found(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "no route matched");
    json_error(StatusCode::NOT_FOUND, "route_not_found", "route not found")
}

/// Converts a handler panic into the generic 500 body.
pub fn panic_to_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    internal_error(format!("handler panicked: {detail}"))
}
