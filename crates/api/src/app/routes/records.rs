//! Handler bodies shared by every flat CRUD resource.
//!
//! Each resource module owns its routes and request DTOs; once the input is
//! shape-checked it delegates here, so status mapping is identical across
//! resources.

use core::str::FromStr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use filmapi_core::{DomainError, DomainResult, Record};
use filmapi_infra::RecordStore;

use crate::app::errors;

/// Parse a path identifier; malformed ids are a 400 before the store is called.
pub fn parse_id<R>(raw: &str) -> Result<R::Id, Response>
where
    R: Record,
    R::Id: FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}

pub async fn list<R>(store: &dyn RecordStore<R>) -> Response
where
    R: Record + Serialize,
{
    match store.list().await {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get<R>(store: &dyn RecordStore<R>, raw_id: &str) -> Response
where
    R: Record + Serialize,
    R::Id: FromStr<Err = DomainError>,
{
    let id = match parse_id::<R>(raw_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match store.get(id).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create<R>(store: &dyn RecordStore<R>, fields: DomainResult<R::Fields>) -> Response
where
    R: Record + Serialize,
{
    let fields = match fields {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match store.create(fields).await {
        Ok(record) => {
            tracing::info!(kind = R::KIND, id = ?record.id(), "record created");
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn replace<R>(store: &dyn RecordStore<R>, raw_id: &str, fields: DomainResult<R::Fields>) -> Response
where
    R: Record + Serialize,
    R::Id: FromStr<Err = DomainError>,
{
    let id = match parse_id::<R>(raw_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    let fields = match fields {
        Ok(f) => f,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match store.replace(id, fields).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete<R>(store: &dyn RecordStore<R>, raw_id: &str) -> Response
where
    R: Record,
    R::Id: FromStr<Err = DomainError>,
{
    let id = match parse_id::<R>(raw_id) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match store.delete(id).await {
        Ok(()) => {
            tracing::info!(kind = R::KIND, id = ?id, "record deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
