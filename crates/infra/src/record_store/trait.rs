use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use filmapi_core::Record;

pub type StoreResult<T> = Result<T, StoreError>;

/// Record store operation error.
///
/// These are the only failure shapes handlers see. Anything the store
/// cannot classify is `Internal`; its detail is for server logs only.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the given id (the payload is the record kind).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A store-level constraint rejected the data.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("internal store error: {0}")]
    Internal(String),
}

/// CRUD over one record type.
///
/// Implementations perform no business validation: `fields` arrive already
/// checked by the caller, and the store only enforces its own constraints.
/// Identifiers and `created_at` are assigned here and never change.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<R>>;

    async fn get(&self, id: R::Id) -> StoreResult<R>;

    async fn create(&self, fields: R::Fields) -> StoreResult<R>;

    /// Replace every client-owned field of an existing record.
    async fn replace(&self, id: R::Id, fields: R::Fields) -> StoreResult<R>;

    async fn delete(&self, id: R::Id) -> StoreResult<()>;
}

#[async_trait]
impl<R, S> RecordStore<R> for Arc<S>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    async fn list(&self) -> StoreResult<Vec<R>> {
        (**self).list().await
    }

    async fn get(&self, id: R::Id) -> StoreResult<R> {
        (**self).get(id).await
    }

    async fn create(&self, fields: R::Fields) -> StoreResult<R> {
        (**self).create(fields).await
    }

    async fn replace(&self, id: R::Id, fields: R::Fields) -> StoreResult<R> {
        (**self).replace(id, fields).await
    }

    async fn delete(&self, id: R::Id) -> StoreResult<()> {
        (**self).delete(id).await
    }
}
