//! Infrastructure layer: the record store adapters behind the HTTP handlers.
//!
//! - `record_store`: movies and directors (in-memory and Postgres)
//! - `user_store`: registered users
//! - `schema`: table bootstrap for Postgres

pub mod record_store;
pub mod schema;
pub mod user_store;

pub use record_store::{InMemoryRecordStore, PostgresStore, RecordStore, StoreError, StoreResult};
pub use user_store::{InMemoryUserStore, UserStore};
