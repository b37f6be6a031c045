//! Record store adapters: a thin, pass-through interface over the database.

mod in_memory;
mod postgres;
mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use postgres::PostgresStore;
pub use r#trait::{RecordStore, StoreError, StoreResult};
