use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use filmapi_core::Record;

use super::r#trait::{RecordStore, StoreError, StoreResult};

#[derive(Debug)]
struct Table<R: Record> {
    rows: BTreeMap<R::Id, R>,
    /// Last assigned id; ids are never reused, even after deletes.
    last_id: i64,
}

/// In-memory record store.
///
/// Intended for tests/dev. Mirrors the Postgres adapter: sequential ids
/// starting at 1, `NotFound` for unknown ids.
#[derive(Debug)]
pub struct InMemoryRecordStore<R: Record> {
    table: RwLock<Table<R>>,
}

impl<R: Record> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(kind: &str) -> StoreError {
    StoreError::Internal(format!("{kind} table lock poisoned"))
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryRecordStore<R> {
    async fn list(&self) -> StoreResult<Vec<R>> {
        let table = self.table.read().map_err(|_| poisoned(R::KIND))?;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: R::Id) -> StoreResult<R> {
        let table = self.table.read().map_err(|_| poisoned(R::KIND))?;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(R::KIND))
    }

    async fn create(&self, fields: R::Fields) -> StoreResult<R> {
        let mut table = self.table.write().map_err(|_| poisoned(R::KIND))?;
        table.last_id += 1;
        let id = R::id_from_i64(table.last_id);
        let now = Utc::now();
        let record = R::from_parts(id, fields, now, now);
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn replace(&self, id: R::Id, fields: R::Fields) -> StoreResult<R> {
        let mut table = self.table.write().map_err(|_| poisoned(R::KIND))?;
        let existing = table.rows.get_mut(&id).ok_or(StoreError::NotFound(R::KIND))?;
        *existing = R::from_parts(id, fields, existing.created_at(), Utc::now());
        Ok(existing.clone())
    }

    async fn delete(&self, id: R::Id) -> StoreResult<()> {
        let mut table = self.table.write().map_err(|_| poisoned(R::KIND))?;
        table.rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(R::KIND))
    }
}
