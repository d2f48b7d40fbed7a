//! In-memory record store
//!
//! Backs the fixture API and the in-memory client transport. The store is an
//! explicit value owned by whoever creates it; nothing here is global.
//! Ordering is most-recently-created-or-edited first.

use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{FormdeskError, FormdeskResult};
use crate::record::{Payload, Record};
use crate::search::SearchRule;

/// Ordered in-memory collection of records
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<Vec<Record>>,
    search: SearchRule,
}

impl RecordStore {
    /// Empty store with the default search rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store with a custom search rule
    pub fn with_search_rule(search: SearchRule) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            search,
        }
    }

    /// Replace the contents, keeping the given order
    pub fn with_records(self, records: Vec<Record>) -> Self {
        *self.records.write() = records;
        self
    }

    /// Snapshot of every record, in stored order
    pub fn list(&self) -> Vec<Record> {
        self.records.read().clone()
    }

    /// Records matching `term` under the store's search rule
    pub fn search(&self, term: &str) -> Vec<Record> {
        self.search.filter(self.records.read().iter(), term)
    }

    /// Record by id
    pub fn get(&self, id: &str) -> Option<Record> {
        self.records.read().iter().find(|r| r.id == id).cloned()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when the store is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Insert a record under a fresh id at the front
    pub fn create(&self, payload: Payload) -> Record {
        let record = Record::new(Uuid::new_v4().to_string(), payload);
        self.records.write().insert(0, record.clone());
        debug!(id = %record.id, "record created");
        record
    }

    /// Merge `payload` over the record and move it to the front
    pub fn update(&self, id: &str, payload: &Payload) -> FormdeskResult<Record> {
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| FormdeskError::NotFound(id.to_string()))?;
        let mut record = records.remove(index);
        record.merge(payload);
        records.insert(0, record.clone());
        debug!(id, from = index, "record updated");
        Ok(record)
    }

    /// Remove the record. Remaining order is untouched.
    pub fn delete(&self, id: &str) -> FormdeskResult<Record> {
        let mut records = self.records.write();
        let index = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| FormdeskError::NotFound(id.to_string()))?;
        debug!(id, "record deleted");
        Ok(records.remove(index))
    }
}
