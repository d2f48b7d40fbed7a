//! Transport seam between the collection client and the backend

use async_trait::async_trait;
use formdesk_common::{FieldSchema, FormdeskError, FormdeskResult, Payload, Record, RecordStore};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Raw CRUD calls for one resource collection
#[async_trait]
pub trait CollectionTransport: Send + Sync {
    /// Field schema for the collection's form
    async fn fetch_schema(&self) -> FormdeskResult<Vec<FieldSchema>>;

    /// Whole collection, stored order
    async fn list(&self) -> FormdeskResult<Vec<Record>>;

    /// Records matching `term`
    async fn search(&self, term: &str) -> FormdeskResult<Vec<Record>>;

    /// Create a record; the backend assigns the id
    async fn create(&self, payload: &Payload) -> FormdeskResult<Record>;

    /// Merge `payload` into the record
    async fn update(&self, id: &str, payload: &Payload) -> FormdeskResult<Record>;

    /// Remove the record
    async fn delete(&self, id: &str) -> FormdeskResult<()>;
}

/// Transport over an explicit [`RecordStore`], for tests and offline use.
///
/// Clones share the store, the call counter and the pending failure.
#[derive(Debug, Clone)]
pub struct InMemoryTransport {
    store: Arc<RecordStore>,
    schema: Arc<Vec<FieldSchema>>,
    calls: Arc<AtomicUsize>,
    fail_next: Arc<Mutex<Option<FormdeskError>>>,
}

impl InMemoryTransport {
    /// Transport serving `schema` over `store`
    pub fn new(store: Arc<RecordStore>, schema: Vec<FieldSchema>) -> Self {
        Self {
            store,
            schema: Arc::new(schema),
            calls: Arc::new(AtomicUsize::new(0)),
            fail_next: Arc::new(Mutex::new(None)),
        }
    }

    /// The backing store
    pub fn store(&self) -> &Arc<RecordStore> {
        &self.store
    }

    /// Calls made so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make the next call fail with `err` without touching the store
    pub fn fail_next(&self, err: FormdeskError) {
        *self.fail_next.lock() = Some(err);
    }

    fn enter(&self) -> FormdeskResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_next.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CollectionTransport for InMemoryTransport {
    async fn fetch_schema(&self) -> FormdeskResult<Vec<FieldSchema>> {
        self.enter()?;
        Ok(self.schema.as_ref().clone())
    }

    async fn list(&self) -> FormdeskResult<Vec<Record>> {
        self.enter()?;
        Ok(self.store.list())
    }

    async fn search(&self, term: &str) -> FormdeskResult<Vec<Record>> {
        self.enter()?;
        Ok(self.store.search(term))
    }

    async fn create(&self, payload: &Payload) -> FormdeskResult<Record> {
        self.enter()?;
        Ok(self.store.create(payload.clone()))
    }

    async fn update(&self, id: &str, payload: &Payload) -> FormdeskResult<Record> {
        self.enter()?;
        self.store.update(id, payload)
    }

    async fn delete(&self, id: &str) -> FormdeskResult<()> {
        self.enter()?;
        self.store.delete(id).map(|_| ())
    }
}
