//! Remote collection client

use formdesk_common::{FieldSchema, FormdeskResult, Payload, Record};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use crate::cache::{QueryCache, QueryKey};
use crate::transport::CollectionTransport;

/// Handle for one search request. Only the most recently issued ticket's
/// response is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    term: String,
    generation: u64,
}

impl SearchTicket {
    /// Searched term
    pub fn term(&self) -> &str {
        &self.term
    }
}

/// CRUD and search for one collection, with cached reads.
///
/// Reads are served from the cache when possible. Every successful mutation
/// invalidates the cache before returning, so the next read goes to the
/// backend.
pub struct RemoteCollectionClient<T> {
    transport: T,
    cache: QueryCache,
    search_generation: AtomicU64,
}

impl<T: CollectionTransport> RemoteCollectionClient<T> {
    /// Client over `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            cache: QueryCache::new(),
            search_generation: AtomicU64::new(0),
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The read cache
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Form schema for this collection. Not cached here; see
    /// [`SchemaFetcher`](crate::SchemaFetcher).
    pub async fn fetch_schema(&self) -> FormdeskResult<Vec<FieldSchema>> {
        self.transport.fetch_schema().await
    }

    /// Whole collection, newest first
    pub async fn list(&self) -> FormdeskResult<Vec<Record>> {
        self.read(QueryKey::List).await
    }

    /// Records matching `term`. An empty term lists everything.
    pub async fn search(&self, term: &str) -> FormdeskResult<Vec<Record>> {
        if term.is_empty() {
            return self.list().await;
        }
        self.read(QueryKey::search(term)).await
    }

    /// Start a search, superseding every earlier ticket
    pub fn begin_search(&self, term: &str) -> SearchTicket {
        let generation = self.search_generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            term: term.to_string(),
            generation,
        }
    }

    /// Run a ticket's search. `Ok(None)` when a newer search started while
    /// this one was in flight, whether this one succeeded or failed.
    pub async fn run_search(&self, ticket: &SearchTicket) -> FormdeskResult<Option<Vec<Record>>> {
        let result = self.search(&ticket.term).await;
        if self.search_generation.load(Ordering::SeqCst) != ticket.generation {
            warn!(term = %ticket.term, failed = result.is_err(), "discarding stale search response");
            return Ok(None);
        }
        result.map(Some)
    }

    /// Search and drop the result if superseded
    pub async fn search_latest(&self, term: &str) -> FormdeskResult<Option<Vec<Record>>> {
        let ticket = self.begin_search(term);
        self.run_search(&ticket).await
    }

    /// Create a record; it becomes the first element of the collection
    pub async fn create(&self, payload: &Payload) -> FormdeskResult<Record> {
        let record = self.transport.create(payload).await?;
        self.cache.invalidate_all();
        info!(id = %record.id, "record created");
        Ok(record)
    }

    /// Merge `payload` into record `id`; it moves to the front
    pub async fn update(&self, id: &str, payload: &Payload) -> FormdeskResult<Record> {
        let record = self.transport.update(id, payload).await?;
        self.cache.invalidate_all();
        info!(id, "record updated");
        Ok(record)
    }

    /// Remove record `id`
    pub async fn delete(&self, id: &str) -> FormdeskResult<()> {
        self.transport.delete(id).await?;
        self.cache.invalidate_all();
        info!(id, "record deleted");
        Ok(())
    }

    /// Drop every cached read
    pub fn refresh(&self) {
        self.cache.invalidate_all();
    }

    async fn read(&self, key: QueryKey) -> FormdeskResult<Vec<Record>> {
        if let Some(hit) = self.cache.get(&key) {
            debug!(?key, "cache hit");
            return Ok(hit);
        }
        debug!(?key, "cache miss");
        let epoch = self.cache.epoch();
        let records = match &key {
            QueryKey::List => self.transport.list().await,
            QueryKey::Search(term) => self.transport.search(term).await,
        }
        .map_err(|err| {
            warn!(?key, error = %err, "read failed");
            err
        })?;
        self.cache.store_if_current(key, records.clone(), epoch);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::InMemoryTransport;
    use formdesk_common::{user_plan_schema, FormdeskError, RecordStore};
    use std::sync::Arc;

    fn client() -> (RemoteCollectionClient<InMemoryTransport>, InMemoryTransport) {
        let transport = InMemoryTransport::new(Arc::new(RecordStore::new()), user_plan_schema());
        (RemoteCollectionClient::new(transport.clone()), transport)
    }

    fn titled(title: &str) -> Payload {
        Payload::from([("title".to_string(), title.to_string())])
    }

    fn titles(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.get_or_empty("title")).collect()
    }

    #[tokio::test]
    async fn test_create_order_newest_first() {
        let (client, _) = client();
        let a = client.create(&titled("A")).await.unwrap();
        let b = client.create(&titled("B")).await.unwrap();
        assert_ne!(a.id, b.id);

        let list = client.list().await.unwrap();
        assert_eq!(titles(&list), vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_created_record_reads_back_equal() {
        let (client, _) = client();
        let payload = Payload::from([
            ("title".to_string(), "Trip".to_string()),
            ("description".to_string(), "".to_string()),
            ("startDate".to_string(), "1/2/2024".to_string()),
        ]);
        let created = client.create(&payload).await.unwrap();
        assert_eq!(created.fields, payload);

        let listed = client.list().await.unwrap();
        assert_eq!(listed[0], created);
    }

    #[tokio::test]
    async fn test_update_unknown_and_known() {
        let (client, _) = client();
        let a = client.create(&titled("A")).await.unwrap();
        client.create(&titled("B")).await.unwrap();

        let err = client.update("nope", &titled("X")).await.unwrap_err();
        assert_eq!(err, FormdeskError::NotFound("nope".into()));

        let updated = client
            .update(&a.id, &Payload::from([("description".to_string(), "d".to_string())]))
            .await
            .unwrap();
        let list = client.list().await.unwrap();
        assert_eq!(list[0], updated);
        assert_eq!(list[0].get("title"), Some("A"));
        assert_eq!(list[0].get("description"), Some("d"));
        assert_eq!(list[1].get("title"), Some("B"));
    }

    #[tokio::test]
    async fn test_delete_missing_keeps_collection() {
        let (client, _) = client();
        client.create(&titled("A")).await.unwrap();

        let err = client.delete("missing-id").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(client.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reads_are_cached_until_mutation() {
        let (client, transport) = client();
        client.create(&titled("A")).await.unwrap();

        client.list().await.unwrap();
        let calls = transport.calls();
        client.list().await.unwrap();
        assert_eq!(transport.calls(), calls);

        // A write behind the client's back is invisible until refresh
        transport.store().create(titled("Z"));
        assert_eq!(client.list().await.unwrap().len(), 1);
        client.refresh();
        assert_eq!(client.list().await.unwrap().len(), 2);

        client.create(&titled("B")).await.unwrap();
        assert_eq!(titles(&client.list().await.unwrap())[0], "B");
    }

    #[tokio::test]
    async fn test_search_cached_per_term_and_invalidated() {
        let (client, transport) = client();
        client.create(&titled("Beach")).await.unwrap();
        client.create(&titled("Ski")).await.unwrap();

        assert_eq!(titles(&client.search("BEA").await.unwrap()), vec!["Beach"]);
        let calls = transport.calls();
        client.search("bea").await.unwrap();
        assert_eq!(transport.calls(), calls);

        client.create(&titled("Beanie")).await.unwrap();
        assert_eq!(client.search("bea").await.unwrap().len(), 2);
        assert_eq!(client.search("").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_stale_search_discarded() {
        let (client, _) = client();
        client.create(&titled("alpha")).await.unwrap();

        let first = client.begin_search("a");
        let second = client.begin_search("al");
        assert_eq!(client.run_search(&first).await.unwrap(), None);
        assert_eq!(client.run_search(&second).await.unwrap().map(|r| r.len()), Some(1));
        assert_eq!(second.term(), "al");
    }

    #[tokio::test]
    async fn test_stale_search_failure_discarded() {
        let (client, transport) = client();
        client.create(&titled("alpha")).await.unwrap();

        let first = client.begin_search("a");
        let second = client.begin_search("ab");
        transport.fail_next(FormdeskError::Transport("boom".into()));
        assert_eq!(client.run_search(&first).await, Ok(None));

        transport.fail_next(FormdeskError::Transport("boom".into()));
        assert_eq!(
            client.run_search(&second).await,
            Err(FormdeskError::Transport("boom".into()))
        );
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_cache() {
        let (client, transport) = client();
        client.create(&titled("A")).await.unwrap();
        client.list().await.unwrap();

        transport.fail_next(FormdeskError::Transport("connection reset".into()));
        assert!(matches!(
            client.create(&titled("B")).await,
            Err(FormdeskError::Transport(_))
        ));
        assert_eq!(client.cache().len(), 1);
        assert_eq!(transport.store().len(), 1);
    }
}
