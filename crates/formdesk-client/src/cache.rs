//! Query cache

use dashmap::DashMap;
use formdesk_common::Record;
use parking_lot::RwLock;
use tracing::debug;

/// Identity of a read
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// Whole collection
    List,
    /// Search for a lower-cased term
    Search(String),
}

impl QueryKey {
    /// Key for a search; case does not change the result set
    pub fn search(term: &str) -> Self {
        Self::Search(term.to_lowercase())
    }
}

/// Read results keyed by query, no expiry.
///
/// Every invalidation bumps an epoch. A read captures the epoch before it
/// starts and is only written back if no invalidation happened meanwhile.
/// Write-backs hold the epoch lock shared and invalidation holds it
/// exclusively, so no write-back can land between a bump and the clear.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, Vec<Record>>,
    epoch: RwLock<u64>,
}

impl QueryCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result
    pub fn get(&self, key: &QueryKey) -> Option<Vec<Record>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Current epoch
    pub fn epoch(&self) -> u64 {
        *self.epoch.read()
    }

    /// Store `records` if the cache was not invalidated since `epoch`
    pub fn store_if_current(&self, key: QueryKey, records: Vec<Record>, epoch: u64) -> bool {
        let current = self.epoch.read();
        if *current != epoch {
            debug!(?key, "dropping read that raced a mutation");
            return false;
        }
        self.entries.insert(key, records);
        true
    }

    /// Mark everything stale
    pub fn invalidate_all(&self) {
        let mut epoch = self.epoch.write();
        *epoch += 1;
        self.entries.clear();
    }

    /// Number of cached queries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidation_blocks_stale_writes() {
        let cache = QueryCache::new();
        let epoch = cache.epoch();
        cache.invalidate_all();
        assert!(!cache.store_if_current(QueryKey::List, vec![], epoch));
        assert!(cache.get(&QueryKey::List).is_none());

        assert!(cache.store_if_current(QueryKey::List, vec![], cache.epoch()));
        assert_eq!(cache.len(), 1);
        cache.invalidate_all();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_invalidation_leaves_no_stale_entry() {
        let cache = std::sync::Arc::new(QueryCache::new());
        let writers: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let epoch = cache.epoch();
                        cache.store_if_current(QueryKey::List, vec![], epoch);
                    }
                })
            })
            .collect();
        for _ in 0..500 {
            cache.invalidate_all();
        }
        for writer in writers {
            writer.join().unwrap();
        }
        cache.invalidate_all();
        let epoch = cache.epoch();
        assert!(cache.is_empty());
        assert!(!cache.store_if_current(QueryKey::List, vec![], epoch - 1));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_search_key_ignores_case() {
        assert_eq!(QueryKey::search("Trip"), QueryKey::search("tRIP"));
        assert_ne!(QueryKey::search("a"), QueryKey::List);
    }
}
