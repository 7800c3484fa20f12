// ── Read-through list cache ──
//
// Each list controller owns one cache keyed by its full query (page,
// limit, filter). A hit is shown immediately while the refetch runs;
// any successful mutation clears the whole cache.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

pub struct QueryCache<K: Eq + Hash, V> {
    entries: DashMap<K, Arc<Vec<V>>>,
}

impl<K: Eq + Hash, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash, V> QueryCache<K, V> {
    pub fn get(&self, key: &K) -> Option<Arc<Vec<V>>> {
        self.entries.get(key).map(|entry| Arc::clone(entry.value()))
    }

    pub fn insert(&self, key: K, items: Arc<Vec<V>>) {
        self.entries.insert(key, items);
    }

    pub fn invalidate_all(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
