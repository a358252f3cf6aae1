use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;
use crate::transaction::WriteSet;

/// In-memory, BTreeMap-based key-value store.
///
/// Intended for tests and embedding. A commit takes the write lock once, so
/// concurrent readers observe either none or all of a write set.
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryKvStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys in sorted order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.keys().cloned().collect())
    }

    /// Copy of the full state, used to compare replicas in tests.
    pub fn dump(&self) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.clone())
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn apply(&self, writes: &WriteSet) -> StoreResult<()> {
        if writes.keys().any(str::is_empty) {
            return Err(StoreError::EmptyKey);
        }
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        for (key, value) in writes.iter() {
            map.insert(key.to_string(), value.to_vec());
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_key_returns_none() {
        let store = InMemoryKvStore::new();
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn put_then_get() {
        let store = InMemoryKvStore::new();
        store.put("acc1", b"{}").unwrap();
        assert_eq!(store.get("acc1").unwrap(), Some(b"{}".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn put_overwrites() {
        let store = InMemoryKvStore::new();
        store.put("k", b"old").unwrap();
        store.put("k", b"new").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn apply_with_empty_key_writes_nothing() {
        let store = InMemoryKvStore::new();
        let mut ws = WriteSet::new();
        ws.insert("good", b"1".to_vec());
        ws.insert("", b"2".to_vec());
        assert!(store.apply(&ws).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryKvStore::new();
        store.put("b", b"").unwrap();
        store.put("a", b"").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryKvStore::new());
        store.put("shared", b"data").unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    assert_eq!(store.get("shared").unwrap(), Some(b"data".to_vec()));
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryKvStore::new();
        store.put("x", b"1").unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryKvStore"));
        assert!(debug.contains("key_count"));
    }
}
