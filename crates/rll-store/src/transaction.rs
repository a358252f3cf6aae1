use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{KvStore, StateView, StateWriter};

/// Writes staged by one invocation, ordered by key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteSet {
    entries: BTreeMap<String, Vec<u8>>,
}

impl WriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `value` at `key`, replacing any earlier staged value.
    pub fn insert(&mut self, key: impl Into<String>, value: Vec<u8>) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Staged keys in commit order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// A staged view over a store for a single mutating invocation.
///
/// Reads see the invocation's own staged writes first. Nothing reaches the
/// store until [`Transaction::commit`]; dropping the transaction discards it.
pub struct Transaction<'s> {
    store: &'s dyn KvStore,
    writes: WriteSet,
}

impl<'s> Transaction<'s> {
    pub fn begin(store: &'s dyn KvStore) -> Self {
        Self {
            store,
            writes: WriteSet::new(),
        }
    }

    /// The writes staged so far.
    pub fn write_set(&self) -> &WriteSet {
        &self.writes
    }

    /// Apply the staged writes atomically and return how many keys were
    /// written. An empty transaction does not touch the store.
    pub fn commit(self) -> StoreResult<usize> {
        let count = self.writes.len();
        if count == 0 {
            return Ok(0);
        }
        self.store.apply(&self.writes)?;
        debug!(keys = count, "transaction committed");
        Ok(count)
    }
}

impl StateView for Transaction<'_> {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if let Some(staged) = self.writes.get(key) {
            return Ok(Some(staged.to_vec()));
        }
        self.store.get(key)
    }
}

impl StateWriter for Transaction<'_> {
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::EmptyKey);
        }
        self.writes.insert(key, value);
        Ok(())
    }
}

/// Read-only view over a store for query invocations.
pub struct Snapshot<'s> {
    store: &'s dyn KvStore,
}

impl<'s> Snapshot<'s> {
    pub fn new(store: &'s dyn KvStore) -> Self {
        Self { store }
    }
}

impl StateView for Snapshot<'_> {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.store.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryKvStore;

    #[test]
    fn staged_writes_are_visible_inside_transaction() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        tx.put_state("k", b"v".to_vec()).unwrap();
        assert_eq!(tx.get_state("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn commit_publishes_all_writes() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        tx.put_state("a", b"1".to_vec()).unwrap();
        tx.put_state("b", b"2".to_vec()).unwrap();
        assert_eq!(tx.commit().unwrap(), 2);
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
        assert_eq!(store.get("b").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn dropped_transaction_leaves_store_untouched() {
        let store = InMemoryKvStore::new();
        {
            let mut tx = Transaction::begin(&store);
            tx.put_state("a", b"1".to_vec()).unwrap();
        }
        assert!(store.is_empty());
    }

    #[test]
    fn later_write_replaces_earlier_one() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        tx.put_state("a", b"1".to_vec()).unwrap();
        tx.put_state("a", b"2".to_vec()).unwrap();
        assert_eq!(tx.write_set().len(), 1);
        tx.commit().unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn empty_key_is_rejected() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        assert!(matches!(
            tx.put_state("", vec![]),
            Err(StoreError::EmptyKey)
        ));
    }

    #[test]
    fn empty_commit_is_noop() {
        let store = InMemoryKvStore::new();
        assert_eq!(Transaction::begin(&store).commit().unwrap(), 0);
    }

    #[test]
    fn write_set_iterates_in_key_order() {
        let mut ws = WriteSet::new();
        ws.insert("zeta", vec![]);
        ws.insert("alpha", vec![]);
        ws.insert("mid", vec![]);
        let keys: Vec<&str> = ws.keys().collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn snapshot_reads_through() {
        let store = InMemoryKvStore::new();
        store.put("k", b"v").unwrap();
        let snap = Snapshot::new(&store);
        assert_eq!(snap.get_state("k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(snap.get_state("missing").unwrap(), None);
    }
}
