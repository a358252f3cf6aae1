//! Single-file backend used by the `rll` binary.
//!
//! The whole state lives in one JSON object mapping keys to hex-encoded
//! values. Every commit writes a complete new file next to the old one and
//! renames it into place, so a crash leaves either the old or the new state.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::traits::KvStore;
use crate::transaction::WriteSet;

/// Key-value store persisted to a single JSON file.
pub struct FileKvStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl FileKvStore {
    /// Open the state file at `path`, or start empty if it does not exist.
    /// The file is only created by the first commit.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read(&path)?;
            decode_state(&raw)?
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), keys = entries.len(), "state file opened");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let encoded: BTreeMap<&str, String> = entries
            .iter()
            .map(|(k, v)| (k.as_str(), hex::encode(v)))
            .collect();
        let bytes = serde_json::to_vec_pretty(&encoded)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %self.path.display(), keys = entries.len(), "state file written");
        Ok(())
    }

    fn commit(&self, writes: &WriteSet) -> StoreResult<()> {
        if writes.keys().any(str::is_empty) {
            return Err(StoreError::EmptyKey);
        }
        let mut map = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut next = map.clone();
        for (key, value) in writes.iter() {
            next.insert(key.to_string(), value.to_vec());
        }
        // The in-memory view only advances once the file is durable.
        self.persist(&next)?;
        *map = next;
        Ok(())
    }
}

fn decode_state(raw: &[u8]) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    let encoded: BTreeMap<String, String> =
        serde_json::from_slice(raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
    encoded
        .into_iter()
        .map(|(k, v)| {
            let bytes = hex::decode(&v)
                .map_err(|e| StoreError::Serialization(format!("key '{k}': {e}")))?;
            Ok((k, bytes))
        })
        .collect()
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut single = WriteSet::new();
        single.insert(key, value.to_vec());
        self.commit(&single)
    }

    fn apply(&self, writes: &WriteSet) -> StoreResult<()> {
        self.commit(writes)
    }
}

impl std::fmt::Debug for FileKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKvStore")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("state.json")).unwrap();
        assert!(store.get("anything").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileKvStore::open(&path).unwrap();
        let mut ws = WriteSet::new();
        ws.insert("acc1", b"{\"id\":\"acc1\"}".to_vec());
        ws.insert("_accounts", b"[\"acc1\"]".to_vec());
        store.apply(&ws).unwrap();
        drop(store);

        let reopened = FileKvStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("_accounts").unwrap(),
            Some(b"[\"acc1\"]".to_vec())
        );
        assert_eq!(
            reopened.get("acc1").unwrap(),
            Some(b"{\"id\":\"acc1\"}".to_vec())
        );
    }

    #[test]
    fn values_are_hex_encoded_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let store = FileKvStore::open(&path).unwrap();
        store.put("k", &[0xde, 0xad]).unwrap();

        let raw: BTreeMap<String, String> =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["k"], "dead");
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"{\"k\": \"not-hex\"}").unwrap();
        assert!(matches!(
            FileKvStore::open(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn rejected_commit_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("state.json")).unwrap();
        store.put("a", b"1").unwrap();

        let mut ws = WriteSet::new();
        ws.insert("a", b"2".to_vec());
        ws.insert("", b"x".to_vec());
        assert!(store.apply(&ws).is_err());
        assert_eq!(store.get("a").unwrap(), Some(b"1".to_vec()));
    }
}
