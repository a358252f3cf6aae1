use rll_store::{StateView, StateWriter, StoreError};
use tracing::debug;

use crate::error::{IndexError, IndexResult};

/// Index of all registered account ids.
pub const ACCOUNT_INDEX: &str = "_accounts";
/// Index of all registered track ids, in registration order.
pub const TRACK_INDEX: &str = "_tracks";

/// Read the identifiers stored at `index_key`, in insertion order.
///
/// An absent key is an empty index, not an error.
pub fn read_index<V>(state: &V, index_key: &str) -> IndexResult<Vec<String>>
where
    V: StateView + ?Sized,
{
    match state.get_state(index_key)? {
        None => Ok(Vec::new()),
        Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| IndexError::Decode {
            key: index_key.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Whether `id` has been appended to the index at `index_key`.
pub fn contains<V>(state: &V, index_key: &str, id: &str) -> IndexResult<bool>
where
    V: StateView + ?Sized,
{
    Ok(read_index(state, index_key)?.iter().any(|entry| entry == id))
}

/// Append an identifier to the index at `index_key` and return it.
///
/// With `generate`, the identifier is `candidate` followed by the new length
/// of the index (`"sg"` on an index of two entries yields `"sg3"`). Without
/// it, `candidate` is used verbatim and the caller guarantees uniqueness.
///
/// Performs exactly one read and one write of the index key; the whole list
/// is rewritten.
pub fn append_identifier<W>(
    state: &mut W,
    index_key: &str,
    candidate: &str,
    generate: bool,
) -> IndexResult<String>
where
    W: StateWriter + ?Sized,
{
    let mut ids = read_index(&*state, index_key)?;

    let new_id = if generate {
        format!("{candidate}{}", ids.len() + 1)
    } else {
        if candidate.is_empty() {
            return Err(IndexError::EmptyIdentifier(index_key.to_string()));
        }
        candidate.to_string()
    };

    ids.push(new_id.clone());
    let bytes = serde_json::to_vec(&ids).map_err(|e| encode_error(index_key, e))?;
    state.put_state(index_key, bytes)?;

    debug!(index = index_key, id = %new_id, len = ids.len(), "identifier appended");
    Ok(new_id)
}

fn encode_error(index_key: &str, reason: impl std::fmt::Display) -> IndexError {
    IndexError::Store(StoreError::Serialization(format!(
        "index '{index_key}': {reason}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rll_store::{InMemoryKvStore, KvStore, Snapshot, Transaction};
    use std::collections::HashSet;

    #[test]
    fn missing_index_reads_empty() {
        let store = InMemoryKvStore::new();
        assert!(read_index(&Snapshot::new(&store), TRACK_INDEX)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn verbatim_append_keeps_candidate() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        let id = append_identifier(&mut tx, ACCOUNT_INDEX, "alice", false).unwrap();
        assert_eq!(id, "alice");
        tx.commit().unwrap();
        assert_eq!(
            store.get(ACCOUNT_INDEX).unwrap(),
            Some(b"[\"alice\"]".to_vec())
        );
    }

    #[test]
    fn generated_ids_use_next_position() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        assert_eq!(append_identifier(&mut tx, "_sigs", "sg", true).unwrap(), "sg1");
        assert_eq!(append_identifier(&mut tx, "_sigs", "sg", true).unwrap(), "sg2");
        assert_eq!(
            read_index(&tx, "_sigs").unwrap(),
            vec!["sg1".to_string(), "sg2".to_string()]
        );
    }

    #[test]
    fn insertion_order_is_preserved() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        for id in ["t3", "t1", "t2"] {
            append_identifier(&mut tx, TRACK_INDEX, id, false).unwrap();
        }
        tx.commit().unwrap();
        let snap = Snapshot::new(&store);
        assert_eq!(read_index(&snap, TRACK_INDEX).unwrap(), vec!["t3", "t1", "t2"]);
    }

    #[test]
    fn contains_sees_staged_and_committed_entries() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        append_identifier(&mut tx, ACCOUNT_INDEX, "alice", false).unwrap();
        assert!(contains(&tx, ACCOUNT_INDEX, "alice").unwrap());
        assert!(!contains(&Snapshot::new(&store), ACCOUNT_INDEX, "alice").unwrap());

        tx.commit().unwrap();
        let snap = Snapshot::new(&store);
        assert!(contains(&snap, ACCOUNT_INDEX, "alice").unwrap());
        assert!(!contains(&snap, ACCOUNT_INDEX, "bob").unwrap());
        assert!(!contains(&snap, TRACK_INDEX, "alice").unwrap());
    }

    #[test]
    fn empty_verbatim_id_is_rejected() {
        let store = InMemoryKvStore::new();
        let mut tx = Transaction::begin(&store);
        assert!(matches!(
            append_identifier(&mut tx, TRACK_INDEX, "", false),
            Err(IndexError::EmptyIdentifier(_))
        ));
        assert!(tx.write_set().is_empty());
    }

    #[test]
    fn corrupt_index_is_a_decode_error() {
        let store = InMemoryKvStore::new();
        store.put(TRACK_INDEX, b"{\"not\": \"a list\"}").unwrap();
        let mut tx = Transaction::begin(&store);
        let err = append_identifier(&mut tx, TRACK_INDEX, "t1", false).unwrap_err();
        assert!(matches!(err, IndexError::Decode { ref key, .. } if key == TRACK_INDEX));
        assert!(tx.write_set().is_empty());
    }

    #[test]
    fn encode_failure_is_a_store_error() {
        let err = encode_error(TRACK_INDEX, "refused");
        assert!(matches!(
            err,
            IndexError::Store(StoreError::Serialization(ref reason)) if reason.contains("_tracks")
        ));
    }

    proptest! {
        #[test]
        fn generated_ids_are_distinct(prior in 0usize..20, n in 1usize..30) {
            let store = InMemoryKvStore::new();
            let mut tx = Transaction::begin(&store);
            for _ in 0..prior {
                append_identifier(&mut tx, "_things", "th", true).unwrap();
            }
            let before = read_index(&tx, "_things").unwrap().len();

            let mut fresh = HashSet::new();
            for _ in 0..n {
                fresh.insert(append_identifier(&mut tx, "_things", "th", true).unwrap());
            }

            let after = read_index(&tx, "_things").unwrap();
            prop_assert_eq!(fresh.len(), n);
            prop_assert_eq!(after.len(), before + n);
            let all: HashSet<&String> = after.iter().collect();
            prop_assert_eq!(all.len(), after.len());
        }
    }
}
