use crate::error::StoreResult;
use crate::transaction::WriteSet;

/// The host's key-value state.
///
/// All implementations must satisfy these invariants:
/// - `get` of a key never written returns `Ok(None)`, not an error.
/// - `apply` is atomic: on `Err`, no key of the write set is visible.
/// - Values are opaque bytes; the store never interprets them.
/// - All I/O errors are propagated, never silently ignored.
pub trait KvStore: Send + Sync {
    /// Read the value stored at `key`.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write a single key.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Write every entry of `writes` as one atomic commit.
    fn apply(&self, writes: &WriteSet) -> StoreResult<()>;
}

/// Read access to ledger state, as seen by one invocation.
pub trait StateView {
    fn get_state(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;
}

/// Buffered write access to ledger state.
///
/// Writes become visible to `get_state` on the same writer immediately and
/// to the store only when the owning transaction commits.
pub trait StateWriter: StateView {
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> StoreResult<()>;
}
