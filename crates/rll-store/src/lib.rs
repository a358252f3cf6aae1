//! Key-value persistence for the Royalty Ledger.
//!
//! The ledger core never talks to storage directly. It reads and writes
//! opaque byte values by string key through the [`KvStore`] trait, which
//! stands in for the host's replicated key-value state.
//!
//! # Storage Backends
//!
//! - [`InMemoryKvStore`] -- `BTreeMap`-based store for tests and embedding
//! - [`FileKvStore`] -- single JSON file, rewritten atomically on commit
//!
//! # Staging
//!
//! Every invocation works against a [`Transaction`]: reads fall through to
//! the store, writes are buffered in a [`WriteSet`], and
//! [`Transaction::commit`] hands the whole set to [`KvStore::apply`] at once.
//! A failed invocation simply drops its transaction, so no partial write set
//! ever reaches the store. Read-only callers use a [`Snapshot`].
//!
//! # Design Rules
//!
//! 1. `apply` is all-or-nothing: either every key in the set is written or
//!    none is.
//! 2. The store never interprets values.
//! 3. Iteration order is the key order, so commits are deterministic.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;
pub mod transaction;

pub use error::{StoreError, StoreResult};
pub use file::FileKvStore;
pub use memory::InMemoryKvStore;
pub use traits::{KvStore, StateView, StateWriter};
pub use transaction::{Snapshot, Transaction, WriteSet};
