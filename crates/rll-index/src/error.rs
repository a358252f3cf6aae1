//! Error types for the index crate.

use rll_store::StoreError;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Reading or writing the index key failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The stored index is not a list of identifiers.
    #[error("index '{key}' is corrupt: {reason}")]
    Decode { key: String, reason: String },

    /// An empty identifier was offered for verbatim insertion.
    #[error("empty identifier for index '{0}'")]
    EmptyIdentifier(String),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
