use std::fmt;

use rll_index::IndexError;
use rll_store::StoreError;
use rll_types::TypeError;

/// The kind of entity a lookup was looking for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Track,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account => write!(f, "account"),
            Self::Track => write!(f, "track"),
        }
    }
}

/// Coarse classification of a [`LedgerError`], reported to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Decode,
    Validation,
    Persistence,
    PartialDistribution,
}

/// Errors produced by ledger operations.
///
/// Every error is terminal for the invocation: the staged write set is
/// dropped and nothing reaches the store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    #[error("record at '{key}' does not decode: {reason}")]
    Decode { key: String, reason: String },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("distribution of track '{track_id}' in tx '{tx_id}' could not be committed: {reason}")]
    PartialDistribution {
        track_id: String,
        tx_id: String,
        reason: String,
    },
}

impl LedgerError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::PartialDistribution { .. } => ErrorKind::PartialDistribution,
        }
    }

    /// The identifier the error is about, when there is one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Self::NotFound { id, .. } => Some(id),
            Self::Decode { key, .. } => Some(key),
            Self::PartialDistribution { track_id, .. } => Some(track_id),
            Self::Validation(_) | Self::Persistence(_) => None,
        }
    }
}

impl From<TypeError> for LedgerError {
    fn from(err: TypeError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<IndexError> for LedgerError {
    fn from(err: IndexError) -> Self {
        match err {
            IndexError::Store(e) => Self::Persistence(e),
            IndexError::Decode { key, reason } => Self::Decode { key, reason },
            IndexError::EmptyIdentifier(index) => {
                Self::Validation(format!("empty identifier for index '{index}'"))
            }
        }
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
