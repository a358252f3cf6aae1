use rll_ledger::{ErrorKind, LedgerError};

/// Errors that can occur while dispatching an invocation.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// No operation is registered under this name.
    #[error("unknown invocation: {0}")]
    UnknownInvocation(String),

    /// A query name was sent to the invoke entry point or vice versa.
    #[error("'{invocation}' must be submitted as a {expected}")]
    WrongEntryPoint {
        invocation: String,
        expected: &'static str,
    },

    /// The argument list has the wrong length.
    #[error("'{invocation}' takes {expected} argument(s), got {actual}")]
    Arity {
        invocation: String,
        expected: usize,
        actual: usize,
    },

    /// An argument exceeds the configured size limit.
    #[error("argument {position} of '{invocation}' is {size} bytes, limit is {limit}")]
    ArgumentTooLarge {
        invocation: String,
        position: usize,
        size: usize,
        limit: usize,
    },

    /// The caller's role may not perform this invocation.
    #[error("role {role} of '{identity}' is not allowed to call '{invocation}'")]
    Unauthorized {
        invocation: String,
        identity: String,
        role: i64,
    },

    /// The core operation failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A query result could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration is invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GateError {
    /// The ledger taxonomy kind of this error, if it has one.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Ledger(e) => Some(e.kind()),
            Self::Arity { .. } | Self::ArgumentTooLarge { .. } => Some(ErrorKind::Validation),
            _ => None,
        }
    }
}

/// Result alias for gate operations.
pub type GateResult<T> = Result<T, GateError>;
