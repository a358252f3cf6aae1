//! Invocation gate for the Royalty Ledger.
//!
//! The host hands the gate an invocation name, positional string arguments,
//! and a [`CallerContext`] it has already resolved (identity, role code,
//! transaction id). The gate maps the name to a ledger operation, enforces
//! the [`RolePolicy`] from its [`GateConfig`], and returns the operation's
//! payload: JSON for queries, nothing for mutations.
//!
//! Certificate handling and role extraction stay with the host; the gate
//! only ever sees the resolved values.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod invocation;

pub use config::{GateConfig, RolePolicy};
pub use dispatcher::Dispatcher;
pub use error::{GateError, GateResult};
pub use invocation::{CallerContext, Invocation, InvocationKind};
