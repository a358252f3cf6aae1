//! Append-only identifier indexes for the Royalty Ledger.
//!
//! Each entity kind has one index: an ordered list of identifiers stored as a
//! single JSON array under a well-known key. Entries are never removed or
//! reordered, which makes generated identifiers (`prefix` + position) unique.
//!
//! - [`ACCOUNT_INDEX`] -- `_accounts`
//! - [`TRACK_INDEX`] -- `_tracks`

pub mod error;
pub mod registry;

pub use error::{IndexError, IndexResult};
pub use registry::{append_identifier, contains, read_index, ACCOUNT_INDEX, TRACK_INDEX};
