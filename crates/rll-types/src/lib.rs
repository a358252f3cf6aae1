//! Foundation types for the Royalty Ledger (RLL).
//!
//! This crate provides the entity model shared by every other RLL crate.
//! Entities reference each other by identifier only; nothing here performs
//! I/O.
//!
//! # Key Types
//!
//! - [`Track`] -- A media asset with a price and an ordered beneficiary list
//! - [`Beneficiary`] -- An account entitled to a percentage of a track's price
//! - [`Account`] -- A monetary account holding pending payment obligations
//! - [`Payment`] -- A pending obligation between two accounts
//! - [`TxId`] -- Transaction-scoped identifier supplied by the host log

pub mod account;
pub mod error;
pub mod id;
pub mod track;
pub mod tx;

pub use account::{Account, Payment};
pub use error::TypeError;
pub use id::{validate_entity_id, RESERVED_PREFIX};
pub use track::{Beneficiary, Track, MAX_PERCENTAGE_TOTAL};
pub use tx::TxId;
