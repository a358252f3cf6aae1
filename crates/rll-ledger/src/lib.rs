//! Core state machine of the Royalty Ledger (RLL).
//!
//! This crate is the heart of RLL. It provides:
//! - [`entity`] -- typed, validated reads and writes of tracks and accounts
//! - [`registration`] -- account and track registration
//! - [`RoyaltyDistributionEngine`] -- pending payments for a played track
//! - [`QueryService`] -- read-only projections
//! - [`Ledger`] -- the operations above bound to one store
//!
//! Every operation is deterministic: it depends only on prior state and its
//! arguments, reads no clock, and performs no I/O besides the
//! [`KvStore`](rll_store::KvStore). Mutations are staged and committed as a
//! single write set.

pub mod distribution;
pub mod entity;
pub mod error;
pub mod query;
pub mod registration;

use std::sync::Arc;

use rll_store::KvStore;
use rll_types::{Account, Track, TxId};

pub use distribution::{royalty_share, Distribution, RoyaltyDistributionEngine};
pub use error::{EntityKind, ErrorKind, LedgerError, LedgerResult};
pub use query::QueryService;

/// The ledger operations bound to a shared store.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn KvStore>,
}

impl Ledger {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }

    pub fn add_account(&self, id: &str, account: &Account) -> LedgerResult<()> {
        registration::add_account(self.store(), id, account)
    }

    pub fn add_track(&self, id: &str, track: &Track) -> LedgerResult<()> {
        registration::add_track(self.store(), id, track)
    }

    pub fn register_play(
        &self,
        tx_id: &TxId,
        track_id: &str,
        player_id: &str,
    ) -> LedgerResult<Distribution> {
        RoyaltyDistributionEngine::new(self.store()).register_play(tx_id, track_id, player_id)
    }

    pub fn query(&self) -> QueryService<'_> {
        QueryService::new(self.store())
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").finish_non_exhaustive()
    }
}
