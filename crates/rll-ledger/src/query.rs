use rll_index::{read_index, ACCOUNT_INDEX, TRACK_INDEX};
use rll_store::{KvStore, Snapshot};
use rll_types::{Account, Payment, Track};
use tracing::debug;

use crate::entity;
use crate::error::LedgerResult;

/// Read-only projections over ledger state. Never writes.
pub struct QueryService<'s> {
    snapshot: Snapshot<'s>,
}

impl<'s> QueryService<'s> {
    pub fn new(store: &'s dyn KvStore) -> Self {
        Self {
            snapshot: Snapshot::new(store),
        }
    }

    /// The stored account record, byte for byte.
    pub fn get_account(&self, id: &str) -> LedgerResult<Vec<u8>> {
        entity::get_account_raw(&self.snapshot, id).map(|(_, raw)| raw)
    }

    /// The stored track record, byte for byte.
    pub fn get_track(&self, id: &str) -> LedgerResult<Vec<u8>> {
        entity::get_track_raw(&self.snapshot, id).map(|(_, raw)| raw)
    }

    /// Every registered track in registration order.
    pub fn get_all_tracks(&self) -> LedgerResult<Vec<Track>> {
        let ids = read_index(&self.snapshot, TRACK_INDEX)?;
        debug!(count = ids.len(), "loading all tracks");
        ids.iter()
            .map(|id| entity::get_track(&self.snapshot, id))
            .collect()
    }

    /// Every registered account in registration order.
    pub fn get_all_accounts(&self) -> LedgerResult<Vec<Account>> {
        let ids = read_index(&self.snapshot, ACCOUNT_INDEX)?;
        ids.iter()
            .map(|id| entity::get_account(&self.snapshot, id))
            .collect()
    }

    /// Payments of `account_id` that have not been settled yet.
    pub fn outstanding_payments(&self, account_id: &str) -> LedgerResult<Vec<Payment>> {
        let account = entity::get_account(&self.snapshot, account_id)?;
        Ok(account.outstanding().cloned().collect())
    }
}
