//! Royalty distribution triggered by a play.
//!
//! For every beneficiary of the played track, in list order, a pending
//! [`Payment`] of `price * percentage / 100` (rounded down) is appended to
//! the beneficiary's account. The same payments are then appended, in the
//! same order, to the account that played the track. The rounding remainder
//! is never paid out; it stays with the paying account.
//!
//! All account mutations are staged in one [`Transaction`] and committed
//! together. Every payment carries the invocation's [`TxId`] and the played
//! track. A play whose `TxId` and track already appear on payments sent by
//! the same account is a replay and writes nothing. Any other reuse of a
//! `TxId` already present on the sender or a beneficiary is rejected.
//!
//! A track without beneficiaries creates no payments, so its plays leave no
//! replay key. Repeating such a play reports `Applied` again with no
//! payments and leaves the state unchanged.

use rll_store::{KvStore, Transaction};
use rll_types::{Payment, TxId};
use tracing::{debug, info};

use crate::entity;
use crate::error::{LedgerError, LedgerResult};

/// What a call to [`RoyaltyDistributionEngine::register_play`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Distribution {
    /// Payments were created and committed.
    Applied {
        /// Created payments in beneficiary order.
        payments: Vec<Payment>,
        /// Part of the price not assigned to any beneficiary.
        retained: u64,
    },
    /// The transaction was already applied; nothing was written.
    Replayed,
}

impl Distribution {
    pub fn payments(&self) -> &[Payment] {
        match self {
            Self::Applied { payments, .. } => payments,
            Self::Replayed => &[],
        }
    }
}

/// Share of `price` owed for `percentage` parts per hundred, rounded down.
///
/// Returns `None` only if the share does not fit in a `u64`, which cannot
/// happen for percentages up to 100.
pub fn royalty_share(price: u64, percentage: u32) -> Option<u64> {
    let share = u128::from(price) * u128::from(percentage) / 100;
    u64::try_from(share).ok()
}

/// Computes and records royalty payments for plays.
pub struct RoyaltyDistributionEngine<'s> {
    store: &'s dyn KvStore,
}

impl<'s> RoyaltyDistributionEngine<'s> {
    pub fn new(store: &'s dyn KvStore) -> Self {
        Self { store }
    }

    /// Record that `player_id` played `track_id` and pay out the track's
    /// beneficiaries.
    ///
    /// Fails with `NotFound` if the track, the player, or any beneficiary
    /// account is missing, and with `PartialDistribution` if the staged
    /// writes cannot be committed. In both cases the store is unchanged.
    pub fn register_play(
        &self,
        tx_id: &TxId,
        track_id: &str,
        player_id: &str,
    ) -> LedgerResult<Distribution> {
        let mut txn = Transaction::begin(self.store);

        let track = entity::get_track(&txn, track_id)?;
        let sender = entity::get_account(&txn, player_id)?;

        if sender.has_sent_for(tx_id, track_id) {
            info!(tx = %tx_id, track = track_id, player = player_id, "play already applied; skipping replay");
            return Ok(Distribution::Replayed);
        }
        if sender.has_payments_from(tx_id) {
            return Err(reused_tx(tx_id));
        }

        let mut sender_payments = Vec::with_capacity(track.beneficiaries.len());
        for (position, beneficiary) in track.beneficiaries.iter().enumerate() {
            // Reads go through the transaction, so a beneficiary listed twice
            // or equal to the sender sees its earlier staged payments.
            let mut recipient = entity::get_account(&txn, &beneficiary.account_id)?;
            if recipient.has_payments_from(tx_id) {
                return Err(reused_tx(tx_id));
            }

            let amount = royalty_share(track.price, beneficiary.percentage).ok_or_else(|| {
                LedgerError::validation(format!(
                    "royalty share overflows for track '{track_id}' and beneficiary '{}'",
                    beneficiary.account_id
                ))
            })?;
            let ordinal = u32::try_from(position).map_err(|_| {
                LedgerError::validation(format!("track '{track_id}' has too many beneficiaries"))
            })?;

            let payment = Payment {
                recipient_id: recipient.id.clone(),
                sender_id: sender.id.clone(),
                track_id: track.id.clone(),
                amount,
                completed: false,
                tx_id: tx_id.clone(),
                ordinal,
            };

            recipient.pending_payments.push(payment.clone());
            entity::put_account(&mut txn, &recipient)?;
            debug!(tx = %tx_id, recipient = %recipient.id, amount, ordinal, "payment staged");

            sender_payments.push(payment);
        }

        // Reload so a sender that is also a beneficiary keeps its recipient entry.
        let mut sender = entity::get_account(&txn, player_id)?;
        sender.pending_payments.extend(sender_payments.iter().cloned());
        entity::put_account(&mut txn, &sender)?;

        let paid: u64 = sender_payments.iter().map(|p| p.amount).sum();
        let retained = track.price.saturating_sub(paid);

        txn.commit().map_err(|e| LedgerError::PartialDistribution {
            track_id: track_id.to_string(),
            tx_id: tx_id.to_string(),
            reason: e.to_string(),
        })?;

        info!(
            tx = %tx_id,
            track = track_id,
            player = player_id,
            payments = sender_payments.len(),
            paid,
            retained,
            "play registered"
        );
        Ok(Distribution::Applied {
            payments: sender_payments,
            retained,
        })
    }
}

fn reused_tx(tx_id: &TxId) -> LedgerError {
    LedgerError::validation(format!(
        "transaction '{tx_id}' was already applied to a different play"
    ))
}
