use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::id::validate_entity_id;
use crate::tx::TxId;

/// A pending obligation from `sender_id` to `recipient_id`.
///
/// Payments reference accounts and tracks by id. `(tx_id, ordinal)`
/// identifies the distribution step that created the payment; the same pair
/// appears on the recipient's and the sender's copy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub recipient_id: String,
    pub sender_id: String,
    /// Track whose play created the payment.
    pub track_id: String,
    /// Amount in the smallest currency unit.
    pub amount: u64,
    /// Settlement flag, flipped outside the ledger core.
    pub completed: bool,
    pub tx_id: TxId,
    /// Index of the beneficiary in the track's list.
    pub ordinal: u32,
}

/// A monetary account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    /// Optional running total; not touched by distribution.
    #[serde(default)]
    pub balance: i64,
    #[serde(default)]
    pub pending_payments: Vec<Payment>,
}

impl Account {
    /// A fresh account with no balance and no payments.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance: 0,
            pending_payments: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), TypeError> {
        validate_entity_id("account id", &self.id)
    }

    /// Returns `true` if any payment on this account was created by `tx`.
    pub fn has_payments_from(&self, tx: &TxId) -> bool {
        self.pending_payments.iter().any(|p| &p.tx_id == tx)
    }

    /// Returns `true` if this account already paid for a play of `track_id`
    /// in transaction `tx`.
    pub fn has_sent_for(&self, tx: &TxId, track_id: &str) -> bool {
        self.pending_payments
            .iter()
            .any(|p| &p.tx_id == tx && p.sender_id == self.id && p.track_id == track_id)
    }

    /// Payments not yet settled, in recorded order.
    pub fn outstanding(&self) -> impl Iterator<Item = &Payment> {
        self.pending_payments.iter().filter(|p| !p.completed)
    }
}
