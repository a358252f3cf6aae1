//! Account and track registration.
//!
//! Both operations append the new id to its index and store the record in
//! the same transaction, so the index never names a record that was not
//! written.

use rll_index::{append_identifier, ACCOUNT_INDEX, TRACK_INDEX};
use rll_store::{KvStore, StateView, Transaction};
use rll_types::{Account, Track};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::entity;
use crate::error::{LedgerError, LedgerResult};

/// Parse an account record supplied as an invocation argument.
pub fn parse_account(json: &str) -> LedgerResult<Account> {
    parse_argument("account", json)
}

/// Parse a track record supplied as an invocation argument.
pub fn parse_track(json: &str) -> LedgerResult<Track> {
    parse_argument("track", json)
}

fn parse_argument<T: DeserializeOwned>(what: &str, json: &str) -> LedgerResult<T> {
    serde_json::from_str(json)
        .map_err(|e| LedgerError::validation(format!("malformed {what} JSON: {e}")))
}

/// Register a new account under `id`.
///
/// The account must carry the same id, must not already exist, and must not
/// arrive with payments (those are only created by distribution).
pub fn add_account(store: &dyn KvStore, id: &str, account: &Account) -> LedgerResult<()> {
    account.validate()?;
    check_argument_id(id, &account.id)?;
    if !account.pending_payments.is_empty() {
        return Err(LedgerError::validation(format!(
            "account '{id}' cannot be registered with pending payments"
        )));
    }

    let mut txn = Transaction::begin(store);
    ensure_vacant(&txn, id)?;
    append_identifier(&mut txn, ACCOUNT_INDEX, id, false)?;
    entity::put_account(&mut txn, account)?;
    txn.commit()?;

    info!(account = id, "account registered");
    Ok(())
}

/// Register a new track under `id`.
///
/// Besides the structural checks of [`Track::validate`], every beneficiary
/// must name an account that already exists.
pub fn add_track(store: &dyn KvStore, id: &str, track: &Track) -> LedgerResult<()> {
    track.validate()?;
    check_argument_id(id, &track.id)?;

    let mut txn = Transaction::begin(store);
    ensure_vacant(&txn, id)?;
    for beneficiary in &track.beneficiaries {
        entity::get_account(&txn, &beneficiary.account_id)?;
    }
    append_identifier(&mut txn, TRACK_INDEX, id, false)?;
    entity::put_track(&mut txn, track)?;
    txn.commit()?;

    info!(
        track = id,
        price = track.price,
        beneficiaries = track.beneficiaries.len(),
        "track registered"
    );
    Ok(())
}

fn check_argument_id(argument: &str, record: &str) -> LedgerResult<()> {
    if argument != record {
        return Err(LedgerError::validation(format!(
            "argument id '{argument}' does not match record id '{record}'"
        )));
    }
    Ok(())
}

fn ensure_vacant<V: StateView + ?Sized>(state: &V, id: &str) -> LedgerResult<()> {
    if entity::is_occupied(state, id)? {
        return Err(LedgerError::validation(format!(
            "identifier '{id}' is already registered"
        )));
    }
    Ok(())
}
