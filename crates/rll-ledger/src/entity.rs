//! Typed access to tracks and accounts stored in ledger state.
//!
//! Each entity is one JSON value at the key equal to its own id. Decoding
//! checks field presence and types (serde), the entity's structural
//! invariants, and that the record's id matches the key it was read from.

use rll_store::{StateView, StateWriter, StoreError};
use rll_types::{Account, Track};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{EntityKind, LedgerError, LedgerResult};

pub fn get_track<V: StateView + ?Sized>(state: &V, id: &str) -> LedgerResult<Track> {
    get_track_raw(state, id).map(|(track, _)| track)
}

/// The decoded track together with the exact bytes that were stored.
pub fn get_track_raw<V: StateView + ?Sized>(state: &V, id: &str) -> LedgerResult<(Track, Vec<u8>)> {
    let bytes = read_record(state, EntityKind::Track, id)?;
    let track: Track = decode(id, &bytes)?;
    track.validate().map_err(|e| decode_error(id, e))?;
    check_key(id, &track.id)?;
    Ok((track, bytes))
}

pub fn put_track<W: StateWriter + ?Sized>(state: &mut W, track: &Track) -> LedgerResult<()> {
    write_record(state, &track.id, track)
}

pub fn get_account<V: StateView + ?Sized>(state: &V, id: &str) -> LedgerResult<Account> {
    get_account_raw(state, id).map(|(account, _)| account)
}

/// The decoded account together with the exact bytes that were stored.
pub fn get_account_raw<V: StateView + ?Sized>(
    state: &V,
    id: &str,
) -> LedgerResult<(Account, Vec<u8>)> {
    let bytes = read_record(state, EntityKind::Account, id)?;
    let account: Account = decode(id, &bytes)?;
    account.validate().map_err(|e| decode_error(id, e))?;
    check_key(id, &account.id)?;
    Ok((account, bytes))
}

pub fn put_account<W: StateWriter + ?Sized>(state: &mut W, account: &Account) -> LedgerResult<()> {
    write_record(state, &account.id, account)
}

/// Returns `true` if any value is stored at `key`.
pub fn is_occupied<V: StateView + ?Sized>(state: &V, key: &str) -> LedgerResult<bool> {
    Ok(state.get_state(key)?.is_some())
}

fn read_record<V: StateView + ?Sized>(
    state: &V,
    kind: EntityKind,
    id: &str,
) -> LedgerResult<Vec<u8>> {
    state
        .get_state(id)?
        .ok_or_else(|| LedgerError::not_found(kind, id))
}

fn write_record<W, T>(state: &mut W, key: &str, record: &T) -> LedgerResult<()>
where
    W: StateWriter + ?Sized,
    T: Serialize,
{
    let bytes = serde_json::to_vec(record).map_err(|e| {
        LedgerError::Persistence(StoreError::Serialization(format!("record '{key}': {e}")))
    })?;
    state.put_state(key, bytes)?;
    Ok(())
}

fn decode<T: DeserializeOwned>(key: &str, bytes: &[u8]) -> LedgerResult<T> {
    serde_json::from_slice(bytes).map_err(|e| decode_error(key, e))
}

fn check_key(key: &str, record_id: &str) -> LedgerResult<()> {
    if key != record_id {
        return Err(LedgerError::Decode {
            key: key.to_string(),
            reason: format!("record id '{record_id}' does not match its key"),
        });
    }
    Ok(())
}

fn decode_error(key: &str, reason: impl std::fmt::Display) -> LedgerError {
    LedgerError::Decode {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
