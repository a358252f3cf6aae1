//! Invocation names, argument layouts, and caller context.
//!
//! | Name             | Entry  | args[0]     | args[1]           |
//! |------------------|--------|-------------|-------------------|
//! | `init`           | invoke |             |                   |
//! | `add_account`    | invoke | account id  | account JSON      |
//! | `add_track`      | invoke | track id    | track JSON        |
//! | `register_track` | invoke | track id    | player account id |
//! | `get_account`    | query  | account id  |                   |
//! | `get_track`      | query  | track id    |                   |
//! | `get_all_tracks` | query  |             |                   |

use std::fmt;
use std::str::FromStr;

use rll_types::TxId;

use crate::error::{GateError, GateResult};

/// Who is calling, as resolved by the host before dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallerContext {
    /// Opaque caller identity (e.g. certificate common name).
    pub identity: String,
    /// Role code extracted from the caller's credentials.
    pub role: i64,
    /// Transaction id the host assigned to this invocation.
    pub tx_id: TxId,
}

impl CallerContext {
    pub fn new(identity: impl Into<String>, role: i64, tx_id: TxId) -> Self {
        Self {
            identity: identity.into(),
            role,
            tx_id,
        }
    }
}

/// The operations the gate can dispatch to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvocationKind {
    Init,
    AddAccount,
    AddTrack,
    RegisterTrack,
    GetAccount,
    GetTrack,
    GetAllTracks,
}

impl InvocationKind {
    pub const ALL: [InvocationKind; 7] = [
        Self::Init,
        Self::AddAccount,
        Self::AddTrack,
        Self::RegisterTrack,
        Self::GetAccount,
        Self::GetTrack,
        Self::GetAllTracks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::AddAccount => "add_account",
            Self::AddTrack => "add_track",
            Self::RegisterTrack => "register_track",
            Self::GetAccount => "get_account",
            Self::GetTrack => "get_track",
            Self::GetAllTracks => "get_all_tracks",
        }
    }

    /// Number of positional arguments.
    pub fn arity(self) -> usize {
        match self {
            Self::Init | Self::GetAllTracks => 0,
            Self::GetAccount | Self::GetTrack => 1,
            Self::AddAccount | Self::AddTrack | Self::RegisterTrack => 2,
        }
    }

    /// Read-only invocations go through the query entry point.
    pub fn is_query(self) -> bool {
        matches!(self, Self::GetAccount | Self::GetTrack | Self::GetAllTracks)
    }
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InvocationKind {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| GateError::UnknownInvocation(s.to_string()))
    }
}

/// A parsed invocation with its arguments bound to names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    Init,
    AddAccount { id: String, account_json: String },
    AddTrack { id: String, track_json: String },
    RegisterTrack { track_id: String, player_id: String },
    GetAccount { id: String },
    GetTrack { id: String },
    GetAllTracks,
}

impl Invocation {
    /// Bind `args` to the argument layout of `kind`.
    pub fn parse(kind: InvocationKind, args: &[String]) -> GateResult<Self> {
        if args.len() != kind.arity() {
            return Err(GateError::Arity {
                invocation: kind.name().to_string(),
                expected: kind.arity(),
                actual: args.len(),
            });
        }
        let arg = |i: usize| args[i].clone();
        Ok(match kind {
            InvocationKind::Init => Self::Init,
            InvocationKind::AddAccount => Self::AddAccount {
                id: arg(0),
                account_json: arg(1),
            },
            InvocationKind::AddTrack => Self::AddTrack {
                id: arg(0),
                track_json: arg(1),
            },
            InvocationKind::RegisterTrack => Self::RegisterTrack {
                track_id: arg(0),
                player_id: arg(1),
            },
            InvocationKind::GetAccount => Self::GetAccount { id: arg(0) },
            InvocationKind::GetTrack => Self::GetTrack { id: arg(0) },
            InvocationKind::GetAllTracks => Self::GetAllTracks,
        })
    }

    pub fn kind(&self) -> InvocationKind {
        match self {
            Self::Init => InvocationKind::Init,
            Self::AddAccount { .. } => InvocationKind::AddAccount,
            Self::AddTrack { .. } => InvocationKind::AddTrack,
            Self::RegisterTrack { .. } => InvocationKind::RegisterTrack,
            Self::GetAccount { .. } => InvocationKind::GetAccount,
            Self::GetTrack { .. } => InvocationKind::GetTrack,
            Self::GetAllTracks => InvocationKind::GetAllTracks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn names_round_trip() {
        for kind in InvocationKind::ALL {
            assert_eq!(kind.name().parse::<InvocationKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(matches!(
            "delete_track".parse::<InvocationKind>(),
            Err(GateError::UnknownInvocation(name)) if name == "delete_track"
        ));
    }

    #[test]
    fn register_track_binds_positions() {
        let inv = Invocation::parse(InvocationKind::RegisterTrack, &args(&["t1", "p"])).unwrap();
        assert_eq!(
            inv,
            Invocation::RegisterTrack {
                track_id: "t1".into(),
                player_id: "p".into()
            }
        );
        assert_eq!(inv.kind(), InvocationKind::RegisterTrack);
    }

    #[test]
    fn add_account_is_not_routed_to_tracks() {
        let inv =
            Invocation::parse(InvocationKind::AddAccount, &args(&["a", "{}"])).unwrap();
        assert_eq!(inv.kind(), InvocationKind::AddAccount);
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let err = Invocation::parse(InvocationKind::GetTrack, &args(&[])).unwrap_err();
        assert!(matches!(
            err,
            GateError::Arity {
                expected: 1,
                actual: 0,
                ..
            }
        ));
        assert!(Invocation::parse(InvocationKind::GetAllTracks, &args(&["x"])).is_err());
    }

    #[test]
    fn query_classification() {
        let queries: Vec<_> = InvocationKind::ALL
            .into_iter()
            .filter(|k| k.is_query())
            .map(InvocationKind::name)
            .collect();
        assert_eq!(queries, vec!["get_account", "get_track", "get_all_tracks"]);
    }
}
