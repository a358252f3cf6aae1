use std::sync::Arc;

use rll_ledger::{registration, Distribution, Ledger};
use rll_store::KvStore;
use tracing::{debug, info, warn};

use crate::config::GateConfig;
use crate::error::{GateError, GateResult};
use crate::invocation::{CallerContext, Invocation, InvocationKind};

/// Routes named invocations to ledger operations.
///
/// Every invocation passes the same pipeline: resolve the name, check the
/// entry point, check the caller's role, bind and size-check the arguments,
/// then run the operation. The first failing step ends the invocation.
pub struct Dispatcher {
    ledger: Ledger,
    config: GateConfig,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn KvStore>, config: GateConfig) -> GateResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger: Ledger::new(store),
            config,
        })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Entry point for state-changing invocations. Returns an empty payload
    /// on success.
    pub fn invoke(
        &self,
        caller: &CallerContext,
        name: &str,
        args: &[String],
    ) -> GateResult<Vec<u8>> {
        self.dispatch(caller, name, args, false)
    }

    /// Entry point for read-only invocations. Returns the JSON result.
    pub fn query(
        &self,
        caller: &CallerContext,
        name: &str,
        args: &[String],
    ) -> GateResult<Vec<u8>> {
        self.dispatch(caller, name, args, true)
    }

    fn dispatch(
        &self,
        caller: &CallerContext,
        name: &str,
        args: &[String],
        as_query: bool,
    ) -> GateResult<Vec<u8>> {
        let kind: InvocationKind = name.parse()?;
        if kind.is_query() != as_query {
            return Err(GateError::WrongEntryPoint {
                invocation: name.to_string(),
                expected: if kind.is_query() { "query" } else { "invoke" },
            });
        }

        if !self.config.roles.allows(kind, caller.role) {
            warn!(invocation = name, identity = %caller.identity, role = caller.role, "invocation denied");
            return Err(GateError::Unauthorized {
                invocation: name.to_string(),
                identity: caller.identity.clone(),
                role: caller.role,
            });
        }

        let invocation = Invocation::parse(kind, args)?;
        self.check_sizes(kind, args)?;

        debug!(invocation = name, tx = %caller.tx_id, identity = %caller.identity, "dispatching");
        let result = self.execute(caller, invocation);
        if let Err(e) = &result {
            warn!(invocation = name, tx = %caller.tx_id, error = %e, "invocation failed");
        }
        result
    }

    fn check_sizes(&self, kind: InvocationKind, args: &[String]) -> GateResult<()> {
        let limit = self.config.max_argument_bytes;
        match args.iter().position(|a| a.len() > limit) {
            Some(position) => Err(GateError::ArgumentTooLarge {
                invocation: kind.name().to_string(),
                position,
                size: args[position].len(),
                limit,
            }),
            None => Ok(()),
        }
    }

    fn execute(&self, caller: &CallerContext, invocation: Invocation) -> GateResult<Vec<u8>> {
        match invocation {
            Invocation::Init => {
                info!(tx = %caller.tx_id, "ledger initialised");
                Ok(Vec::new())
            }
            Invocation::AddAccount { id, account_json } => {
                let account = registration::parse_account(&account_json)?;
                self.ledger.add_account(&id, &account)?;
                Ok(Vec::new())
            }
            Invocation::AddTrack { id, track_json } => {
                let track = registration::parse_track(&track_json)?;
                self.ledger.add_track(&id, &track)?;
                Ok(Vec::new())
            }
            Invocation::RegisterTrack {
                track_id,
                player_id,
            } => {
                let outcome = self
                    .ledger
                    .register_play(&caller.tx_id, &track_id, &player_id)?;
                if outcome == Distribution::Replayed {
                    debug!(tx = %caller.tx_id, "register_track replay absorbed");
                }
                Ok(Vec::new())
            }
            Invocation::GetAccount { id } => Ok(self.ledger.query().get_account(&id)?),
            Invocation::GetTrack { id } => Ok(self.ledger.query().get_track(&id)?),
            Invocation::GetAllTracks => {
                let tracks = self.ledger.query().get_all_tracks()?;
                serde_json::to_vec(&tracks).map_err(|e| GateError::Serialization(e.to_string()))
            }
        }
    }
}
