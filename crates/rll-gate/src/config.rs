use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GateError, GateResult};
use crate::invocation::InvocationKind;

/// Which caller roles may run which invocations.
///
/// Roles are integer codes resolved by the host from the caller's identity
/// before the invocation reaches the gate. The table is handed to the gate
/// explicitly; there is no process-wide role registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RolePolicy {
    /// Outcome for invocations that have no rule.
    pub default_allow: bool,
    /// Invocation name to the role codes allowed to call it.
    pub rules: BTreeMap<String, Vec<i64>>,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

impl RolePolicy {
    /// A policy with no rules that allows everything.
    pub fn allow_all() -> Self {
        Self {
            default_allow: true,
            rules: BTreeMap::new(),
        }
    }

    /// Restrict `kind` to the given roles.
    pub fn with_rule(mut self, kind: InvocationKind, roles: impl IntoIterator<Item = i64>) -> Self {
        self.rules
            .insert(kind.name().to_string(), roles.into_iter().collect());
        self
    }

    pub fn allows(&self, kind: InvocationKind, role: i64) -> bool {
        match self.rules.get(kind.name()) {
            Some(roles) => roles.contains(&role),
            None => self.default_allow,
        }
    }
}

/// Configuration for the invocation gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub roles: RolePolicy,
    /// Largest accepted argument, in bytes.
    pub max_argument_bytes: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            roles: RolePolicy::allow_all(),
            max_argument_bytes: 64 * 1024,
        }
    }
}

impl GateConfig {
    pub fn from_toml_str(raw: &str) -> GateResult<Self> {
        let config: Self = toml::from_str(raw).map_err(|e| GateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> GateResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GateError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Reject rules for invocation names the gate does not know.
    pub fn validate(&self) -> GateResult<()> {
        for name in self.roles.rules.keys() {
            name.parse::<InvocationKind>()
                .map_err(|_| GateError::Config(format!("role rule for unknown invocation '{name}'")))?;
        }
        if self.max_argument_bytes == 0 {
            return Err(GateError::Config("max_argument_bytes must be positive".into()));
        }
        Ok(())
    }
}
