use thiserror::Error;

/// Errors produced when an entity fails shape validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("identifier '{0}' uses the reserved '_' prefix")]
    ReservedId(String),

    #[error("beneficiary percentages of track '{track}' sum to {total}, limit is 100")]
    PercentageOverflow { track: String, total: u64 },

    #[error("account '{account}' appears more than once among the beneficiaries of track '{track}'")]
    DuplicateBeneficiary { track: String, account: String },
}
