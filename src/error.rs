//! Error types for combat resolution.
//!
//! All recoverable failures are represented by the `CombatError` enum. They
//! are scoped to a single request (one weapon record, or one weapon/target
//! pair); the caller reports them and carries on with the next request.
//! Broken probability invariants are not errors: they panic.

use crate::dice::DiceParseError;
use crate::modifier::Phase;
use crate::rule_id::RuleId;
use thiserror::Error;

/// Errors that can occur while building modifiers or resolving an attack.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{CombatError, RuleId};
///
/// let err = CombatError::UnknownRule(RuleId::new("psychic"));
/// assert_eq!(err.to_string(), "Unknown rule: psychic");
/// assert!(err.is_configuration());
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CombatError {
    /// A rule name from weapon data has no registered implementation.
    #[error("Unknown rule: {0}")]
    UnknownRule(RuleId),

    /// A rule was found but its argument is missing or malformed.
    #[error("Invalid argument for rule {rule}: {reason}")]
    InvalidRuleArgument { rule: RuleId, reason: String },

    /// Dice notation in a weapon or rule could not be parsed.
    #[error("Invalid dice: {0}")]
    InvalidDice(#[from] DiceParseError),

    /// Resolving a phase would expand beyond the configured outcome bound.
    ///
    /// The computation for this request is abandoned; nothing is cached.
    #[error("Size limit exceeded in {phase} phase: {required} outcomes required, limit is {limit}")]
    SizeLimit {
        phase: Phase,
        required: usize,
        limit: usize,
    },

    /// Resolver configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Resolver configuration could not be deserialized.
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),
}

impl CombatError {
    /// Returns true for errors caused by weapon data or configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CombatError::UnknownRule(_)
                | CombatError::InvalidRuleArgument { .. }
                | CombatError::InvalidDice(_)
                | CombatError::InvalidConfig(_)
                | CombatError::ConfigParse(_)
        )
    }

    /// Returns true if the computation was abandoned because of its size.
    pub fn is_size_limit(&self) -> bool {
        matches!(self, CombatError::SizeLimit { .. })
    }
}

impl From<serde_json::Error> for CombatError {
    fn from(err: serde_json::Error) -> Self {
        CombatError::ConfigParse(err.to_string())
    }
}
