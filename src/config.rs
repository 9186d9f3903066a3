//! Resolver configuration.
//!
//! Both bounds are plain numbers so a configuration can be loaded from a
//! JSON document next to the weapon data. Missing fields take their
//! defaults.

use crate::error::CombatError;
use serde::{Deserialize, Serialize};

/// Limits applied by a [`Resolver`](crate::Resolver).
///
/// # Examples
///
/// ```rust
/// use mathhammer::ResolverConfig;
///
/// let config = ResolverConfig::from_json(r#"{ "max_outcomes": 10000 }"#).unwrap();
/// assert_eq!(config.max_outcomes, 10_000);
/// assert_eq!(config.cache_capacity, ResolverConfig::default().cache_capacity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Most key pairs a single `All` product may evaluate, and most
    /// sub-rolls a single face may expand into.
    ///
    /// Reaching it abandons the request with a size-limit error.
    #[serde(default = "default_max_outcomes")]
    pub max_outcomes: usize,

    /// Most phase results kept in the memo table. Zero disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_max_outcomes() -> usize {
    2_000_000
}

fn default_cache_capacity() -> usize {
    4096
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_outcomes: default_max_outcomes(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl ResolverConfig {
    pub fn with_max_outcomes(self, max_outcomes: usize) -> Self {
        Self {
            max_outcomes,
            ..self
        }
    }

    pub fn with_cache_capacity(self, cache_capacity: usize) -> Self {
        Self {
            cache_capacity,
            ..self
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, CombatError> {
        let config: ResolverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the outcome bound is positive.
    ///
    /// Called by [`Resolver::new`](crate::Resolver::new) and
    /// [`resolve_batch`](crate::resolve_batch).
    pub fn validate(&self) -> Result<(), CombatError> {
        if self.max_outcomes == 0 {
            return Err(CombatError::InvalidConfig(
                "max_outcomes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
