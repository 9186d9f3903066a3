//! Outcome module.
//!
//! Provides the `Success` lattice and the `Outcome` value object that every
//! phase action and modifier produces. Outcomes are plain `Copy` values;
//! modifiers build new ones with the `with_*` methods instead of mutating.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Roll value used for outcomes that did not come from a die.
pub const FIXED_ROLL: i32 = -1;

/// Tri-state result of a single die check.
///
/// Ordered `Failure < Success < Critical`.
///
/// # Examples
///
/// ```rust
/// use mathhammer::Success;
///
/// assert!(Success::Failure < Success::Success);
/// assert!(Success::Success < Success::Critical);
/// assert!(!Success::Failure.passed());
/// assert!(Success::Critical.passed());
/// assert!(Success::Critical.is_critical());
/// assert!(!Success::Success.is_critical());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Success {
    /// The check failed.
    #[default]
    Failure,
    /// The check passed.
    Success,
    /// The check passed on a critical roll.
    Critical,
}

impl Success {
    /// Convert a plain boolean into `Success` or `Failure`.
    pub fn from_bool(value: bool) -> Self {
        if value {
            Success::Success
        } else {
            Success::Failure
        }
    }

    /// Truthiness: everything except `Failure` passed.
    pub fn passed(self) -> bool {
        self != Success::Failure
    }

    /// Returns true only for `Critical`.
    pub fn is_critical(self) -> bool {
        self == Success::Critical
    }
}

impl From<bool> for Success {
    fn from(value: bool) -> Self {
        Success::from_bool(value)
    }
}

/// Result of resolving one face or branch of a phase.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{Outcome, Success};
///
/// let face = Outcome::face(6, Success::Critical);
/// assert_eq!(face.value, 1);
/// assert_eq!(face.roll_value, 6);
///
/// let sustained = face.with_value(face.value + 1);
/// assert_eq!(sustained.value, 2);
/// assert_eq!(face.value, 1); // the original is untouched
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// Quantity produced by this branch (hits, wounds, damage points).
    pub value: u32,
    /// The die face that produced it, or [`FIXED_ROLL`].
    pub roll_value: i32,
    /// Result of the check.
    pub success: Success,
    /// Skip the following phase and feed the phase after it.
    pub bypass_next: bool,
    /// This branch may be rerolled once if the caller permits.
    pub reroll: bool,
}

impl Outcome {
    /// Create an outcome with every field given explicitly.
    pub fn new(value: u32, roll_value: i32, success: Success, bypass_next: bool, reroll: bool) -> Self {
        Self {
            value,
            roll_value,
            success,
            bypass_next,
            reroll,
        }
    }

    /// A non-random, successful outcome of the given value.
    pub fn fixed(value: u32) -> Self {
        Self::new(value, FIXED_ROLL, Success::Success, false, false)
    }

    /// A single die face producing one unit.
    pub fn face(roll_value: i32, success: Success) -> Self {
        Self::new(1, roll_value, success, false, false)
    }

    pub fn with_value(self, value: u32) -> Self {
        Self { value, ..self }
    }

    pub fn with_success(self, success: Success) -> Self {
        Self { success, ..self }
    }

    pub fn with_bypass(self, bypass_next: bool) -> Self {
        Self {
            bypass_next,
            ..self
        }
    }

    pub fn with_reroll(self, reroll: bool) -> Self {
        Self { reroll, ..self }
    }

    /// Returns true if the outcome came from a die rather than a fixed value.
    pub fn is_rolled(&self) -> bool {
        self.roll_value != FIXED_ROLL
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let success = match self.success {
            Success::Failure => 'F',
            Success::Success => 'S',
            Success::Critical => 'C',
        };
        write!(
            f,
            "O({}, {}{}{})",
            self.value,
            success,
            if self.bypass_next { 'B' } else { '-' },
            if self.reroll { 'R' } else { '-' },
        )
    }
}
