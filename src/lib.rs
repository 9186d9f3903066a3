//! # mathhammer - Exact Damage Distributions for Tabletop Combat
//!
//! A combat calculator for miniature wargames that provides:
//! - **Exact** probabilities (no sampling, no approximation)
//! - **Rule-driven** phases (special rules are modifiers, not special cases)
//! - **Memoized** resolution (shared sub-rolls are computed once)
//! - **Bounded** work (oversized requests fail instead of exhausting memory)
//!
//! ## Core Concepts
//!
//! ### Phase Pipeline
//!
//! An attack flows through a fixed sequence of phases:
//!
//! ```text
//! attack → hit → wound → save → damage → feel no pain
//! ```
//!
//! 1. **Actions** produce a phase's base outcome list (one entry per die face)
//! 2. **Modifiers** transform the list in the order the caller gave them
//! 3. The **Resolver** branches on every outcome and combines the branches
//!    into an exact distribution
//!
//! ### Probability Algebra
//!
//! - `All`: independent events, whose allocations add up
//! - `Together`: mutually exclusive alternatives, such as the faces of a die
//! - `EventResult`: canonical histogram of damage allocations used as the key
//!   of every distribution
//!
//! ## Example
//!
//! ```rust
//! use mathhammer::*;
//!
//! let registry = RuleRegistry::standard();
//! let options = AttackOptions::with_modifiers(
//!     registry.resolve_all(["Sustained Hits 1", "Lethal Hits"]).unwrap(),
//! );
//!
//! // A 2, WS 3+, S 4, AP -1, D 1 against T 4, Sv 3+.
//! let weapon = WeaponProfile::new(2, 3, 4, -1, 1);
//! let target = TargetProfile::new(4, 3);
//!
//! let mut resolver = Resolver::default();
//! let outcomes = resolver.attack_roll(&weapon, &target, &options).unwrap();
//!
//! assert!((total_probability(&outcomes) - 1.0).abs() < 1e-9);
//! assert!(average_damage(&outcomes) > 0.0);
//! let row = cumulative_damage_probabilities(&outcomes, 4);
//! assert!(row.windows(2).all(|w| w[0] >= w[1]));
//! ```
//!
//! ## Modules
//!
//! - [`outcome`] - Outcome and success types
//! - [`dice`] - Dice notation and weapon characteristics
//! - [`profile`] - Weapon and target statistics
//! - [`options`] - Attack options and active modifiers
//! - [`modifier`] - Phases and the modifier trait
//! - [`action`] - Base phase actions
//! - [`rules`] - Built-in special rules
//! - [`registry`] - Rule name parsing and factories
//! - [`event`] - Probability algebra
//! - [`resolver`] - Memoized phase resolver
//! - [`summary`] - Derived views of a distribution
//! - [`batch`] - Parallel resolution
//! - [`error`] - Error types

pub mod action;
pub mod batch;
pub mod config;
pub mod dice;
pub mod error;
pub mod event;
pub mod memo;
pub mod modifier;
pub mod options;
pub mod outcome;
pub mod profile;
pub mod registry;
pub mod resolver;
pub mod rule_id;
pub mod rules;
pub mod summary;

// Re-export main types for convenience
pub use batch::{resolve_batch, AttackRequest};
pub use config::ResolverConfig;
pub use dice::{Characteristic, Dice, DiceParseError};
pub use error::CombatError;
pub use event::{EventResult, EventSet, Outcomes, Probability, TRACKED_DAMAGE};
pub use modifier::{FnModifier, OutcomeModifier, Phase};
pub use options::AttackOptions;
pub use outcome::{Outcome, Success, FIXED_ROLL};
pub use profile::{RollContext, TargetProfile, WeaponProfile};
pub use registry::{ParsedRule, RuleArgs, RuleRegistry};
pub use resolver::{RerollBudget, Resolver};
pub use rule_id::RuleId;
pub use summary::{
    average_damage, cap_damage, cumulative_damage_probabilities, damage_totals,
    total_probability, DamageSummary,
};
