//! Outcome modifiers module.
//!
//! A modifier is a named, pure transform of one phase's outcome list. It
//! represents a single special rule. Modifiers are tagged with the phase
//! they belong to and applied in the order the caller listed them in
//! [`AttackOptions`](crate::AttackOptions); a phase never sees another
//! phase's modifiers.

use crate::outcome::Outcome;
use crate::profile::RollContext;
use crate::rule_id::RuleId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One step of the combat sequence.
///
/// Phases run in declaration order: attack, hit, wound, save, damage,
/// feel no pain.
///
/// # Examples
///
/// ```rust
/// use mathhammer::Phase;
///
/// assert_eq!(Phase::Attack.next(), Some(Phase::Hit));
/// assert_eq!(Phase::Wound.skip(), Some(Phase::Damage));
/// assert_eq!(Phase::FeelNoPain.next(), None);
/// assert!(Phase::Save.is_defensive());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Attack,
    Hit,
    Wound,
    Save,
    Damage,
    FeelNoPain,
}

impl Phase {
    /// All phases in resolution order.
    pub const ALL: [Phase; 6] = [
        Phase::Attack,
        Phase::Hit,
        Phase::Wound,
        Phase::Save,
        Phase::Damage,
        Phase::FeelNoPain,
    ];

    /// The phase that follows this one, if any.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Attack => Some(Phase::Hit),
            Phase::Hit => Some(Phase::Wound),
            Phase::Wound => Some(Phase::Save),
            Phase::Save => Some(Phase::Damage),
            Phase::Damage => Some(Phase::FeelNoPain),
            Phase::FeelNoPain => None,
        }
    }

    /// The phase reached when the next one is bypassed.
    pub fn skip(self) -> Option<Phase> {
        self.next().and_then(Phase::next)
    }

    /// Defensive phases are rolled by the target: their success stops damage.
    pub fn is_defensive(self) -> bool {
        matches!(self, Phase::Save | Phase::FeelNoPain)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Attack => "attack",
            Phase::Hit => "hit",
            Phase::Wound => "wound",
            Phase::Save => "save",
            Phase::Damage => "damage",
            Phase::FeelNoPain => "feel_no_pain",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Trait for special rules that transform a phase's outcome list.
///
/// Implementations must be pure: the same outcomes and context always give
/// the same result. The name identifies the rule in memo keys, so two
/// modifiers with different behaviour must not share a name.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{AttackOptions, OutcomeModifier, Phase, RollContext, TargetProfile, WeaponProfile};
/// use mathhammer::action;
/// use mathhammer::rules::LethalHits;
///
/// let weapon = WeaponProfile::new(1, 3, 4, 0, 1);
/// let target = TargetProfile::new(4, 3);
/// let options = AttackOptions::new();
/// let ctx = RollContext::new(&weapon, &target, &options);
///
/// let base = action::base_roll(Phase::Hit, &ctx);
/// let lethal = LethalHits.apply(base, &ctx);
/// assert!(lethal[5].bypass_next); // the 6 is critical
/// assert!(!lethal[4].bypass_next);
/// ```
pub trait OutcomeModifier: Send + Sync {
    /// The phase this modifier applies to.
    fn phase(&self) -> Phase;

    /// Unique name of the rule, including its parameters.
    fn name(&self) -> RuleId;

    /// Transform the outcome list, returning a new one.
    fn apply(&self, outcomes: Vec<Outcome>, ctx: &RollContext<'_>) -> Vec<Outcome>;

    /// Factor by which `apply` may multiply the length of the list, or
    /// `None` when it does not fit in a `usize`.
    ///
    /// The resolver checks the product of these factors against its
    /// outcome bound before rolling a phase.
    fn expansion(&self, _ctx: &RollContext<'_>) -> Option<usize> {
        Some(1)
    }
}

type TransformFn = dyn Fn(Vec<Outcome>, &RollContext<'_>) -> Vec<Outcome> + Send + Sync;

/// A modifier built from a closure.
///
/// Used for house rules and one-off effects that have no dedicated type.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{FnModifier, OutcomeModifier, Phase};
///
/// let plus_one_damage = FnModifier::new(Phase::Damage, "plus_one_damage", |outcomes, _ctx| {
///     outcomes
///         .into_iter()
///         .map(|o| o.with_value(o.value + 1))
///         .collect()
/// });
/// assert_eq!(plus_one_damage.phase(), Phase::Damage);
/// assert_eq!(plus_one_damage.name().as_str(), "plus_one_damage");
/// ```
#[derive(Clone)]
pub struct FnModifier {
    phase: Phase,
    name: RuleId,
    transform: Arc<TransformFn>,
}

impl FnModifier {
    pub fn new<F>(phase: Phase, name: impl Into<RuleId>, transform: F) -> Self
    where
        F: Fn(Vec<Outcome>, &RollContext<'_>) -> Vec<Outcome> + Send + Sync + 'static,
    {
        Self {
            phase,
            name: name.into(),
            transform: Arc::new(transform),
        }
    }
}

impl OutcomeModifier for FnModifier {
    fn phase(&self) -> Phase {
        self.phase
    }

    fn name(&self) -> RuleId {
        self.name.clone()
    }

    fn apply(&self, outcomes: Vec<Outcome>, ctx: &RollContext<'_>) -> Vec<Outcome> {
        (self.transform)(outcomes, ctx)
    }
}

impl fmt::Debug for FnModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModifier")
            .field("phase", &self.phase)
            .field("name", &self.name)
            .finish()
    }
}

/// Apply every active modifier tagged with `phase`, in the caller's order.
pub fn apply_modifiers(phase: Phase, outcomes: Vec<Outcome>, ctx: &RollContext<'_>) -> Vec<Outcome> {
    ctx.options
        .modifiers()
        .iter()
        .filter(|modifier| modifier.phase() == phase)
        .fold(outcomes, |current, modifier| modifier.apply(current, ctx))
}
