//! Attack options.
//!
//! `AttackOptions` carries the situational flags of an attack (half range,
//! cover, anti keyword active) and the ordered list of modifiers in effect.
//! The list is the only place that decides which special rules apply; phase
//! actions never name a rule.

use crate::modifier::OutcomeModifier;
use crate::rule_id::RuleId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Immutable attack configuration.
///
/// Two options compare equal when their flags match and their modifiers have
/// the same names in the same order, which lets options take part in memo
/// keys.
///
/// # Examples
///
/// ```rust
/// use mathhammer::AttackOptions;
/// use mathhammer::rules::{LethalHits, SustainedHits};
/// use std::sync::Arc;
///
/// let options = AttackOptions::new()
///     .with_half_range(true)
///     .with_modifier(Arc::new(SustainedHits::fixed(1)))
///     .with_modifier(Arc::new(LethalHits));
///
/// assert!(options.half_range);
/// let names: Vec<_> = options.modifier_names().map(|n| n.to_string()).collect();
/// assert_eq!(names, vec!["sustained_hits_1", "lethal_hits"]);
/// ```
#[derive(Clone)]
pub struct AttackOptions {
    pub half_range: bool,
    pub cover: bool,
    pub anti_active: bool,
    modifiers: Arc<[Arc<dyn OutcomeModifier>]>,
}

impl AttackOptions {
    /// Options with every flag off and no modifiers.
    pub fn new() -> Self {
        Self {
            half_range: false,
            cover: false,
            anti_active: false,
            modifiers: Arc::from(Vec::new()),
        }
    }

    /// Options with the given modifiers, in the given order.
    pub fn with_modifiers(modifiers: Vec<Arc<dyn OutcomeModifier>>) -> Self {
        Self {
            modifiers: Arc::from(modifiers),
            ..Self::new()
        }
    }

    pub fn with_half_range(self, half_range: bool) -> Self {
        Self { half_range, ..self }
    }

    pub fn with_cover(self, cover: bool) -> Self {
        Self { cover, ..self }
    }

    pub fn with_anti_active(self, anti_active: bool) -> Self {
        Self {
            anti_active,
            ..self
        }
    }

    /// Append a modifier after the ones already present.
    pub fn with_modifier(self, modifier: Arc<dyn OutcomeModifier>) -> Self {
        let mut modifiers: Vec<_> = self.modifiers.iter().cloned().collect();
        modifiers.push(modifier);
        Self {
            modifiers: Arc::from(modifiers),
            ..self
        }
    }

    /// The modifiers in effect, in application order.
    pub fn modifiers(&self) -> &[Arc<dyn OutcomeModifier>] {
        &self.modifiers
    }

    pub fn modifier_names(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.modifiers.iter().map(|m| m.name())
    }
}

impl Default for AttackOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for AttackOptions {
    fn eq(&self, other: &Self) -> bool {
        self.half_range == other.half_range
            && self.cover == other.cover
            && self.anti_active == other.anti_active
            && self.modifiers.len() == other.modifiers.len()
            && self.modifier_names().eq(other.modifier_names())
    }
}

impl Eq for AttackOptions {}

impl Hash for AttackOptions {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.half_range.hash(state);
        self.cover.hash(state);
        self.anti_active.hash(state);
        self.modifiers.len().hash(state);
        for name in self.modifier_names() {
            name.hash(state);
        }
    }
}

impl fmt::Debug for AttackOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttackOptions")
            .field("half_range", &self.half_range)
            .field("cover", &self.cover)
            .field("anti_active", &self.anti_active)
            .field("modifiers", &self.modifier_names().collect::<Vec<_>>())
            .finish()
    }
}
