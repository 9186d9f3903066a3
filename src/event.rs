//! Probability algebra.
//!
//! An [`EventSet`] is a tree of independent (`All`) and mutually exclusive
//! (`Together`) events whose leaves carry an [`EventResult`]: the canonical
//! histogram of damage allocations. Flattening a tree yields [`Outcomes`], a
//! map from canonical key to exact probability.
//!
//! Keys are canonical by construction: a histogram does not remember the
//! order in which its allocations were added, so distributions reached via
//! different dice orderings share keys.

use crate::error::CombatError;
use crate::modifier::Phase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Number of allocation values tracked individually (1 to 12 damage).
pub const TRACKED_DAMAGE: usize = 12;

/// Tolerance for a distribution summing to one.
pub const PROBABILITY_TOLERANCE: f64 = 1e-7;

pub type Probability = f64;

/// Flattened distribution: canonical key to probability.
pub type Outcomes = BTreeMap<EventResult, Probability>;

/// Canonical histogram of damage allocations.
///
/// Bucket `i` counts allocations of exactly `i + 1` damage. Allocations
/// above [`TRACKED_DAMAGE`] go to the spill bucket, which keeps each of
/// them, sorted. Allocations of zero are not recorded.
///
/// # Examples
///
/// ```rust
/// use mathhammer::EventResult;
///
/// let key = EventResult::from_value(1)
///     .join(&EventResult::from_value(3))
///     .join(&EventResult::from_value(1))
///     .join(&EventResult::from_value(14));
///
/// assert_eq!(key.allocation_count(), 4);
/// assert_eq!(key.total(), 19);
/// assert_eq!(key.to_string(), "1x2 3x1 +14");
///
/// // Per-allocation cap: every allocation above 2 becomes 2.
/// assert_eq!(key.reduce_to_max(2).total(), 1 + 1 + 2 + 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EventResult {
    buckets: [u32; TRACKED_DAMAGE],
    spill: Vec<u32>,
}

impl EventResult {
    /// No damage allocated.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A single allocation of `value` damage.
    pub fn from_value(value: u32) -> Self {
        let mut result = Self::empty();
        match value {
            0 => {}
            v if v as usize <= TRACKED_DAMAGE => result.buckets[v as usize - 1] = 1,
            v => result.spill.push(v),
        }
        result
    }

    pub fn is_empty(&self) -> bool {
        self.allocation_count() == 0
    }

    /// Bucket-wise sum of two histograms.
    pub fn join(&self, other: &EventResult) -> EventResult {
        let mut buckets = self.buckets;
        for (bucket, extra) in buckets.iter_mut().zip(other.buckets.iter()) {
            *bucket += extra;
        }
        let mut spill = Vec::with_capacity(self.spill.len() + other.spill.len());
        spill.extend_from_slice(&self.spill);
        spill.extend_from_slice(&other.spill);
        spill.sort_unstable();
        EventResult { buckets, spill }
    }

    /// Number of allocations, spill included.
    pub fn allocation_count(&self) -> u32 {
        self.buckets.iter().sum::<u32>() + self.spill.len() as u32
    }

    /// Width of the populated histogram: highest populated bucket index + 1.
    ///
    /// The spill bucket sits just past the tracked buckets, so a key using it
    /// has a count of `TRACKED_DAMAGE + 1`.
    pub fn count(&self) -> u32 {
        if !self.spill.is_empty() {
            return TRACKED_DAMAGE as u32 + 1;
        }
        self.buckets
            .iter()
            .rposition(|bucket| *bucket > 0)
            .map_or(0, |index| index as u32 + 1)
    }

    /// Total damage over every allocation.
    pub fn total(&self) -> u32 {
        self.allocations()
            .map(|(value, count)| value * count)
            .sum::<u32>()
            + self.spill.iter().sum::<u32>()
    }

    /// Largest single allocation, or zero for an empty key.
    pub fn largest(&self) -> u32 {
        if let Some(spilled) = self.spill.last() {
            return *spilled;
        }
        self.allocations().map(|(value, _)| value).max().unwrap_or(0)
    }

    /// Tracked `(value, count)` pairs with a non-zero count, smallest first.
    pub fn allocations(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, count)| **count > 0)
            .map(|(index, count)| (index as u32 + 1, *count))
    }

    /// Allocations that overflowed the tracked width: `(count, damage)`.
    pub fn spill(&self) -> (u32, u32) {
        (self.spill.len() as u32, self.spill.iter().sum())
    }

    /// The spilled allocations themselves, smallest first.
    pub fn spilled(&self) -> &[u32] {
        &self.spill
    }

    /// Cap every allocation at `max` damage.
    ///
    /// Allocations of `max` or more fold into the `max` bucket, wherever
    /// that bucket lives. `max == 0` drops everything.
    pub fn reduce_to_max(&self, max: u32) -> EventResult {
        if max == 0 {
            return EventResult::empty();
        }
        let cap = max as usize;
        if cap > TRACKED_DAMAGE {
            let mut spill: Vec<u32> = self.spill.iter().map(|value| (*value).min(max)).collect();
            spill.sort_unstable();
            return EventResult {
                buckets: self.buckets,
                spill,
            };
        }

        let mut buckets = [0; TRACKED_DAMAGE];
        buckets[..cap - 1].copy_from_slice(&self.buckets[..cap - 1]);
        buckets[cap - 1] = self.buckets[cap - 1..].iter().sum::<u32>() + self.spill.len() as u32;
        EventResult {
            buckets,
            spill: Vec::new(),
        }
    }
}

impl fmt::Display for EventResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        let mut parts: Vec<String> = self
            .allocations()
            .map(|(value, count)| format!("{}x{}", value, count))
            .collect();
        parts.extend(self.spill.iter().map(|value| format!("+{}", value)));
        f.write_str(&parts.join(" "))
    }
}

/// An `All` product needed more key pairs than allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeExceeded {
    pub required: usize,
    pub limit: usize,
}

impl SizeExceeded {
    /// Attribute the overflow to the phase being resolved.
    pub fn in_phase(self, phase: Phase) -> CombatError {
        CombatError::SizeLimit {
            phase,
            required: self.required,
            limit: self.limit,
        }
    }
}

/// A tree of probabilistic events.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{EventResult, EventSet};
///
/// // One die: damage 1 on a 3+, nothing otherwise.
/// let die = EventSet::Together(
///     (1..=6)
///         .map(|face| EventSet::leaf(EventResult::from_value(if face >= 3 { 1 } else { 0 })))
///         .collect(),
/// );
/// // Two independent dice.
/// let two = EventSet::All(vec![die.clone(), die]);
/// let outcomes = two.outcomes();
///
/// let p = 4.0 / 6.0;
/// let both = EventResult::from_value(1).join(&EventResult::from_value(1));
/// assert!((outcomes[&both] - p * p).abs() < 1e-12);
/// assert!((outcomes[&EventResult::empty()] - (1.0 - p) * (1.0 - p)).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub enum EventSet {
    /// A terminal result with its probability weight.
    Leaf {
        key: EventResult,
        probability: Probability,
    },
    /// Independent events: keys are joined and probabilities multiplied.
    All(Vec<EventSet>),
    /// Mutually exclusive alternatives, weighted by `weight()`.
    Together(Vec<EventSet>),
    /// An already flattened distribution.
    Resolved(Arc<Outcomes>),
}

impl EventSet {
    /// A leaf with weight one.
    pub fn leaf(key: EventResult) -> Self {
        EventSet::Leaf {
            key,
            probability: 1.0,
        }
    }

    /// The certain empty result.
    pub fn nothing() -> Self {
        Self::leaf(EventResult::empty())
    }

    /// Relative weight of this event inside a `Together`.
    pub fn weight(&self) -> Probability {
        match self {
            EventSet::Leaf { probability, .. } => *probability,
            _ => 1.0,
        }
    }

    /// Flatten without a size bound.
    pub fn outcomes(&self) -> Outcomes {
        self.outcomes_within(usize::MAX).unwrap_or_default()
    }

    /// Flatten, failing when any `All` product would evaluate more than
    /// `limit` key pairs.
    ///
    /// # Panics
    ///
    /// Panics if a `Together` has no positive weight or does not sum to one.
    pub fn outcomes_within(&self, limit: usize) -> Result<Outcomes, SizeExceeded> {
        match self {
            EventSet::Leaf { key, probability } => {
                let mut outcomes = Outcomes::new();
                outcomes.insert(key.clone(), *probability);
                Ok(outcomes)
            }
            EventSet::Resolved(outcomes) => Ok(outcomes.as_ref().clone()),
            EventSet::All(children) => {
                let mut acc = Outcomes::new();
                acc.insert(EventResult::empty(), 1.0);
                for child in children {
                    let child = child.outcomes_within(limit)?;
                    acc = product(&acc, &child, limit)?;
                }
                Ok(acc)
            }
            EventSet::Together(children) => together(children, limit),
        }
    }
}

fn product(left: &Outcomes, right: &Outcomes, limit: usize) -> Result<Outcomes, SizeExceeded> {
    let required = left.len().saturating_mul(right.len());
    if required > limit {
        return Err(SizeExceeded { required, limit });
    }

    let mut result = Outcomes::new();
    for (left_key, left_p) in left {
        for (right_key, right_p) in right {
            *result.entry(left_key.join(right_key)).or_insert(0.0) += left_p * right_p;
        }
    }
    Ok(result)
}

fn together(children: &[EventSet], limit: usize) -> Result<Outcomes, SizeExceeded> {
    let total_weight: Probability = children.iter().map(EventSet::weight).sum();
    assert!(
        total_weight > 0.0,
        "Together needs a positive total weight, got {}",
        total_weight
    );

    let mut result = Outcomes::new();
    for child in children {
        match child {
            EventSet::Leaf { key, probability } => {
                *result.entry(key.clone()).or_insert(0.0) += probability / total_weight;
            }
            _ => {
                let scale = child.weight() / total_weight;
                for (key, p) in child.outcomes_within(limit)? {
                    *result.entry(key).or_insert(0.0) += p * scale;
                }
            }
        }
    }

    let sum: Probability = result.values().sum();
    assert!(
        (sum - 1.0).abs() < PROBABILITY_TOLERANCE,
        "Together probabilities sum to {}, expected 1",
        sum
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(values: &[u32]) -> EventResult {
        values
            .iter()
            .fold(EventResult::empty(), |acc, v| acc.join(&EventResult::from_value(*v)))
    }

    fn coin(value: u32) -> EventSet {
        EventSet::Together(vec![EventSet::nothing(), EventSet::leaf(EventResult::from_value(value))])
    }

    #[test]
    fn test_from_value_zero_is_empty() {
        assert!(EventResult::from_value(0).is_empty());
        assert_eq!(EventResult::from_value(0), EventResult::empty());
    }

    #[test]
    fn test_spill_bucket() {
        let big = EventResult::from_value(20).join(&EventResult::from_value(13));
        assert_eq!(big.spill(), (2, 33));
        assert_eq!(big.allocation_count(), 2);
        assert_eq!(big.count(), TRACKED_DAMAGE as u32 + 1);
        assert_eq!(big.total(), 33);
        assert_eq!(big.allocations().count(), 0);
        assert_eq!(big.spilled(), &[13, 20]);
        assert_eq!(big.largest(), 20);
        assert_eq!(big.to_string(), "+13 +20");
    }

    #[test]
    fn test_join_is_order_independent() {
        assert_eq!(key(&[1, 3, 2]), key(&[2, 1, 3]));
        assert_eq!(key(&[1, 3, 2]).largest(), 3);
        assert_eq!(key(&[1, 3, 2]).count(), 3);
        assert_eq!(key(&[1, 1]).count(), 1);
        assert_eq!(EventResult::empty().count(), 0);
    }

    #[test]
    fn test_reduce_to_max() {
        let k = key(&[1, 2, 3, 5, 15]);
        let capped = k.reduce_to_max(3);
        assert_eq!(capped, key(&[1, 2, 3, 3, 3]));
        assert_eq!(capped.spill(), (0, 0));

        assert!(k.reduce_to_max(0).is_empty());
        assert_eq!(k.reduce_to_max(12), key(&[1, 2, 3, 5, 12]));
    }

    #[test]
    fn test_reduce_to_max_above_tracked_width() {
        let k = key(&[2, 14, 20, 30]);
        let capped = k.reduce_to_max(15);
        assert_eq!(capped, key(&[2, 14, 15, 15]));
        assert_eq!(capped.spilled(), &[14, 15, 15]);
        assert_eq!(capped.largest(), 15);
        assert_eq!(capped.total(), 2 + 14 + 15 + 15);
        assert_eq!(capped.reduce_to_max(15), capped);

        // A cap above every allocation changes nothing.
        assert_eq!(k.reduce_to_max(40), k);
    }

    #[test]
    fn test_reduce_to_max_idempotent() {
        let k = key(&[4, 4, 6, 1]);
        assert_eq!(k.reduce_to_max(2).reduce_to_max(2), k.reduce_to_max(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(EventResult::empty().to_string(), "-");
        assert_eq!(key(&[2, 2, 6]).to_string(), "2x2 6x1");
    }

    #[test]
    fn test_leaf_outcomes() {
        let leaf = EventSet::Leaf {
            key: EventResult::from_value(2),
            probability: 0.25,
        };
        assert_eq!(leaf.weight(), 0.25);
        assert_eq!(leaf.outcomes()[&EventResult::from_value(2)], 0.25);
    }

    #[test]
    fn test_all_empty_is_certain() {
        let outcomes = EventSet::All(vec![]).outcomes();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[&EventResult::empty()], 1.0);
    }

    #[test]
    fn test_all_multiplies() {
        let outcomes = EventSet::All(vec![coin(1), coin(2)]).outcomes();
        assert_eq!(outcomes.len(), 4);
        for p in outcomes.values() {
            assert!((p - 0.25).abs() < 1e-12);
        }
        assert!(outcomes.contains_key(&key(&[1, 2])));
    }

    #[test]
    fn test_together_normalises_weights() {
        let weighted = EventSet::Together(vec![
            EventSet::Leaf {
                key: EventResult::from_value(1),
                probability: 0.2,
            },
            EventSet::Leaf {
                key: EventResult::empty(),
                probability: 0.6,
            },
        ]);
        let outcomes = weighted.outcomes();
        assert!((outcomes[&EventResult::from_value(1)] - 0.25).abs() < 1e-12);
        assert!((outcomes[&EventResult::empty()] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_together_of_composites() {
        let nested = EventSet::Together(vec![coin(1), EventSet::nothing()]);
        let outcomes = nested.outcomes();
        assert!((outcomes[&EventResult::empty()] - 0.75).abs() < 1e-12);
        assert!((outcomes[&EventResult::from_value(1)] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_resolved_embeds_distribution() {
        let inner = Arc::new(coin(3).outcomes());
        let outcomes = EventSet::All(vec![
            EventSet::Resolved(inner.clone()),
            EventSet::Resolved(inner),
        ])
        .outcomes();
        assert!((outcomes[&key(&[3, 3])] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_size_limit() {
        let three = EventSet::All(vec![coin(1), coin(2), coin(3)]);
        let err = three.outcomes_within(3).unwrap_err();
        assert_eq!(err, SizeExceeded { required: 4, limit: 3 });
        assert!(three.outcomes_within(8).is_ok());

        let combat = err.in_phase(Phase::Hit);
        assert!(combat.is_size_limit());
    }

    #[test]
    #[should_panic(expected = "sum to")]
    fn test_together_invariant_violation_panics() {
        let broken: Outcomes = [(EventResult::empty(), 0.5)].into_iter().collect();
        EventSet::Together(vec![EventSet::Resolved(Arc::new(broken))]).outcomes();
    }
}
