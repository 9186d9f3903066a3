//! Derived views of a resolved distribution.
//!
//! These are the read-only results a presentation layer consumes: the mean
//! damage, the per-allocation capped distribution and the cumulative
//! "at least k damage" row.

use crate::event::{EventResult, Outcomes, Probability};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Probability-weighted mean of the total damage.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{average_damage, EventResult, Outcomes};
///
/// let outcomes: Outcomes = [
///     (EventResult::empty(), 0.5),
///     (EventResult::from_value(3), 0.5),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(average_damage(&outcomes), 1.5);
/// ```
pub fn average_damage(outcomes: &Outcomes) -> f64 {
    outcomes
        .iter()
        .map(|(key, p)| f64::from(key.total()) * p)
        .sum()
}

/// Cap every allocation of every key at `cap` damage and merge the keys
/// that become equal.
///
/// Applying the same cap twice changes nothing.
pub fn cap_damage(outcomes: &Outcomes, cap: u32) -> Outcomes {
    let mut capped = Outcomes::new();
    for (key, p) in outcomes {
        *capped.entry(key.reduce_to_max(cap)).or_insert(0.0) += p;
    }
    capped
}

/// `P(total damage >= k)` for `k = 1..=n`.
///
/// The returned row is non-increasing.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{cumulative_damage_probabilities, EventResult, Outcomes};
///
/// let outcomes: Outcomes = [
///     (EventResult::empty(), 0.25),
///     (EventResult::from_value(1), 0.25),
///     (EventResult::from_value(2), 0.5),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(cumulative_damage_probabilities(&outcomes, 3), vec![0.75, 0.5, 0.0]);
/// ```
pub fn cumulative_damage_probabilities(outcomes: &Outcomes, n: u32) -> Vec<Probability> {
    let totals = damage_totals(outcomes);
    (1..=n)
        .map(|k| totals.range(k..).map(|(_, p)| p).sum())
        .collect()
}

/// Distribution of total damage, merging keys with the same total.
pub fn damage_totals(outcomes: &Outcomes) -> BTreeMap<u32, Probability> {
    let mut totals = BTreeMap::new();
    for (key, p) in outcomes {
        *totals.entry(key.total()).or_insert(0.0) += p;
    }
    totals
}

pub fn total_probability(outcomes: &Outcomes) -> Probability {
    outcomes.values().sum()
}

/// Probability that no damage at all is dealt.
pub fn no_damage_probability(outcomes: &Outcomes) -> Probability {
    outcomes.get(&EventResult::empty()).copied().unwrap_or(0.0)
}

/// Serializable summary row for one weapon against one target.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{DamageSummary, EventResult, Outcomes};
///
/// let outcomes: Outcomes = [(EventResult::from_value(2), 1.0)].into_iter().collect();
/// let summary = DamageSummary::from_outcomes(&outcomes, 3);
/// assert_eq!(summary.average, 2.0);
/// assert_eq!(summary.at_least, vec![1.0, 1.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageSummary {
    /// Mean total damage.
    pub average: f64,
    /// `at_least[k - 1]` is the probability of dealing `k` or more damage.
    pub at_least: Vec<Probability>,
}

impl DamageSummary {
    pub fn from_outcomes(outcomes: &Outcomes, columns: u32) -> Self {
        Self {
            average: average_damage(outcomes),
            at_least: cumulative_damage_probabilities(outcomes, columns),
        }
    }
}
