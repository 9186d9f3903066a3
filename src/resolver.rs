//! Phase resolver module.
//!
//! Provides the `Resolver` type, the main entry point for turning a weapon,
//! a target and attack options into an exact damage distribution. It walks
//! the phases attack → hit → wound → save → damage → feel no pain, builds
//! the event tree for each one and memoizes every flattened phase result.

use crate::action;
use crate::config::ResolverConfig;
use crate::error::CombatError;
use crate::event::{EventResult, EventSet, Outcomes};
use crate::memo::Memo;
use crate::modifier::Phase;
use crate::options::AttackOptions;
use crate::outcome::Outcome;
use crate::profile::{RollContext, TargetProfile, WeaponProfile};
use std::sync::Arc;

/// Whether a phase may still reroll its marked outcomes.
///
/// A phase resolved with `Available` reroll budget may re-resolve itself
/// once with `Spent`; a `Spent` phase never rerolls. Every child phase
/// starts with a fresh `Available` budget.
///
/// # Examples
///
/// ```rust
/// use mathhammer::RerollBudget;
///
/// assert_eq!(RerollBudget::Available.spend(), Some(RerollBudget::Spent));
/// assert_eq!(RerollBudget::Spent.spend(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RerollBudget {
    #[default]
    Available,
    Spent,
}

impl RerollBudget {
    /// The budget after using the reroll, if one is left.
    pub fn spend(self) -> Option<RerollBudget> {
        match self {
            RerollBudget::Available => Some(RerollBudget::Spent),
            RerollBudget::Spent => None,
        }
    }

    pub fn is_available(self) -> bool {
        self == RerollBudget::Available
    }
}

/// Full argument tuple of a phase resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MemoKey {
    phase: Phase,
    weapon: WeaponProfile,
    target: TargetProfile,
    options: AttackOptions,
    budget: RerollBudget,
}

impl MemoKey {
    fn new(phase: Phase, ctx: &RollContext<'_>, budget: RerollBudget) -> Self {
        Self {
            phase,
            weapon: ctx.weapon.clone(),
            target: ctx.target.clone(),
            options: ctx.options.clone(),
            budget,
        }
    }
}

/// Memoizing resolver for combat distributions.
///
/// For every outcome of a phase roll the resolver picks one branch:
/// 1. `bypass_next`: resolve the phase after next, `value` times
/// 2. success: resolve the next phase `value` times (for the save and
///    feel no pain phases, success means no damage)
/// 3. a failure marked for reroll with budget left: resolve the same phase
///    again with the budget spent
/// 4. any other failure: no damage (for defensive phases, advance)
///
/// Repeated resolutions are independent and combined with `All`; the faces
/// of one roll are mutually exclusive and combined with `Together`.
///
/// # Examples
///
/// ```rust
/// use mathhammer::*;
///
/// let mut resolver = Resolver::default();
///
/// // Hits on 2+, wounds on 2+, no save, one damage.
/// let weapon = WeaponProfile::new(1, 2, 9, -6, 1);
/// let target = TargetProfile::new(2, 7);
/// let outcomes = resolver.attack_roll(&weapon, &target, &AttackOptions::new()).unwrap();
///
/// let nothing = outcomes[&EventResult::empty()];
/// let one = outcomes[&EventResult::from_value(1)];
/// assert!((nothing - 11.0 / 36.0).abs() < 1e-9);
/// assert!((one - 25.0 / 36.0).abs() < 1e-9);
/// ```
pub struct Resolver {
    config: ResolverConfig,
    memo: Memo<MemoKey, Arc<Outcomes>>,
}

impl Resolver {
    /// Create a resolver with its own empty memo table.
    ///
    /// # Returns
    ///
    /// * `Ok(Resolver)` - The configuration is valid
    /// * `Err(CombatError::InvalidConfig)` - `max_outcomes` is zero
    pub fn new(config: ResolverConfig) -> Result<Self, CombatError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    pub(crate) fn with_valid_config(config: ResolverConfig) -> Self {
        Self {
            memo: Memo::new(config.cache_capacity),
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a whole attack sequence.
    ///
    /// # Returns
    ///
    /// * `Ok(Outcomes)` - Canonical damage keys and their probabilities,
    ///   summing to one
    /// * `Err(CombatError::SizeLimit)` - The distribution would exceed
    ///   `max_outcomes`
    pub fn attack_roll(
        &mut self,
        weapon: &WeaponProfile,
        target: &TargetProfile,
        options: &AttackOptions,
    ) -> Result<Outcomes, CombatError> {
        tracing::debug!("Resolving {} against {}", weapon, target);
        let ctx = RollContext::new(weapon, target, options);
        let outcomes = self.attack(&ctx, RerollBudget::Available)?;
        Ok(outcomes.as_ref().clone())
    }

    pub fn attack(
        &mut self,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<Arc<Outcomes>, CombatError> {
        self.resolve(Phase::Attack, ctx, budget)
    }

    pub fn hit(
        &mut self,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<Arc<Outcomes>, CombatError> {
        self.resolve(Phase::Hit, ctx, budget)
    }

    pub fn wound(
        &mut self,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<Arc<Outcomes>, CombatError> {
        self.resolve(Phase::Wound, ctx, budget)
    }

    pub fn save(
        &mut self,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<Arc<Outcomes>, CombatError> {
        self.resolve(Phase::Save, ctx, budget)
    }

    /// Distribution of the single allocation one unsaved wound inflicts.
    pub fn damage(
        &mut self,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<Arc<Outcomes>, CombatError> {
        self.resolve(Phase::Damage, ctx, budget)
    }

    /// Distribution of the damage points one point of damage leaves after
    /// the target's feel no pain roll.
    pub fn feel_no_pain(
        &mut self,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<Arc<Outcomes>, CombatError> {
        self.resolve(Phase::FeelNoPain, ctx, budget)
    }

    /// Resolve any phase, consulting the memo table first.
    ///
    /// A phase that fails with a size-limit error is not cached.
    pub fn resolve(
        &mut self,
        phase: Phase,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<Arc<Outcomes>, CombatError> {
        let key = MemoKey::new(phase, ctx, budget);
        if let Some(cached) = self.memo.get(&key) {
            tracing::trace!("Memo hit for {} phase ({:?})", phase, budget);
            return Ok(Arc::clone(cached));
        }

        let event = self.build(phase, ctx, budget)?;
        let outcomes = event
            .outcomes_within(self.config.max_outcomes)
            .map_err(|exceeded| self.size_limit(exceeded.in_phase(phase)))?;

        tracing::debug!(
            "Resolved {} phase ({:?}) into {} outcomes",
            phase,
            budget,
            outcomes.len()
        );
        let outcomes = Arc::new(outcomes);
        self.memo.insert(key, Arc::clone(&outcomes));
        Ok(outcomes)
    }

    /// Number of memoized phase results.
    pub fn cache_len(&self) -> usize {
        self.memo.len()
    }

    pub fn clear_cache(&mut self) {
        self.memo.clear();
    }

    fn build(
        &mut self,
        phase: Phase,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
    ) -> Result<EventSet, CombatError> {
        let expected = action::roll_size(phase, ctx).unwrap_or(usize::MAX);
        self.check_expansion(phase, expected)?;
        let faces = action::roll(phase, ctx);
        self.check_expansion(phase, faces.len())?;

        let mut branches = Vec::with_capacity(faces.len());
        for outcome in faces {
            branches.push(self.branch(phase, ctx, budget, outcome)?);
        }
        Ok(EventSet::Together(branches))
    }

    fn branch(
        &mut self,
        phase: Phase,
        ctx: &RollContext<'_>,
        budget: RerollBudget,
        outcome: Outcome,
    ) -> Result<EventSet, CombatError> {
        if phase == Phase::Damage && (outcome.bypass_next || outcome.success.passed()) {
            return self.allocate(ctx, outcome.value, outcome.bypass_next);
        }

        if outcome.bypass_next {
            return self.advance(phase, phase.skip(), ctx, outcome.value);
        }

        if outcome.success.passed() {
            if phase.is_defensive() {
                return Ok(EventSet::nothing());
            }
            return self.advance(phase, phase.next(), ctx, outcome.value);
        }

        if outcome.reroll {
            if let Some(spent) = budget.spend() {
                return Ok(EventSet::Resolved(self.resolve(phase, ctx, spent)?));
            }
        }

        if phase.is_defensive() {
            self.advance(phase, phase.next(), ctx, outcome.value)
        } else {
            Ok(EventSet::nothing())
        }
    }

    /// `count` independent resolutions of `target`, or `count` damage
    /// points once the sequence has run out of phases.
    fn advance(
        &mut self,
        from: Phase,
        target: Option<Phase>,
        ctx: &RollContext<'_>,
        count: u32,
    ) -> Result<EventSet, CombatError> {
        let Some(next) = target else {
            return Ok(EventSet::leaf(EventResult::from_value(count)));
        };
        self.check_expansion(from, count as usize)?;

        let sub = self.resolve(next, ctx, RerollBudget::Available)?;
        Ok(EventSet::All(vec![EventSet::Resolved(sub); count as usize]))
    }

    /// Collapse one damage face into a single allocation.
    ///
    /// Each of the `damage` points runs through feel no pain unless the face
    /// bypasses it; the surviving points form one allocation, capped at the
    /// target's wounds.
    fn allocate(
        &mut self,
        ctx: &RollContext<'_>,
        damage: u32,
        skip_feel_no_pain: bool,
    ) -> Result<EventSet, CombatError> {
        let cap = |total: u32| match ctx.target.wounds {
            Some(wounds) => total.min(wounds),
            None => total,
        };

        if skip_feel_no_pain {
            return Ok(EventSet::leaf(EventResult::from_value(cap(damage))));
        }

        self.check_expansion(Phase::Damage, damage as usize)?;
        let per_point = self.resolve(Phase::FeelNoPain, ctx, RerollBudget::Available)?;
        let points = EventSet::All(vec![EventSet::Resolved(per_point); damage as usize])
            .outcomes_within(self.config.max_outcomes)
            .map_err(|exceeded| self.size_limit(exceeded.in_phase(Phase::Damage)))?;

        Ok(EventSet::Together(
            points
                .into_iter()
                .map(|(key, probability)| EventSet::Leaf {
                    key: EventResult::from_value(cap(key.total())),
                    probability,
                })
                .collect(),
        ))
    }

    fn check_expansion(&self, phase: Phase, required: usize) -> Result<(), CombatError> {
        if required > self.config.max_outcomes {
            return Err(self.size_limit(CombatError::SizeLimit {
                phase,
                required,
                limit: self.config.max_outcomes,
            }));
        }
        Ok(())
    }

    fn size_limit(&self, err: CombatError) -> CombatError {
        tracing::warn!("Abandoning resolution: {}", err);
        err
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::with_valid_config(ResolverConfig::default())
    }
}
