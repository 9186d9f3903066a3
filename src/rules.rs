//! Built-in special rules.
//!
//! Every rule is a small [`OutcomeModifier`] tagged with the phase it
//! changes. Rules never mutate outcomes; they map the list to a new one.
//! Rules with a dice amount (sustained hits D3, rapid fire D6, melta D3)
//! expand the list into one copy per die result, so every entry of the
//! returned list stays equally likely.

use crate::action::{save_passes, save_threshold};
use crate::dice::Characteristic;
use crate::modifier::{OutcomeModifier, Phase};
use crate::outcome::{Outcome, Success, FIXED_ROLL};
use crate::profile::RollContext;
use crate::rule_id::RuleId;

/// Add `amount` to selected outcomes, once per equally likely amount value.
///
/// `select` decides which outcomes receive the extra value; the rest are
/// repeated unchanged in every copy.
fn add_amount(
    outcomes: Vec<Outcome>,
    amount: &Characteristic,
    select: impl Fn(&Outcome) -> bool,
) -> Vec<Outcome> {
    let extras = amount.outcomes();
    let mut result = Vec::with_capacity(outcomes.len() * extras.len());
    for extra in &extras {
        result.extend(outcomes.iter().map(|o| {
            if select(o) {
                o.with_value(o.value + extra.value)
            } else {
                *o
            }
        }));
    }
    result
}

fn amount_suffix(amount: &Characteristic) -> String {
    amount.to_string().to_lowercase()
}

/// Successful attacks skip the hit roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Torrent;

impl OutcomeModifier for Torrent {
    fn phase(&self) -> Phase {
        Phase::Attack
    }

    fn name(&self) -> RuleId {
        RuleId::new("torrent")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes
            .into_iter()
            .map(|o| o.with_bypass(o.bypass_next || o.success.passed()))
            .collect()
    }
}

/// Extra attacks at half range.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{AttackOptions, OutcomeModifier, RollContext, TargetProfile, WeaponProfile};
/// use mathhammer::action;
/// use mathhammer::rules::RapidFire;
/// use mathhammer::Phase;
///
/// let weapon = WeaponProfile::new(2, 3, 4, 0, 1);
/// let target = TargetProfile::new(4, 3);
/// let options = AttackOptions::new().with_half_range(true);
/// let ctx = RollContext::new(&weapon, &target, &options);
///
/// let rapid_fire = RapidFire::fixed(2);
/// let attacks = rapid_fire.apply(action::base_roll(Phase::Attack, &ctx), &ctx);
/// assert_eq!(attacks[0].value, 4);
/// assert_eq!(rapid_fire.name().as_str(), "rapid_fire_2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RapidFire(pub Characteristic);

impl RapidFire {
    pub fn fixed(amount: u32) -> Self {
        Self(Characteristic::Fixed(amount))
    }
}

impl OutcomeModifier for RapidFire {
    fn phase(&self) -> Phase {
        Phase::Attack
    }

    fn name(&self) -> RuleId {
        RuleId::from(format!("rapid_fire_{}", amount_suffix(&self.0)))
    }

    fn apply(&self, outcomes: Vec<Outcome>, ctx: &RollContext<'_>) -> Vec<Outcome> {
        if !ctx.options.half_range {
            return outcomes;
        }
        add_amount(outcomes, &self.0, |_| true)
    }

    fn expansion(&self, ctx: &RollContext<'_>) -> Option<usize> {
        if ctx.options.half_range {
            self.0.face_count()
        } else {
            Some(1)
        }
    }
}

/// Critical hits score extra hits.
///
/// With a dice amount each critical face is split into one entry per die
/// result, and every other face is repeated alongside so the faces stay
/// equally likely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SustainedHits(pub Characteristic);

impl SustainedHits {
    pub fn fixed(amount: u32) -> Self {
        Self(Characteristic::Fixed(amount))
    }

    pub fn dice(amount: crate::dice::Dice) -> Self {
        Self(Characteristic::Dice(amount))
    }
}

impl OutcomeModifier for SustainedHits {
    fn phase(&self) -> Phase {
        Phase::Hit
    }

    fn name(&self) -> RuleId {
        RuleId::from(format!("sustained_hits_{}", amount_suffix(&self.0)))
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        add_amount(outcomes, &self.0, |o| o.success.is_critical())
    }

    fn expansion(&self, _ctx: &RollContext<'_>) -> Option<usize> {
        self.0.face_count()
    }
}

/// Critical hits automatically wound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LethalHits;

impl OutcomeModifier for LethalHits {
    fn phase(&self) -> Phase {
        Phase::Hit
    }

    fn name(&self) -> RuleId {
        RuleId::new("lethal_hits")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes
            .into_iter()
            .map(|o| o.with_bypass(o.bypass_next || o.success.is_critical()))
            .collect()
    }
}

/// Unmodified hit rolls of `n` or more are critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalHits(pub i32);

impl OutcomeModifier for CriticalHits {
    fn phase(&self) -> Phase {
        Phase::Hit
    }

    fn name(&self) -> RuleId {
        RuleId::from(format!("critical_hits_{}", self.0))
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes
            .into_iter()
            .map(|o| critical_from(o, self.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllHitsCritical;

impl OutcomeModifier for AllHitsCritical {
    fn phase(&self) -> Phase {
        Phase::Hit
    }

    fn name(&self) -> RuleId {
        RuleId::new("all_hits_critical")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes.into_iter().map(upgrade_passed).collect()
    }
}

/// Failed hit rolls may be rerolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RerollHits;

impl OutcomeModifier for RerollHits {
    fn phase(&self) -> Phase {
        Phase::Hit
    }

    fn name(&self) -> RuleId {
        RuleId::new("reroll_hits")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes.into_iter().map(mark_failed).collect()
    }
}

/// Hit rolls of 1 may be rerolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RerollHitOnes;

impl OutcomeModifier for RerollHitOnes {
    fn phase(&self) -> Phase {
        Phase::Hit
    }

    fn name(&self) -> RuleId {
        RuleId::new("reroll_hit_ones")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes.into_iter().map(mark_ones).collect()
    }
}

/// Critical wounds skip the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DevastatingWounds;

impl OutcomeModifier for DevastatingWounds {
    fn phase(&self) -> Phase {
        Phase::Wound
    }

    fn name(&self) -> RuleId {
        RuleId::new("devastating_wounds")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes
            .into_iter()
            .map(|o| o.with_bypass(o.bypass_next || o.success.is_critical()))
            .collect()
    }
}

/// Failed wound rolls may be rerolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TwinLinked;

impl OutcomeModifier for TwinLinked {
    fn phase(&self) -> Phase {
        Phase::Wound
    }

    fn name(&self) -> RuleId {
        RuleId::new("twin_linked")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes.into_iter().map(mark_failed).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RerollWoundOnes;

impl OutcomeModifier for RerollWoundOnes {
    fn phase(&self) -> Phase {
        Phase::Wound
    }

    fn name(&self) -> RuleId {
        RuleId::new("reroll_wound_ones")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes.into_iter().map(mark_ones).collect()
    }
}

/// Anti-KEYWORD X+: against a target with the keyword, unmodified wound
/// rolls of `threshold` or more are critical.
///
/// Whether the target has the keyword is the caller's call, given through
/// [`AttackOptions::anti_active`](crate::AttackOptions).
///
/// # Examples
///
/// ```rust
/// use mathhammer::OutcomeModifier;
/// use mathhammer::rules::Anti;
///
/// let anti = Anti::new("Infantry", 4);
/// assert_eq!(anti.name().as_str(), "anti_infantry_4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anti {
    pub keyword: String,
    pub threshold: i32,
}

impl Anti {
    pub fn new(keyword: impl Into<String>, threshold: i32) -> Self {
        Self {
            keyword: keyword.into(),
            threshold,
        }
    }
}

impl OutcomeModifier for Anti {
    fn phase(&self) -> Phase {
        Phase::Wound
    }

    fn name(&self) -> RuleId {
        let keyword = self.keyword.trim().to_lowercase().replace([' ', '-'], "_");
        RuleId::from(format!("anti_{}_{}", keyword, self.threshold))
    }

    fn apply(&self, outcomes: Vec<Outcome>, ctx: &RollContext<'_>) -> Vec<Outcome> {
        if !ctx.options.anti_active {
            return outcomes;
        }
        outcomes
            .into_iter()
            .map(|o| critical_from(o, self.threshold))
            .collect()
    }
}

/// Unmodified wound rolls of `n` or more are critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CriticalWounds(pub i32);

impl OutcomeModifier for CriticalWounds {
    fn phase(&self) -> Phase {
        Phase::Wound
    }

    fn name(&self) -> RuleId {
        RuleId::from(format!("critical_wounds_{}", self.0))
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes
            .into_iter()
            .map(|o| critical_from(o, self.0))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AllWoundsCritical;

impl OutcomeModifier for AllWoundsCritical {
    fn phase(&self) -> Phase {
        Phase::Wound
    }

    fn name(&self) -> RuleId {
        RuleId::new("all_wounds_critical")
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes.into_iter().map(upgrade_passed).collect()
    }
}

/// The target gains no benefit from cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IgnoresCover;

impl OutcomeModifier for IgnoresCover {
    fn phase(&self) -> Phase {
        Phase::Save
    }

    fn name(&self) -> RuleId {
        RuleId::new("ignores_cover")
    }

    fn apply(&self, outcomes: Vec<Outcome>, ctx: &RollContext<'_>) -> Vec<Outcome> {
        if !ctx.options.cover {
            return outcomes;
        }
        let covered = save_threshold(ctx, true);
        let open = save_threshold(ctx, false);
        outcomes
            .into_iter()
            .map(|o| {
                if !o.is_rolled() {
                    return o;
                }
                let with_cover = save_passes(o.roll_value, covered);
                let without = save_passes(o.roll_value, open);
                // Only faces decided by cover flip; earlier save rules stand.
                if with_cover != without && o.success.passed() == with_cover {
                    o.with_success(Success::from_bool(without))
                } else {
                    o
                }
            })
            .collect()
    }
}

/// No save may be taken: every wound proceeds to damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BypassSave;

impl OutcomeModifier for BypassSave {
    fn phase(&self) -> Phase {
        Phase::Save
    }

    fn name(&self) -> RuleId {
        RuleId::new("bypass_save")
    }

    fn apply(&self, _outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        vec![Outcome::new(1, FIXED_ROLL, Success::Failure, false, false)]
    }
}

/// Extra damage at half range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Melta(pub Characteristic);

impl Melta {
    pub fn fixed(amount: u32) -> Self {
        Self(Characteristic::Fixed(amount))
    }
}

impl OutcomeModifier for Melta {
    fn phase(&self) -> Phase {
        Phase::Damage
    }

    fn name(&self) -> RuleId {
        RuleId::from(format!("melta_{}", amount_suffix(&self.0)))
    }

    fn apply(&self, outcomes: Vec<Outcome>, ctx: &RollContext<'_>) -> Vec<Outcome> {
        if !ctx.options.half_range {
            return outcomes;
        }
        add_amount(outcomes, &self.0, |_| true)
    }

    fn expansion(&self, ctx: &RollContext<'_>) -> Option<usize> {
        if ctx.options.half_range {
            self.0.face_count()
        } else {
            Some(1)
        }
    }
}

/// A recognised rule that does not change the damage distribution
/// (blast, heavy, pistol, precision, and the like).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passive(pub RuleId);

impl Passive {
    pub fn new(name: impl Into<RuleId>) -> Self {
        Self(name.into())
    }
}

impl OutcomeModifier for Passive {
    fn phase(&self) -> Phase {
        Phase::Attack
    }

    fn name(&self) -> RuleId {
        self.0.clone()
    }

    fn apply(&self, outcomes: Vec<Outcome>, _ctx: &RollContext<'_>) -> Vec<Outcome> {
        outcomes
    }
}

fn critical_from(outcome: Outcome, threshold: i32) -> Outcome {
    if outcome.is_rolled() && outcome.roll_value >= threshold {
        outcome.with_success(Success::Critical)
    } else {
        outcome
    }
}

fn upgrade_passed(outcome: Outcome) -> Outcome {
    if outcome.success.passed() {
        outcome.with_success(Success::Critical)
    } else {
        outcome
    }
}

fn mark_failed(outcome: Outcome) -> Outcome {
    if outcome.success.passed() {
        outcome
    } else {
        outcome.with_reroll(true)
    }
}

fn mark_ones(outcome: Outcome) -> Outcome {
    if outcome.roll_value == 1 {
        outcome.with_reroll(true)
    } else {
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::base_roll;
    use crate::dice::Dice;
    use crate::options::AttackOptions;
    use crate::profile::{TargetProfile, WeaponProfile};

    fn weapon() -> WeaponProfile {
        WeaponProfile::new(2, 3, 4, 0, 1)
    }

    fn target() -> TargetProfile {
        TargetProfile::new(4, 4)
    }

    #[test]
    fn test_torrent_bypasses_hit() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let attacks = Torrent.apply(base_roll(Phase::Attack, &ctx), &ctx);
        assert!(attacks.iter().all(|o| o.bypass_next));
    }

    #[test]
    fn test_rapid_fire_needs_half_range() {
        let (weapon, target) = (weapon(), target());
        let far = AttackOptions::new();
        let ctx = RollContext::new(&weapon, &target, &far);
        let attacks = RapidFire::fixed(1).apply(base_roll(Phase::Attack, &ctx), &ctx);
        assert_eq!(attacks[0].value, 2);

        let near = AttackOptions::new().with_half_range(true);
        let ctx = RollContext::new(&weapon, &target, &near);
        let attacks = RapidFire::fixed(1).apply(base_roll(Phase::Attack, &ctx), &ctx);
        assert_eq!(attacks[0].value, 3);
    }

    #[test]
    fn test_rapid_fire_dice_expands() {
        let (weapon, target) = (weapon(), target());
        let near = AttackOptions::new().with_half_range(true);
        let ctx = RollContext::new(&weapon, &target, &near);

        let rule = RapidFire(Characteristic::Dice(Dice::d(3).unwrap()));
        let attacks = rule.apply(base_roll(Phase::Attack, &ctx), &ctx);
        let values: Vec<u32> = attacks.iter().map(|o| o.value).collect();
        assert_eq!(values, vec![3, 4, 5]);
        assert_eq!(rule.name().as_str(), "rapid_fire_1d3");
    }

    #[test]
    fn test_sustained_hits_fixed() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let hits = SustainedHits::fixed(1).apply(base_roll(Phase::Hit, &ctx), &ctx);

        assert_eq!(hits.len(), 6);
        assert_eq!(hits[5].value, 2);
        assert!(hits[..5].iter().all(|o| o.value == 1));
    }

    #[test]
    fn test_sustained_hits_dice_keeps_faces_equally_likely() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let rule = SustainedHits::dice(Dice::d(3).unwrap());
        let hits = rule.apply(base_roll(Phase::Hit, &ctx), &ctx);

        assert_eq!(hits.len(), 18);
        let criticals: Vec<u32> = hits
            .iter()
            .filter(|o| o.success.is_critical())
            .map(|o| o.value)
            .collect();
        assert_eq!(criticals, vec![2, 3, 4]);
        assert_eq!(hits.iter().filter(|o| o.roll_value == 1).count(), 3);
        assert_eq!(rule.name().as_str(), "sustained_hits_1d3");
    }

    #[test]
    fn test_lethal_hits_only_criticals() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let hits = LethalHits.apply(base_roll(Phase::Hit, &ctx), &ctx);
        let bypassing: Vec<i32> = hits.iter().filter(|o| o.bypass_next).map(|o| o.roll_value).collect();
        assert_eq!(bypassing, vec![6]);
    }

    #[test]
    fn test_critical_hits_threshold() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let hits = CriticalHits(5).apply(base_roll(Phase::Hit, &ctx), &ctx);
        assert_eq!(hits[4].success, Success::Critical);
        assert_eq!(hits[3].success, Success::Success);
    }

    #[test]
    fn test_all_hits_critical_keeps_failures() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let hits = AllHitsCritical.apply(base_roll(Phase::Hit, &ctx), &ctx);
        assert_eq!(hits[0].success, Success::Failure);
        assert_eq!(hits[1].success, Success::Failure);
        assert!(hits[2..].iter().all(|o| o.success == Success::Critical));
    }

    #[test]
    fn test_reroll_hit_ones_leaves_success() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let base = base_roll(Phase::Hit, &ctx);
        let hits = RerollHitOnes.apply(base.clone(), &ctx);

        assert!(hits[0].reroll);
        assert!(hits[1..].iter().all(|o| !o.reroll));
        for (before, after) in base.iter().zip(&hits) {
            assert_eq!(before.success, after.success);
        }
    }

    #[test]
    fn test_twin_linked_marks_failures() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let wounds = TwinLinked.apply(base_roll(Phase::Wound, &ctx), &ctx);
        let marked: Vec<i32> = wounds.iter().filter(|o| o.reroll).map(|o| o.roll_value).collect();
        assert_eq!(marked, vec![1, 2, 3]);
        assert!(wounds.iter().all(|o| !o.bypass_next));
    }

    #[test]
    fn test_anti_requires_active_keyword() {
        let (weapon, target) = (weapon(), target());
        let rule = Anti::new("infantry", 4);

        let inactive = AttackOptions::new();
        let ctx = RollContext::new(&weapon, &target, &inactive);
        let wounds = rule.apply(base_roll(Phase::Wound, &ctx), &ctx);
        assert_eq!(wounds[3].success, Success::Success);

        let active = AttackOptions::new().with_anti_active(true);
        let ctx = RollContext::new(&weapon, &target, &active);
        let wounds = rule.apply(base_roll(Phase::Wound, &ctx), &ctx);
        let criticals: Vec<i32> = wounds
            .iter()
            .filter(|o| o.success.is_critical())
            .map(|o| o.roll_value)
            .collect();
        assert_eq!(criticals, vec![4, 5, 6]);
    }

    #[test]
    fn test_ignores_cover() {
        let weapon = WeaponProfile::new(1, 3, 4, -1, 1);
        let target = TargetProfile::new(4, 4);
        let options = AttackOptions::new().with_cover(true);
        let ctx = RollContext::new(&weapon, &target, &options);

        let covered = base_roll(Phase::Save, &ctx);
        assert!(covered[3].success.passed());
        let exposed = IgnoresCover.apply(covered, &ctx);
        assert!(!exposed[3].success.passed());
        assert!(exposed[4].success.passed());
    }

    #[test]
    fn test_ignores_cover_keeps_earlier_results() {
        let weapon = WeaponProfile::new(1, 3, 4, -1, 1);
        let target = TargetProfile::new(4, 4);
        let options = AttackOptions::new().with_cover(true);
        let ctx = RollContext::new(&weapon, &target, &options);

        let failed: Vec<Outcome> = base_roll(Phase::Save, &ctx)
            .into_iter()
            .map(|o| o.with_success(Success::Failure))
            .collect();
        let exposed = IgnoresCover.apply(failed.clone(), &ctx);
        assert_eq!(exposed, failed);

        let mut mixed = base_roll(Phase::Save, &ctx);
        mixed[5] = mixed[5].with_success(Success::Failure);
        let exposed = IgnoresCover.apply(mixed, &ctx);
        let passed: Vec<bool> = exposed.iter().map(|o| o.success.passed()).collect();
        assert_eq!(passed, vec![false, false, false, false, true, false]);
    }

    #[test]
    fn test_bypass_save_always_fails() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let saves = BypassSave.apply(base_roll(Phase::Save, &ctx), &ctx);
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].value, 1);
        assert!(!saves[0].success.passed());
    }

    #[test]
    fn test_melta_dice() {
        let weapon = WeaponProfile::new(1, 3, 9, -4, Dice::d(6).unwrap());
        let target = target();
        let options = AttackOptions::new().with_half_range(true);
        let ctx = RollContext::new(&weapon, &target, &options);

        let rule = Melta(Characteristic::Dice(Dice::d(3).unwrap()));
        let damage = rule.apply(base_roll(Phase::Damage, &ctx), &ctx);
        assert_eq!(damage.len(), 18);
        assert_eq!(damage.iter().map(|o| o.value).max(), Some(9));
        assert_eq!(damage.iter().map(|o| o.value).min(), Some(2));
    }

    #[test]
    fn test_passive_is_identity() {
        let (weapon, target, options) = (weapon(), target(), AttackOptions::new());
        let ctx = RollContext::new(&weapon, &target, &options);
        let base = base_roll(Phase::Attack, &ctx);
        let blast = Passive::new("blast");
        assert_eq!(blast.apply(base.clone(), &ctx), base);
        assert_eq!(blast.name().as_str(), "blast");
    }
}
