//! Base phase actions.
//!
//! Each phase has one action producing its unmodified outcome list: one
//! entry per die face, or the entries of a weapon characteristic. [`roll`]
//! runs the action and then the modifier pipeline for that phase.

use crate::modifier::{apply_modifiers, Phase};
use crate::outcome::{Outcome, Success, FIXED_ROLL};
use crate::profile::RollContext;

const D6: std::ops::RangeInclusive<i32> = 1..=6;
const D6_FACES: usize = 6;

/// The unmodified outcome list of `phase`.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{AttackOptions, Phase, RollContext, Success, TargetProfile, WeaponProfile};
/// use mathhammer::action;
///
/// let weapon = WeaponProfile::new(1, 4, 4, 0, 1);
/// let target = TargetProfile::new(4, 3);
/// let options = AttackOptions::new();
/// let ctx = RollContext::new(&weapon, &target, &options);
///
/// let hits = action::base_roll(Phase::Hit, &ctx);
/// let passed = hits.iter().filter(|o| o.success.passed()).count();
/// assert_eq!(passed, 3); // 4+, 5+ and the critical 6
/// assert_eq!(hits[5].success, Success::Critical);
/// ```
pub fn base_roll(phase: Phase, ctx: &RollContext<'_>) -> Vec<Outcome> {
    match phase {
        Phase::Attack => ctx.weapon.attacks.outcomes(),
        Phase::Hit => hit(ctx.weapon.skill),
        Phase::Wound => wound(wound_threshold(ctx.weapon.strength, ctx.target.toughness)),
        Phase::Save => save(save_threshold(ctx, ctx.options.cover)),
        Phase::Damage => ctx.weapon.damage.outcomes(),
        Phase::FeelNoPain => feel_no_pain(ctx.target.feel_no_pain),
    }
}

/// The outcome list of `phase` after every active modifier for it.
pub fn roll(phase: Phase, ctx: &RollContext<'_>) -> Vec<Outcome> {
    apply_modifiers(phase, base_roll(phase, ctx), ctx)
}

/// Upper bound on the length of [`roll`]'s list, computed without
/// enumerating any dice. `None` when the bound does not fit in a `usize`.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{AttackOptions, Dice, Phase, RollContext, TargetProfile, WeaponProfile};
/// use mathhammer::action;
///
/// let weapon = WeaponProfile::new(Dice::parse("3d6").unwrap(), 3, 4, 0, 1);
/// let target = TargetProfile::new(4, 3);
/// let options = AttackOptions::new();
/// let ctx = RollContext::new(&weapon, &target, &options);
///
/// assert_eq!(action::roll_size(Phase::Attack, &ctx), Some(216));
/// assert_eq!(action::roll_size(Phase::Hit, &ctx), Some(6));
/// assert_eq!(action::roll_size(Phase::FeelNoPain, &ctx), Some(1));
/// ```
pub fn roll_size(phase: Phase, ctx: &RollContext<'_>) -> Option<usize> {
    let base = match phase {
        Phase::Attack => ctx.weapon.attacks.face_count()?,
        Phase::Damage => ctx.weapon.damage.face_count()?,
        Phase::FeelNoPain if ctx.target.feel_no_pain.is_none() => 1,
        Phase::Hit | Phase::Wound | Phase::Save | Phase::FeelNoPain => D6_FACES,
    };
    ctx.options
        .modifiers()
        .iter()
        .filter(|modifier| modifier.phase() == phase)
        .try_fold(base, |size, modifier| size.checked_mul(modifier.expansion(ctx)?))
}

/// Minimum unmodified wound roll for strength against toughness.
///
/// # Examples
///
/// ```rust
/// use mathhammer::action::wound_threshold;
///
/// assert_eq!(wound_threshold(8, 4), 2);
/// assert_eq!(wound_threshold(5, 4), 3);
/// assert_eq!(wound_threshold(4, 4), 4);
/// assert_eq!(wound_threshold(3, 4), 5);
/// assert_eq!(wound_threshold(2, 4), 6);
/// ```
pub fn wound_threshold(strength: i32, toughness: i32) -> i32 {
    if strength >= 2 * toughness {
        2
    } else if strength > toughness {
        3
    } else if strength == toughness {
        4
    } else if 2 * strength > toughness {
        5
    } else {
        6
    }
}

/// Minimum unmodified save roll against the attacking weapon.
///
/// Armour penetration worsens the armour save; cover improves it by one
/// unless the save is 3+ or better and the weapon has no armour
/// penetration. An invulnerable save ignores both and is used when better.
pub fn save_threshold(ctx: &RollContext<'_>, cover: bool) -> i32 {
    let save = ctx.target.save;
    let armour_penetration = ctx.weapon.armour_penetration;

    let mut armour = save - armour_penetration;
    if cover && !(save <= 3 && armour_penetration == 0) {
        armour -= 1;
    }

    match ctx.target.invulnerable_save {
        Some(invulnerable) => armour.min(invulnerable),
        None => armour,
    }
}

/// Whether a save face passes against `threshold`. A natural 1 always fails.
pub fn save_passes(face: i32, threshold: i32) -> bool {
    face != 1 && face >= threshold
}

fn hit(skill: i32) -> Vec<Outcome> {
    D6.map(|face| {
        let success = match face {
            1 => Success::Failure,
            6 => Success::Critical,
            _ => Success::from_bool(face >= skill),
        };
        Outcome::face(face, success)
    })
    .collect()
}

fn wound(threshold: i32) -> Vec<Outcome> {
    D6.map(|face| {
        let success = match face {
            1 => Success::Failure,
            6 => Success::Critical,
            _ => Success::from_bool(face >= threshold),
        };
        Outcome::face(face, success)
    })
    .collect()
}

fn save(threshold: i32) -> Vec<Outcome> {
    D6.map(|face| Outcome::face(face, Success::from_bool(save_passes(face, threshold))))
        .collect()
}

fn feel_no_pain(feel_no_pain: Option<i32>) -> Vec<Outcome> {
    match feel_no_pain {
        None => vec![Outcome::face(FIXED_ROLL, Success::Failure)],
        Some(threshold) => D6
            .map(|face| Outcome::face(face, Success::from_bool(face >= threshold)))
            .collect(),
    }
}
