//! Attacker and defender statistics.
//!
//! `RollContext` bundles the weapon, the target and the active options and
//! is what every phase action and modifier receives.

use crate::dice::Characteristic;
use crate::options::AttackOptions;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weapon statistics.
///
/// `armour_penetration` is written the way it appears on a datasheet: `0`
/// or negative, where `-1` worsens the target's save by one.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{Characteristic, WeaponProfile};
///
/// let bolt_rifle = WeaponProfile::new(2, 3, 4, -1, 1);
/// assert_eq!(bolt_rifle.attacks, Characteristic::Fixed(2));
/// assert_eq!(bolt_rifle.to_string(), "A 2, WS 3+, S 4, AP -1, D 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub attacks: Characteristic,
    /// Weapon or ballistic skill: the minimum unmodified hit roll.
    pub skill: i32,
    pub strength: i32,
    pub armour_penetration: i32,
    pub damage: Characteristic,
}

impl WeaponProfile {
    pub fn new(
        attacks: impl Into<Characteristic>,
        skill: i32,
        strength: i32,
        armour_penetration: i32,
        damage: impl Into<Characteristic>,
    ) -> Self {
        Self {
            attacks: attacks.into(),
            skill,
            strength,
            armour_penetration,
            damage: damage.into(),
        }
    }
}

impl fmt::Display for WeaponProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A {}, WS {}+, S {}, AP {}, D {}",
            self.attacks, self.skill, self.strength, self.armour_penetration, self.damage
        )
    }
}

/// Defender statistics.
///
/// `wounds` caps the damage of a single allocation: damage beyond a model's
/// wounds is lost. `invulnerable_save` ignores armour penetration and cover.
/// `feel_no_pain` is the roll needed to ignore one point of damage, if the
/// target has one.
///
/// # Examples
///
/// ```rust
/// use mathhammer::TargetProfile;
///
/// let intercessor = TargetProfile::new(4, 3).with_wounds(2);
/// assert_eq!(intercessor.wounds, Some(2));
/// assert_eq!(intercessor.feel_no_pain, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetProfile {
    pub toughness: i32,
    pub save: i32,
    #[serde(default)]
    pub wounds: Option<u32>,
    #[serde(default)]
    pub invulnerable_save: Option<i32>,
    #[serde(default)]
    pub feel_no_pain: Option<i32>,
}

impl TargetProfile {
    pub fn new(toughness: i32, save: i32) -> Self {
        Self {
            toughness,
            save,
            wounds: None,
            invulnerable_save: None,
            feel_no_pain: None,
        }
    }

    pub fn with_wounds(self, wounds: u32) -> Self {
        Self {
            wounds: Some(wounds),
            ..self
        }
    }

    pub fn with_invulnerable_save(self, invulnerable_save: i32) -> Self {
        Self {
            invulnerable_save: Some(invulnerable_save),
            ..self
        }
    }

    pub fn with_feel_no_pain(self, feel_no_pain: i32) -> Self {
        Self {
            feel_no_pain: Some(feel_no_pain),
            ..self
        }
    }
}

impl fmt::Display for TargetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T {}, Sv {}+", self.toughness, self.save)?;
        if let Some(invulnerable) = self.invulnerable_save {
            write!(f, ", Inv {}+", invulnerable)?;
        }
        if let Some(wounds) = self.wounds {
            write!(f, ", W {}", wounds)?;
        }
        if let Some(fnp) = self.feel_no_pain {
            write!(f, ", FNP {}+", fnp)?;
        }
        Ok(())
    }
}

/// Everything a phase action or modifier may read.
#[derive(Debug, Clone, Copy)]
pub struct RollContext<'a> {
    pub weapon: &'a WeaponProfile,
    pub target: &'a TargetProfile,
    pub options: &'a AttackOptions,
}

impl<'a> RollContext<'a> {
    pub fn new(
        weapon: &'a WeaponProfile,
        target: &'a TargetProfile,
        options: &'a AttackOptions,
    ) -> Self {
        Self {
            weapon,
            target,
            options,
        }
    }
}
