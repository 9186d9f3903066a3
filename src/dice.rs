//! Dice module.
//!
//! `Dice` enumerates every equally likely combination of a dice expression
//! such as `2d6+1`. `Characteristic` is a weapon value that is either fixed
//! or rolled.

use crate::outcome::{Outcome, Success};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing dice notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The notation string is empty.
    #[error("Empty dice notation")]
    Empty,
    /// Not of the form `XdY`, `XdY+Z` or `XdY-Z`.
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1.
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2.
    #[error("Die size must be at least 2")]
    InvalidDieSize,
}

/// A dice expression: `number` dice of `sides` sides plus a flat `addition`.
///
/// # Examples
///
/// ```rust
/// use mathhammer::Dice;
///
/// let dice = Dice::parse("2d6+1").unwrap();
/// assert_eq!(dice.number, 2);
/// assert_eq!(dice.sides, 6);
/// assert_eq!(dice.addition, 1);
/// assert_eq!(dice.to_string(), "2d6+1");
///
/// // One entry per combination: 36 for 2d6.
/// assert_eq!(dice.outcomes().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dice {
    pub number: u8,
    pub sides: u8,
    pub addition: i32,
}

impl Dice {
    /// Create a validated dice expression.
    pub fn new(number: u8, sides: u8, addition: i32) -> Result<Self, DiceParseError> {
        if number == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if sides < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self {
            number,
            sides,
            addition,
        })
    }

    /// A single die, `dN`.
    pub fn d(sides: u8) -> Result<Self, DiceParseError> {
        Self::new(1, sides, 0)
    }

    /// Parse notation like `"2d6+1"`, `"d3"`, `"D6-1"`.
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let count_str = &input[..d_pos];
        let number: u8 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
            })?
        };

        let after_d = &input[d_pos + 1..];
        let (sides_str, addition) = if let Some(plus) = after_d.find('+') {
            let add_str = &after_d[plus + 1..];
            let addition: i32 = add_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid addition: '+{}'", add_str))
            })?;
            (&after_d[..plus], addition)
        } else if let Some(minus) = after_d.find('-') {
            let sub_str = &after_d[minus + 1..];
            let subtraction: i32 = sub_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid addition: '-{}'", sub_str))
            })?;
            (&after_d[..minus], -subtraction)
        } else {
            (after_d, 0)
        };

        let sides: u8 = sides_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", sides_str))
        })?;

        Self::new(number, sides, addition)
    }

    /// Every combination of the dice, each equally likely.
    ///
    /// Values below zero are clamped to zero. The length of the list is the
    /// denominator of each entry's probability.
    pub fn outcomes(&self) -> Vec<Outcome> {
        let mut sums: Vec<i32> = vec![0];
        for _ in 0..self.number {
            sums = sums
                .iter()
                .flat_map(|sum| (1..=i32::from(self.sides)).map(move |face| sum + face))
                .collect();
        }
        sums.into_iter()
            .map(|sum| {
                let total = (sum + self.addition).max(0);
                Outcome::new(total as u32, total, Success::Success, false, false)
            })
            .collect()
    }

    /// Length of the list [`outcomes`](Self::outcomes) builds, `sides^number`,
    /// or `None` when it does not fit in a `usize`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mathhammer::Dice;
    ///
    /// assert_eq!(Dice::parse("2d6").unwrap().face_count(), Some(36));
    /// assert_eq!(Dice::new(200, 6, 0).unwrap().face_count(), None);
    /// ```
    pub fn face_count(&self) -> Option<usize> {
        usize::from(self.sides).checked_pow(u32::from(self.number))
    }

    pub fn min_value(&self) -> u32 {
        (i32::from(self.number) + self.addition).max(0) as u32
    }

    pub fn max_value(&self) -> u32 {
        (i32::from(self.number) * i32::from(self.sides) + self.addition).max(0) as u32
    }

    pub fn mean(&self) -> f64 {
        let outcomes = self.outcomes();
        outcomes.iter().map(|o| f64::from(o.value)).sum::<f64>() / outcomes.len() as f64
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.number, self.sides)?;
        if self.addition > 0 {
            write!(f, "+{}", self.addition)
        } else if self.addition < 0 {
            write!(f, "{}", self.addition)
        } else {
            Ok(())
        }
    }
}

impl FromStr for Dice {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dice::parse(s)
    }
}

/// A weapon value that is either a fixed number or a dice roll.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{Characteristic, Dice};
///
/// let fixed: Characteristic = "2".parse().unwrap();
/// assert_eq!(fixed, Characteristic::Fixed(2));
///
/// let rolled: Characteristic = "d3".parse().unwrap();
/// assert_eq!(rolled, Characteristic::Dice(Dice::d(3).unwrap()));
/// assert_eq!(rolled.outcomes().len(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Characteristic {
    Fixed(u32),
    Dice(Dice),
}

impl Characteristic {
    /// The equally likely outcomes of this value.
    pub fn outcomes(&self) -> Vec<Outcome> {
        match self {
            Characteristic::Fixed(value) => vec![Outcome::fixed(*value)],
            Characteristic::Dice(dice) => dice.outcomes(),
        }
    }

    /// Length of the list [`outcomes`](Self::outcomes) builds.
    pub fn face_count(&self) -> Option<usize> {
        match self {
            Characteristic::Fixed(_) => Some(1),
            Characteristic::Dice(dice) => dice.face_count(),
        }
    }

    pub fn max_value(&self) -> u32 {
        match self {
            Characteristic::Fixed(value) => *value,
            Characteristic::Dice(dice) => dice.max_value(),
        }
    }
}

impl From<u32> for Characteristic {
    fn from(value: u32) -> Self {
        Characteristic::Fixed(value)
    }
}

impl From<i32> for Characteristic {
    fn from(value: i32) -> Self {
        Characteristic::Fixed(value.max(0) as u32)
    }
}

impl From<Dice> for Characteristic {
    fn from(dice: Dice) -> Self {
        Characteristic::Dice(dice)
    }
}

impl FromStr for Characteristic {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DiceParseError::Empty);
        }
        match trimmed.parse::<u32>() {
            Ok(value) => Ok(Characteristic::Fixed(value)),
            Err(_) => Dice::parse(trimmed).map(Characteristic::Dice),
        }
    }
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Characteristic::Fixed(value) => write!(f, "{}", value),
            Characteristic::Dice(dice) => write!(f, "{}", dice),
        }
    }
}
