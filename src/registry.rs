//! Rule registry module.
//!
//! Maps the rule names found in weapon data ("Sustained Hits D3",
//! "anti-infantry 4+", "twin-linked") to modifier factories. A registry is
//! built and owned by the caller; nothing in the crate consults a global
//! table. Parsing the text and building the modifier happen once, when the
//! weapon record is loaded, so no string matching is left for resolution.

use crate::dice::Characteristic;
use crate::error::CombatError;
use crate::modifier::OutcomeModifier;
use crate::rule_id::RuleId;
use crate::rules::{
    AllHitsCritical, AllWoundsCritical, Anti, BypassSave, CriticalHits, CriticalWounds,
    DevastatingWounds, IgnoresCover, LethalHits, Melta, Passive, RapidFire, RerollHitOnes,
    RerollHits, RerollWoundOnes, SustainedHits, Torrent, TwinLinked,
};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Rules recognised by the standard registry that do not change the maths.
pub const PASSIVE_RULES: [&str; 9] = [
    "assault",
    "blast",
    "hazardous",
    "heavy",
    "indirect_fire",
    "mortal_wounds",
    "one_shot",
    "pistol",
    "precision",
];

/// Arguments parsed from a rule's text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleArgs {
    /// Keyword of an anti rule, e.g. `infantry`.
    pub keyword: Option<String>,
    /// Trailing amount, e.g. `1`, `d3` or `4` (from `4+`).
    pub amount: Option<String>,
}

impl RuleArgs {
    /// The amount as a fixed or dice value.
    pub fn characteristic(&self, rule: &RuleId) -> Result<Characteristic, CombatError> {
        let amount = self.require_amount(rule)?;
        amount
            .parse::<Characteristic>()
            .map_err(|err| CombatError::InvalidRuleArgument {
                rule: rule.clone(),
                reason: err.to_string(),
            })
    }

    /// The amount as a roll threshold, e.g. `4` for `4+`.
    pub fn threshold(&self, rule: &RuleId) -> Result<i32, CombatError> {
        let amount = self.require_amount(rule)?;
        match amount.parse::<i32>() {
            Ok(threshold) if (2..=6).contains(&threshold) => Ok(threshold),
            _ => Err(CombatError::InvalidRuleArgument {
                rule: rule.clone(),
                reason: format!("expected a roll between 2+ and 6+, got '{}'", amount),
            }),
        }
    }

    pub fn keyword(&self, rule: &RuleId) -> Result<&str, CombatError> {
        self.keyword
            .as_deref()
            .ok_or_else(|| CombatError::InvalidRuleArgument {
                rule: rule.clone(),
                reason: "missing keyword".to_string(),
            })
    }

    fn require_amount(&self, rule: &RuleId) -> Result<&str, CombatError> {
        self.amount
            .as_deref()
            .ok_or_else(|| CombatError::InvalidRuleArgument {
                rule: rule.clone(),
                reason: "missing amount".to_string(),
            })
    }
}

/// A rule's text split into a canonical name and its arguments.
///
/// # Examples
///
/// ```rust
/// use mathhammer::ParsedRule;
///
/// let sustained = ParsedRule::parse("Sustained Hits D3");
/// assert_eq!(sustained.name.as_str(), "sustained_hits");
/// assert_eq!(sustained.args.amount.as_deref(), Some("d3"));
///
/// let anti = ParsedRule::parse("anti-infantry 4+");
/// assert_eq!(anti.name.as_str(), "anti");
/// assert_eq!(anti.args.keyword.as_deref(), Some("infantry"));
/// assert_eq!(anti.args.amount.as_deref(), Some("4"));
///
/// let twin = ParsedRule::parse("Twin-linked");
/// assert_eq!(twin.name.as_str(), "twin_linked");
/// assert_eq!(twin.args.amount, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRule {
    pub name: RuleId,
    pub args: RuleArgs,
}

impl ParsedRule {
    pub fn parse(text: &str) -> Self {
        let normalized = text.trim().to_lowercase().replace("re-roll", "reroll");
        let mut tokens: Vec<&str> = normalized.split_whitespace().collect();

        let amount = match tokens.last() {
            Some(last) if tokens.len() > 1 && is_amount(last) => {
                let amount = last.strip_suffix('+').unwrap_or(last).to_string();
                tokens.pop();
                Some(amount)
            }
            _ => None,
        };

        let name = tokens.join("_").replace('-', "_");
        let (name, keyword) = match name.strip_prefix("anti_") {
            Some(keyword) if !keyword.is_empty() => ("anti".to_string(), Some(keyword.to_string())),
            _ => (name, None),
        };

        Self {
            name: RuleId::from(name),
            args: RuleArgs { keyword, amount },
        }
    }
}

impl fmt::Display for ParsedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(keyword) = &self.args.keyword {
            write!(f, "-{}", keyword)?;
        }
        if let Some(amount) = &self.args.amount {
            write!(f, " {}", amount)?;
        }
        Ok(())
    }
}

fn is_amount(token: &str) -> bool {
    let token = token.strip_suffix('+').unwrap_or(token);
    !token.is_empty() && token.parse::<Characteristic>().is_ok()
}

/// Factory building a modifier from parsed rule arguments.
pub type RuleFactory =
    dyn Fn(&RuleArgs) -> Result<Arc<dyn OutcomeModifier>, CombatError> + Send + Sync;

/// Caller-owned table of rule factories.
///
/// # Examples
///
/// ```rust
/// use mathhammer::{CombatError, RuleRegistry};
///
/// let registry = RuleRegistry::standard();
///
/// let lethal = registry.resolve("Lethal Hits").unwrap();
/// assert_eq!(lethal.name().as_str(), "lethal_hits");
///
/// let anti = registry.resolve("anti-vehicle 4+").unwrap();
/// assert_eq!(anti.name().as_str(), "anti_vehicle_4");
///
/// assert!(matches!(
///     registry.resolve("psychic"),
///     Err(CombatError::UnknownRule(_))
/// ));
/// ```
#[derive(Clone, Default)]
pub struct RuleRegistry {
    factories: HashMap<RuleId, Arc<RuleFactory>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in rule.
    pub fn standard() -> Self {
        let mut registry = Self::new();

        registry.register("torrent", |_| Ok(Arc::new(Torrent)));
        registry.register("rapid_fire", |args| {
            let rule = RuleId::new("rapid_fire");
            Ok(Arc::new(RapidFire(args.characteristic(&rule)?)))
        });

        registry.register("sustained_hits", |args| {
            let rule = RuleId::new("sustained_hits");
            Ok(Arc::new(SustainedHits(args.characteristic(&rule)?)))
        });
        registry.register("lethal_hits", |_| Ok(Arc::new(LethalHits)));
        registry.register("critical_hits", |args| {
            let rule = RuleId::new("critical_hits");
            Ok(Arc::new(CriticalHits(args.threshold(&rule)?)))
        });
        registry.register("all_hits_critical", |_| Ok(Arc::new(AllHitsCritical)));
        registry.register("reroll_hits", |args| reroll_ones_or(args, "reroll_hits", true));
        registry.register("reroll_hit", |args| reroll_ones_or(args, "reroll_hit", true));

        registry.register("devastating_wounds", |_| Ok(Arc::new(DevastatingWounds)));
        registry.register("twin_linked", |_| Ok(Arc::new(TwinLinked)));
        registry.register("reroll_wounds", |args| {
            reroll_ones_or(args, "reroll_wounds", false)
        });
        registry.register("reroll_wound", |args| {
            reroll_ones_or(args, "reroll_wound", false)
        });
        registry.register("anti", |args| {
            let rule = RuleId::new("anti");
            let keyword = args.keyword(&rule)?;
            Ok(Arc::new(Anti::new(keyword, args.threshold(&rule)?)))
        });
        registry.register("critical_wounds", |args| {
            let rule = RuleId::new("critical_wounds");
            Ok(Arc::new(CriticalWounds(args.threshold(&rule)?)))
        });
        registry.register("all_wounds_critical", |_| Ok(Arc::new(AllWoundsCritical)));

        registry.register("ignores_cover", |_| Ok(Arc::new(IgnoresCover)));
        registry.register("bypass_save", |_| Ok(Arc::new(BypassSave)));
        registry.register("melta", |args| {
            let rule = RuleId::new("melta");
            Ok(Arc::new(Melta(args.characteristic(&rule)?)))
        });

        for name in PASSIVE_RULES {
            registry.register(name, move |_| Ok(Arc::new(Passive::new(name))));
        }
        registry
    }

    /// Register `factory` under `name`, replacing any earlier entry.
    pub fn register<F>(&mut self, name: impl Into<RuleId>, factory: F)
    where
        F: Fn(&RuleArgs) -> Result<Arc<dyn OutcomeModifier>, CombatError> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&RuleId::new(name))
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Parse `text` and build its modifier.
    ///
    /// # Returns
    ///
    /// * `Err(CombatError::UnknownRule)` - No factory is registered for the name
    /// * `Err(CombatError::InvalidRuleArgument)` - The amount or keyword is
    ///   missing or malformed
    pub fn resolve(&self, text: &str) -> Result<Arc<dyn OutcomeModifier>, CombatError> {
        let parsed = ParsedRule::parse(text);
        let Some(factory) = self.factories.get(&parsed.name) else {
            tracing::warn!("Unknown rule '{}'", text.trim());
            return Err(CombatError::UnknownRule(parsed.name));
        };

        let modifier = factory(&parsed.args)?;
        tracing::debug!("Rule '{}' resolved to {}", text.trim(), modifier.name());
        Ok(modifier)
    }

    /// Resolve every rule of one weapon record, keeping their order.
    ///
    /// Stops at the first rule that fails.
    pub fn resolve_all<'a, I>(&self, texts: I) -> Result<Vec<Arc<dyn OutcomeModifier>>, CombatError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts
            .into_iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| self.resolve(text))
            .collect()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(RuleId::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RuleRegistry").field("rules", &names).finish()
    }
}

/// "reroll hits" rerolls every failure; "reroll hits 1" only ones.
fn reroll_ones_or(
    args: &RuleArgs,
    name: &str,
    hits: bool,
) -> Result<Arc<dyn OutcomeModifier>, CombatError> {
    match (args.amount.as_deref(), hits) {
        (Some("1"), true) => Ok(Arc::new(RerollHitOnes)),
        (Some("1"), false) => Ok(Arc::new(RerollWoundOnes)),
        (None, true) => Ok(Arc::new(RerollHits)),
        (None, false) => Ok(Arc::new(TwinLinked)),
        (Some(other), _) => Err(CombatError::InvalidRuleArgument {
            rule: RuleId::new(name),
            reason: format!("only rerolls of 1 are supported, got '{}'", other),
        }),
    }
}
