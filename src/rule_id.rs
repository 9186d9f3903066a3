//! Rule identifier module.
//!
//! Provides the `RuleId` type, the name a special rule is known by in weapon
//! data and in memo keys. Uses `Arc<str>` so cloning into every memo key is
//! cheap.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Interned name of a special rule.
///
/// # Examples
///
/// ```rust
/// use mathhammer::RuleId;
///
/// let lethal = RuleId::new("lethal_hits");
/// let lethal2: RuleId = "lethal_hits".into();
/// let lethal3: RuleId = String::from("lethal_hits").into();
///
/// assert_eq!(lethal, lethal2);
/// assert_eq!(lethal, lethal3);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RuleId(Arc<str>);

impl Serialize for RuleId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RuleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(RuleId::from)
    }
}

impl RuleId {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RuleId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
