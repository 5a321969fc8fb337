//! Qualitative requirement parameters.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A requirement dimension the assistant asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ParamName {
    Scalability,
    Cost,
    Security,
    Complexity,
    Availability,
    Latency,
}

impl ParamName {
    pub const ALL: [ParamName; 6] = [
        ParamName::Scalability,
        ParamName::Cost,
        ParamName::Security,
        ParamName::Complexity,
        ParamName::Availability,
        ParamName::Latency,
    ];

    /// Canonical wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamName::Scalability => "scalability",
            ParamName::Cost => "cost",
            ParamName::Security => "security",
            ParamName::Complexity => "complexity",
            ParamName::Availability => "availability",
            ParamName::Latency => "latency",
        }
    }

    /// Name shown to users.
    pub fn label_es(&self) -> &'static str {
        match self {
            ParamName::Scalability => "escalabilidad",
            ParamName::Cost => "costo",
            ParamName::Security => "seguridad",
            ParamName::Complexity => "complejidad",
            ParamName::Availability => "disponibilidad",
            ParamName::Latency => "latencia",
        }
    }

    /// Parse an English or Spanish parameter name.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "scalability" | "escalabilidad" => Some(ParamName::Scalability),
            "cost" | "costo" | "coste" => Some(ParamName::Cost),
            "security" | "seguridad" => Some(ParamName::Security),
            "complexity" | "complejidad" => Some(ParamName::Complexity),
            "availability" | "disponibilidad" => Some(ParamName::Availability),
            "latency" | "latencia" => Some(ParamName::Latency),
            _ => None,
        }
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ParamName {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ParamName::from_label(&value).ok_or(CatalogError::UnknownParameter(value))
    }
}

/// A qualitative level on the 1..=3 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "LevelRepr")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Number(i64),
    Text(String),
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Low, Level::Medium, Level::High];

    /// Numeric value used by scoring and averaging.
    pub fn value(&self) -> u8 {
        match self {
            Level::Low => 1,
            Level::Medium => 2,
            Level::High => 3,
        }
    }

    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Level::Low),
            2 => Some(Level::Medium),
            3 => Some(Level::High),
            _ => None,
        }
    }

    /// Bucket an average of level values back onto the scale.
    ///
    /// `<= 1.5` is low, `<= 2.4` is medium, anything above is high.
    pub fn from_average(avg: f64) -> Self {
        if avg <= 1.5 {
            Level::Low
        } else if avg <= 2.4 {
            Level::Medium
        } else {
            Level::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }

    pub fn label_es(&self) -> &'static str {
        match self {
            Level::Low => "bajo",
            Level::Medium => "medio",
            Level::High => "alto",
        }
    }

    /// Parse an English or Spanish level, or a digit 1..=3.
    ///
    /// Returns `None` for "unknown" and for anything unrecognized.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "bajo" | "baja" | "1" => Some(Level::Low),
            "medium" | "medio" | "media" | "moderado" | "moderada" | "2" => Some(Level::Medium),
            "high" | "alto" | "alta" | "3" => Some(Level::High),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<LevelRepr> for Level {
    type Error = CatalogError;

    fn try_from(repr: LevelRepr) -> Result<Self, Self::Error> {
        match repr {
            LevelRepr::Number(n) => {
                Level::from_value(n).ok_or_else(|| CatalogError::UnknownLevel(n.to_string()))
            }
            LevelRepr::Text(s) => Level::from_label(&s).ok_or(CatalogError::UnknownLevel(s)),
        }
    }
}

/// Known parameter levels of a conversation or an extraction.
///
/// Unknown values are never stored: absence means unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(BTreeMap<ParamName, Level>);

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: ParamName) -> Option<Level> {
        self.0.get(&name).copied()
    }

    pub fn insert(&mut self, name: ParamName, level: Level) {
        self.0.insert(name, level);
    }

    pub fn contains(&self, name: ParamName) -> bool {
        self.0.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamName, Level)> + '_ {
        self.0.iter().map(|(name, level)| (*name, *level))
    }

    /// Overwrite with every known value in `incoming`.
    ///
    /// Keys absent from `incoming` keep their current value, so a known
    /// value can be replaced but never erased.
    pub fn merge_known(&mut self, incoming: &ParamSet) {
        for (name, level) in incoming.iter() {
            self.0.insert(name, level);
        }
    }

    /// Required parameters that are not yet known, in the given order.
    pub fn missing(&self, required: &[ParamName]) -> Vec<ParamName> {
        required
            .iter()
            .copied()
            .filter(|name| !self.contains(*name))
            .collect()
    }

    /// Build from loosely-typed JSON, dropping unknown keys and values.
    ///
    /// Values may be level names in English or Spanish or the digits 1..=3.
    pub fn from_json_value(value: &serde_json::Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        object
            .iter()
            .filter_map(|(key, value)| {
                let name = ParamName::from_label(key)?;
                let level = match value {
                    serde_json::Value::String(s) => Level::from_label(s),
                    serde_json::Value::Number(n) => n.as_i64().and_then(Level::from_value),
                    _ => None,
                }?;
                Some((name, level))
            })
            .collect()
    }

    /// Human-readable summary such as `escalabilidad: alto, costo: bajo`.
    pub fn describe_es(&self) -> String {
        self.iter()
            .map(|(name, level)| format!("{}: {}", name.label_es(), level.label_es()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<(ParamName, Level)> for ParamSet {
    fn from_iter<I: IntoIterator<Item = (ParamName, Level)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
