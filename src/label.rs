//! Stat labels and localized label lookup.
//!
//! A [`StatLabel`] names one stat line. It doubles as the suffix of the
//! line's node ids and as the last segment of its localization key
//! (`statistics.<panel>.<label>`), so it must be unique within a category.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Interned string identifier for a stat line.
///
/// Uses `Arc<str>` so catalogs can hand labels out cheaply.
///
/// # Examples
///
/// ```rust
/// use statsheet::StatLabel;
///
/// let beta = StatLabel::new("Beta");
/// let beta2: StatLabel = "Beta".into();
///
/// assert_eq!(beta, beta2);
/// assert_eq!(beta.as_str(), "Beta");
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatLabel(Arc<str>);

impl Serialize for StatLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatLabel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(StatLabel::from(s))
    }
}

impl StatLabel {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatLabel {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StatLabel {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for StatLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Localized label lookup.
///
/// Implementations return the display text for a dotted key. A key with no
/// translation should come back unchanged so a missing string is visible on
/// screen rather than blank.
pub trait LabelLookup {
    fn translate(&self, key: &str) -> String;
}

/// A flat key → text table, usually loaded from a nested JSON bundle.
///
/// # Examples
///
/// ```rust
/// use statsheet::label::{LabelCatalog, LabelLookup};
///
/// let catalog = LabelCatalog::from_json_str(
///     r#"{ "statistics": { "globalCubeMultiplierStats": { "Beta": "Platonic Beta:" } } }"#,
/// ).unwrap();
///
/// assert_eq!(
///     catalog.translate("statistics.globalCubeMultiplierStats.Beta"),
///     "Platonic Beta:"
/// );
/// assert_eq!(catalog.translate("statistics.missing"), "statistics.missing");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LabelCatalog {
    entries: HashMap<String, String>,
}

impl LabelCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a nested JSON object, flattening nested keys with `.`.
    ///
    /// Non-string leaves (numbers, booleans) are stored in their JSON
    /// rendering; arrays and nulls are skipped.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let root: Value = serde_json::from_str(json)?;
        let mut catalog = Self::empty();
        catalog.flatten("", &root);
        Ok(catalog)
    }

    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flatten(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    self.flatten(&path, child);
                }
            }
            Value::String(text) => self.insert(prefix, text.as_str()),
            Value::Number(_) | Value::Bool(_) => self.insert(prefix, value.to_string()),
            Value::Array(_) | Value::Null => {}
        }
    }
}

impl LabelLookup for LabelCatalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
