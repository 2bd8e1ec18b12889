//! Render configuration.
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! gives the standard statistics layout.

use crate::error::StatsError;
use crate::format::FormatConfig;
use serde::{Deserialize, Serialize};

/// Layout and formatting settings shared by every panel render.
///
/// # Examples
///
/// ```rust
/// use statsheet::RenderConfig;
///
/// let config = RenderConfig::from_json_str(r#"{ "total_precision": 4 }"#).unwrap();
/// assert_eq!(config.total_precision, 4);
/// assert_eq!(config.default_precision, 2);
/// assert_eq!(config.line_class, "statPortion");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fractional digits for a line with no precision of its own.
    pub default_precision: u8,
    /// Fractional digits for every total row.
    pub total_precision: u8,
    /// Color for lines that do not set one.
    pub default_color: String,
    pub line_tag: String,
    pub value_tag: String,
    /// Class carried by every line and total row.
    pub line_class: String,
    /// Class carried by every value node.
    pub number_class: String,
    /// Extra class carried by total rows.
    pub total_class: String,
    /// First segment of every label lookup key.
    pub label_namespace: String,
    pub format: FormatConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            default_precision: 2,
            total_precision: 3,
            default_color: String::from("white"),
            line_tag: String::from("p"),
            value_tag: String::from("span"),
            line_class: String::from("statPortion"),
            number_class: String::from("statNumber"),
            total_class: String::from("statTotal"),
            label_namespace: String::from("statistics"),
            format: FormatConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Parse a config from JSON, filling absent fields with defaults.
    pub fn from_json_str(json: &str) -> Result<Self, StatsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lookup key for a row label of the panel rooted at `root`.
    pub fn label_key(&self, root: &str, label: &str) -> String {
        format!("{}.{}.{}", self.label_namespace, root, label)
    }
}
