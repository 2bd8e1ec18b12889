//! Error types for stat rendering.
//!
//! Everything that can go wrong while building catalogs or rendering
//! panels is represented by the `StatsError` enum.

use thiserror::Error;

/// Errors that can occur while building catalogs or rendering panels.
///
/// # Examples
///
/// ```rust
/// use statsheet::StatsError;
///
/// let err = StatsError::MissingNode(String::from("statGCMNBeta"));
/// assert_eq!(err.to_string(), "Missing display node: statGCMNBeta");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatsError {
    /// A cached display node was expected but is absent.
    ///
    /// This means the panel's marker class was found, so creation was
    /// skipped, but one of the nodes the renderer writes into does not
    /// exist. It is a construction or render-order bug and is never
    /// recovered from.
    #[error("Missing display node: {0}")]
    MissingNode(String),

    /// A node was created with an id that is already taken.
    #[error("Display node already exists: {0}")]
    DuplicateNode(String),

    /// A breakdown factor has no descriptor at its 1-based index.
    #[error("Missing descriptor #{index} for {root}")]
    MissingDescriptor { root: String, index: usize },

    /// A category was built with no lines.
    #[error("Stat category {0} has no lines")]
    EmptyCategory(String),

    /// Two lines of one category share a label, so their node ids collide.
    #[error("Duplicate stat line {label} in {category}")]
    DuplicateLabel { category: String, label: String },

    /// The stage ladder breaks its ordering invariants.
    #[error("Invalid stage ladder: {0}")]
    InvalidLadder(String),

    /// A panel identifier outside the closed set.
    #[error("Unknown panel: {0}")]
    UnknownPanel(String),

    /// The render configuration could not be parsed.
    #[error("Invalid render config: {0}")]
    Config(String),
}

impl From<serde_json::Error> for StatsError {
    fn from(err: serde_json::Error) -> Self {
        StatsError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatsError::MissingNode(String::from("sGQMNT"));
        assert!(err.to_string().contains("sGQMNT"));
    }

    #[test]
    fn test_missing_descriptor_display() {
        let err = StatsError::MissingDescriptor {
            root: String::from("ascensionSpeedMultiplierStats"),
            index: 23,
        };
        let display = err.to_string();
        assert!(display.contains("#23"));
        assert!(display.contains("ascensionSpeedMultiplierStats"));
    }

    #[test]
    fn test_config_error_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{ not json");
        let err: StatsError = parse.unwrap_err().into();
        assert!(matches!(err, StatsError::Config(_)));
    }
}
