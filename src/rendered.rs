//! Render reports.
//!
//! Every render call returns what it wrote: the value and text of each row
//! and how many nodes it had to create. The report is read-only and
//! serializable, which makes it convenient for snapshot tests and for hosts
//! that mirror the panel somewhere other than the display surface.

use crate::numeric::StatNumber;
use serde::{Deserialize, Serialize};

/// One written row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedLine {
    /// Line label, or the total label for the total row.
    pub label: String,
    /// Id of the node the text was written into.
    pub node_id: String,
    /// The numeric value, absent for text rows.
    pub value: Option<StatNumber>,
    pub text: String,
}

/// The result of rendering one panel section.
///
/// # Examples
///
/// ```rust
/// use statsheet::RenderedPanel;
/// use statsheet::numeric::StatNumber;
///
/// let mut panel = RenderedPanel::new("globalQuarkMultiplierStats", "sGQM");
/// panel.add_line("Base", "sGQMNBase", StatNumber::from(2.0), "2.00");
/// panel.set_total("Total", "sGQMNT", StatNumber::from(2.0), "2.000");
///
/// assert_eq!(panel.lines.len(), 1);
/// assert_eq!(panel.total.as_ref().unwrap().text, "2.000");
/// assert_eq!(panel.line_text("Base"), Some("2.00"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedPanel {
    pub root: String,
    pub prefix: String,
    /// Rows in the order they were written.
    pub lines: Vec<RenderedLine>,
    pub total: Option<RenderedLine>,
    /// Nodes created by this call. Zero on every call after the first.
    pub created_nodes: usize,
}

impl RenderedPanel {
    pub fn new(root: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
            lines: Vec::new(),
            total: None,
            created_nodes: 0,
        }
    }

    pub fn add_line(
        &mut self,
        label: impl Into<String>,
        node_id: impl Into<String>,
        value: impl Into<Option<StatNumber>>,
        text: impl Into<String>,
    ) {
        self.lines.push(RenderedLine {
            label: label.into(),
            node_id: node_id.into(),
            value: value.into(),
            text: text.into(),
        });
    }

    pub fn set_total(
        &mut self,
        label: impl Into<String>,
        node_id: impl Into<String>,
        value: StatNumber,
        text: impl Into<String>,
    ) {
        self.total = Some(RenderedLine {
            label: label.into(),
            node_id: node_id.into(),
            value: Some(value),
            text: text.into(),
        });
    }

    /// Text written for the row labelled `label`.
    pub fn line_text(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.text.as_str())
    }

    /// Every written text, lines first then the total.
    pub fn texts(&self) -> Vec<&str> {
        self.lines
            .iter()
            .chain(self.total.iter())
            .map(|line| line.text.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rendered_panel_creation() {
        let panel = RenderedPanel::new("baseOfferingStats", "statOffB");
        assert_eq!(panel.root, "baseOfferingStats");
        assert_eq!(panel.prefix, "statOffB");
        assert!(panel.lines.is_empty());
        assert!(panel.total.is_none());
        assert_eq!(panel.created_nodes, 0);
    }

    #[test]
    fn test_texts_in_write_order() {
        let mut panel = RenderedPanel::new("root", "p");
        panel.add_line("A", "pNA", StatNumber::from(1.0), "1.00");
        panel.add_line("B", "pNB", StatNumber::from(2.0), "2.00");
        panel.set_total("Total", "pNT", StatNumber::from(2.0), "2.000");
        assert_eq!(panel.texts(), vec!["1.00", "2.00", "2.000"]);
        assert_eq!(panel.line_text("C"), None);
    }

    #[test]
    fn test_rendered_panel_serializes() {
        let mut panel = RenderedPanel::new("root", "p");
        panel.add_line("A", "pNA", StatNumber::from(1.5), "1.50");
        let json = serde_json::to_string(&panel).unwrap();
        let back: RenderedPanel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, panel);
    }
}
