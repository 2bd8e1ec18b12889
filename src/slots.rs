//! Fixed-slot panels.
//!
//! The miscellaneous statistics panel is not an aggregate: it is a list of
//! unrelated readouts (best run times, reset counts, the current
//! progression stage), each written into its own node.

use crate::display::DisplaySurface;
use crate::error::StatsError;
use crate::numeric::StatNumber;
use crate::render::StatRenderer;
use crate::rendered::RenderedPanel;
use crate::stat_line::StatFormula;
use std::fmt;

/// What a slot shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    Number(StatNumber),
    /// Milliseconds, written with the short time format.
    Duration { ms: f64 },
    Text(String),
}

enum SlotSource<S> {
    Number(Box<dyn StatFormula<S>>),
    Duration(Box<dyn Fn(&S) -> f64>),
    Text(Box<dyn Fn(&S) -> String>),
}

/// One readout of a slot panel.
///
/// # Examples
///
/// ```rust
/// use statsheet::slots::SlotLine;
///
/// struct Game { ascensions: f64 }
///
/// let slot = SlotLine::number("sMisc3", |g: &Game| g.ascensions).with_suffix(" times");
/// assert_eq!(slot.node_id(), "sMisc3");
/// ```
pub struct SlotLine<S> {
    node_id: String,
    source: SlotSource<S>,
    precision: u8,
    abbreviate: bool,
    prefix: String,
    suffix: String,
}

impl<S> SlotLine<S> {
    fn with_source(node_id: impl Into<String>, source: SlotSource<S>) -> Self {
        Self {
            node_id: node_id.into(),
            source,
            precision: 0,
            abbreviate: false,
            prefix: String::new(),
            suffix: String::new(),
        }
    }

    pub fn number<F, N>(node_id: impl Into<String>, value: F) -> Self
    where
        F: Fn(&S) -> N + 'static,
        N: Into<StatNumber>,
    {
        Self::with_source(node_id, SlotSource::Number(Box::new(value)))
    }

    /// A slot fed with a duration in milliseconds.
    pub fn duration<F>(node_id: impl Into<String>, ms: F) -> Self
    where
        F: Fn(&S) -> f64 + 'static,
    {
        Self::with_source(node_id, SlotSource::Duration(Box::new(ms)))
    }

    pub fn text<F>(node_id: impl Into<String>, text: F) -> Self
    where
        F: Fn(&S) -> String + 'static,
    {
        Self::with_source(node_id, SlotSource::Text(Box::new(text)))
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn abbreviated(mut self) -> Self {
        self.abbreviate = true;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn value(&self, state: &S) -> SlotValue {
        match &self.source {
            SlotSource::Number(formula) => SlotValue::Number(formula.evaluate(state)),
            SlotSource::Duration(ms) => SlotValue::Duration { ms: ms(state) },
            SlotSource::Text(text) => SlotValue::Text(text(state)),
        }
    }
}

impl<S> fmt::Debug for SlotLine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotLine")
            .field("node_id", &self.node_id)
            .field("precision", &self.precision)
            .field("abbreviate", &self.abbreviate)
            .finish_non_exhaustive()
    }
}

impl StatRenderer {
    /// Write every slot under `root`, creating the nodes that are missing.
    pub fn render_slots<S>(
        &self,
        surface: &mut dyn DisplaySurface,
        root: &str,
        slots: &[SlotLine<S>],
        state: &S,
    ) -> Result<RenderedPanel, StatsError> {
        surface.ensure(root);
        let mut panel = RenderedPanel::new(root, "");

        for slot in slots {
            if !surface.contains(&slot.node_id) {
                surface.create_child(root, self.value_node(slot.node_id.clone()))?;
                panel.created_nodes += 1;
            }

            let (value, body) = match slot.value(state) {
                SlotValue::Number(number) => (
                    Some(number),
                    self.formatter().format(&number, slot.precision, slot.abbreviate),
                ),
                SlotValue::Duration { ms } => (None, self.formatter().format_time_short(ms)),
                SlotValue::Text(text) => (None, text),
            };
            let text = format!("{}{}{}", slot.prefix, body, slot.suffix);
            self.write(surface, &slot.node_id, &text)?;
            panel.add_line(slot.node_id.clone(), slot.node_id.clone(), value, text);
        }

        if panel.created_nodes > 0 {
            log::debug!("created {} slot nodes under {root}", panel.created_nodes);
        }
        Ok(panel)
    }
}
