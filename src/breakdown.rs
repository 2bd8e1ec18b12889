//! Breakdown renderers.
//!
//! Some panels are not catalogs of named formulas but a single calculation
//! that reports its own factor list: the ascension speed multiplier, the
//! golden quark multiplier, powder conversion, ambrosia luck. The number of
//! factors is whatever the calculation returns. Each factor is paired with a
//! [`Descriptor`] at the same 1-based index.
//!
//! Global speed is reported in three stages instead (factors before the
//! diminishing-returns step, the step itself, factors after it), see
//! [`StagedBreakdown`].

use crate::display::{DisplaySurface, ElementSpec};
use crate::error::StatsError;
use crate::numeric::StatNumber;
use crate::render::StatRenderer;
use crate::rendered::RenderedPanel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A calculation's factor list plus its final value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub factors: Vec<StatNumber>,
    pub total: StatNumber,
}

impl Breakdown {
    pub fn new(factors: Vec<StatNumber>, total: impl Into<StatNumber>) -> Self {
        Self {
            factors,
            total: total.into(),
        }
    }

    /// Build from plain floats.
    pub fn from_values(factors: &[f64], total: f64) -> Self {
        Self::new(factors.iter().copied().map(StatNumber::from).collect(), total)
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// How one breakdown row is labelled and formatted.
///
/// `notation` overrides the binding's notation for this row only; `suffix`
/// is appended after the number (`" sec"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    pub precision: u8,
    /// Literal text or a label key; it goes through the renderer's lookup.
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub notation: Option<FactorNotation>,
    #[serde(default)]
    pub suffix: String,
}

impl Descriptor {
    pub fn new(precision: u8, label: impl Into<String>) -> Self {
        Self {
            precision,
            label: label.into(),
            color: None,
            notation: None,
            suffix: String::new(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_notation(mut self, notation: FactorNotation) -> Self {
        self.notation = Some(notation);
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Descriptors keyed by 1-based factor index.
///
/// # Examples
///
/// ```rust
/// use statsheet::breakdown::{Descriptor, DescriptorTable};
///
/// let table = DescriptorTable::from_descriptors(vec![
///     Descriptor::new(2, "Base"),
///     Descriptor::new(3, "Platonic Upgrade").with_color("orchid"),
/// ]);
///
/// assert_eq!(table.get(1).unwrap().label, "Base");
/// assert_eq!(table.get(2).unwrap().precision, 3);
/// assert!(table.get(0).is_none());
/// assert_eq!(table.total_label(), "Total");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorTable {
    entries: BTreeMap<usize, Descriptor>,
    #[serde(default = "default_total_label")]
    total_label: String,
}

fn default_total_label() -> String {
    String::from("Total")
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            total_label: default_total_label(),
        }
    }

    /// Number the descriptors 1, 2, ... in order.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = Descriptor>) -> Self {
        let mut table = Self::new();
        for (i, descriptor) in descriptors.into_iter().enumerate() {
            table.insert(i + 1, descriptor);
        }
        table
    }

    pub fn insert(&mut self, index: usize, descriptor: Descriptor) {
        self.entries.insert(index, descriptor);
    }

    pub fn with_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = label.into();
        self
    }

    pub fn get(&self, index: usize) -> Option<&Descriptor> {
        self.entries.get(&index)
    }

    pub fn total_label(&self) -> &str {
        &self.total_label
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for DescriptorTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Symbol written in front of every breakdown value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactorNotation {
    #[default]
    Multiplier,
    Additive,
    Plain,
}

impl FactorNotation {
    pub fn symbol(self) -> &'static str {
        match self {
            FactorNotation::Multiplier => "x",
            FactorNotation::Additive => "+",
            FactorNotation::Plain => "",
        }
    }
}

/// How a breakdown's total value is written.
///
/// Unset fields fall back to the binding's notation and the renderer's
/// total precision. Totals are not abbreviated unless asked.
///
/// # Examples
///
/// ```rust
/// use statsheet::breakdown::{FactorNotation, TotalFormat};
///
/// let luck = TotalFormat::new()
///     .with_notation(FactorNotation::Plain)
///     .with_precision(0)
///     .with_prefix("\u{2618} ");
/// assert_eq!(luck.precision, Some(0));
/// assert!(!luck.abbreviate);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TotalFormat {
    pub notation: Option<FactorNotation>,
    pub precision: Option<u8>,
    pub abbreviate: bool,
    pub prefix: String,
    pub suffix: String,
}

impl TotalFormat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notation(mut self, notation: FactorNotation) -> Self {
        self.notation = Some(notation);
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
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
}

/// Node ids of a breakdown panel.
///
/// Factor `i` (1-based) lives in row `row_prefix + i` with its value in
/// `value_prefix + i`. The total value is `value_prefix + "T"` and its row
/// is `value_prefix + "Total"`, so the total row never shares an id with an
/// aggregate section whose prefix equals `row_prefix`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BreakdownBinding {
    pub root: String,
    pub row_prefix: String,
    pub value_prefix: String,
    pub notation: FactorNotation,
    pub total: TotalFormat,
}

impl BreakdownBinding {
    pub fn new(root: impl Into<String>, row_prefix: impl Into<String>, value_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            row_prefix: row_prefix.into(),
            value_prefix: value_prefix.into(),
            notation: FactorNotation::default(),
            total: TotalFormat::default(),
        }
    }

    pub fn with_notation(mut self, notation: FactorNotation) -> Self {
        self.notation = notation;
        self
    }

    pub fn with_total(mut self, total: TotalFormat) -> Self {
        self.total = total;
        self
    }

    pub fn row_id(&self, index: usize) -> String {
        format!("{}{}", self.row_prefix, index)
    }

    pub fn value_id(&self, index: usize) -> String {
        format!("{}{}", self.value_prefix, index)
    }

    pub fn total_row_id(&self) -> String {
        format!("{}Total", self.value_prefix)
    }

    pub fn total_value_id(&self) -> String {
        format!("{}T", self.value_prefix)
    }
}

/// A three-stage breakdown around a diminishing-returns step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagedBreakdown {
    /// Factors applied before the diminishing-returns step.
    pub pre: Vec<StatNumber>,
    /// Outputs of the diminishing-returns step.
    pub diminishing: Vec<StatNumber>,
    /// Factors applied afterwards.
    pub post: Vec<StatNumber>,
    pub total: StatNumber,
}

/// Node ids of a staged breakdown: `prefix + "a" | "b" | "c" + i` and
/// `prefix + "T"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StagedBinding {
    pub root: String,
    pub prefix: String,
}

impl StagedBinding {
    pub fn new(root: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }

    pub fn stage_id(&self, stage: char, index: usize) -> String {
        format!("{}{}{}", self.prefix, stage, index)
    }

    pub fn total_id(&self) -> String {
        format!("{}T", self.prefix)
    }
}

const STAGED_PRECISION: u8 = 3;

impl StatRenderer {
    /// Render a variable-length breakdown.
    ///
    /// Writes exactly one row per factor followed by the total row. Rows
    /// are created on first use and reused afterwards, so a breakdown that
    /// grows between renders only creates the new rows.
    ///
    /// Every factor index is checked against `descriptors` before anything
    /// is written.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statsheet::StatRenderer;
    /// use statsheet::breakdown::{Breakdown, BreakdownBinding, Descriptor, DescriptorTable};
    /// use statsheet::display::Document;
    ///
    /// let descriptors = DescriptorTable::from_descriptors(vec![
    ///     Descriptor::new(2, "Base"),
    ///     Descriptor::new(2, "Quark Shop"),
    /// ]);
    /// let binding = BreakdownBinding::new("goldenQuarkMultiplierStats", "statGQMS", "sGQMS");
    ///
    /// let mut doc = Document::new();
    /// let panel = StatRenderer::default()
    ///     .render_breakdown(&mut doc, &binding, &Breakdown::from_values(&[1.5, 2.0], 3.0), &descriptors)
    ///     .unwrap();
    ///
    /// assert_eq!(panel.texts(), vec!["x1.50", "x2.00", "x3.000"]);
    /// assert_eq!(doc.text("statGQMS2"), Some("Quark Shop"));
    /// ```
    ///
    /// # Errors
    ///
    /// [`StatsError::MissingDescriptor`] when a factor has no descriptor.
    pub fn render_breakdown(
        &self,
        surface: &mut dyn DisplaySurface,
        binding: &BreakdownBinding,
        breakdown: &Breakdown,
        descriptors: &DescriptorTable,
    ) -> Result<RenderedPanel, StatsError> {
        let rows = (1..=breakdown.len())
            .map(|index| {
                descriptors
                    .get(index)
                    .ok_or_else(|| StatsError::MissingDescriptor {
                        root: binding.root.clone(),
                        index,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        surface.ensure(&binding.root);
        let mut panel = RenderedPanel::new(&binding.root, &binding.row_prefix);

        for (i, (descriptor, value)) in rows.into_iter().zip(&breakdown.factors).enumerate() {
            let index = i + 1;
            let row_id = binding.row_id(index);
            let value_id = binding.value_id(index);
            let label = self.lookup(&descriptor.label);

            panel.created_nodes += self.ensure_row(surface, &binding.root, &row_id, &value_id, &[])?;
            self.write(surface, &row_id, &label)?;
            if let Some(color) = &descriptor.color {
                surface.set_color(&row_id, color)?;
            }

            let symbol = descriptor.notation.unwrap_or(binding.notation).symbol();
            let text = format!(
                "{symbol}{}{}",
                self.formatter().format(value, descriptor.precision, true),
                descriptor.suffix
            );
            self.write(surface, &value_id, &text)?;
            panel.add_line(label, value_id, *value, text);
        }

        let row_id = binding.total_row_id();
        let value_id = binding.total_value_id();
        let label = self.lookup(descriptors.total_label());
        let total_class = self.config().total_class.clone();
        panel.created_nodes += self.ensure_row(surface, &binding.root, &row_id, &value_id, &[total_class])?;
        self.write(surface, &row_id, &label)?;

        let total = &binding.total;
        let text = format!(
            "{}{}{}{}",
            total.prefix,
            total.notation.unwrap_or(binding.notation).symbol(),
            self.formatter().format(
                &breakdown.total,
                total.precision.unwrap_or(self.config().total_precision),
                total.abbreviate
            ),
            total.suffix
        );
        self.write(surface, &value_id, &text)?;
        panel.set_total(label, value_id, breakdown.total, text);

        if panel.created_nodes > 0 {
            log::debug!(
                "created {} breakdown nodes for {}",
                panel.created_nodes,
                binding.root
            );
        }
        Ok(panel)
    }

    /// Render a staged breakdown.
    ///
    /// Every stage value is written as a multiplier with three decimals and
    /// the total without abbreviation.
    pub fn render_staged(
        &self,
        surface: &mut dyn DisplaySurface,
        binding: &StagedBinding,
        staged: &StagedBreakdown,
    ) -> Result<RenderedPanel, StatsError> {
        surface.ensure(&binding.root);
        let mut panel = RenderedPanel::new(&binding.root, &binding.prefix);

        let stages = [('a', &staged.pre), ('b', &staged.diminishing), ('c', &staged.post)];
        for (stage, values) in stages {
            for (i, value) in values.iter().enumerate() {
                let node_id = binding.stage_id(stage, i + 1);
                panel.created_nodes += self.ensure_value(surface, &binding.root, &node_id, None)?;

                let text = format!("x{}", self.formatter().format(value, STAGED_PRECISION, true));
                self.write(surface, &node_id, &text)?;
                panel.add_line(node_id.clone(), node_id, *value, text);
            }
        }

        let node_id = binding.total_id();
        let total_class = self.config().total_class.clone();
        panel.created_nodes += self.ensure_value(surface, &binding.root, &node_id, Some(total_class))?;
        let text = self
            .formatter()
            .format(&staged.total, self.config().total_precision, false);
        self.write(surface, &node_id, &text)?;
        panel.set_total(node_id.clone(), node_id, staged.total, text);

        Ok(panel)
    }

    /// Create a row and its value node unless the row already exists.
    fn ensure_row(
        &self,
        surface: &mut dyn DisplaySurface,
        root: &str,
        row_id: &str,
        value_id: &str,
        extra_classes: &[String],
    ) -> Result<usize, StatsError> {
        if surface.contains(row_id) {
            return Ok(0);
        }
        let mut row = ElementSpec::new(row_id, &self.config().line_tag).with_class(&self.config().line_class);
        for class in extra_classes {
            row = row.with_class(class);
        }
        surface.create_child(root, row)?;
        surface.create_child(row_id, self.value_node(value_id.to_string()))?;
        Ok(2)
    }

    fn ensure_value(
        &self,
        surface: &mut dyn DisplaySurface,
        root: &str,
        node_id: &str,
        extra_class: Option<String>,
    ) -> Result<usize, StatsError> {
        if surface.contains(node_id) {
            return Ok(0);
        }
        let mut node = self.value_node(node_id.to_string());
        if let Some(class) = extra_class {
            node = node.with_class(class);
        }
        surface.create_child(root, node)?;
        Ok(1)
    }
}
