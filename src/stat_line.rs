//! Stat lines and categories.
//!
//! A stat line is one named contributing factor of an aggregate bonus: a
//! label plus a pure formula over the game state. Lines are grouped into
//! ordered categories, one per aggregate (cube multiplier, offering
//! multiplier, ...). Formulas only read the state they are handed; they
//! never mutate it and never cache.

use crate::error::StatsError;
use crate::label::StatLabel;
use crate::numeric::StatNumber;
use std::collections::HashSet;
use std::fmt;

/// A pure function of the game state producing one stat value.
///
/// Any `Fn(&S) -> N` with `N: Into<StatNumber>` is a formula, so most lines
/// are written as closures.
///
/// # Examples
///
/// ```rust
/// use statsheet::stat_line::{ConstantFormula, StatFormula};
/// use statsheet::numeric::StatNumber;
///
/// struct Game { beta: f64 }
///
/// let beta = |game: &Game| 1.0 + game.beta;
/// let game = Game { beta: 1.0 };
///
/// assert_eq!(beta.evaluate(&game), StatNumber::Float(2.0));
/// assert_eq!(StatFormula::<Game>::evaluate(&ConstantFormula(5.0), &game), StatNumber::Float(5.0));
/// ```
pub trait StatFormula<S> {
    fn evaluate(&self, state: &S) -> StatNumber;
}

impl<S, F, N> StatFormula<S> for F
where
    F: Fn(&S) -> N,
    N: Into<StatNumber>,
{
    fn evaluate(&self, state: &S) -> StatNumber {
        self(state).into()
    }
}

/// A formula that ignores the state.
#[derive(Debug, Clone, Copy)]
pub struct ConstantFormula(pub f64);

impl<S> StatFormula<S> for ConstantFormula {
    fn evaluate(&self, _state: &S) -> StatNumber {
        StatNumber::Float(self.0)
    }
}

/// One named factor of an aggregate.
pub struct StatLine<S> {
    label: StatLabel,
    formula: Box<dyn StatFormula<S>>,
    color: Option<String>,
    precision: Option<u8>,
}

impl<S> StatLine<S> {
    /// Create a line from a closure over the state.
    pub fn new<F, N>(label: impl Into<StatLabel>, formula: F) -> Self
    where
        F: Fn(&S) -> N + 'static,
        N: Into<StatNumber>,
    {
        Self::from_formula(label, formula)
    }

    /// Create a line from any [`StatFormula`].
    pub fn from_formula(label: impl Into<StatLabel>, formula: impl StatFormula<S> + 'static) -> Self {
        Self {
            label: label.into(),
            formula: Box::new(formula),
            color: None,
            precision: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn label(&self) -> &StatLabel {
        &self.label
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// The line's own precision, if it overrides the renderer default.
    pub fn precision(&self) -> Option<u8> {
        self.precision
    }

    pub fn evaluate(&self, state: &S) -> StatNumber {
        self.formula.evaluate(state)
    }
}

impl<S> fmt::Debug for StatLine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatLine")
            .field("label", &self.label)
            .field("color", &self.color)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

/// An ordered, non-empty list of stat lines.
///
/// The order is the display order: line N is always rendered into node N.
/// Labels are unique because node ids are derived from them.
///
/// # Examples
///
/// ```rust
/// use statsheet::{StatCategory, StatLine};
///
/// struct Game { beta: f64, omega: f64 }
///
/// let cubes = StatCategory::new("cubes", vec![
///     StatLine::new("Beta", |g: &Game| 1.0 + g.beta),
///     StatLine::new("Omega", |g: &Game| g.omega).with_color("gold"),
/// ]).unwrap();
///
/// assert_eq!(cubes.len(), 2);
/// assert_eq!(cubes.lines()[1].label().as_str(), "Omega");
/// ```
pub struct StatCategory<S> {
    name: String,
    lines: Vec<StatLine<S>>,
}

impl<S> StatCategory<S> {
    pub fn new(name: impl Into<String>, lines: Vec<StatLine<S>>) -> Result<Self, StatsError> {
        let name = name.into();
        if lines.is_empty() {
            return Err(StatsError::EmptyCategory(name));
        }

        let mut seen = HashSet::new();
        for line in &lines {
            if !seen.insert(line.label.clone()) {
                return Err(StatsError::DuplicateLabel {
                    category: name,
                    label: line.label.to_string(),
                });
            }
        }

        Ok(Self { name, lines })
    }

    /// Append another category's lines after this one's.
    pub fn chain(self, other: StatCategory<S>) -> Result<Self, StatsError> {
        let mut lines = self.lines;
        lines.extend(other.lines);
        Self::new(self.name, lines)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[StatLine<S>] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatLine<S>> {
        self.lines.iter()
    }

    /// Evaluate every line in declared order.
    pub fn values(&self, state: &S) -> Vec<StatNumber> {
        self.lines.iter().map(|line| line.evaluate(state)).collect()
    }
}

impl<'a, S> IntoIterator for &'a StatCategory<S> {
    type Item = &'a StatLine<S>;
    type IntoIter = std::slice::Iter<'a, StatLine<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

impl<S> fmt::Debug for StatCategory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatCategory")
            .field("name", &self.name)
            .field("lines", &self.lines)
            .finish()
    }
}
