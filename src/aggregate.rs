//! Aggregate specifications.
//!
//! An [`AggregateSpec`] pairs a category with the canonical formula for the
//! category's grand total. The renderer writes that canonical total as-is;
//! it never rebuilds the total from the displayed lines, because the real
//! calculation applies caps, diminishing-returns stages and rounding that
//! the per-line breakdown does not reproduce exactly.
//!
//! The [`Combinator`] only backs [`AggregateSpec::naive_total`], which
//! exists so callers can compare the two numbers.

use crate::numeric::StatNumber;
use crate::stat_line::{StatCategory, StatFormula};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the lines of a category naively combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Combinator {
    /// Multiply every line (identity 1).
    #[default]
    Product,
    /// Add every line (identity 0).
    Sum,
}

impl Combinator {
    /// Fold values in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use statsheet::Combinator;
    /// use statsheet::numeric::StatNumber;
    ///
    /// let values = [StatNumber::from(2.0), StatNumber::from(3.0)];
    /// assert_eq!(Combinator::Product.combine(&values), StatNumber::from(6.0));
    /// assert_eq!(Combinator::Sum.combine(&values), StatNumber::from(5.0));
    /// assert_eq!(Combinator::Product.combine(&[]), StatNumber::ONE);
    /// ```
    pub fn combine(self, values: &[StatNumber]) -> StatNumber {
        match self {
            Combinator::Product => values.iter().fold(StatNumber::ONE, |acc, v| acc * *v),
            Combinator::Sum => values.iter().fold(StatNumber::ZERO, |acc, v| acc + *v),
        }
    }
}

/// A category plus its canonical total.
///
/// # Examples
///
/// ```rust
/// use statsheet::{AggregateSpec, Combinator, StatCategory, StatLine};
///
/// struct Game { base: f64, bonus: f64 }
///
/// let category = StatCategory::new("baseOffering", vec![
///     StatLine::new("Base", |g: &Game| g.base),
///     StatLine::new("Bonus", |g: &Game| g.bonus),
/// ]).unwrap();
///
/// let spec = AggregateSpec::new(category, |g: &Game| (g.base + g.bonus).floor())
///     .with_combinator(Combinator::Sum)
///     .with_total_label("Total2");
///
/// let game = Game { base: 4.0, bonus: 1.5 };
/// assert_eq!(spec.canonical_total(&game).to_f64(), 5.0);
/// assert_eq!(spec.naive_total(&game).to_f64(), 5.5);
/// assert_eq!(spec.total_label(), "Total2");
/// ```
pub struct AggregateSpec<S> {
    category: StatCategory<S>,
    canonical_total: Box<dyn StatFormula<S>>,
    total_label: String,
    combinator: Combinator,
}

impl<S> AggregateSpec<S> {
    /// Label of the total row unless overridden.
    pub const DEFAULT_TOTAL_LABEL: &'static str = "Total";

    pub fn new<F, N>(category: StatCategory<S>, canonical_total: F) -> Self
    where
        F: Fn(&S) -> N + 'static,
        N: Into<StatNumber>,
    {
        Self::from_formula(category, canonical_total)
    }

    pub fn from_formula(category: StatCategory<S>, canonical_total: impl StatFormula<S> + 'static) -> Self {
        Self {
            category,
            canonical_total: Box::new(canonical_total),
            total_label: String::from(Self::DEFAULT_TOTAL_LABEL),
            combinator: Combinator::default(),
        }
    }

    pub fn with_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = label.into();
        self
    }

    pub fn with_combinator(mut self, combinator: Combinator) -> Self {
        self.combinator = combinator;
        self
    }

    pub fn category(&self) -> &StatCategory<S> {
        &self.category
    }

    pub fn total_label(&self) -> &str {
        &self.total_label
    }

    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// The authoritative total.
    pub fn canonical_total(&self, state: &S) -> StatNumber {
        self.canonical_total.evaluate(state)
    }

    /// The lines folded with the combinator.
    ///
    /// Diagnostic only; it may legitimately differ from
    /// [`canonical_total`](Self::canonical_total).
    pub fn naive_total(&self, state: &S) -> StatNumber {
        self.combinator.combine(&self.category.values(state))
    }
}

impl<S> fmt::Debug for AggregateSpec<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateSpec")
            .field("category", &self.category)
            .field("total_label", &self.total_label)
            .field("combinator", &self.combinator)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::BigNumber;
    use crate::stat_line::StatLine;

    struct Game {
        cube_bonus: f64,
        exponent: i64,
    }

    fn cubes() -> StatCategory<Game> {
        StatCategory::new(
            "cubes",
            vec![
                StatLine::new("Campaign", |g: &Game| g.cube_bonus),
                StatLine::new("SunMoon", |_: &Game| 1.16),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_default_label_and_combinator() {
        let spec = AggregateSpec::new(cubes(), |g: &Game| g.cube_bonus);
        assert_eq!(spec.total_label(), "Total");
        assert_eq!(spec.combinator(), Combinator::Product);
        assert_eq!(spec.category().len(), 2);
    }

    #[test]
    fn test_canonical_total_is_independent_of_lines() {
        // canonical calculation applies a cap the lines do not show
        let spec = AggregateSpec::new(cubes(), |g: &Game| (g.cube_bonus * 1.16).min(2.0));
        let game = Game {
            cube_bonus: 5.0,
            exponent: 0,
        };
        assert_eq!(spec.canonical_total(&game), StatNumber::Float(2.0));
        assert!((spec.naive_total(&game).to_f64() - 5.8).abs() < 1e-9);
    }

    #[test]
    fn test_big_canonical_total() {
        let spec = AggregateSpec::new(cubes(), |g: &Game| BigNumber::pow10(g.exponent));
        let game = Game {
            cube_bonus: 1.0,
            exponent: 420,
        };
        let total = spec.canonical_total(&game);
        assert_eq!(total, StatNumber::Big(BigNumber::pow10(420)));
    }

    #[test]
    fn test_sum_combinator() {
        let spec = AggregateSpec::new(cubes(), |_: &Game| 0.0).with_combinator(Combinator::Sum);
        let game = Game {
            cube_bonus: 2.0,
            exponent: 0,
        };
        assert!((spec.naive_total(&game).to_f64() - 3.16).abs() < 1e-9);
    }
}
