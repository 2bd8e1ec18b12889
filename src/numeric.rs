//! Numeric types for stat values.
//!
//! Most stat lines fit comfortably in an `f64`. Long-run totals (offerings,
//! obtainium, quarks late in a run) can exceed the range where `f64` is
//! usable, so a line may instead produce a [`BigNumber`], a base-10
//! mantissa/exponent decimal. [`StatNumber`] is the value type every formula
//! returns and every formatter accepts.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul};

/// Largest exponent gap at which the smaller addend still affects the sum.
const ADD_PRECISION_DIGITS: i64 = 17;

/// Arbitrary-magnitude decimal stored as `mantissa × 10^exponent`.
///
/// The mantissa is kept normalized to `1 <= |mantissa| < 10`; zero is
/// stored as `0 × 10^0`.
///
/// # Examples
///
/// ```rust
/// use statsheet::numeric::BigNumber;
///
/// let big = BigNumber::new(12.5, 400);
/// assert_eq!(big.mantissa(), 1.25);
/// assert_eq!(big.exponent(), 401);
/// assert!(big.to_f64().is_infinite());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BigNumber {
    mantissa: f64,
    exponent: i64,
}

/// `value / 10^shift`, applied in steps so that subnormal inputs are never
/// divided by a power of ten that itself underflows to zero.
fn shift_down(mut value: f64, mut shift: i64) -> f64 {
    while shift != 0 {
        let step = shift.clamp(-MAX_POW10_STEP, MAX_POW10_STEP);
        value /= 10_f64.powi(step as i32);
        shift -= step;
    }
    value
}

const MAX_POW10_STEP: i64 = 300;

impl BigNumber {
    /// The value zero.
    pub const ZERO: BigNumber = BigNumber {
        mantissa: 0.0,
        exponent: 0,
    };

    /// The value one.
    pub const ONE: BigNumber = BigNumber {
        mantissa: 1.0,
        exponent: 0,
    };

    /// Create a normalized number from any mantissa and exponent.
    pub fn new(mantissa: f64, exponent: i64) -> Self {
        if mantissa == 0.0 {
            return Self::ZERO;
        }
        if !mantissa.is_finite() {
            return Self { mantissa, exponent: 0 };
        }

        let shift = mantissa.abs().log10().floor() as i64;
        let mut mantissa = shift_down(mantissa, shift);
        let mut exponent = exponent + shift;

        // log10 rounding can leave the mantissa one decade off
        if mantissa.abs() >= 10.0 {
            mantissa /= 10.0;
            exponent += 1;
        } else if mantissa.abs() < 1.0 {
            mantissa *= 10.0;
            exponent -= 1;
        }

        Self { mantissa, exponent }
    }

    /// Convert an `f64` into its mantissa/exponent form.
    pub fn from_f64(value: f64) -> Self {
        Self::new(value, 0)
    }

    /// `10^exponent`.
    pub fn pow10(exponent: i64) -> Self {
        Self {
            mantissa: 1.0,
            exponent,
        }
    }

    pub fn mantissa(self) -> f64 {
        self.mantissa
    }

    pub fn exponent(self) -> i64 {
        self.exponent
    }

    pub fn is_zero(self) -> bool {
        self.mantissa == 0.0
    }

    /// Convert to `f64`, saturating to infinity above the `f64` range and
    /// flushing to zero below it.
    pub fn to_f64(self) -> f64 {
        if self.exponent > f64::MAX_10_EXP as i64 {
            return self.mantissa.signum() * f64::INFINITY;
        }
        if self.exponent < f64::MIN_10_EXP as i64 - 17 {
            return 0.0;
        }
        self.mantissa * 10_f64.powi(self.exponent as i32)
    }

    /// Base-10 logarithm of the magnitude. Zero yields negative infinity.
    pub fn log10(self) -> f64 {
        if self.is_zero() {
            return f64::NEG_INFINITY;
        }
        self.mantissa.abs().log10() + self.exponent as f64
    }

    fn sign(self) -> i8 {
        if self.mantissa > 0.0 {
            1
        } else if self.mantissa < 0.0 {
            -1
        } else {
            0
        }
    }
}

impl Default for BigNumber {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for BigNumber {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        if self.is_zero() {
            return other;
        }
        if other.is_zero() {
            return self;
        }

        let gap = self.exponent - other.exponent;
        if gap > ADD_PRECISION_DIGITS {
            return self;
        }
        if gap < -ADD_PRECISION_DIGITS {
            return other;
        }

        let aligned = other.mantissa * 10_f64.powi(-gap as i32);
        Self::new(self.mantissa + aligned, self.exponent)
    }
}

impl Mul for BigNumber {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.mantissa * other.mantissa, self.exponent + other.exponent)
    }
}

impl PartialOrd for BigNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let (a, b) = (self.sign(), other.sign());
        if a != b {
            return Some(a.cmp(&b));
        }
        if a == 0 {
            return Some(Ordering::Equal);
        }

        let magnitude = self
            .exponent
            .cmp(&other.exponent)
            .then(self.mantissa.abs().partial_cmp(&other.mantissa.abs())?);
        Some(if a > 0 { magnitude } else { magnitude.reverse() })
    }
}

impl fmt::Display for BigNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}e{}", self.mantissa, self.exponent)
    }
}

/// A stat value: plain floating point or a [`BigNumber`].
///
/// Arithmetic stays in `f64` while both sides are floats and promotes to
/// `BigNumber` as soon as either side is big.
///
/// # Examples
///
/// ```rust
/// use statsheet::numeric::{BigNumber, StatNumber};
///
/// let small = StatNumber::from(2.0);
/// let huge = StatNumber::from(BigNumber::pow10(500));
///
/// assert_eq!(small * StatNumber::from(3.0), StatNumber::Float(6.0));
/// assert!(matches!(small * huge, StatNumber::Big(_)));
/// assert!(huge > small);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatNumber {
    Float(f64),
    Big(BigNumber),
}

impl StatNumber {
    pub const ZERO: StatNumber = StatNumber::Float(0.0);
    pub const ONE: StatNumber = StatNumber::Float(1.0);

    /// Convert to `f64`, saturating big values outside the `f64` range.
    pub fn to_f64(self) -> f64 {
        match self {
            StatNumber::Float(value) => value,
            StatNumber::Big(big) => big.to_f64(),
        }
    }

    pub fn to_big(self) -> BigNumber {
        match self {
            StatNumber::Float(value) => BigNumber::from_f64(value),
            StatNumber::Big(big) => big,
        }
    }

    /// Base-10 logarithm of the magnitude.
    pub fn log10(self) -> f64 {
        match self {
            StatNumber::Float(value) => value.abs().log10(),
            StatNumber::Big(big) => big.log10(),
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            StatNumber::Float(value) => value.is_finite(),
            StatNumber::Big(big) => big.mantissa.is_finite(),
        }
    }
}

impl Default for StatNumber {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for StatNumber {
    fn from(value: f64) -> Self {
        StatNumber::Float(value)
    }
}

impl From<u32> for StatNumber {
    fn from(value: u32) -> Self {
        StatNumber::Float(f64::from(value))
    }
}

impl From<BigNumber> for StatNumber {
    fn from(value: BigNumber) -> Self {
        StatNumber::Big(value)
    }
}

impl Add for StatNumber {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        match (self, other) {
            (StatNumber::Float(a), StatNumber::Float(b)) => StatNumber::Float(a + b),
            (a, b) => StatNumber::Big(a.to_big() + b.to_big()),
        }
    }
}

impl Mul for StatNumber {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        match (self, other) {
            (StatNumber::Float(a), StatNumber::Float(b)) => StatNumber::Float(a * b),
            (a, b) => StatNumber::Big(a.to_big() * b.to_big()),
        }
    }
}

impl PartialOrd for StatNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (StatNumber::Float(a), StatNumber::Float(b)) => a.partial_cmp(b),
            (a, b) => a.to_big().partial_cmp(&b.to_big()),
        }
    }
}

impl fmt::Display for StatNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatNumber::Float(value) => write!(f, "{}", value),
            StatNumber::Big(big) => write!(f, "{}", big),
        }
    }
}
