//! Number formatting for display.
//!
//! Formatting is a collaborator of the renderer rather than part of it: the
//! renderer only decides *which* precision and abbreviation mode a value
//! gets, the [`NumberFormatter`] decides what the string looks like.

use crate::numeric::{BigNumber, StatNumber};
use serde::{Deserialize, Serialize};

/// Short-scale suffixes, starting at `10^3`.
const SUFFIXES: [&str; 11] = ["K", "M", "B", "T", "Qa", "Qi", "Sx", "Sp", "Oc", "No", "Dc"];

const MS_PER_CENTISECOND: f64 = 10.0;
const CENTIS_PER_SECOND: u64 = 100;
const CENTIS_PER_MINUTE: u64 = 60 * CENTIS_PER_SECOND;
const CENTIS_PER_HOUR: u64 = 60 * CENTIS_PER_MINUTE;
const CENTIS_PER_DAY: u64 = 24 * CENTIS_PER_HOUR;

/// Tunables for [`StandardFormatter`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Magnitudes at or above this switch from fixed-point to
    /// abbreviated or scientific notation.
    pub abbreviation_threshold: f64,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            abbreviation_threshold: 1e6,
        }
    }
}

/// Turns stat values into display text.
pub trait NumberFormatter {
    /// Format `value` with `precision` fractional digits.
    ///
    /// With `abbreviate`, large magnitudes use a short-scale suffix
    /// instead of scientific notation.
    fn format(&self, value: &StatNumber, precision: u8, abbreviate: bool) -> String;

    /// Format a duration given in milliseconds, e.g. `1h 2m 3.00s`.
    fn format_time_short(&self, ms: f64) -> String;
}

/// The default formatter.
///
/// # Examples
///
/// ```rust
/// use statsheet::format::{NumberFormatter, StandardFormatter};
/// use statsheet::numeric::{BigNumber, StatNumber};
///
/// let fmt = StandardFormatter::default();
///
/// assert_eq!(fmt.format(&StatNumber::from(2.0), 2, true), "2.00");
/// assert_eq!(fmt.format(&StatNumber::from(1_234_567.0), 2, true), "1.23M");
/// assert_eq!(fmt.format(&StatNumber::from(1_234_567.0), 2, false), "1.23e6");
/// assert_eq!(fmt.format(&StatNumber::from(BigNumber::new(4.5, 1200)), 1, true), "4.5e1200");
/// ```
#[derive(Debug, Clone, Default)]
pub struct StandardFormatter {
    config: FormatConfig,
}

impl StandardFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    fn fixed(value: f64, precision: u8) -> String {
        // avoid "-0.00"
        let value = if value == 0.0 { 0.0 } else { value };
        format!("{:.*}", precision as usize, value)
    }

    fn scientific(big: BigNumber, precision: u8) -> String {
        let (mantissa, exponent) = Self::round_mantissa(big.mantissa(), big.exponent(), precision, 10.0);
        format!("{:.*}e{}", precision as usize, mantissa, exponent)
    }

    fn abbreviated(big: BigNumber, precision: u8) -> String {
        let exponent = big.exponent();
        if exponent < 3 {
            return Self::fixed(big.to_f64(), precision);
        }

        let group = exponent / 3;
        let scaled = big.mantissa() * 10_f64.powi((exponent - group * 3) as i32);
        let (scaled, group) = Self::round_mantissa(scaled, group, precision, 1000.0);

        match SUFFIXES.get((group - 1) as usize) {
            Some(suffix) => format!("{:.*}{}", precision as usize, scaled, suffix),
            None => Self::scientific(big, precision),
        }
    }

    /// Round to `precision` digits, carrying into the next step when the
    /// rounded mantissa reaches `base`.
    fn round_mantissa(mantissa: f64, step: i64, precision: u8, base: f64) -> (f64, i64) {
        let factor = 10_f64.powi(i32::from(precision));
        let rounded = (mantissa * factor).round() / factor;
        if rounded.abs() >= base {
            (rounded / base, step + 1)
        } else {
            (rounded, step)
        }
    }

    fn non_finite(value: f64) -> String {
        if value.is_nan() {
            String::from("NaN")
        } else if value > 0.0 {
            String::from("Infinity")
        } else {
            String::from("-Infinity")
        }
    }
}

impl NumberFormatter for StandardFormatter {
    fn format(&self, value: &StatNumber, precision: u8, abbreviate: bool) -> String {
        if !value.is_finite() {
            return Self::non_finite(value.to_f64());
        }

        let plain = value.to_f64();
        if plain.is_finite() && plain.abs() < self.config.abbreviation_threshold {
            return Self::fixed(plain, precision);
        }

        let big = value.to_big();
        if abbreviate {
            Self::abbreviated(big, precision)
        } else {
            Self::scientific(big, precision)
        }
    }

    fn format_time_short(&self, ms: f64) -> String {
        // round once, before splitting, so 59.999s carries into the minute
        let centis = if ms.is_finite() {
            (ms.max(0.0) / MS_PER_CENTISECOND).round() as u64
        } else {
            0
        };

        let days = centis / CENTIS_PER_DAY;
        let hours = centis % CENTIS_PER_DAY / CENTIS_PER_HOUR;
        let minutes = centis % CENTIS_PER_HOUR / CENTIS_PER_MINUTE;
        let seconds = (centis % CENTIS_PER_MINUTE) as f64 / CENTIS_PER_SECOND as f64;

        let mut parts = Vec::new();
        if days > 0 {
            parts.push(format!("{days}d"));
        }
        if !parts.is_empty() || hours > 0 {
            parts.push(format!("{hours}h"));
        }
        if !parts.is_empty() || minutes > 0 {
            parts.push(format!("{minutes}m"));
        }
        parts.push(format!("{seconds:.2}s"));
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: f64, precision: u8, abbreviate: bool) -> String {
        StandardFormatter::default().format(&StatNumber::from(value), precision, abbreviate)
    }

    #[test]
    fn test_fixed_point_below_threshold() {
        assert_eq!(fmt(3.0, 2, true), "3.00");
        assert_eq!(fmt(6.0, 3, true), "6.000");
        assert_eq!(fmt(1.23456, 4, false), "1.2346");
        assert_eq!(fmt(999_999.0, 0, true), "999999");
    }

    #[test]
    fn test_precision_zero_is_integer() {
        assert_eq!(fmt(42.4, 0, true), "42");
        assert_eq!(fmt(0.0, 0, false), "0");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(fmt(-0.0, 2, true), "0.00");
    }

    #[test]
    fn test_abbreviated_suffixes() {
        assert_eq!(fmt(1_000_000.0, 2, true), "1.00M");
        assert_eq!(fmt(25_000_000_000.0, 1, true), "25.0B");
        assert_eq!(fmt(-3.5e12, 2, true), "-3.50T");
    }

    #[test]
    fn test_abbreviated_rounding_carries() {
        assert_eq!(fmt(999_999_999.0, 2, true), "1.00B");
    }

    #[test]
    fn test_scientific_without_abbreviation() {
        assert_eq!(fmt(1_500_000.0, 2, false), "1.50e6");
        assert_eq!(fmt(9.999e9, 2, false), "1.00e10");
    }

    #[test]
    fn test_beyond_suffixes_falls_back_to_scientific() {
        assert_eq!(fmt(2e40, 2, true), "2.00e40");
    }

    #[test]
    fn test_big_number_values() {
        let formatter = StandardFormatter::default();
        let huge = StatNumber::from(BigNumber::new(1.5, 5000));
        assert_eq!(formatter.format(&huge, 3, true), "1.500e5000");

        let small_big = StatNumber::from(BigNumber::from_f64(12.5));
        assert_eq!(formatter.format(&small_big, 2, true), "12.50");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(fmt(f64::INFINITY, 2, true), "Infinity");
        assert_eq!(fmt(f64::NEG_INFINITY, 2, true), "-Infinity");
        assert_eq!(fmt(f64::NAN, 2, true), "NaN");
    }

    #[test]
    fn test_custom_threshold() {
        let formatter = StandardFormatter::new(FormatConfig {
            abbreviation_threshold: 1e3,
        });
        assert_eq!(formatter.format(&StatNumber::from(4_500.0), 1, true), "4.5K");
        assert_eq!(formatter.format(&StatNumber::from(450.0), 1, true), "450.0");
    }

    #[test]
    fn test_format_time_short() {
        let formatter = StandardFormatter::default();
        assert_eq!(formatter.format_time_short(500.0), "0.50s");
        assert_eq!(formatter.format_time_short(90_000.0), "1m 30.00s");
        assert_eq!(formatter.format_time_short(3_723_000.0), "1h 2m 3.00s");
        assert_eq!(formatter.format_time_short(90_000_000.0), "1d 1h 0m 0.00s");
        assert_eq!(formatter.format_time_short(-5.0), "0.00s");
    }

    #[test]
    fn test_format_time_short_rounding_carries() {
        let formatter = StandardFormatter::default();
        assert_eq!(formatter.format_time_short(59_999.0), "1m 0.00s");
        assert_eq!(formatter.format_time_short(3_599_996.0), "1h 0m 0.00s");
        assert_eq!(formatter.format_time_short(59_994.0), "59.99s");
        assert_eq!(formatter.format_time_short(f64::INFINITY), "0.00s");
    }
}
