//! Fixed-point temperatures with one decimal digit.
//!
//! Every value in a dataset and in an output file carries exactly one
//! fractional digit, so values are stored as a signed count of tenths.
//! Sums stay exact, and the only rounding in the whole pipeline happens
//! once, when a mean is finalized.
//!
//! # Rounding rule
//!
//! [`Tenths::mean_half_even`] rounds `sum / count` to the nearest tenth and
//! breaks exact ties towards the even neighbour (banker's rounding):
//!
//! ```
//! use rowbench_core::Tenths;
//!
//! // (1.0 + 1.1) / 2 = 1.05 -> 1.0 (tie, 10 is even)
//! assert_eq!(Tenths::mean_half_even(21, 2), Tenths::new(10));
//! // (1.1 + 1.2) / 2 = 1.15 -> 1.2 (tie, 12 is even)
//! assert_eq!(Tenths::mean_half_even(23, 2), Tenths::new(12));
//! // (-1.0 + -1.1) / 2 = -1.05 -> -1.0
//! assert_eq!(Tenths::mean_half_even(-21, 2), Tenths::new(-10));
//! ```

use std::fmt;
use std::str::FromStr;

/// A temperature expressed as a whole number of tenths of a degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tenths(i64);

impl Tenths {
    /// Largest magnitude accepted by the parser, in tenths.
    ///
    /// Sums of these are accumulated in `i128`, which cannot overflow for
    /// any row count that fits in a `u64`.
    pub const LIMIT: i64 = 9_999_999_999;

    /// Creates a value from a raw tenths count.
    pub const fn new(tenths: i64) -> Self {
        Self(tenths)
    }

    /// Returns the raw tenths count.
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Converts to floating point degrees.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 10.0
    }

    /// Rounds a floating point value to the nearest tenth.
    ///
    /// Returns `None` for non-finite input or values beyond [`Tenths::LIMIT`].
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * 10.0).round();
        if scaled.abs() > Self::LIMIT as f64 {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// Parses the strict dataset grammar `-?digits.digit`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rowbench_core::Tenths;
    ///
    /// assert_eq!(Tenths::parse("-9.3"), Some(Tenths::new(-93)));
    /// assert_eq!(Tenths::parse("12.0"), Some(Tenths::new(120)));
    /// assert_eq!(Tenths::parse("12"), None);
    /// assert_eq!(Tenths::parse("12.34"), None);
    /// assert_eq!(Tenths::parse("+1.0"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        Self::parse_bytes(s.as_bytes())
    }

    /// Byte-level variant of [`Tenths::parse`], used on the hot path.
    pub fn parse_bytes(bytes: &[u8]) -> Option<Self> {
        let (negative, digits) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            Some(_) => (false, bytes),
            None => return None,
        };
        // at least "d.d"
        if digits.len() < 3 {
            return None;
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - 2);
        if frac_part[0] != b'.' || !frac_part[1].is_ascii_digit() {
            return None;
        }

        let mut value: i64 = 0;
        for &b in int_part {
            if !b.is_ascii_digit() {
                return None;
            }
            value = value.checked_mul(10)?.checked_add(i64::from(b - b'0'))?;
        }
        value = value
            .checked_mul(10)?
            .checked_add(i64::from(frac_part[1] - b'0'))?;
        if value > Self::LIMIT {
            return None;
        }

        Some(Self(if negative { -value } else { value }))
    }

    /// Computes `sum / count` rounded to the nearest tenth, ties to even.
    ///
    /// The division is done exactly in integer arithmetic, so the result does
    /// not depend on floating point behaviour.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero.
    pub fn mean_half_even(sum: i128, count: u64) -> Self {
        assert!(count > 0, "mean of zero measurements");
        let count = i128::from(count);
        let quotient = sum.div_euclid(count);
        let remainder = sum.rem_euclid(count);

        let twice = remainder * 2;
        let rounded = if twice > count || (twice == count && quotient % 2 != 0) {
            quotient + 1
        } else {
            quotient
        };
        Self(rounded as i64)
    }
}

impl fmt::Display for Tenths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{}", sign, magnitude / 10, magnitude % 10)
    }
}

/// Error returned when a string is not a one-decimal temperature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTenthsError(String);

impl fmt::Display for ParseTenthsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid one-decimal value: {:?}", self.0)
    }
}

impl std::error::Error for ParseTenthsError {}

impl FromStr for Tenths {
    type Err = ParseTenthsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseTenthsError(s.to_string()))
    }
}
