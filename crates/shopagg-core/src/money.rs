//! # Money Module
//!
//! Bills and line items carry their amounts as decimal strings ("42.50",
//! "0.0", "1.995"). They are stored exactly as the client sent them; `Money` is
//! how the rest of the code checks that such a string is a real amount.
//!
//! ## Representation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ "42.50" ──parse──► Money { units: 425,  scale: 1 } ──Display──► "42.50" │
//! │ "1.995" ──parse──► Money { units: 1995, scale: 3 } ──Display──► "1.995" │
//! │ "0.0"   ──parse──► Money { units: 0,    scale: 0 }                      │
//! │ "4,50"  ──parse──► Err (comma is not a decimal separator)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Weighed items are priced per kilogram, so totals routinely carry more than
//! two decimals. Values are kept exact as integer units at a decimal scale,
//! trailing fractional zeros dropped. No floating point is involved.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// An exact decimal amount: `units / 10^scale`.
///
/// Always normalized, so equal amounts compare equal whatever their spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Money {
    units: i64,
    scale: u32,
}

impl Money {
    /// Creates a Money value from cents.
    pub fn from_cents(cents: i64) -> Self {
        Money { units: cents, scale: 2 }.normalized()
    }

    /// The value rounded to cents, half away from zero.
    pub fn cents(&self) -> i64 {
        if self.scale <= 2 {
            return self.units * 10_i64.pow(2 - self.scale);
        }
        let divisor = 10_i64.pow(self.scale - 2);
        let (quotient, remainder) = (self.units / divisor, self.units % divisor);
        if remainder.abs() * 2 >= divisor {
            quotient + self.units.signum()
        } else {
            quotient
        }
    }

    /// Number of significant fractional digits.
    #[inline]
    pub const fn scale(&self) -> u32 {
        self.scale
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.units < 0
    }

    /// Parses a plain decimal string: digits, optionally a point followed by
    /// at least one digit.
    ///
    /// ## Example
    /// ```rust
    /// use shopagg_core::money::Money;
    ///
    /// assert_eq!(Money::parse("42.50").unwrap().cents(), 4250);
    /// assert_eq!(Money::parse("1.995").unwrap().to_string(), "1.995");
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::invalid_format("amount", reason);

        let trimmed = raw.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (major, minor) = match digits.split_once('.') {
            Some((major, minor)) => (major, Some(minor)),
            None => (digits, None),
        };

        if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits before the decimal point"));
        }

        let minor = match minor {
            None => "",
            Some(m) if m.is_empty() || !m.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(invalid("expected digits after the decimal point"));
            }
            Some(m) => m.trim_end_matches('0'),
        };

        let too_large = || invalid("amount has too many digits");
        let scale = u32::try_from(minor.len()).map_err(|_| too_large())?;
        let units = format!("{major}{minor}")
            .parse::<i64>()
            .map_err(|_| too_large())?;

        let units = if negative { -units } else { units };
        Ok(Money { units, scale }.normalized())
    }

    fn normalized(mut self) -> Self {
        while self.scale > 0 && self.units % 10 == 0 {
            self.units /= 10;
            self.scale -= 1;
        }
        self
    }
}

/// At least two decimals, more when the amount carries them.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = self.scale.max(2);
        let units = self.units.unsigned_abs() * 10_u64.pow(scale - self.scale);
        let divisor = 10_u64.pow(scale);
        let sign = if self.units < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            units / divisor,
            units % divisor,
            width = scale as usize
        )
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_common_forms() {
        assert_eq!(Money::parse("42.50").unwrap().cents(), 4250);
        assert_eq!(Money::parse("42.5").unwrap().cents(), 4250);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("0.0").unwrap().cents(), 0);
        assert_eq!(Money::parse(" 3.07 ").unwrap().cents(), 307);
    }

    #[test]
    fn test_parse_keeps_extra_decimals() {
        let m = Money::parse("1.995").unwrap();
        assert_eq!(m.scale(), 3);
        assert_eq!(m.to_string(), "1.995");
        assert_eq!(m.cents(), 200);
        assert_eq!(Money::parse("0.004").unwrap().cents(), 0);
        assert_eq!(Money::parse("12.34567").unwrap().to_string(), "12.34567");
    }

    #[test]
    fn test_equal_spellings_compare_equal() {
        assert_eq!(Money::parse("42.5").unwrap(), Money::parse("42.500").unwrap());
        assert_eq!(Money::parse("0.0").unwrap(), Money::from_cents(0));
        assert_eq!(Money::parse("10").unwrap(), Money::from_cents(1000));
    }

    #[test]
    fn test_parse_negative() {
        let m = Money::parse("-5.50").unwrap();
        assert_eq!(m.cents(), -550);
        assert!(m.is_negative());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "abc", "4,50", "1.", ".5", "--1", "1.2.3", "1.-5"] {
            assert!(Money::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(Money::parse("999999999999999999999").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(4250).to_string(), "42.50");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(1000).to_string(), "10.00");
    }

    #[test]
    fn test_from_str() {
        let m: Money = "19.99".parse().unwrap();
        assert_eq!(m, Money::from_cents(1999));
    }
}
