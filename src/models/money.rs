//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides exact integer arithmetic, rounding multiplication and
//! division by floating-point factors, and formatting.
//!
//! Multiplication and division by a factor round half away from zero
//! (`f64::round`), so `Money::from_cents(1).scale(0.5)` is one cent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
///
/// Using i64 cents avoids floating-point precision issues and supports
/// amounts up to approximately $92 quadrillion (both positive and negative).
/// Addition and subtraction beyond that range overflow like plain `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use tally::models::Money;
    /// let amount = Money::from_cents(1050); // $10.50
    /// assert_eq!(amount.cents(), 1050);
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from dollars and cents
    ///
    /// # Examples
    /// ```
    /// use tally::models::Money;
    /// let amount = Money::from_dollars_cents(10, 50); // $10.50
    /// assert_eq!(amount.cents(), 1050);
    /// ```
    pub const fn from_dollars_cents(dollars: i64, cents: i64) -> Self {
        Self(dollars * 100 + cents)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole dollars portion (truncated toward zero)
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Get the absolute value
    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// The amount as a decimal number of currency units (e.g. 10.5 for $10.50)
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply by a factor, rounding to the nearest cent
    ///
    /// # Panics
    ///
    /// Panics if `factor` is NaN or infinite, or if the result does not fit
    /// in an `i64` number of cents.
    ///
    /// # Examples
    /// ```
    /// use tally::models::Money;
    /// assert_eq!(Money::from_cents(100).scale(0.5), Money::from_cents(50));
    /// assert_eq!(Money::from_cents(1).scale(0.5), Money::from_cents(1));
    /// ```
    pub fn scale(&self, factor: f64) -> Self {
        assert!(
            factor.is_finite(),
            "Money::scale called with non-finite factor {}",
            factor
        );
        Self::round_from(self.0 as f64 * factor)
    }

    /// Divide by a factor, rounding to the nearest cent
    ///
    /// # Panics
    ///
    /// Panics if `factor` is zero, NaN or infinite.
    pub fn divide(&self, factor: f64) -> Self {
        assert!(
            factor.is_finite() && factor != 0.0,
            "Money::divide called with invalid factor {}",
            factor
        );
        Self::round_from(self.0 as f64 / factor)
    }

    fn round_from(value: f64) -> Self {
        let rounded = value.round();
        assert!(
            rounded >= i64::MIN as f64 && rounded < i64::MAX as f64,
            "Money result {} is out of range",
            rounded
        );
        Self(rounded as i64)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "-10.50", "$10.50", "-$10.50", "1,250.00", "10".
    /// Only one leading minus is allowed, before the currency sign. Digits
    /// past the second decimal place are truncated.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let input = s.trim();
        let invalid = || MoneyParseError::InvalidFormat(input.to_string());

        let (negative, rest) = match input.strip_prefix('-') {
            Some(stripped) => (true, stripped),
            None => (false, input),
        };
        let rest = rest.strip_prefix('$').unwrap_or(rest);
        let cleaned: String = rest.chars().filter(|c| *c != ',').collect();

        let (dollars_str, cents_str) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
        if dollars_str.is_empty() && cents_str.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(dollars_str) || !all_digits(cents_str) {
            return Err(invalid());
        }

        let dollars: i64 = if dollars_str.is_empty() {
            0
        } else {
            dollars_str.parse().map_err(|_| invalid())?
        };
        let cents: i64 = match cents_str.len() {
            0 => 0,
            1 => cents_str.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => cents_str[..2].parse().map_err(|_| invalid())?,
        };

        let total = dollars
            .checked_mul(100)
            .and_then(|d| d.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        self.format(&MoneyFormat {
            symbol: symbol.to_string(),
            thousands_separator: String::new(),
            decimal_separator: ".".to_string(),
        })
    }

    /// Format using the host's number conventions
    ///
    /// # Examples
    /// ```
    /// use tally::models::{Money, MoneyFormat};
    /// let fmt = MoneyFormat::default();
    /// assert_eq!(Money::from_cents(123456789).format(&fmt), "$1,234,567.89");
    /// assert_eq!(Money::from_cents(-5).format(&fmt), "-$0.05");
    /// ```
    pub fn format(&self, fmt: &MoneyFormat) -> String {
        let digits = self.dollars().abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push_str(&fmt.thousands_separator);
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}{}{:02}",
            sign,
            fmt.symbol,
            grouped,
            fmt.decimal_separator,
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> std::iter::Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

/// Number formatting conventions for displaying money
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyFormat {
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for MoneyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        }
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1050);
        assert_eq!(m.cents(), 1050);
        assert_eq!(m.dollars(), 10);
        assert_eq!(m.cents_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1050)), "$10.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
        assert_eq!(format!("{}", Money::from_cents(-1050)), "-$10.50");
        assert_eq!(format!("{}", Money::from_cents(5)), "$0.05");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
        assert_eq!((-a).cents(), -1000);
    }

    #[test]
    fn test_add_commutes_and_sub_inverts() {
        let samples = [0, 1, -1, 99, 12345, -987654, 1 << 40];
        for &a in &samples {
            for &b in &samples {
                let (ma, mb) = (Money::from_cents(a), Money::from_cents(b));
                assert_eq!(ma + mb, mb + ma);
                assert_eq!((ma + mb) - mb, ma);
            }
        }
    }

    #[test]
    fn test_scale() {
        assert_eq!(Money::from_cents(100).scale(0.5), Money::from_cents(50));
        assert_eq!(Money::from_cents(12345).scale(1.0), Money::from_cents(12345));
        assert_eq!(Money::from_cents(1000).scale(0.0825), Money::from_cents(83));
        assert_eq!(Money::from_cents(-1000).scale(1.5), Money::from_cents(-1500));
    }

    #[test]
    fn test_scale_rounds_half_away_from_zero() {
        assert_eq!(Money::from_cents(1).scale(0.5), Money::from_cents(1));
        assert_eq!(Money::from_cents(3).scale(0.5), Money::from_cents(2));
        assert_eq!(Money::from_cents(5).scale(0.5), Money::from_cents(3));
        assert_eq!(Money::from_cents(-1).scale(0.5), Money::from_cents(-1));
        // Repeated calls are deterministic
        assert_eq!(Money::from_cents(1).scale(0.5), Money::from_cents(1).scale(0.5));
    }

    #[test]
    fn test_divide() {
        assert_eq!(Money::from_cents(1000).divide(3.0), Money::from_cents(333));
        assert_eq!(Money::from_cents(1000).divide(8.0), Money::from_cents(125));
        assert_eq!(Money::from_cents(5).divide(2.0), Money::from_cents(3));
        assert_eq!(Money::from_cents(-5).divide(2.0), Money::from_cents(-3));
    }

    #[test]
    #[should_panic(expected = "non-finite")]
    fn test_scale_nan_panics() {
        let _ = Money::from_cents(100).scale(f64::NAN);
    }

    #[test]
    #[should_panic(expected = "invalid factor")]
    fn test_divide_by_zero_panics() {
        let _ = Money::from_cents(100).divide(0.0);
    }

    #[test]
    #[should_panic(expected = "invalid factor")]
    fn test_divide_by_infinity_panics() {
        let _ = Money::from_cents(100).divide(f64::INFINITY);
    }

    #[test]
    fn test_to_decimal() {
        assert_eq!(Money::from_cents(1050).to_decimal(), 10.5);
        assert_eq!(Money::from_cents(-1).to_decimal(), -0.01);
    }

    #[test]
    fn test_format_grouping() {
        let fmt = MoneyFormat::default();
        assert_eq!(Money::from_cents(0).format(&fmt), "$0.00");
        assert_eq!(Money::from_cents(99999).format(&fmt), "$999.99");
        assert_eq!(Money::from_cents(100000).format(&fmt), "$1,000.00");
        assert_eq!(Money::from_cents(-6000000).format(&fmt), "-$60,000.00");

        let euro = MoneyFormat {
            symbol: "€".into(),
            thousands_separator: ".".into(),
            decimal_separator: ",".into(),
        };
        assert_eq!(Money::from_cents(123456).format(&euro), "€1.234,56");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(123456).format_with_symbol("£"), "£1234.56");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("-10.50").unwrap().cents(), -1050);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse("10.5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("0.05").unwrap().cents(), 5);
        assert_eq!(Money::parse("1,250.00").unwrap().cents(), 125000);
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_parse_sign_placement() {
        assert_eq!(Money::parse("-$5.50").unwrap().cents(), -550);
        assert!(Money::parse("$-5.50").is_err());
        assert!(Money::parse("--5").is_err());
        assert!(Money::parse("+5").is_err());
        assert!(Money::parse("5.-5").is_err());
    }

    #[test]
    fn test_parse_rejects_bare_separators() {
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("$").is_err());
        assert!(Money::parse("-").is_err());
        assert_eq!(Money::parse("5.").unwrap().cents(), 500);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
    }

    #[test]
    fn test_parse_overflow_is_an_error() {
        assert!(Money::parse("922337203685477581").is_err());
        assert!(Money::parse("92233720368547758.08").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
        assert_eq!(
            Money::parse("92233720368547758.07").unwrap().cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_comparison() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert!(a > b);
        assert!(b < a);
        assert_eq!(a, Money::from_cents(1000));
    }

    #[test]
    fn test_sum() {
        let amounts = vec![
            Money::from_cents(100),
            Money::from_cents(200),
            Money::from_cents(300),
        ];
        let by_ref: Money = amounts.iter().sum();
        let total: Money = amounts.into_iter().sum();
        assert_eq!(total.cents(), 600);
        assert_eq!(by_ref, total);
    }

    #[test]
    fn test_serialization() {
        let m = Money::from_cents(1050);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "1050");

        let deserialized: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(m, deserialized);
    }
}
