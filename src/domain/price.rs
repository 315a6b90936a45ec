//! Fixed-point price in mini-dollars.
//!
//! A mini-dollar is 10^-10 of the reference currency (USD). All
//! comparisons and ordering happen on the integer count so that two
//! reporters parsing the same payload always agree bit for bit.
//!
//! Source payloads are converted through an exact decimal parser
//! (`rust_decimal`), scaled by 10^10 and truncated. JSON numbers are
//! first rendered with exactly 10 fractional digits and then go through
//! the same string path, so `"0.012"` and `0.012` yield the same price.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Mini-dollars per unit of the reference currency.
pub const MINI_DOLLAR_SCALE: i64 = 10_000_000_000;

/// Fractional digits used when rendering a JSON number before parsing.
const NUMBER_FRACTION_DIGITS: usize = 10;

/// Integer price denominated in mini-dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

/// Why a raw value could not become a usable price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceParseError {
    /// The string is not a decimal number.
    #[error("invalid decimal {0:?}")]
    InvalidDecimal(String),
    /// Scaling pushed the value outside the i64 range.
    #[error("price {0} does not fit the fixed-point range")]
    Overflow(String),
    /// Zero or negative after truncation.
    #[error("non-positive price {0}")]
    NonPositive(Price),
    /// JSON value was neither a string nor a number.
    #[error("unsupported JSON value type: {0}")]
    UnsupportedValue(&'static str),
}

impl Price {
    /// Wrap a raw mini-dollar count.
    pub const fn from_mini_dollars(value: i64) -> Self {
        Self(value)
    }

    /// Raw mini-dollar count.
    pub const fn mini_dollars(self) -> i64 {
        self.0
    }

    /// Whether the price is strictly above zero.
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Price expressed in whole reference-currency units.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 10)
    }

    /// Parse a decimal string (e.g. `"0.012"`) into mini-dollars.
    ///
    /// Accepts `-?digits[.digits]` only.
    /// Truncates toward zero below 10^-10, never rounds. Does not check
    /// the sign; use [`Price::from_json`] for source payloads.
    pub fn from_decimal_str(raw: &str) -> Result<Self, PriceParseError> {
        let kept = truncate_fraction(raw)
            .ok_or_else(|| PriceParseError::InvalidDecimal(raw.to_string()))?;
        // Syntax is already checked; the only failure left is range.
        let dec = Decimal::from_str_exact(kept)
            .map_err(|_| PriceParseError::Overflow(raw.to_string()))?;

        let scaled = dec
            .checked_mul(Decimal::from(MINI_DOLLAR_SCALE))
            .ok_or_else(|| PriceParseError::Overflow(raw.to_string()))?
            .trunc();

        scaled
            .to_i64()
            .map(Self)
            .ok_or_else(|| PriceParseError::Overflow(raw.to_string()))
    }

    /// Parse a JSON number through the string path at fixed precision.
    pub fn from_f64(value: f64) -> Result<Self, PriceParseError> {
        if !value.is_finite() {
            return Err(PriceParseError::InvalidDecimal(value.to_string()));
        }
        Self::from_decimal_str(&format!("{:.*}", NUMBER_FRACTION_DIGITS, value))
    }

    /// Convert an extracted JSON value into a strictly positive price.
    pub fn from_json(value: &Value) -> Result<Self, PriceParseError> {
        let price = match value {
            Value::String(s) => Self::from_decimal_str(s)?,
            Value::Number(n) => {
                let f = n
                    .as_f64()
                    .ok_or_else(|| PriceParseError::InvalidDecimal(n.to_string()))?;
                Self::from_f64(f)?
            }
            Value::Null => return Err(PriceParseError::UnsupportedValue("null")),
            Value::Bool(_) => return Err(PriceParseError::UnsupportedValue("bool")),
            Value::Array(_) => return Err(PriceParseError::UnsupportedValue("array")),
            Value::Object(_) => return Err(PriceParseError::UnsupportedValue("object")),
        };

        if !price.is_positive() {
            return Err(PriceParseError::NonPositive(price));
        }
        Ok(price)
    }
}

/// Validate decimal syntax and drop fraction digits past 10^-10.
///
/// Returns `None` for anything but `-?digits[.digits]`.
fn truncate_fraction(raw: &str) -> Option<&str> {
    let unsigned = raw.strip_prefix('-').unwrap_or(raw);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int) || !frac.is_none_or(all_digits) {
        return None;
    }
    let frac_len = frac.map_or(0, str::len);
    if int.is_empty() {
        return None;
    }

    // Input is pure ASCII past this point, so byte offsets are char boundaries.
    let keep = frac_len.min(NUMBER_FRACTION_DIGITS);
    let end = raw.len() - (frac_len - keep);
    let kept = &raw[..end];
    Some(kept.strip_suffix('.').unwrap_or(kept))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_string_scaled_to_mini_dollars() {
        let price = Price::from_decimal_str("0.012").unwrap();
        assert_eq!(price.mini_dollars(), 120_000_000);
    }

    #[test]
    fn test_string_and_number_agree() {
        let from_str = Price::from_json(&json!("0.012")).unwrap();
        let from_num = Price::from_json(&json!(0.012)).unwrap();
        assert_eq!(from_str, from_num);
    }

    #[test]
    fn test_truncates_not_rounds() {
        // 11th fractional digit is dropped
        let price = Price::from_decimal_str("1.00000000019").unwrap();
        assert_eq!(price.mini_dollars(), 10_000_000_001);
    }

    #[test]
    fn test_integer_number() {
        let price = Price::from_json(&json!(3)).unwrap();
        assert_eq!(price.mini_dollars(), 3 * MINI_DOLLAR_SCALE);
    }

    #[test]
    fn test_negative_rejected() {
        let err = Price::from_json(&json!("-1")).unwrap_err();
        assert!(matches!(err, PriceParseError::NonPositive(_)));
    }

    #[test]
    fn test_zero_rejected() {
        assert!(matches!(
            Price::from_json(&json!(0)),
            Err(PriceParseError::NonPositive(_))
        ));
        // Below the fixed-point resolution truncates to zero.
        assert!(matches!(
            Price::from_json(&json!("0.00000000001")),
            Err(PriceParseError::NonPositive(_))
        ));
    }

    #[test]
    fn test_unsupported_types() {
        assert_eq!(
            Price::from_json(&json!(true)),
            Err(PriceParseError::UnsupportedValue("bool"))
        );
        assert_eq!(
            Price::from_json(&json!(null)),
            Err(PriceParseError::UnsupportedValue("null"))
        );
        assert_eq!(
            Price::from_json(&json!({"price": 1})),
            Err(PriceParseError::UnsupportedValue("object"))
        );
    }

    #[test]
    fn test_long_fraction_truncates() {
        let price = Price::from_json(&json!("1.999999999999999999999999999999")).unwrap();
        assert_eq!(price.mini_dollars(), 19_999_999_999);
    }

    #[test]
    fn test_long_fraction_below_resolution_rejected() {
        assert!(matches!(
            Price::from_json(&json!("0.000000000099999999999999999999")),
            Err(PriceParseError::NonPositive(_))
        ));
    }

    #[test]
    fn test_strict_decimal_syntax() {
        for raw in ["1_000.5", "+1", "1e5", ".", ".5", "-", "", "1.2.3", " 1", "0x10"] {
            assert!(
                matches!(Price::from_decimal_str(raw), Err(PriceParseError::InvalidDecimal(_))),
                "{raw:?} should be rejected"
            );
        }
        assert_eq!(Price::from_decimal_str("2.").unwrap().mini_dollars(), 2 * MINI_DOLLAR_SCALE);
    }

    #[test]
    fn test_huge_integer_overflows() {
        assert!(matches!(
            Price::from_decimal_str("123456789012345678901234567890"),
            Err(PriceParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_garbage_string() {
        assert!(matches!(
            Price::from_json(&json!("twelve")),
            Err(PriceParseError::InvalidDecimal(_))
        ));
    }

    #[test]
    fn test_overflow() {
        assert!(matches!(
            Price::from_decimal_str("99999999999999999999"),
            Err(PriceParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_to_decimal() {
        let price = Price::from_mini_dollars(120_000_000);
        assert_eq!(price.to_decimal(), dec!(0.0120000000));
    }
}
