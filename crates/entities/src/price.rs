//! Fixed-point price type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of fraction digits stored for a price.
pub const PRICE_DECIMAL_PLACES: usize = 2;

/// Maximum number of digits (integer and fraction) a price may have.
pub const PRICE_MAX_DIGITS: usize = 5;

/// Errors produced when parsing a [`Price`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("A valid number is required.")]
    Invalid,

    /// More fraction digits than can be stored.
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimalPlaces,

    /// More digits in total than can be stored.
    #[error("Ensure that there are no more than 5 digits in total.")]
    TooManyDigits,
}

/// A decimal amount with two implied fraction digits, held as cents.
///
/// Serialized as a string such as `"5.50"`; deserialized from either a
/// string or a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    /// Creates a price from a number of cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    pub const fn cents(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(PriceError::Invalid);
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PriceError::Invalid);
        }

        // Trailing zeros in the fraction and leading zeros in the integer part
        // do not count towards the digit limits.
        let frac_part = frac_part.trim_end_matches('0');
        let int_part = int_part.trim_start_matches('0');
        if frac_part.len() > PRICE_DECIMAL_PLACES {
            return Err(PriceError::TooManyDecimalPlaces);
        }
        if int_part.len() + PRICE_DECIMAL_PLACES > PRICE_MAX_DIGITS {
            return Err(PriceError::TooManyDigits);
        }

        let whole: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| PriceError::Invalid)?
        };
        let mut frac: i64 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| PriceError::Invalid)?
        };
        if frac_part.len() == 1 {
            frac *= 10;
        }

        let cents = whole * 100 + frac;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = match PriceRepr::deserialize(deserializer)? {
            PriceRepr::Text(text) => text,
            PriceRepr::Number(number) => number.to_string(),
        };
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("5.5".parse::<Price>().unwrap().to_string(), "5.50");
        assert_eq!("5.50".parse::<Price>().unwrap().cents(), 550);
        assert_eq!("50".parse::<Price>().unwrap().to_string(), "50.00");
        assert_eq!(".25".parse::<Price>().unwrap().cents(), 25);
        assert_eq!("-1.05".parse::<Price>().unwrap().to_string(), "-1.05");
        assert_eq!("999.99".parse::<Price>().unwrap().cents(), 99_999);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("".parse::<Price>(), Err(PriceError::Invalid));
        assert_eq!("abc".parse::<Price>(), Err(PriceError::Invalid));
        assert_eq!("1.2.3".parse::<Price>(), Err(PriceError::Invalid));
        assert_eq!("1.234".parse::<Price>(), Err(PriceError::TooManyDecimalPlaces));
        assert_eq!("1000".parse::<Price>(), Err(PriceError::TooManyDigits));
    }

    #[test]
    fn test_trailing_zeros_are_not_significant() {
        assert_eq!("2.500".parse::<Price>().unwrap().cents(), 250);
        assert_eq!("0005.9".parse::<Price>().unwrap().cents(), 590);
    }

    #[test]
    fn test_serde_accepts_string_and_number() {
        let from_str: Price = serde_json::from_str("\"4.9\"").unwrap();
        let from_num: Price = serde_json::from_str("4.9").unwrap();
        let from_int: Price = serde_json::from_str("50").unwrap();

        assert_eq!(from_str, Price::from_cents(490));
        assert_eq!(from_num, Price::from_cents(490));
        assert_eq!(from_int, Price::from_cents(5000));
        assert_eq!(serde_json::to_string(&from_num).unwrap(), "\"4.90\"");
    }
}
