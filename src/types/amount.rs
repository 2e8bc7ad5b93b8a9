//! Human-readable token amounts.
//!
//! Forms hold amounts the way a person types them ("1.5"), while the chain
//! only knows integer micro-units ("1500000" for a 6-decimal token). An
//! [`Amount`] keeps the exact decimal text so nothing is lost to floating
//! point, and converts to micro-units by truncating digits beyond the
//! token's precision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::coin::Uint128;

/// Largest decimal count whose scale factor fits in a `u128`
pub const MAX_DECIMALS: u32 = 38;

/// A non-negative decimal amount in whole-token units.
///
/// Always stored normalized: no leading zeros in the integer part, no
/// trailing zeros in the fraction, no dangling decimal point.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Amount(String);

impl Amount {
    /// Parse from decimal text such as `"12"`, `"0.05"` or `".5"`
    ///
    /// # Errors
    /// Returns error if the text is negative or not a plain decimal
    pub fn parse(text: &str) -> Result<Self, AmountError> {
        let text = text.trim();
        if text.starts_with('-') {
            return Err(AmountError::Negative(text.to_string()));
        }
        let text = text.strip_prefix('+').unwrap_or(text);

        let (int_part, frac_part) = match text.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (text, ""),
        };

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty())
            || !all_digits(int_part)
            || !all_digits(frac_part)
        {
            return Err(AmountError::InvalidFormat(text.to_string()));
        }

        Ok(Self::from_parts(int_part, frac_part))
    }

    /// Zero tokens
    #[must_use]
    pub fn zero() -> Self {
        Self("0".to_string())
    }

    /// A whole number of tokens
    #[must_use]
    pub fn from_whole(value: u128) -> Self {
        Self(value.to_string())
    }

    /// Convert a micro-denominated integer into whole-token units
    ///
    /// # Errors
    /// Returns error if `decimals` exceeds [`MAX_DECIMALS`]
    pub fn from_micro(micro: Uint128, decimals: u32) -> Result<Self, AmountError> {
        if decimals > MAX_DECIMALS {
            return Err(AmountError::TooManyDecimals(decimals));
        }
        let digits = micro.u128().to_string();
        let decimals = decimals as usize;
        if decimals == 0 {
            return Ok(Self(digits));
        }

        let padded = format!("{digits:0>width$}", width = decimals + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
        Ok(Self::from_parts(int_part, frac_part))
    }

    /// Convert to micro-units for a token with `decimals` places.
    ///
    /// Digits past the token's precision are truncated, never rounded.
    ///
    /// # Errors
    /// Returns error if the result does not fit in a `u128`
    pub fn to_micro(&self, decimals: u32) -> Result<Uint128, AmountError> {
        if decimals > MAX_DECIMALS {
            return Err(AmountError::TooManyDecimals(decimals));
        }
        let (int_part, frac_part) = self.0.split_once('.').unwrap_or((&self.0, ""));

        let frac: String = frac_part
            .chars()
            .chain(std::iter::repeat('0'))
            .take(decimals as usize)
            .collect();

        let overflow = || AmountError::Overflow {
            amount: self.0.clone(),
            decimals,
        };
        let scale = 10u128.checked_pow(decimals).ok_or_else(overflow)?;
        let int_value: u128 = int_part.parse().map_err(|_| overflow())?;
        let frac_value: u128 = if frac.is_empty() {
            0
        } else {
            frac.parse().map_err(|_| overflow())?
        };

        int_value
            .checked_mul(scale)
            .and_then(|v| v.checked_add(frac_value))
            .map(Uint128::new)
            .ok_or_else(overflow)
    }

    /// Check whether the amount is zero
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == "0"
    }

    /// Normalized decimal text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_parts(int_part: &str, frac_part: &str) -> Self {
        let int_part = int_part.trim_start_matches('0');
        let int_part = if int_part.is_empty() { "0" } else { int_part };
        let frac_part = frac_part.trim_end_matches('0');

        if frac_part.is_empty() {
            Self(int_part.to_string())
        } else {
            Self(format!("{int_part}.{frac_part}"))
        }
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::zero()
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Accepts either decimal text or a JSON number, since form layers
    /// commonly hand over numeric inputs as numbers. Numbers may print in
    /// exponent form (`1e-7`); text may not.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        let text = match Raw::deserialize(deserializer)? {
            Raw::Text(text) => text,
            Raw::Number(number) => {
                expand_exponent(&number.to_string()).map_err(serde::de::Error::custom)?
            }
        };
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Rewrite number text such as `1.5e-7` as plain decimal text
fn expand_exponent(text: &str) -> Result<String, AmountError> {
    let Some((mantissa, exponent)) = text.split_once(['e', 'E']) else {
        return Ok(text.to_string());
    };
    let invalid = || AmountError::InvalidFormat(text.to_string());
    let exponent: i64 = exponent.parse().map_err(|_| invalid())?;
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits = format!("{int_part}{frac_part}");

    // Position of the decimal point within `digits` after shifting.
    let point = i64::try_from(int_part.len()).map_err(|_| invalid())? + exponent;
    let width = |n: i64| usize::try_from(n).map_err(|_| invalid());
    let plain = if point <= 0 {
        format!("0.{}{digits}", "0".repeat(width(-point)?))
    } else if width(point)? >= digits.len() {
        format!("{digits}{}", "0".repeat(width(point)? - digits.len()))
    } else {
        let (int_part, frac_part) = digits.split_at(width(point)?);
        format!("{int_part}.{frac_part}")
    };
    Ok(format!("{sign}{plain}"))
}

/// Amount parsing and conversion errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    /// Negative amounts are never valid
    #[error("amount must not be negative: {0}")]
    Negative(String),
    /// Not a plain decimal number
    #[error("invalid decimal amount: {0:?}")]
    InvalidFormat(String),
    /// Result does not fit in 128 bits
    #[error("amount {amount} with {decimals} decimals overflows")]
    Overflow {
        /// Amount being converted
        amount: String,
        /// Token decimals
        decimals: u32,
    },
    /// Scale factor does not fit in 128 bits
    #[error("unsupported decimal count: {0}")]
    TooManyDecimals(u32),
}
