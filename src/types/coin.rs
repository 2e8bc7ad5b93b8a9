//! Integer token quantities as they appear on the wire.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 128-bit unsigned integer serialized as a decimal string.
///
/// JSON numbers lose precision above 2^53, so chain messages carry
/// amounts as strings.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Uint128(u128);

impl Uint128 {
    /// Zero
    pub const ZERO: Self = Self(0);

    /// Wrap a raw value
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Raw value
    #[must_use]
    pub const fn u128(self) -> u128 {
        self.0
    }

    /// Check for zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl From<u64> for Uint128 {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl FromStr for Uint128 {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

impl fmt::Debug for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint128({})", self.0)
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Uint128 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Uint128 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let value: Self = text
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid Uint128 {text:?}: {e}")))?;
        // Only the canonical form is accepted, so re-serializing is lossless.
        if value.to_string() != text {
            return Err(serde::de::Error::custom(format!(
                "non-canonical Uint128 {text:?}"
            )));
        }
        Ok(value)
    }
}

/// An amount of one denomination
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coin {
    /// Denomination (e.g. `ujuno`, or an IBC/factory denom)
    pub denom: String,
    /// Amount in micro-units
    pub amount: Uint128,
}

impl Coin {
    /// Create a coin
    #[must_use]
    pub fn new(amount: impl Into<Uint128>, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint128_serializes_as_string() {
        let value = Uint128::new(u128::MAX);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, format!("\"{}\"", u128::MAX));

        let parsed: Uint128 = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_uint128_rejects_numbers() {
        assert!(serde_json::from_str::<Uint128>("5").is_err());
        assert!(serde_json::from_str::<Uint128>("\"-5\"").is_err());
    }

    #[test]
    fn test_uint128_rejects_non_canonical_text() {
        for text in ["\"007\"", "\"+5\"", "\"\"", "\" 5\""] {
            assert!(serde_json::from_str::<Uint128>(text).is_err(), "{text}");
        }
        assert_eq!(serde_json::from_str::<Uint128>("\"0\"").unwrap(), Uint128::ZERO);
    }

    #[test]
    fn test_coin_wire_shape() {
        let coin = Coin::new(1_500_000u128, "ujuno");
        let json = serde_json::to_value(&coin).unwrap();
        assert_eq!(json, serde_json::json!({"denom": "ujuno", "amount": "1500000"}));
        assert_eq!(coin.to_string(), "1500000ujuno");
    }
}
