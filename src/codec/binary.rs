//! Base64-encoded byte payloads.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{CodecError, CodecResult};

/// Opaque bytes carried in a wire message, serialized as standard padded
/// base64.
///
/// Contract-call payloads are JSON documents wrapped in a `Binary`.
/// Decoding is strict, so any accepted string re-encodes to the exact same
/// text.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Wrap raw bytes
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Serialize a value to JSON and wrap the bytes
    ///
    /// # Errors
    /// Returns error if the value cannot be serialized
    pub fn from_json<T: Serialize + ?Sized>(value: &T) -> CodecResult<Self> {
        serde_json::to_vec(value)
            .map(Self)
            .map_err(|e| CodecError::Json(e.to_string()))
    }

    /// Decode from base64 text
    ///
    /// # Errors
    /// Returns error if the text is not canonical base64
    pub fn from_base64(encoded: &str) -> CodecResult<Self> {
        STANDARD
            .decode(encoded)
            .map(Self)
            .map_err(|e| CodecError::Base64(e.to_string()))
    }

    /// Encode as base64 text
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Parse the bytes as a JSON document of type `T`
    ///
    /// # Errors
    /// Returns error if the bytes are not valid JSON for `T`
    pub fn parse_json<T: DeserializeOwned>(&self) -> CodecResult<T> {
        serde_json::from_slice(&self.0).map_err(|e| CodecError::Json(e.to_string()))
    }

    /// View the bytes as UTF-8 text
    ///
    /// # Errors
    /// Returns error if the bytes are not UTF-8
    pub fn as_utf8(&self) -> CodecResult<&str> {
        std::str::from_utf8(&self.0).map_err(|_| CodecError::NotUtf8)
    }

    /// Raw bytes
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Consume into raw bytes
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }

    /// Check for an empty payload
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for Binary {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl fmt::Debug for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binary({})", self.to_base64())
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl Serialize for Binary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Binary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_base64(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_payload_roundtrip() {
        let payload = json!({"transfer": {"recipient": "juno1abc", "amount": "10"}});
        let binary = Binary::from_json(&payload).unwrap();
        let parsed: serde_json::Value = binary.parse_json().unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_serde_as_base64() {
        let binary = Binary::from("{}");
        assert_eq!(serde_json::to_string(&binary).unwrap(), "\"e30=\"");

        let parsed: Binary = serde_json::from_str("\"e30=\"").unwrap();
        assert_eq!(parsed.as_utf8().unwrap(), "{}");
    }

    #[test]
    fn test_rejects_non_canonical_base64() {
        assert!(Binary::from_base64("e30").is_err());
        assert!(Binary::from_base64("not base64!").is_err());
    }

    #[test]
    fn test_non_utf8() {
        let binary = Binary::new(vec![0xff, 0xfe]);
        assert_eq!(binary.as_utf8(), Err(CodecError::NotUtf8));
    }
}
