use crate::errors::DecodeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Raw `eth_call` return data or call data
///
/// Always rendered as `0x` followed by lowercase hex. Parsing rejects text
/// without the prefix, odd-length payloads and non-hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HexBlob(Vec<u8>);

impl HexBlob {
    /// The empty blob, `0x`
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse `0x`-prefixed hex text
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidHex` if the prefix is missing or the
    /// payload is not even-length hexadecimal.
    pub fn parse(text: &str) -> Result<Self, DecodeError> {
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| DecodeError::InvalidHex {
                reason: format!("missing 0x prefix in {:?}", abbreviate(text)),
            })?;

        if digits.len() % 2 != 0 {
            return Err(DecodeError::InvalidHex {
                reason: format!("odd number of hex digits ({})", digits.len()),
            });
        }

        hex::decode(digits)
            .map(Self)
            .map_err(|e| DecodeError::InvalidHex {
                reason: e.to_string(),
            })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Byte length of the payload
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the textual form, prefix included
    pub fn hex_len(&self) -> usize {
        2 + self.0.len() * 2
    }
}

impl fmt::Display for HexBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl FromStr for HexBlob {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

fn abbreviate(text: &str) -> String {
    let mut short: String = text.chars().take(16).collect();
    if short.len() < text.len() {
        short.push_str("...");
    }
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_blob() {
        let blob = HexBlob::parse("0x").unwrap();
        assert!(blob.is_empty());
        assert_eq!(blob.to_string(), "0x");
        assert_eq!(blob.hex_len(), 2);
    }

    #[test]
    fn test_parse_normalizes_case() {
        let blob = HexBlob::parse("0X52EF6B2C").unwrap();
        assert_eq!(blob.as_bytes(), &[0x52, 0xef, 0x6b, 0x2c]);
        assert_eq!(blob.to_string(), "0x52ef6b2c");
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        let err = HexBlob::parse("52ef6b2c").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHex { .. }));
    }

    #[test]
    fn test_parse_rejects_odd_length() {
        let err = HexBlob::parse("0x123").unwrap_err();
        assert!(matches!(err, DecodeError::InvalidHex { .. }));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(HexBlob::parse("0xzz").is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let blob = HexBlob::from_bytes(vec![0xab, 0xcd]);
        let json = serde_json::to_string(&blob).unwrap();
        assert_eq!(json, "\"0xabcd\"");
        let back: HexBlob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, blob);
    }
}
