//! Fixed-width identifiers: contract addresses and function selectors.
//!
//! Both render as `0x` followed by lowercase hex of exactly twice their byte
//! width, and both serialize as that string. Parsing is case-insensitive, so
//! EIP-55 checksummed addresses are accepted (the checksum is not verified).

use crate::errors::LoupeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// EIP-155 chain identifier (42161 for Arbitrum One)
pub type ChainId = u64;

/// A 20-byte contract address
///
/// Used both for facets and for the Diamond itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FacetAddress([u8; 20]);

impl FacetAddress {
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Build from a slice of exactly 20 bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the slice length is not 20.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoupeError> {
        <[u8; 20]>::try_from(bytes)
            .map(Self)
            .map_err(|_| LoupeError::InvalidInput {
                reason: format!("address must be 20 bytes, got {}", bytes.len()),
            })
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// The address as a single ABI word, left-padded with zeros
    pub fn to_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        word
    }
}

impl fmt::Display for FacetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for FacetAddress {
    type Err = LoupeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<20>(s, "address").map(Self)
    }
}

/// A 4-byte function selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorId([u8; 4]);

impl SelectorId {
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// # Errors
    ///
    /// Returns `InvalidInput` when the slice length is not 4.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, LoupeError> {
        <[u8; 4]>::try_from(bytes)
            .map(Self)
            .map_err(|_| LoupeError::InvalidInput {
                reason: format!("selector must be 4 bytes, got {}", bytes.len()),
            })
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for SelectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for SelectorId {
    type Err = LoupeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<4>(s, "selector").map(Self)
    }
}

fn parse_fixed<const N: usize>(text: &str, what: &str) -> Result<[u8; N], LoupeError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| LoupeError::InvalidInput {
            reason: format!("{} {:?} is missing the 0x prefix", what, text),
        })?;

    if digits.len() != N * 2 {
        return Err(LoupeError::InvalidInput {
            reason: format!(
                "{} {:?} must have {} hex digits, got {}",
                what,
                text,
                N * 2,
                digits.len()
            ),
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| LoupeError::InvalidInput {
        reason: format!("{} {:?} is not valid hex: {}", what, text, e),
    })?;
    Ok(out)
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                text.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(FacetAddress);
string_serde!(SelectorId);
