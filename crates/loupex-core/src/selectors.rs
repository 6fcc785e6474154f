//! Diamond Standard (EIP-2535) function selectors.
//!
//! The loupe selectors are wire constants and must stay bit-exact. The
//! registry below maps the standard Diamond and ownership selectors to
//! their signatures for reporting; it is not an ABI.

use crate::model::{HexBlob, SelectorId};
use tiny_keccak::{Hasher, Keccak};

/// `facetAddresses()`
pub const FACET_ADDRESSES: SelectorId = SelectorId::from_bytes([0x52, 0xef, 0x6b, 0x2c]);

/// `facetFunctionSelectors(address)`
pub const FACET_FUNCTION_SELECTORS: SelectorId = SelectorId::from_bytes([0xad, 0xfc, 0xa1, 0x5e]);

/// `facets()`
pub const FACETS: SelectorId = SelectorId::from_bytes([0x7a, 0x0e, 0xd6, 0x27]);

/// `facetAddress(bytes4)`
pub const FACET_ADDRESS: SelectorId = SelectorId::from_bytes([0xcd, 0xff, 0xac, 0xc6]);

/// `diamondCut((address,uint8,bytes4[])[],address,bytes)`; classified, never called
pub const DIAMOND_CUT: SelectorId = SelectorId::from_bytes([0x1f, 0x93, 0x1c, 0x1c]);

/// `supportsInterface(bytes4)` (ERC-165)
pub const SUPPORTS_INTERFACE: SelectorId = SelectorId::from_bytes([0x01, 0xff, 0xc9, 0xa7]);

/// `owner()` (ERC-173)
pub const OWNER: SelectorId = SelectorId::from_bytes([0x8d, 0xa5, 0xcb, 0x5b]);

/// `transferOwnership(address)` (ERC-173)
pub const TRANSFER_OWNERSHIP: SelectorId = SelectorId::from_bytes([0xf2, 0xfd, 0xe3, 0x8b]);

const KNOWN_SELECTORS: &[(SelectorId, &str)] = &[
    (FACETS, "facets()"),
    (FACET_ADDRESSES, "facetAddresses()"),
    (FACET_FUNCTION_SELECTORS, "facetFunctionSelectors(address)"),
    (FACET_ADDRESS, "facetAddress(bytes4)"),
    (
        DIAMOND_CUT,
        "diamondCut((address,uint8,bytes4[])[],address,bytes)",
    ),
    (SUPPORTS_INTERFACE, "supportsInterface(bytes4)"),
    (OWNER, "owner()"),
    (TRANSFER_OWNERSHIP, "transferOwnership(address)"),
];

/// Compute the selector of a canonical function signature
///
/// The selector is the first four bytes of the Keccak-256 hash of the
/// signature text, e.g. `"facetAddresses()"`.
pub fn selector_of(signature: &str) -> SelectorId {
    let mut hasher = Keccak::v256();
    hasher.update(signature.as_bytes());
    let mut digest = [0u8; 32];
    hasher.finalize(&mut digest);
    SelectorId::from_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Signature of a standard Diamond or ownership selector, if known
pub fn describe(selector: &SelectorId) -> Option<&'static str> {
    KNOWN_SELECTORS
        .iter()
        .find(|(known, _)| known == selector)
        .map(|(_, signature)| *signature)
}

/// All registered selectors with their signatures
pub fn known_selectors() -> impl Iterator<Item = (SelectorId, &'static str)> {
    KNOWN_SELECTORS.iter().copied()
}

/// Coarse classification of a call against a Diamond, for alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallClass {
    /// Routing-table mutation
    DiamondCut,
    /// One of the read-only loupe functions
    LoupeRead,
    Other,
}

/// Classify call data by its leading selector
pub fn classify_call_data(data: &HexBlob) -> CallClass {
    match data.as_bytes().get(..4) {
        Some(prefix) => classify_selector(prefix),
        None => CallClass::Other,
    }
}

/// Classify a block-explorer method field
///
/// Explorers report either the raw selector (`0x1f931c1c`) or a decoded
/// method name (`diamondCut`); both forms are recognized.
pub fn classify_method(method: &str) -> CallClass {
    let method = method.trim();
    let lowered = method.to_ascii_lowercase();

    if let Ok(selector) = method.get(..10).unwrap_or(method).parse::<SelectorId>() {
        return classify_selector(selector.as_bytes());
    }

    if lowered.contains("diamondcut") {
        CallClass::DiamondCut
    } else if ["facets", "facetaddresses", "facetfunctionselectors", "facetaddress"]
        .iter()
        .any(|name| lowered.split('(').next() == Some(*name))
    {
        CallClass::LoupeRead
    } else {
        CallClass::Other
    }
}

fn classify_selector(prefix: &[u8]) -> CallClass {
    if prefix == DIAMOND_CUT.as_bytes() {
        CallClass::DiamondCut
    } else if [FACETS, FACET_ADDRESSES, FACET_FUNCTION_SELECTORS, FACET_ADDRESS]
        .iter()
        .any(|s| prefix == s.as_bytes())
    {
        CallClass::LoupeRead
    } else {
        CallClass::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_selectors_match_their_signatures() {
        for (selector, signature) in known_selectors() {
            assert_eq!(selector_of(signature), selector, "{}", signature);
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(describe(&FACET_ADDRESSES), Some("facetAddresses()"));
        assert_eq!(describe(&SelectorId::from_bytes([0; 4])), None);
    }

    #[test]
    fn test_classify_call_data() {
        let cut = HexBlob::parse("0x1f931c1c0000").unwrap();
        assert_eq!(classify_call_data(&cut), CallClass::DiamondCut);

        let loupe = HexBlob::parse("0x52ef6b2c").unwrap();
        assert_eq!(classify_call_data(&loupe), CallClass::LoupeRead);

        assert_eq!(classify_call_data(&HexBlob::empty()), CallClass::Other);
    }

    #[test]
    fn test_classify_method_accepts_names_and_selectors() {
        assert_eq!(classify_method("diamondCut"), CallClass::DiamondCut);
        assert_eq!(classify_method("0x1f931c1c"), CallClass::DiamondCut);
        assert_eq!(
            classify_method("0x1F931C1C000000000000"),
            CallClass::DiamondCut
        );
        assert_eq!(classify_method("facetAddresses"), CallClass::LoupeRead);
        assert_eq!(classify_method("transfer"), CallClass::Other);
    }
}
