//! Encoding for the shapes the decoder reads, plus call data.

use crate::abi::decoder::{Alignment, WORD};
use crate::errors::DecodeError;
use crate::model::{FacetAddress, HexBlob, SelectorId};

/// Encode `value` as a big-endian ABI word
pub fn usize_word(value: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Pad `element` into a word at the given alignment
///
/// # Errors
///
/// Returns `InvalidWidth` when `element` is empty or wider than a word.
pub fn pad_word(element: &[u8], alignment: Alignment) -> Result<[u8; 32], DecodeError> {
    if element.is_empty() || element.len() > WORD {
        return Err(DecodeError::InvalidWidth {
            width: element.len(),
        });
    }
    let mut word = [0u8; 32];
    match alignment {
        Alignment::Right => word[WORD - element.len()..].copy_from_slice(element),
        Alignment::Left => word[..element.len()].copy_from_slice(element),
    }
    Ok(word)
}

/// Encode a single dynamic array return value with the canonical `0x20` head
///
/// # Errors
///
/// Returns `InvalidWidth` if any element is empty or wider than a word.
pub fn encode_tail_array<E: AsRef<[u8]>>(
    elements: &[E],
    alignment: Alignment,
) -> Result<HexBlob, DecodeError> {
    let mut out = Vec::with_capacity(WORD * (2 + elements.len()));
    out.extend_from_slice(&usize_word(WORD));
    out.extend_from_slice(&usize_word(elements.len()));
    for element in elements {
        out.extend_from_slice(&pad_word(element.as_ref(), alignment)?);
    }
    Ok(HexBlob::from_bytes(out))
}

/// Encode an `address[]` return value
pub fn encode_address_array(addresses: &[FacetAddress]) -> HexBlob {
    let mut out = Vec::with_capacity(WORD * (2 + addresses.len()));
    out.extend_from_slice(&usize_word(WORD));
    out.extend_from_slice(&usize_word(addresses.len()));
    for address in addresses {
        out.extend_from_slice(&address.to_word());
    }
    HexBlob::from_bytes(out)
}

/// Encode a `bytes4[]` return value (left-aligned elements)
pub fn encode_selector_array(selectors: &[SelectorId]) -> HexBlob {
    let mut out = Vec::with_capacity(WORD * (2 + selectors.len()));
    out.extend_from_slice(&usize_word(WORD));
    out.extend_from_slice(&usize_word(selectors.len()));
    for selector in selectors {
        let mut word = [0u8; 32];
        word[..4].copy_from_slice(selector.as_bytes());
        out.extend_from_slice(&word);
    }
    HexBlob::from_bytes(out)
}

/// Call data: a selector followed by static argument words
pub fn encode_call(selector: SelectorId, args: &[[u8; 32]]) -> HexBlob {
    let mut out = Vec::with_capacity(4 + WORD * args.len());
    out.extend_from_slice(selector.as_bytes());
    for arg in args {
        out.extend_from_slice(arg);
    }
    HexBlob::from_bytes(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_data_for_facet_function_selectors() {
        let selector: SelectorId = "0xadfca15e".parse().unwrap();
        let facet: FacetAddress = "0x00000000000000000000000000000000000000ff".parse().unwrap();
        let data = encode_call(selector, &[facet.to_word()]);
        assert_eq!(
            data.to_string(),
            format!("0xadfca15e{}ff", "0".repeat(62))
        );
    }

    #[test]
    fn test_empty_array_is_two_words() {
        let blob = encode_address_array(&[]);
        assert_eq!(blob.len(), 64);
        assert_eq!(blob.as_bytes()[31], 0x20);
    }

    #[test]
    fn test_pad_word_rejects_oversized_elements() {
        assert!(pad_word(&[0u8; 33], Alignment::Right).is_err());
        assert!(pad_word(&[], Alignment::Left).is_err());
    }
}
