#![allow(clippy::unwrap_used, clippy::expect_used)]

use loupex_core::abi::{
    decode_address_array, decode_selector_array, decode_tail_array, encode_address_array,
    encode_selector_array, encode_tail_array, usize_word, Alignment,
};
use loupex_core::errors::DecodeError;
use loupex_core::{FacetAddress, HexBlob, SelectorId};
use proptest::prelude::*;

fn hex_of(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_address_array_round_trip(raw in prop::collection::vec(any::<[u8; 20]>(), 0..12)) {
        let addresses: Vec<FacetAddress> = raw.iter().copied().map(FacetAddress::from_bytes).collect();
        let blob = encode_address_array(&addresses);

        let decoded = decode_tail_array(&blob, 20).unwrap();
        let expected: Vec<String> = raw.iter().map(|a| hex_of(a)).collect();
        prop_assert_eq!(decoded, expected);
        prop_assert_eq!(decode_address_array(&blob).unwrap(), addresses);
    }

    #[test]
    fn prop_right_aligned_width_4_round_trip(raw in prop::collection::vec(any::<[u8; 4]>(), 0..12)) {
        let blob = encode_tail_array(&raw, Alignment::Right).unwrap();
        let decoded = decode_tail_array(&blob, 4).unwrap();
        let expected: Vec<String> = raw.iter().map(|s| hex_of(s)).collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn prop_selector_array_round_trip(raw in prop::collection::vec(any::<[u8; 4]>(), 0..12)) {
        let selectors: Vec<SelectorId> = raw.iter().copied().map(SelectorId::from_bytes).collect();
        let blob = encode_selector_array(&selectors);
        prop_assert_eq!(decode_selector_array(&blob).unwrap(), selectors);
    }

    #[test]
    fn prop_decoder_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..200), width in 1usize..=32) {
        let _ = decode_tail_array(&HexBlob::from_bytes(bytes), width);
    }
}

#[test]
fn test_lengths_zero_one_many_at_both_widths() {
    for n in [0usize, 1, 7] {
        let addresses: Vec<FacetAddress> =
            (0..n).map(|i| FacetAddress::from_bytes([i as u8 + 1; 20])).collect();
        let decoded = decode_tail_array(&encode_address_array(&addresses), 20).unwrap();
        assert_eq!(decoded.len(), n);
        assert!(decoded.iter().all(|s| s.len() == 42 && s.starts_with("0x")));

        let selectors: Vec<[u8; 4]> = (0..n).map(|i| [i as u8 + 1; 4]).collect();
        let blob = encode_tail_array(&selectors, Alignment::Right).unwrap();
        let decoded = decode_tail_array(&blob, 4).unwrap();
        assert_eq!(decoded.len(), n);
        assert!(decoded.iter().all(|s| s.len() == 10));
    }
}

#[test]
fn test_selector_decoder_reads_leading_bytes() {
    let raw = [[0xad, 0xfc, 0xa1, 0x5e]];

    // Solidity layout: bytes4 sits at the start of its word
    let left = encode_tail_array(&raw, Alignment::Left).unwrap();
    assert_eq!(
        decode_selector_array(&left).unwrap(),
        vec![SelectorId::from_bytes([0xad, 0xfc, 0xa1, 0x5e])]
    );
    assert_eq!(left, encode_selector_array(&[SelectorId::from_bytes(raw[0])]));

    // right-aligned words only round-trip through the generic decoder
    let right = encode_tail_array(&raw, Alignment::Right).unwrap();
    assert_eq!(decode_tail_array(&right, 4).unwrap(), vec!["0xadfca15e"]);
    assert_eq!(
        decode_selector_array(&right).unwrap(),
        vec![SelectorId::from_bytes([0; 4])]
    );
}

// ---------------------------------------------------------------------------
// Short and malformed input
// ---------------------------------------------------------------------------

#[test]
fn test_bare_prefix_decodes_to_empty() {
    let blob = HexBlob::parse("0x").unwrap();
    assert!(decode_tail_array(&blob, 20).unwrap().is_empty());
    assert!(decode_tail_array(&blob, 4).unwrap().is_empty());
}

#[test]
fn test_input_shorter_than_one_word_decodes_to_empty() {
    let blob = HexBlob::parse(&format!("0x{}", "00".repeat(31))).unwrap();
    assert!(blob.hex_len() < 66);
    assert!(decode_address_array(&blob).unwrap().is_empty());
}

#[test]
fn test_over_long_length_is_decode_error() {
    // claims 5 elements, carries 2
    let mut data = Vec::new();
    data.extend_from_slice(&usize_word(32));
    data.extend_from_slice(&usize_word(5));
    data.extend_from_slice(&[0u8; 64]);

    let err = decode_tail_array(&HexBlob::from_bytes(data), 20).unwrap_err();
    assert_eq!(
        err,
        DecodeError::Truncated {
            field: "elements",
            needed: 64 + 5 * 32,
            available: 128,
        }
    );
}

#[test]
fn test_head_only_is_truncated() {
    let blob = HexBlob::from_bytes(usize_word(32).to_vec());
    let err = decode_tail_array(&blob, 4).unwrap_err();
    assert!(matches!(err, DecodeError::Truncated { field: "length", .. }));
}

#[test]
fn test_length_beyond_machine_word_is_decode_error() {
    let mut data = Vec::new();
    data.extend_from_slice(&usize_word(32));
    let mut huge = [0u8; 32];
    huge[0] = 1;
    data.extend_from_slice(&huge);

    let err = decode_tail_array(&HexBlob::from_bytes(data), 20).unwrap_err();
    assert!(matches!(err, DecodeError::WordOverflow { field: "length", .. }));
}

#[test]
fn test_odd_length_hex_is_rejected() {
    assert!(matches!(
        HexBlob::parse("0x123"),
        Err(DecodeError::InvalidHex { .. })
    ));
    assert!(HexBlob::parse("1234").is_err());
}

#[test]
fn test_uppercase_input_is_stored_lowercase() {
    let blob = HexBlob::parse("0xABCDEF").unwrap();
    assert_eq!(blob.to_string(), "0xabcdef");
}
