//! The combined `facets()` return shape: `(address, bytes4[])[]`.
//!
//! ```text
//! word 0                      offset of the outer array
//! word at offset              tuple count n
//! n words                     tuple offsets, relative to the first of these words
//! each tuple                  address word, offset of its bytes4[] (relative to tuple start)
//! ```

use crate::abi::decoder::{read_array_at, read_usize, read_word, Alignment, WORD};
use crate::abi::encoder::usize_word;
use crate::errors::DecodeError;
use crate::model::{FacetAddress, HexBlob, SelectorId};

/// One entry of the `facets()` result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetEntry {
    pub facet_address: FacetAddress,
    pub selectors: Vec<SelectorId>,
}

/// Decode the return value of `facets()`
///
/// Data shorter than one word decodes to an empty list, matching
/// [`decode_tail_array`](crate::abi::decode_tail_array).
///
/// # Errors
///
/// Returns `Truncated` or `WordOverflow` when any outer, tuple or nested
/// selector-array offset points outside the data.
pub fn decode_facets(data: &HexBlob) -> Result<Vec<FacetEntry>, DecodeError> {
    let bytes = data.as_bytes();
    if bytes.len() < WORD {
        return Ok(Vec::new());
    }

    let offset = read_usize(bytes, 0, "offset")?;
    let count = read_usize(bytes, offset, "length")?;
    let heads_start = offset + WORD;

    let heads_end = count
        .checked_mul(WORD)
        .and_then(|n| n.checked_add(heads_start))
        .ok_or(DecodeError::WordOverflow {
            field: "length",
            position: offset,
        })?;
    if heads_end > bytes.len() {
        return Err(DecodeError::Truncated {
            field: "tuple offsets",
            needed: heads_end,
            available: bytes.len(),
        });
    }

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let head_position = heads_start + i * WORD;
        let tuple_offset = read_usize(bytes, head_position, "tuple offset")?;
        let tuple_start =
            heads_start
                .checked_add(tuple_offset)
                .ok_or(DecodeError::WordOverflow {
                    field: "tuple offset",
                    position: head_position,
                })?;

        let address_word = read_word(bytes, tuple_start, "tuple address")?;
        let mut address = [0u8; 20];
        address.copy_from_slice(&address_word[WORD - 20..]);

        let selectors_offset = read_usize(bytes, tuple_start + WORD, "selectors offset")?;
        let selectors_start =
            tuple_start
                .checked_add(selectors_offset)
                .ok_or(DecodeError::WordOverflow {
                    field: "selectors offset",
                    position: tuple_start + WORD,
                })?;

        let selectors = read_array_at(bytes, selectors_start, 4, Alignment::Left)?
            .into_iter()
            .map(|element| {
                let mut sel = [0u8; 4];
                sel.copy_from_slice(element);
                SelectorId::from_bytes(sel)
            })
            .collect();

        entries.push(FacetEntry {
            facet_address: FacetAddress::from_bytes(address),
            selectors,
        });
    }

    Ok(entries)
}

/// Encode a `facets()` return value
pub fn encode_facets(entries: &[FacetEntry]) -> HexBlob {
    let mut heads = Vec::with_capacity(entries.len() * WORD);
    let mut tails = Vec::new();
    let mut next_offset = entries.len() * WORD;

    for entry in entries {
        heads.extend_from_slice(&usize_word(next_offset));

        let mut tuple = Vec::with_capacity(WORD * (3 + entry.selectors.len()));
        tuple.extend_from_slice(&entry.facet_address.to_word());
        tuple.extend_from_slice(&usize_word(2 * WORD));
        tuple.extend_from_slice(&usize_word(entry.selectors.len()));
        for selector in &entry.selectors {
            let mut word = [0u8; 32];
            word[..4].copy_from_slice(selector.as_bytes());
            tuple.extend_from_slice(&word);
        }

        next_offset += tuple.len();
        tails.extend(tuple);
    }

    let mut out = Vec::with_capacity(2 * WORD + heads.len() + tails.len());
    out.extend_from_slice(&usize_word(WORD));
    out.extend_from_slice(&usize_word(entries.len()));
    out.extend(heads);
    out.extend(tails);
    HexBlob::from_bytes(out)
}
