//! Dynamic-array decoding for `eth_call` return data.
//!
//! A function returning a single `T[]` encodes as:
//!
//! ```text
//! word 0                 offset of the array (bytes from start of data)
//! word at offset         element count
//! following words        one 32-byte word per element
//! ```
//!
//! Every offset and length is bounds-checked before any slice is taken, so
//! malformed data fails with [`DecodeError`] instead of yielding a short or
//! garbage sequence.

use crate::errors::DecodeError;
use crate::model::{FacetAddress, HexBlob, SelectorId};

/// ABI word size in bytes
pub const WORD: usize = 32;

/// Textual length of the smallest blob holding a head word (`0x` + 64 digits)
pub const MIN_HEX_LEN: usize = 2 + WORD * 2;

/// Where a value narrower than a word sits inside its word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Trailing bytes (addresses, integers)
    Right,
    /// Leading bytes (`bytesN`)
    Left,
}

/// Decode a single dynamic array of `width`-byte elements
///
/// Each element is the last `width` bytes of its word, rendered as `0x` plus
/// `2 * width` lowercase hex digits. Data shorter than one word (including
/// `0x`) decodes to an empty sequence.
///
/// # Errors
///
/// - `InvalidWidth` if `width` is 0 or above 32
/// - `WordOverflow` if the offset or length does not fit in `usize`
/// - `Truncated` if the offset or length points past the end of `data`
pub fn decode_tail_array(data: &HexBlob, width: usize) -> Result<Vec<String>, DecodeError> {
    decode_tail_array_aligned(data, width, Alignment::Right)
}

/// [`decode_tail_array`] with an explicit element alignment
///
/// # Errors
///
/// Same as [`decode_tail_array`].
pub fn decode_tail_array_aligned(
    data: &HexBlob,
    width: usize,
    alignment: Alignment,
) -> Result<Vec<String>, DecodeError> {
    Ok(tail_elements(data.as_bytes(), width, alignment)?
        .into_iter()
        .map(|element| format!("0x{}", hex::encode(element)))
        .collect())
}

/// Decode an `address[]` return value (`facetAddresses()`)
///
/// # Errors
///
/// Same as [`decode_tail_array`].
pub fn decode_address_array(data: &HexBlob) -> Result<Vec<FacetAddress>, DecodeError> {
    Ok(tail_elements(data.as_bytes(), 20, Alignment::Right)?
        .into_iter()
        .map(|element| {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(element);
            FacetAddress::from_bytes(bytes)
        })
        .collect())
}

/// Decode a `bytes4[]` return value (`facetFunctionSelectors(address)`)
///
/// Solidity left-aligns `bytesN` inside its word, so the selector is the
/// leading four bytes.
///
/// # Errors
///
/// Same as [`decode_tail_array`].
pub fn decode_selector_array(data: &HexBlob) -> Result<Vec<SelectorId>, DecodeError> {
    Ok(tail_elements(data.as_bytes(), 4, Alignment::Left)?
        .into_iter()
        .map(|element| {
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(element);
            SelectorId::from_bytes(bytes)
        })
        .collect())
}

/// Element slices of the array whose offset is stored in the head word
pub(crate) fn tail_elements(
    bytes: &[u8],
    width: usize,
    alignment: Alignment,
) -> Result<Vec<&[u8]>, DecodeError> {
    check_width(width)?;
    if bytes.len() < WORD {
        return Ok(Vec::new());
    }

    let offset = read_usize(bytes, 0, "offset")?;
    read_array_at(bytes, offset, width, alignment)
}

/// Element slices of the array whose length word starts at `position`
pub(crate) fn read_array_at(
    bytes: &[u8],
    position: usize,
    width: usize,
    alignment: Alignment,
) -> Result<Vec<&[u8]>, DecodeError> {
    check_width(width)?;

    let length = read_usize(bytes, position, "length")?;
    let body_start = position + WORD;
    let body_end = length
        .checked_mul(WORD)
        .and_then(|n| n.checked_add(body_start))
        .ok_or(DecodeError::WordOverflow {
            field: "length",
            position,
        })?;

    if body_end > bytes.len() {
        return Err(DecodeError::Truncated {
            field: "elements",
            needed: body_end,
            available: bytes.len(),
        });
    }

    Ok(bytes[body_start..body_end]
        .chunks_exact(WORD)
        .map(|word| match alignment {
            Alignment::Right => &word[WORD - width..],
            Alignment::Left => &word[..width],
        })
        .collect())
}

/// Read the word at `position` as an unsigned integer that must fit `usize`
pub(crate) fn read_usize(
    bytes: &[u8],
    position: usize,
    field: &'static str,
) -> Result<usize, DecodeError> {
    let word = read_word(bytes, position, field)?;
    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return Err(DecodeError::WordOverflow { field, position });
    }

    let mut buf = [0u8; 8];
    buf.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(buf))
        .map_err(|_| DecodeError::WordOverflow { field, position })
}

/// Borrow the full word at `position`
pub(crate) fn read_word<'a>(
    bytes: &'a [u8],
    position: usize,
    field: &'static str,
) -> Result<&'a [u8], DecodeError> {
    let end = position
        .checked_add(WORD)
        .ok_or(DecodeError::WordOverflow { field, position })?;
    if end > bytes.len() {
        return Err(DecodeError::Truncated {
            field,
            needed: end,
            available: bytes.len(),
        });
    }
    Ok(&bytes[position..end])
}

fn check_width(width: usize) -> Result<(), DecodeError> {
    if width == 0 || width > WORD {
        return Err(DecodeError::InvalidWidth { width });
    }
    Ok(())
}
