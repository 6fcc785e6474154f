//! Minimal ABI codec for Diamond Loupe return values.
//!
//! Only the shapes the loupe functions return are supported: a single
//! dynamic array of narrow values, and the `(address, bytes4[])[]` tuple
//! array returned by `facets()`.

pub mod decoder;
pub mod encoder;
pub mod facets_tuple;

pub use decoder::{
    decode_address_array, decode_selector_array, decode_tail_array, decode_tail_array_aligned,
    Alignment, MIN_HEX_LEN, WORD,
};
pub use encoder::{
    encode_address_array, encode_call, encode_selector_array, encode_tail_array, pad_word,
    usize_word,
};
pub use facets_tuple::{decode_facets, encode_facets, FacetEntry};
