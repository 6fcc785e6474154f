pub mod hex_blob;
pub mod ids;
pub mod snapshot;

pub use hex_blob::HexBlob;
pub use ids::{ChainId, FacetAddress, SelectorId};
pub use snapshot::{DiamondSnapshot, FacetSnapshot};
