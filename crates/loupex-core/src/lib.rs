//! Loupex Core - Diamond (EIP-2535) introspection kernel
//!
//! This crate provides:
//! - Typed hex blobs, addresses, selectors and routing-table snapshots
//! - A bounds-checked ABI decoder for loupe return data
//! - Facet enumeration over injected JSON-RPC and verification capabilities
//! - The compliance predicate, compliance reports and snapshot drift diffs
//! - The error and structured logging facilities shared by adapter crates
//!
//! No network I/O happens here; see `loupex-rpc` for HTTP adapters.

pub mod abi;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod loupe;
pub mod model;
pub mod rules;
pub mod selectors;

pub use loupex_core_types::schema;

// Re-export commonly used types
pub use diff::{diff, FacetDiff};
pub use errors::{DecodeError, ExError, ExErrorKind, LoupeError, Result};
pub use loupe::{
    probe_selector, CallError, EnumerationOptions, FacetEnumerator, ReadCall, SelectorProbe,
    VerificationLookup,
};
pub use model::{ChainId, DiamondSnapshot, FacetAddress, FacetSnapshot, HexBlob, SelectorId};
pub use rules::{is_compliant, ComplianceReport};
