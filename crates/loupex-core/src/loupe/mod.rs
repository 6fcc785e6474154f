//! Diamond Loupe enumeration over injected capabilities.

pub mod capability;
pub mod enumerator;
pub mod probe;

pub use capability::{CallError, ReadCall, VerificationLookup};
pub use enumerator::{EnumerationOptions, FacetEnumerator};
pub use probe::{probe_selector, SelectorProbe};
