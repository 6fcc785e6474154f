//! Selector probing against a Diamond's fallback router

use crate::abi::encode_call;
use crate::errors::Result;
use crate::loupe::capability::{CallError, ReadCall};
use crate::model::{FacetAddress, SelectorId};

/// Revert text emitted by the Diamond fallback for unrouted selectors
const NOT_ROUTED_MARKER: &str = "function does not exist";

/// Outcome of [`probe_selector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorProbe {
    /// The call reached a facet (it may still have reverted inside it)
    Routed,
    /// The fallback rejected the selector
    NotRouted { message: String },
}

impl SelectorProbe {
    pub fn is_routed(&self) -> bool {
        matches!(self, SelectorProbe::Routed)
    }
}

/// Check whether `selector` is routed by `diamond`
///
/// Issues the selector with a single zero argument word. A successful call
/// or an ordinary revert means a facet handled it; a revert whose message
/// contains "function does not exist" (any case) means it did not.
///
/// # Errors
///
/// Transport failures propagate as `LoupeError::Transport`, a malformed
/// result as `LoupeError::Decode`.
pub async fn probe_selector(
    reader: &dyn ReadCall,
    diamond: &FacetAddress,
    selector: SelectorId,
) -> Result<SelectorProbe> {
    let data = encode_call(selector, &[[0u8; 32]]);
    match reader.call(diamond, &data).await {
        Ok(_) => Ok(SelectorProbe::Routed),
        Err(CallError::Rpc { message, .. }) => {
            if message.to_ascii_lowercase().contains(NOT_ROUTED_MARKER) {
                Ok(SelectorProbe::NotRouted { message })
            } else {
                Ok(SelectorProbe::Routed)
            }
        }
        Err(err @ (CallError::Transport { .. } | CallError::Decode(_))) => {
            Err(err.into_loupe_error(selector, diamond))
        }
    }
}
