//! Injected I/O capabilities
//!
//! The enumerator never talks to the network itself. Callers supply an
//! `eth_call` reader and, optionally, an explorer verification lookup.

use crate::errors::{DecodeError, LoupeError};
use crate::model::{ChainId, FacetAddress, HexBlob, SelectorId};
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by a capability, before the enumerator attaches context
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The node answered with a JSON-RPC error object
    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request never produced a usable answer
    #[error("transport failure: {message}")]
    Transport { message: String, cancelled: bool },

    /// The node answered, but the result is not valid return data
    #[error("malformed result: {0}")]
    Decode(#[from] DecodeError),
}

impl CallError {
    pub fn rpc(code: i64, message: impl Into<String>) -> Self {
        CallError::Rpc {
            code,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        CallError::Transport {
            message: message.into(),
            cancelled: false,
        }
    }

    /// Attach the call that failed
    pub fn into_loupe_error(self, selector: SelectorId, target: &FacetAddress) -> LoupeError {
        match self {
            CallError::Rpc { code, message } => LoupeError::Rpc {
                selector: selector.to_string(),
                target: target.to_string(),
                code,
                message,
            },
            CallError::Transport { message, cancelled } => LoupeError::Transport {
                message: format!("{} calling {} on {}", message, selector, target),
                cancelled,
            },
            CallError::Decode(err) => LoupeError::Decode(err),
        }
    }
}

/// Read-only contract call (`eth_call` against the latest block)
#[async_trait]
pub trait ReadCall: Send + Sync {
    /// # Errors
    ///
    /// `CallError::Rpc` for a JSON-RPC error object, `CallError::Decode` for
    /// a result that is not hex, `CallError::Transport` for anything that
    /// prevented an answer.
    async fn call(&self, to: &FacetAddress, data: &HexBlob) -> Result<HexBlob, CallError>;
}

/// Best-effort source-verification lookup on a block explorer
#[async_trait]
pub trait VerificationLookup: Send + Sync {
    /// # Errors
    ///
    /// Any failure; the enumerator records it as unverified.
    async fn is_verified(&self, address: &FacetAddress, chain_id: ChainId)
        -> Result<bool, CallError>;
}
