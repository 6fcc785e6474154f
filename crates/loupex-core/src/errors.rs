use loupex_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using LoupeError
pub type Result<T> = std::result::Result<T, LoupeError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error surfaced by loupex maps to exactly one kind, and each kind
/// maps to a stable `ERR_*` code for programmatic handling and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Decoding
    /// ABI tail data is malformed, truncated or points out of bounds
    Decode,

    // Remote calls
    /// The node answered with a JSON-RPC error object
    Rpc,
    /// The node could not be reached or the response was unreadable
    Transport,
    /// The caller cancelled the request or its deadline elapsed
    Cancelled,

    // Comparison
    /// A diff was requested across different diamonds or chains
    IncomparableSnapshots,

    // Ambient
    InvalidInput,
    Config,
    Serialization,
    Io,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::Rpc => "ERR_RPC",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::IncomparableSnapshots => "ERR_INCOMPARABLE_SNAPSHOTS",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the call
/// context (target contract, selector, chain) needed to debug a failed
/// enumeration.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    target: Option<String>,
    selector: Option<String>,
    chain_id: Option<u64>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            target: None,
            selector: None,
            chain_id: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the contract address the failing call was sent to
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Add the function selector of the failing call
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(selector) = &self.selector {
            write!(f, " (selector: {})", selector)?;
        }
        if let Some(target) = &self.target {
            write!(f, " (target: {})", target)?;
        }
        if let Some(chain_id) = self.chain_id {
            write!(f, " (chain_id: {})", chain_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Malformed ABI return data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Text is not `0x`-prefixed, even-length hexadecimal
    #[error("Invalid hex data: {reason}")]
    InvalidHex { reason: String },

    /// Element width must be between 1 and 32 bytes
    #[error("Invalid element width {width}: must be between 1 and 32 bytes")]
    InvalidWidth { width: usize },

    /// A head word (offset or length) does not fit in a machine word
    #[error("Word at byte {position} ({field}) does not fit in usize")]
    WordOverflow { field: &'static str, position: usize },

    /// Offset or length points past the end of the data
    #[error("Truncated {field}: needs {needed} bytes, data has {available}")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// The same element appears twice where the routing table forbids it
    #[error("Duplicate element {element} in {field}")]
    DuplicateElement { field: &'static str, element: String },
}

/// Error taxonomy for loupex operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoupeError {
    /// ABI tail data could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The node returned a JSON-RPC error object for a specific call
    #[error("RPC error calling {selector} on {target}: {message} (code {code})")]
    Rpc {
        selector: String,
        target: String,
        code: i64,
        message: String,
    },

    /// Network failure, unreadable response, cancellation or deadline
    #[error("Transport error: {message} (cancelled: {cancelled})")]
    Transport { message: String, cancelled: bool },

    /// Diff requested across snapshots of different contracts or chains
    #[error(
        "Snapshots are not comparable: {old_diamond}@{old_chain_id} vs {new_diamond}@{new_chain_id}"
    )]
    IncomparableSnapshots {
        old_diamond: String,
        old_chain_id: u64,
        new_diamond: String,
        new_chain_id: u64,
    },

    /// Address, selector or blob text could not be parsed
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl LoupeError {
    /// Transport failure that was not caused by cancellation
    pub fn transport(message: impl Into<String>) -> Self {
        LoupeError::Transport {
            message: message.into(),
            cancelled: false,
        }
    }

    /// Transport failure caused by a cancellation token or deadline
    pub fn cancelled(message: impl Into<String>) -> Self {
        LoupeError::Transport {
            message: message.into(),
            cancelled: true,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, LoupeError::Transport { cancelled: true, .. })
    }
}

/// Conversion from LoupeError to ExError
impl From<LoupeError> for ExError {
    fn from(err: LoupeError) -> Self {
        match err {
            LoupeError::Decode(decode) => {
                ExError::new(ExErrorKind::Decode).with_message(decode.to_string())
            }

            LoupeError::Rpc {
                selector,
                target,
                code,
                message,
            } => ExError::new(ExErrorKind::Rpc)
                .with_op("eth_call")
                .with_selector(selector)
                .with_target(target)
                .with_message(format!("{} (code {})", message, code)),

            LoupeError::Transport { message, cancelled } => {
                let kind = if cancelled {
                    ExErrorKind::Cancelled
                } else {
                    ExErrorKind::Transport
                };
                ExError::new(kind).with_message(message)
            }

            LoupeError::IncomparableSnapshots {
                old_diamond,
                old_chain_id,
                new_diamond,
                new_chain_id,
            } => ExError::new(ExErrorKind::IncomparableSnapshots)
                .with_op("diff")
                .with_target(new_diamond.clone())
                .with_chain_id(new_chain_id)
                .with_message(format!(
                    "old snapshot is {}@{}, new snapshot is {}@{}",
                    old_diamond, old_chain_id, new_diamond, new_chain_id
                )),

            LoupeError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            LoupeError::Config { reason } => ExError::new(ExErrorKind::Config).with_message(reason),

            LoupeError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            LoupeError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
        }
    }
}

impl From<DecodeError> for ExError {
    fn from(err: DecodeError) -> Self {
        LoupeError::from(err).into()
    }
}

/// Conversion from serde_json::Error to LoupeError
impl From<serde_json::Error> for LoupeError {
    fn from(err: serde_json::Error) -> Self {
        LoupeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for LoupeError {
    fn from(err: std::io::Error) -> Self {
        LoupeError::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::Decode, "ERR_DECODE"),
            (ExErrorKind::Rpc, "ERR_RPC"),
            (ExErrorKind::Transport, "ERR_TRANSPORT"),
            (ExErrorKind::Cancelled, "ERR_CANCELLED"),
            (
                ExErrorKind::IncomparableSnapshots,
                "ERR_INCOMPARABLE_SNAPSHOTS",
            ),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_cancelled_transport_maps_to_cancelled_kind() {
        let ex: ExError = LoupeError::cancelled("deadline elapsed").into();
        assert_eq!(ex.kind(), ExErrorKind::Cancelled);
        assert_eq!(ex.message(), "deadline elapsed");
    }

    #[test]
    fn test_transport_display_marks_cancellation() {
        let err = LoupeError::cancelled("token fired");
        assert_eq!(
            err.to_string(),
            "Transport error: token fired (cancelled: true)"
        );
        assert!(err.is_cancelled());
        assert!(!LoupeError::transport("refused").is_cancelled());
    }

    #[test]
    fn test_source_chain_is_exposed() {
        let inner = ExError::new(ExErrorKind::Transport).with_message("connection reset");
        let outer = ExError::new(ExErrorKind::Internal).with_source(inner);
        let source = std::error::Error::source(&outer).expect("source should be set");
        assert!(source.to_string().contains("connection reset"));
    }
}
