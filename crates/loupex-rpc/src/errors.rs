//! Error helpers for loupex-rpc
//!
//! HTTP failures become `CallError`s so the enumerator can attach the
//! selector and target; configuration and file failures become `LoupeError`s.

use loupex_core::errors::LoupeError;
use loupex_core::CallError;
use std::path::Path;

/// Result type alias defaulting to LoupeError
pub type Result<T, E = LoupeError> = std::result::Result<T, E>;

/// Map a reqwest failure onto a transport error
pub fn from_reqwest(err: reqwest::Error) -> CallError {
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };
    CallError::transport(message)
}

/// Non-success HTTP status without a JSON-RPC error body
pub fn http_status(status: reqwest::StatusCode, body: &str) -> CallError {
    CallError::transport(format!("HTTP {}: {}", status, truncate(body, 200)))
}

/// Response that is neither a result nor a JSON-RPC error
pub fn unreadable_response(reason: impl std::fmt::Display) -> CallError {
    CallError::transport(format!("unreadable response: {}", reason))
}

/// Create a configuration error
pub fn config_error(reason: impl std::fmt::Display) -> LoupeError {
    LoupeError::Config {
        reason: reason.to_string(),
    }
}

/// Create an IO error naming the file involved
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> LoupeError {
    LoupeError::Io {
        message: format!("{} {}: {}", operation, path.display(), err),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
