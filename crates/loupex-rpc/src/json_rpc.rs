//! JSON-RPC 2.0 client for `eth_call` reads.
//!
//! Request shape:
//!
//! ```text
//! {"jsonrpc":"2.0","id":N,"method":"eth_call","params":[{"to":..,"data":..},"latest"]}
//! ```
//!
//! No retries are attempted; every failure is reported to the caller.

use crate::config::RpcConfig;
use crate::errors::{config_error, from_reqwest, http_status, unreadable_response, Result};
use async_trait::async_trait;
use loupex_core::{CallError, ChainId, FacetAddress, HexBlob, ReadCall};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Block tag every read is pinned to
pub const BLOCK_TAG: &str = "latest";

/// HTTP JSON-RPC endpoint
pub struct JsonRpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// # Errors
    ///
    /// `Config` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(config_error)?;

        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// # Errors
    ///
    /// Same as [`JsonRpcClient::new`].
    pub fn from_config(config: &RpcConfig) -> Result<Self> {
        Self::new(config.url.clone(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `eth_call` against the latest block
    ///
    /// # Errors
    ///
    /// `CallError::Rpc` for an error object, `CallError::Decode` for a
    /// result that is not hex, `CallError::Transport` for HTTP failures and
    /// unreadable responses.
    pub async fn eth_call(&self, to: &FacetAddress, data: &HexBlob) -> Result<HexBlob, CallError> {
        let params = json!([
            { "to": to.to_string(), "data": data.to_string() },
            BLOCK_TAG
        ]);
        let result = self.request("eth_call", params).await?;
        parse_hex_result(&result)
    }

    /// `eth_chainId` of the endpoint
    ///
    /// # Errors
    ///
    /// Same as [`JsonRpcClient::eth_call`].
    pub async fn chain_id(&self) -> Result<ChainId, CallError> {
        let result = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&result)
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, CallError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = build_request(id, method, params);

        tracing::debug!(
            component = module_path!(),
            op = "json_rpc_request",
            method = method,
            id = id,
        );

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        let text = response.text().await.map_err(from_reqwest)?;

        // Some nodes pair an error object with a non-2xx status
        match serde_json::from_str::<Value>(&text) {
            Ok(value) if status.is_success() || value.get("error").is_some() => {
                parse_response(&value)
            }
            Ok(_) | Err(_) if !status.is_success() => Err(http_status(status, &text)),
            Ok(_) => Err(unreadable_response("unexpected JSON shape")),
            Err(err) => Err(unreadable_response(err)),
        }
    }
}

#[async_trait]
impl ReadCall for JsonRpcClient {
    async fn call(&self, to: &FacetAddress, data: &HexBlob) -> Result<HexBlob, CallError> {
        self.eth_call(to, data).await
    }
}

/// Build a JSON-RPC 2.0 request body
pub fn build_request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Extract `result` from a response body, or its `error` object
///
/// # Errors
///
/// `CallError::Rpc` when an error object is present, `CallError::Transport`
/// when neither member is.
pub fn parse_response(body: &Value) -> Result<Value, CallError> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
        let mut message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        // revert payloads ride along in `data`
        if let Some(data) = error.get("data").and_then(Value::as_str) {
            message = format!("{} (data: {})", message, data);
        }
        return Err(CallError::rpc(code, message));
    }

    body.get("result")
        .cloned()
        .ok_or_else(|| unreadable_response("missing both result and error"))
}

/// Parse an `eth_call` result string
///
/// # Errors
///
/// `CallError::Decode` if the result is not `0x`-prefixed even-length hex,
/// `CallError::Transport` if it is not a string at all.
pub fn parse_hex_result(result: &Value) -> Result<HexBlob, CallError> {
    let text = result
        .as_str()
        .ok_or_else(|| unreadable_response(format!("result is not a string: {}", result)))?;
    Ok(HexBlob::parse(text)?)
}

/// Parse a hex quantity such as `0xa4b1`
///
/// # Errors
///
/// `CallError::Transport` on anything but a `0x`-prefixed hex number.
pub fn parse_quantity(result: &Value) -> Result<u64, CallError> {
    let digits = result
        .as_str()
        .and_then(|s| s.strip_prefix("0x"))
        .ok_or_else(|| unreadable_response(format!("not a hex quantity: {}", result)))?;
    u64::from_str_radix(digits, 16).map_err(unreadable_response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = build_request(7, "eth_call", json!([{"to": "0x01", "data": "0x52ef6b2c"}, "latest"]));
        assert_eq!(body["jsonrpc"], "2.0");
        assert_eq!(body["id"], 7);
        assert_eq!(body["params"][1], "latest");
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity(&json!("0xa4b1")).unwrap(), 42161);
        assert!(parse_quantity(&json!("42161")).is_err());
        assert!(parse_quantity(&json!(42161)).is_err());
    }

    #[test]
    fn test_null_error_is_ignored() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "result": "0x", "error": null});
        assert_eq!(parse_response(&body).unwrap(), json!("0x"));
    }
}
