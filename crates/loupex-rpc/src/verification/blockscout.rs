//! Blockscout v2 API client
//!
//! Provides the verification lookup plus a one-shot fetch of recent inbound
//! transactions, classified so that routing-table changes (`diamondCut`) can
//! be flagged.

use crate::config::BlockscoutConfig;
use crate::errors::{config_error, from_reqwest, http_status, unreadable_response, Result};
use crate::verification::EXPLORER_TIMEOUT;
use async_trait::async_trait;
use loupex_core::selectors::{classify_method, CallClass};
use loupex_core::{CallError, ChainId, FacetAddress, VerificationLookup};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::BTreeMap;

/// One transaction as reported by the explorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerTransaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Raw selector or decoded method name, when the explorer reports one
    pub method: Option<String>,
    pub status: String,
    pub timestamp: String,
    pub class: CallClass,
}

impl ExplorerTransaction {
    pub fn is_diamond_cut(&self) -> bool {
        self.class == CallClass::DiamondCut
    }
}

pub struct BlockscoutClient {
    client: Client,
    api_bases: BTreeMap<String, String>,
}

impl BlockscoutClient {
    /// # Errors
    ///
    /// `Config` if the HTTP client cannot be built.
    pub fn from_config(config: &BlockscoutConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(EXPLORER_TIMEOUT)
            .build()
            .map_err(config_error)?;

        Ok(Self {
            client,
            api_bases: config
                .api_bases
                .iter()
                .map(|(chain, url)| (chain.clone(), url.trim_end_matches('/').to_string()))
                .collect(),
        })
    }

    fn api_base(&self, chain_id: ChainId) -> Result<&str, CallError> {
        self.api_bases
            .get(&chain_id.to_string())
            .map(String::as_str)
            .ok_or_else(|| {
                CallError::transport(format!("no Blockscout API configured for chain {}", chain_id))
            })
    }

    /// # Errors
    ///
    /// `CallError::Transport` if the chain has no configured API.
    pub fn smart_contract_url(
        &self,
        address: &FacetAddress,
        chain_id: ChainId,
    ) -> Result<String, CallError> {
        Ok(format!(
            "{}/v2/smart-contracts/{}",
            self.api_base(chain_id)?,
            address
        ))
    }

    /// Most recent transactions sent to `address`, newest first
    ///
    /// # Errors
    ///
    /// `CallError::Transport` on HTTP failure or an unreadable body.
    pub async fn recent_transactions(
        &self,
        address: &FacetAddress,
        chain_id: ChainId,
        limit: usize,
    ) -> Result<Vec<ExplorerTransaction>, CallError> {
        let url = format!(
            "{}/v2/addresses/{}/transactions?filter=to&limit={}",
            self.api_base(chain_id)?,
            address,
            limit
        );
        let body = self.get_json(&url).await?;
        let mut transactions = parse_transactions(&body)?;
        transactions.truncate(limit);
        Ok(transactions)
    }

    async fn get_json(&self, url: &str) -> Result<Value, CallError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_status(status, &body));
        }

        response.json().await.map_err(unreadable_response)
    }
}

#[async_trait]
impl VerificationLookup for BlockscoutClient {
    async fn is_verified(
        &self,
        address: &FacetAddress,
        chain_id: ChainId,
    ) -> Result<bool, CallError> {
        let url = self.smart_contract_url(address, chain_id)?;
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_status(status, &body));
        }

        let body: Value = response.json().await.map_err(unreadable_response)?;
        Ok(parse_is_verified(&body))
    }
}

/// `is_verified` from a smart-contract body; absent means unverified
pub fn parse_is_verified(body: &Value) -> bool {
    body.get("is_verified")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Parse the `items` of a transactions page
///
/// # Errors
///
/// `CallError::Transport` if `items` is present but not an array.
pub fn parse_transactions(body: &Value) -> Result<Vec<ExplorerTransaction>, CallError> {
    let items = match body.get("items") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(unreadable_response(format!(
                "items is not an array: {}",
                other
            )))
        }
    };

    Ok(items.iter().map(parse_transaction).collect())
}

fn parse_transaction(item: &Value) -> ExplorerTransaction {
    let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);
    let party = |key: &str| {
        item.get(key)
            .and_then(|p| p.get("hash"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let method = text("method");
    let class = method
        .as_deref()
        .map(classify_method)
        .unwrap_or(CallClass::Other);

    ExplorerTransaction {
        hash: text("hash").unwrap_or_default(),
        from: party("from"),
        to: party("to"),
        method,
        status: text("status").unwrap_or_else(|| "unknown".to_string()),
        timestamp: text("timestamp").unwrap_or_default(),
        class,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_is_verified() {
        assert!(parse_is_verified(&json!({"is_verified": true, "name": "DiamondLoupeFacet"})));
        assert!(!parse_is_verified(&json!({"is_verified": false})));
        assert!(!parse_is_verified(&json!({"message": "Not found"})));
    }

    #[test]
    fn test_unknown_chain_is_an_error() {
        let client = BlockscoutClient::from_config(&BlockscoutConfig::default()).unwrap();
        let address = FacetAddress::from_bytes([1; 20]);
        assert!(client.smart_contract_url(&address, 999_999).is_err());
        assert_eq!(
            client.smart_contract_url(&address, 42161).unwrap(),
            format!("https://arbitrum.blockscout.com/api/v2/smart-contracts/{}", address)
        );
    }
}
