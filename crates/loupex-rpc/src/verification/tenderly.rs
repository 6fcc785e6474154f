//! Tenderly contract registry lookup
//!
//! A contract counts as verified when the project's contract endpoint
//! answers with a success status for it.

use crate::config::TenderlyConfig;
use crate::errors::{config_error, from_reqwest, http_status, Result};
use crate::verification::EXPLORER_TIMEOUT;
use async_trait::async_trait;
use loupex_core::{CallError, ChainId, FacetAddress, VerificationLookup};
use loupex_core_types::Sensitive;
use reqwest::{Client, StatusCode};

/// Header carrying the Tenderly API key
pub const ACCESS_KEY_HEADER: &str = "X-Access-Key";

pub struct TenderlyVerifier {
    client: Client,
    api_base: String,
    account: String,
    project: String,
    access_key: Sensitive<String>,
}

impl TenderlyVerifier {
    /// # Errors
    ///
    /// `Config` if the HTTP client cannot be built.
    pub fn from_config(config: &TenderlyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(EXPLORER_TIMEOUT)
            .build()
            .map_err(config_error)?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            account: config.account.clone(),
            project: config.project.clone(),
            access_key: config.access_key.clone(),
        })
    }

    pub fn contract_url(&self, address: &FacetAddress, chain_id: ChainId) -> String {
        format!(
            "{}/account/{}/project/{}/contracts/{}/{}",
            self.api_base, self.account, self.project, chain_id, address
        )
    }
}

#[async_trait]
impl VerificationLookup for TenderlyVerifier {
    async fn is_verified(
        &self,
        address: &FacetAddress,
        chain_id: ChainId,
    ) -> Result<bool, CallError> {
        let response = self
            .client
            .get(self.contract_url(address, chain_id))
            .header(ACCESS_KEY_HEADER, self.access_key.expose().as_str())
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }

        let body = response.text().await.unwrap_or_default();
        Err(http_status(status, &body))
    }
}
