//! Runtime configuration
//!
//! Loaded from an optional TOML file, then overridden by `LOUPEX__*`
//! environment variables (`LOUPEX__RPC__URL`, `LOUPEX__ENUMERATION__CONCURRENCY`,
//! ...). A `.env` file in the working directory is read first.

use crate::errors::{config_error, Result};
use config::{Config, Environment, File, FileFormat};
use loupex_core::{ChainId, EnumerationOptions, FacetAddress};
use loupex_core_types::Sensitive;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "LOUPEX";

#[derive(Debug, Clone, Deserialize)]
pub struct LoupexConfig {
    pub rpc: RpcConfig,

    #[serde(default)]
    pub enumeration: EnumerationConfig,

    /// Tenderly verification; takes precedence over Blockscout when set
    #[serde(default)]
    pub tenderly: Option<TenderlyConfig>,

    #[serde(default)]
    pub blockscout: BlockscoutConfig,

    /// Named Diamonds to inspect
    #[serde(default)]
    pub diamonds: Vec<DiamondTarget>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl RpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnumerationConfig {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub deadline_ms: Option<u64>,

    #[serde(default = "default_verify")]
    pub verify: bool,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            deadline_ms: None,
            verify: default_verify(),
        }
    }
}

impl EnumerationConfig {
    pub fn options(&self) -> EnumerationOptions {
        let options = EnumerationOptions::default()
            .with_concurrency(self.concurrency)
            .with_verify(self.verify);
        match self.deadline_ms {
            Some(ms) => options.with_deadline(Duration::from_millis(ms)),
            None => options,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TenderlyConfig {
    #[serde(default = "default_tenderly_api_base")]
    pub api_base: String,
    pub account: String,
    pub project: String,
    pub access_key: Sensitive<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockscoutConfig {
    /// API base per chain id, e.g. `"42161" = "https://arbitrum.blockscout.com/api"`
    #[serde(default = "default_blockscout_apis")]
    pub api_bases: BTreeMap<String, String>,
}

impl Default for BlockscoutConfig {
    fn default() -> Self {
        Self {
            api_bases: default_blockscout_apis(),
        }
    }
}

impl BlockscoutConfig {
    pub fn api_base(&self, chain_id: ChainId) -> Option<&str> {
        self.api_bases.get(&chain_id.to_string()).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiamondTarget {
    pub name: String,
    pub address: FacetAddress,
    pub chain_id: ChainId,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_concurrency() -> usize {
    4
}

fn default_verify() -> bool {
    true
}

fn default_tenderly_api_base() -> String {
    "https://api.tenderly.co/api/v1".to_string()
}

fn default_blockscout_apis() -> BTreeMap<String, String> {
    [
        ("1", "https://eth.blockscout.com/api"),
        ("137", "https://polygon.blockscout.com/api"),
        ("8453", "https://base.blockscout.com/api"),
        ("42161", "https://arbitrum.blockscout.com/api"),
    ]
    .into_iter()
    .map(|(chain, url)| (chain.to_string(), url.to_string()))
    .collect()
}

impl LoupexConfig {
    /// Load from `path` (if given), `.env` and the environment
    ///
    /// # Errors
    ///
    /// `Config` if the file is missing or malformed, a value has the wrong
    /// type, or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        Self::finish(builder)
    }

    /// Parse TOML text, still applying environment overrides
    ///
    /// # Errors
    ///
    /// Same as [`LoupexConfig::load`].
    pub fn from_toml(content: &str) -> Result<Self> {
        Self::finish(Config::builder().add_source(File::from_str(content, FileFormat::Toml)))
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let parsed: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|config| config.try_deserialize::<Self>())
            .map_err(config_error)?;

        parsed.validate()?;
        Ok(parsed)
    }

    /// # Errors
    ///
    /// `Config` describing the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        let url = self.rpc.url.trim();
        if url.is_empty() {
            return Err(config_error("rpc.url is empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(config_error(format!(
                "rpc.url must be an http(s) URL, got {:?}",
                url
            )));
        }
        if self.rpc.timeout_ms == 0 {
            return Err(config_error("rpc.timeout_ms must be positive"));
        }
        if self.enumeration.concurrency == 0 {
            return Err(config_error("enumeration.concurrency must be at least 1"));
        }
        if self.enumeration.deadline_ms == Some(0) {
            return Err(config_error("enumeration.deadline_ms must be positive"));
        }

        if let Some(tenderly) = &self.tenderly {
            if tenderly.account.is_empty() || tenderly.project.is_empty() {
                return Err(config_error("tenderly.account and tenderly.project are required"));
            }
            if tenderly.access_key.expose().is_empty() {
                return Err(config_error("tenderly.access_key is empty"));
            }
        }

        let mut names = HashSet::new();
        for target in &self.diamonds {
            if target.name.is_empty() {
                return Err(config_error(format!(
                    "diamond {} has an empty name",
                    target.address
                )));
            }
            if !names.insert(target.name.as_str()) {
                return Err(config_error(format!(
                    "diamond name {:?} is used twice",
                    target.name
                )));
            }
        }

        Ok(())
    }

    pub fn diamond(&self, name: &str) -> Option<&DiamondTarget> {
        self.diamonds.iter().find(|d| d.name == name)
    }
}
