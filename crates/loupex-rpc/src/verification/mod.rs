//! Explorer-backed source verification lookups.
//!
//! Both clients implement [`VerificationLookup`]. Results are advisory: the
//! enumerator records any failure as "unverified".

pub mod blockscout;
pub mod tenderly;

pub use blockscout::{BlockscoutClient, ExplorerTransaction};
pub use tenderly::TenderlyVerifier;

use crate::config::LoupexConfig;
use crate::errors::Result;
use loupex_core::VerificationLookup;
use std::time::Duration;

/// Timeout for explorer requests
pub const EXPLORER_TIMEOUT: Duration = Duration::from_secs(15);

/// The verifier selected by configuration: Tenderly when configured,
/// otherwise Blockscout
///
/// # Errors
///
/// `Config` if an HTTP client cannot be built.
pub fn verifier_from_config(config: &LoupexConfig) -> Result<Box<dyn VerificationLookup>> {
    match &config.tenderly {
        Some(tenderly) => Ok(Box::new(TenderlyVerifier::from_config(tenderly)?)),
        None => Ok(Box::new(BlockscoutClient::from_config(&config.blockscout)?)),
    }
}
