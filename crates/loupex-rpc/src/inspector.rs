//! One-shot inspection of a configured Diamond
//!
//! Wires the JSON-RPC client, the configured verifier and the enumeration
//! options together, and evaluates the result against an optional previous
//! snapshot.

use crate::config::{DiamondTarget, LoupexConfig};
use crate::errors::Result;
use crate::json_rpc::JsonRpcClient;
use crate::verification::verifier_from_config;
use loupex_core::diff::{diff, FacetDiff};
use loupex_core::errors::LoupeError;
use loupex_core::rules::ComplianceReport;
use loupex_core::{DiamondSnapshot, EnumerationOptions, FacetEnumerator, VerificationLookup};
use tokio_util::sync::CancellationToken;

/// Result of inspecting one Diamond
#[derive(Debug, Clone)]
pub struct Inspection {
    pub snapshot: DiamondSnapshot,
    pub compliance: ComplianceReport,
    /// Present when a previous snapshot was supplied
    pub drift: Option<FacetDiff>,
}

impl Inspection {
    /// Whether anything warrants attention
    pub fn needs_attention(&self) -> bool {
        !self.compliance.compliant
            || self.compliance.has_collisions()
            || self.drift.as_ref().is_some_and(|d| !d.is_empty())
    }
}

pub struct Inspector {
    rpc: JsonRpcClient,
    verifier: Option<Box<dyn VerificationLookup>>,
    options: EnumerationOptions,
}

impl Inspector {
    /// # Errors
    ///
    /// `Config` if an HTTP client cannot be built.
    pub fn from_config(config: &LoupexConfig) -> Result<Self> {
        let verifier = if config.enumeration.verify {
            Some(verifier_from_config(config)?)
        } else {
            None
        };

        Ok(Self {
            rpc: JsonRpcClient::from_config(&config.rpc)?,
            verifier,
            options: config.enumeration.options(),
        })
    }

    /// Check that the endpoint serves the target's chain
    ///
    /// # Errors
    ///
    /// `Config` on a mismatch, `Rpc`, `Transport` or `Decode` if the query
    /// fails.
    pub async fn check_chain(&self, target: &DiamondTarget) -> Result<()> {
        let served = self.rpc.chain_id().await.map_err(|err| match err {
            loupex_core::CallError::Rpc { code, message } => LoupeError::Rpc {
                selector: "eth_chainId".to_string(),
                target: self.rpc.url().to_string(),
                code,
                message,
            },
            loupex_core::CallError::Transport { message, cancelled } => {
                LoupeError::Transport { message, cancelled }
            }
            loupex_core::CallError::Decode(err) => LoupeError::Decode(err),
        })?;

        if served != target.chain_id {
            return Err(LoupeError::Config {
                reason: format!(
                    "diamond {:?} is on chain {} but {} serves chain {}",
                    target.name,
                    target.chain_id,
                    self.rpc.url(),
                    served
                ),
            });
        }
        Ok(())
    }

    /// Enumerate `target`
    ///
    /// # Errors
    ///
    /// Any enumeration failure, unmodified.
    pub async fn snapshot(
        &self,
        target: &DiamondTarget,
        cancel: &CancellationToken,
    ) -> Result<DiamondSnapshot> {
        let mut enumerator = FacetEnumerator::new(&self.rpc).with_options(self.options.clone());
        if let Some(verifier) = &self.verifier {
            enumerator = enumerator.with_verifier(verifier.as_ref());
        }
        enumerator
            .enumerate(target.address, target.chain_id, cancel)
            .await
    }

    /// Enumerate `target` and evaluate it against `previous`
    ///
    /// # Errors
    ///
    /// Enumeration failures, or `IncomparableSnapshots` if `previous`
    /// belongs to another Diamond or chain.
    pub async fn inspect(
        &self,
        target: &DiamondTarget,
        previous: Option<&DiamondSnapshot>,
        cancel: &CancellationToken,
    ) -> Result<Inspection> {
        let snapshot = self.snapshot(target, cancel).await?;
        let compliance = ComplianceReport::evaluate(&snapshot);
        let drift = previous.map(|old| diff(old, &snapshot)).transpose()?;

        Ok(Inspection {
            snapshot,
            compliance,
            drift,
        })
    }
}
