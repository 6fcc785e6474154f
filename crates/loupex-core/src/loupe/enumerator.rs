//! Diamond facet enumeration.
//!
//! Walks the routing table through the loupe functions and assembles a
//! [`DiamondSnapshot`]. Per-facet calls run concurrently up to the configured
//! limit; results keep the order reported by the Diamond. The whole run is
//! all-or-nothing: any RPC, transport or decode failure aborts it, and no
//! partial snapshot is returned.
//!
//! Selector words are read with Solidity's `bytes4` layout: the selector is
//! the leading four bytes of each 32-byte word (see
//! [`decode_selector_array`]). A reader that right-aligns selectors, the way
//! [`crate::abi::decode_tail_array`] expects, produces `0x00000000` entries.
//! Addresses are the trailing twenty bytes.

use crate::abi::{
    decode_address_array, decode_facets, decode_selector_array, encode_call, FacetEntry,
};
use crate::errors::{DecodeError, LoupeError, Result};
use crate::loupe::capability::{ReadCall, VerificationLookup};
use crate::model::{ChainId, DiamondSnapshot, FacetAddress, FacetSnapshot, HexBlob, SelectorId};
use crate::selectors::{FACETS, FACET_ADDRESSES, FACET_FUNCTION_SELECTORS};
use crate::{log_op_end, log_op_error, log_op_start};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use loupex_core_types::RequestContext;
use std::collections::HashSet;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Tuning for a single enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationOptions {
    /// Maximum in-flight per-facet calls (at least 1)
    pub concurrency: usize,

    /// Overall time limit; expiry behaves like cancellation
    pub deadline: Option<Duration>,

    /// Whether to consult the verification lookup, when one is supplied
    pub verify: bool,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            deadline: None,
            verify: true,
        }
    }
}

impl EnumerationOptions {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    fn limit(&self) -> usize {
        self.concurrency.max(1)
    }
}

/// Enumerates a Diamond through injected capabilities
pub struct FacetEnumerator<'a> {
    reader: &'a dyn ReadCall,
    verifier: Option<&'a dyn VerificationLookup>,
    options: EnumerationOptions,
}

impl<'a> FacetEnumerator<'a> {
    pub fn new(reader: &'a dyn ReadCall) -> Self {
        Self {
            reader,
            verifier: None,
            options: EnumerationOptions::default(),
        }
    }

    pub fn with_verifier(mut self, verifier: &'a dyn VerificationLookup) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_options(mut self, options: EnumerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EnumerationOptions {
        &self.options
    }

    /// Enumerate via `facetAddresses()` then `facetFunctionSelectors(address)`
    /// per facet
    ///
    /// The snapshot timestamp is the time the enumeration started. Each
    /// `facetFunctionSelectors` result is decoded as a left-aligned
    /// `bytes4[]`.
    ///
    /// # Errors
    ///
    /// - `Rpc` naming the selector and target of the failed call
    /// - `Transport` on network failure, or with `cancelled: true` when
    ///   `cancel` fires or the deadline expires
    /// - `Decode` on malformed return data or a repeated facet address
    pub async fn enumerate(
        &self,
        diamond: FacetAddress,
        chain_id: ChainId,
        cancel: &CancellationToken,
    ) -> Result<DiamondSnapshot> {
        self.run(
            "enumerate_facets",
            diamond,
            chain_id,
            cancel,
            self.routing_via_loupe(diamond),
        )
        .await
    }

    /// Enumerate with the single combined `facets()` call
    ///
    /// # Errors
    ///
    /// Same as [`FacetEnumerator::enumerate`].
    pub async fn enumerate_via_facets(
        &self,
        diamond: FacetAddress,
        chain_id: ChainId,
        cancel: &CancellationToken,
    ) -> Result<DiamondSnapshot> {
        self.run(
            "enumerate_via_facets",
            diamond,
            chain_id,
            cancel,
            self.routing_via_facets(diamond),
        )
        .await
    }

    async fn run<F>(
        &self,
        op: &'static str,
        diamond: FacetAddress,
        chain_id: ChainId,
        cancel: &CancellationToken,
        routing: F,
    ) -> Result<DiamondSnapshot>
    where
        F: Future<Output = Result<Vec<FacetEntry>>>,
    {
        let ctx = RequestContext::new();
        let timestamp = Utc::now();
        let start = Instant::now();
        log_op_start!(
            op,
            request_id = %ctx.request_id,
            diamond_address = %diamond,
            chain_id = chain_id
        );

        let result = self
            .guard(self.assemble(diamond, chain_id, timestamp, routing), cancel)
            .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(snapshot) => {
                log_op_end!(
                    op,
                    duration_ms = duration_ms,
                    request_id = %ctx.request_id,
                    facet_count = snapshot.facets.len(),
                    selector_count = snapshot.selector_count()
                );
            }
            Err(err) => {
                log_op_error!(
                    op,
                    err.clone(),
                    duration_ms = duration_ms,
                    request_id = %ctx.request_id
                );
            }
        }

        result
    }

    async fn assemble<F>(
        &self,
        diamond: FacetAddress,
        chain_id: ChainId,
        timestamp: DateTime<Utc>,
        routing: F,
    ) -> Result<DiamondSnapshot>
    where
        F: Future<Output = Result<Vec<FacetEntry>>>,
    {
        let entries = routing.await?;
        let facets = self.verify_all(entries, chain_id).await;
        DiamondSnapshot::new(diamond, chain_id, facets, timestamp)
    }

    /// Race `work` against the cancellation token and the deadline
    async fn guard<T, F>(&self, work: F, cancel: &CancellationToken) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let bounded = async {
            match self.options.deadline {
                Some(deadline) => match tokio::time::timeout(deadline, work).await {
                    Ok(result) => result,
                    Err(_) => Err(LoupeError::cancelled(format!(
                        "deadline of {}ms elapsed",
                        deadline.as_millis()
                    ))),
                },
                None => work.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LoupeError::cancelled("enumeration cancelled")),
            result = bounded => result,
        }
    }

    async fn routing_via_loupe(&self, diamond: FacetAddress) -> Result<Vec<FacetEntry>> {
        let data = self.call(&diamond, FACET_ADDRESSES, &[]).await?;
        let addresses = decode_address_array(&data)?;
        ensure_unique(&addresses)?;

        stream::iter(addresses)
            .map(|facet| async move {
                let data = self
                    .call(&diamond, FACET_FUNCTION_SELECTORS, &[facet.to_word()])
                    .await?;
                Ok::<_, LoupeError>(FacetEntry {
                    facet_address: facet,
                    selectors: decode_selector_array(&data)?,
                })
            })
            .buffered(self.options.limit())
            .try_collect()
            .await
    }

    async fn routing_via_facets(&self, diamond: FacetAddress) -> Result<Vec<FacetEntry>> {
        let data = self.call(&diamond, FACETS, &[]).await?;
        let entries = decode_facets(&data)?;
        let addresses: Vec<FacetAddress> = entries.iter().map(|e| e.facet_address).collect();
        ensure_unique(&addresses)?;
        Ok(entries)
    }

    async fn verify_all(&self, entries: Vec<FacetEntry>, chain_id: ChainId) -> Vec<FacetSnapshot> {
        let verifier = match self.verifier {
            Some(verifier) if self.options.verify => verifier,
            _ => {
                return entries
                    .into_iter()
                    .map(|e| FacetSnapshot::new(e.facet_address, e.selectors, false))
                    .collect()
            }
        };

        stream::iter(entries)
            .map(|entry| async move {
                let verified = match verifier.is_verified(&entry.facet_address, chain_id).await {
                    Ok(verified) => verified,
                    Err(err) => {
                        tracing::warn!(
                            component = module_path!(),
                            op = "verify_facet",
                            facet_address = %entry.facet_address,
                            chain_id = chain_id,
                            error = %err,
                            "verification lookup failed, recording facet as unverified"
                        );
                        false
                    }
                };
                FacetSnapshot::new(entry.facet_address, entry.selectors, verified)
            })
            .buffered(self.options.limit())
            .collect()
            .await
    }

    async fn call(
        &self,
        target: &FacetAddress,
        selector: SelectorId,
        args: &[[u8; 32]],
    ) -> Result<HexBlob> {
        let data = encode_call(selector, args);
        self.reader
            .call(target, &data)
            .await
            .map_err(|err| err.into_loupe_error(selector, target))
    }
}

fn ensure_unique(addresses: &[FacetAddress]) -> std::result::Result<(), DecodeError> {
    let mut seen = HashSet::with_capacity(addresses.len());
    for address in addresses {
        if !seen.insert(address) {
            return Err(DecodeError::DuplicateElement {
                field: "facet addresses",
                element: address.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_clamp_concurrency() {
        let options = EnumerationOptions::default().with_concurrency(0);
        assert_eq!(options.concurrency, 1);

        let raw = EnumerationOptions {
            concurrency: 0,
            ..EnumerationOptions::default()
        };
        assert_eq!(raw.limit(), 1);
    }

    #[test]
    fn test_ensure_unique() {
        let a = FacetAddress::from_bytes([1; 20]);
        let b = FacetAddress::from_bytes([2; 20]);
        assert!(ensure_unique(&[a, b]).is_ok());

        let err = ensure_unique(&[a, b, a]).unwrap_err();
        assert!(matches!(err, DecodeError::DuplicateElement { .. }));
    }
}
