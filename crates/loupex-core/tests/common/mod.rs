use async_trait::async_trait;
use loupex_core::abi::{encode_address_array, encode_call, encode_selector_array};
use loupex_core::selectors::{FACET_ADDRESSES, FACET_FUNCTION_SELECTORS};
use loupex_core::{CallError, ChainId, FacetAddress, HexBlob, ReadCall, SelectorId, VerificationLookup};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[allow(dead_code)]
pub fn addr(byte: u8) -> FacetAddress {
    FacetAddress::from_bytes([byte; 20])
}

#[allow(dead_code)]
pub fn sel(byte: u8) -> SelectorId {
    SelectorId::from_bytes([byte; 4])
}

/// In-memory `eth_call` responder keyed by target and call data
#[derive(Default)]
pub struct MockChain {
    responses: HashMap<(FacetAddress, HexBlob), Result<HexBlob, CallError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[allow(dead_code)]
impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A Diamond whose loupe reports `facets` in order
    pub fn diamond(diamond: FacetAddress, facets: &[(FacetAddress, &[SelectorId])]) -> Self {
        let addresses: Vec<FacetAddress> = facets.iter().map(|(a, _)| *a).collect();
        let mut chain = Self::new().respond(
            diamond,
            encode_call(FACET_ADDRESSES, &[]),
            Ok(encode_address_array(&addresses)),
        );
        for (facet, selectors) in facets {
            chain = chain.respond(
                diamond,
                selectors_call(facet),
                Ok(encode_selector_array(selectors)),
            );
        }
        chain
    }

    pub fn respond(
        mut self,
        to: FacetAddress,
        data: HexBlob,
        response: Result<HexBlob, CallError>,
    ) -> Self {
        self.responses.insert((to, data), response);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[allow(dead_code)]
pub fn selectors_call(facet: &FacetAddress) -> HexBlob {
    encode_call(FACET_FUNCTION_SELECTORS, &[facet.to_word()])
}

#[async_trait]
impl ReadCall for MockChain {
    async fn call(&self, to: &FacetAddress, data: &HexBlob) -> Result<HexBlob, CallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .get(&(*to, data.clone()))
            .cloned()
            .unwrap_or_else(|| Err(CallError::rpc(-32601, format!("no mock response for {}", data))))
    }
}

/// Verification lookup answering from a fixed table; unknown facets are
/// unverified
#[derive(Default)]
pub struct MockVerifier {
    answers: HashMap<FacetAddress, Result<bool, CallError>>,
    lookups: AtomicUsize,
}

#[allow(dead_code)]
impl MockVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, facet: FacetAddress, answer: Result<bool, CallError>) -> Self {
        self.answers.insert(facet, answer);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerificationLookup for MockVerifier {
    async fn is_verified(
        &self,
        address: &FacetAddress,
        _chain_id: ChainId,
    ) -> Result<bool, CallError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.answers.get(address).cloned().unwrap_or(Ok(false))
    }
}
