use crate::errors::{LoupeError, Result};
use crate::model::ids::{ChainId, FacetAddress, SelectorId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One facet as seen by a single enumeration
///
/// Produced fresh on every enumeration and replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSnapshot {
    /// Address the Diamond routes to
    pub facet_address: FacetAddress,

    /// Selectors routed to this facet
    pub selectors: BTreeSet<SelectorId>,

    /// Advisory explorer verification status (false when the lookup failed)
    pub verified: bool,
}

impl FacetSnapshot {
    pub fn new(
        facet_address: FacetAddress,
        selectors: impl IntoIterator<Item = SelectorId>,
        verified: bool,
    ) -> Self {
        Self {
            facet_address,
            selectors: selectors.into_iter().collect(),
            verified,
        }
    }

    pub fn has_selectors(&self) -> bool {
        !self.selectors.is_empty()
    }
}

/// The full routing table of a Diamond at one point in time
///
/// The unit of comparison for drift detection. Facet order is the order
/// reported by `facetAddresses()`. Deserialization goes through
/// [`DiamondSnapshot::new`], so a persisted snapshot listing a facet twice is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDiamondSnapshot")]
pub struct DiamondSnapshot {
    pub diamond_address: FacetAddress,
    pub chain_id: ChainId,
    pub facets: Vec<FacetSnapshot>,
    /// Enumeration start time
    pub timestamp: DateTime<Utc>,
}

/// Unchecked wire form of [`DiamondSnapshot`]
#[derive(Deserialize)]
struct RawDiamondSnapshot {
    diamond_address: FacetAddress,
    chain_id: ChainId,
    facets: Vec<FacetSnapshot>,
    timestamp: DateTime<Utc>,
}

impl TryFrom<RawDiamondSnapshot> for DiamondSnapshot {
    type Error = LoupeError;

    fn try_from(raw: RawDiamondSnapshot) -> Result<Self> {
        Self::new(raw.diamond_address, raw.chain_id, raw.facets, raw.timestamp)
    }
}

impl DiamondSnapshot {
    /// Assemble a snapshot, enforcing unique facet addresses
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if two facets share an address.
    pub fn new(
        diamond_address: FacetAddress,
        chain_id: ChainId,
        facets: Vec<FacetSnapshot>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        let mut seen = HashSet::with_capacity(facets.len());
        for facet in &facets {
            if !seen.insert(facet.facet_address) {
                return Err(LoupeError::InvalidInput {
                    reason: format!(
                        "facet {} appears twice in snapshot of {}",
                        facet.facet_address, diamond_address
                    ),
                });
            }
        }

        Ok(Self {
            diamond_address,
            chain_id,
            facets,
            timestamp,
        })
    }

    /// Look up a facet by address
    pub fn facet(&self, address: &FacetAddress) -> Option<&FacetSnapshot> {
        self.facets.iter().find(|f| &f.facet_address == address)
    }

    pub fn facet_addresses(&self) -> impl Iterator<Item = &FacetAddress> {
        self.facets.iter().map(|f| &f.facet_address)
    }

    /// Total selectors across all facets (repeats counted)
    pub fn selector_count(&self) -> usize {
        self.facets.iter().map(|f| f.selectors.len()).sum()
    }

    /// Which facet routes `selector`, first match in facet order
    pub fn facet_for_selector(&self, selector: &SelectorId) -> Option<&FacetAddress> {
        self.facets
            .iter()
            .find(|f| f.selectors.contains(selector))
            .map(|f| &f.facet_address)
    }

    /// Whether `other` describes the same contract on the same chain
    pub fn is_comparable_with(&self, other: &DiamondSnapshot) -> bool {
        self.diamond_address == other.diamond_address && self.chain_id == other.chain_id
    }
}
