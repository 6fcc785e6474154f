use crate::model::{ChainId, FacetAddress};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Facet-level difference between two snapshots of one Diamond
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetDiff {
    pub diamond_address: FacetAddress,
    pub chain_id: ChainId,
    pub old_timestamp: DateTime<Utc>,
    pub new_timestamp: DateTime<Utc>,

    /// Facets present only in the new snapshot, in new-snapshot order
    pub added_facets: Vec<FacetAddress>,

    /// Facets present only in the old snapshot, in old-snapshot order
    pub removed_facets: Vec<FacetAddress>,
}

impl FacetDiff {
    pub fn is_empty(&self) -> bool {
        self.added_facets.is_empty() && self.removed_facets.is_empty()
    }
}
