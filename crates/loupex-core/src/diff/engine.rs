use crate::diff::model::FacetDiff;
use crate::errors::{LoupeError, Result};
use crate::model::{DiamondSnapshot, FacetAddress};
use std::collections::HashSet;

/// Compare two snapshots of the same Diamond
///
/// # Errors
///
/// `IncomparableSnapshots` when the Diamond address or chain id differ.
pub fn diff(old: &DiamondSnapshot, new: &DiamondSnapshot) -> Result<FacetDiff> {
    if !old.is_comparable_with(new) {
        return Err(LoupeError::IncomparableSnapshots {
            old_diamond: old.diamond_address.to_string(),
            old_chain_id: old.chain_id,
            new_diamond: new.diamond_address.to_string(),
            new_chain_id: new.chain_id,
        });
    }

    let old_facets: Vec<FacetAddress> = old.facet_addresses().copied().collect();
    let new_facets: Vec<FacetAddress> = new.facet_addresses().copied().collect();
    let (added_facets, removed_facets) = set_delta(&old_facets, &new_facets);

    Ok(FacetDiff {
        diamond_address: new.diamond_address,
        chain_id: new.chain_id,
        old_timestamp: old.timestamp,
        new_timestamp: new.timestamp,
        added_facets,
        removed_facets,
    })
}

/// `(in b but not a, in a but not b)`, each in its source order
fn set_delta(a: &[FacetAddress], b: &[FacetAddress]) -> (Vec<FacetAddress>, Vec<FacetAddress>) {
    let set_a: HashSet<&FacetAddress> = a.iter().collect();
    let set_b: HashSet<&FacetAddress> = b.iter().collect();
    let added = b.iter().filter(|f| !set_a.contains(f)).copied().collect();
    let removed = a.iter().filter(|f| !set_b.contains(f)).copied().collect();
    (added, removed)
}
