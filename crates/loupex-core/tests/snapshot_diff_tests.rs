#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, Utc};
use loupex_core::diff::{diff, render_diff_summary};
use loupex_core::errors::{ExError, ExErrorKind};
use loupex_core::{DiamondSnapshot, FacetAddress, FacetSnapshot, LoupeError, SelectorId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn addr(byte: u8) -> FacetAddress {
    FacetAddress::from_bytes([byte; 20])
}

fn sel(byte: u8) -> SelectorId {
    SelectorId::from_bytes([byte; 4])
}

fn snapshot_of(diamond: u8, chain_id: u64, facets: &[(u8, &[u8])]) -> DiamondSnapshot {
    let facets = facets
        .iter()
        .map(|(a, sels)| FacetSnapshot::new(addr(*a), sels.iter().map(|s| sel(*s)), false))
        .collect();
    DiamondSnapshot::new(addr(diamond), chain_id, facets, Utc::now()).unwrap()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_single_added_facet() {
    let old = snapshot_of(0xdd, 42161, &[(1, &[1])]);
    let mut new = snapshot_of(0xdd, 42161, &[(1, &[1]), (2, &[2])]);
    new.timestamp = old.timestamp + Duration::minutes(5);

    let drift = diff(&old, &new).unwrap();
    assert_eq!(drift.added_facets, vec![addr(2)]);
    assert!(drift.removed_facets.is_empty());
    assert_eq!(drift.old_timestamp, old.timestamp);
    assert_eq!(drift.new_timestamp, new.timestamp);
}

#[test]
fn test_removed_facets_in_old_order() {
    let old = snapshot_of(0xdd, 42161, &[(3, &[]), (1, &[]), (2, &[])]);
    let new = snapshot_of(0xdd, 42161, &[(1, &[])]);

    let drift = diff(&old, &new).unwrap();
    assert_eq!(drift.removed_facets, vec![addr(3), addr(2)]);
    assert!(drift.added_facets.is_empty());
}

#[test]
fn test_selector_changes_are_not_reported() {
    let old = snapshot_of(0xdd, 42161, &[(1, &[1, 2])]);
    let new = snapshot_of(0xdd, 42161, &[(1, &[3])]);

    let drift = diff(&old, &new).unwrap();
    assert!(drift.is_empty());
}

#[test]
fn test_different_diamonds_are_incomparable() {
    let old = snapshot_of(0xdd, 42161, &[(1, &[1])]);
    let new = snapshot_of(0xee, 42161, &[(1, &[1])]);

    let err = diff(&old, &new).unwrap_err();
    assert!(matches!(err, LoupeError::IncomparableSnapshots { .. }));

    let ex: ExError = err.into();
    assert_eq!(ex.kind(), ExErrorKind::IncomparableSnapshots);
    assert_eq!(ex.code(), "ERR_INCOMPARABLE_SNAPSHOTS");
}

#[test]
fn test_different_chains_are_incomparable() {
    let old = snapshot_of(0xdd, 1, &[(1, &[1])]);
    let new = snapshot_of(0xdd, 42161, &[(1, &[1])]);

    match diff(&old, &new).unwrap_err() {
        LoupeError::IncomparableSnapshots {
            old_chain_id,
            new_chain_id,
            ..
        } => {
            assert_eq!(old_chain_id, 1);
            assert_eq!(new_chain_id, 42161);
        }
        other => panic!("expected IncomparableSnapshots, got {:?}", other),
    }
}

#[test]
fn test_diff_is_deterministic() {
    let old = snapshot_of(0xdd, 42161, &[(1, &[]), (2, &[]), (3, &[])]);
    let new = snapshot_of(0xdd, 42161, &[(4, &[]), (2, &[]), (5, &[])]);

    let first = serde_json::to_string(&diff(&old, &new).unwrap()).unwrap();
    let second = serde_json::to_string(&diff(&old, &new).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_summary_lists_both_sections() {
    let old = snapshot_of(0xdd, 42161, &[(1, &[]), (2, &[])]);
    let new = snapshot_of(0xdd, 42161, &[(2, &[]), (3, &[])]);

    let summary = render_diff_summary(&diff(&old, &new).unwrap());
    assert!(summary.contains("### Added Facets (1)"));
    assert!(summary.contains("### Removed Facets (1)"));
    assert!(summary.contains(&addr(3).to_string()));
    assert!(summary.contains(&addr(1).to_string()));
}
