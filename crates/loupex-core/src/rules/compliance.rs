use crate::model::{DiamondSnapshot, FacetAddress, SelectorId};
use crate::selectors;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Whether a snapshot describes a live Diamond
///
/// True iff there is at least one facet and at least one facet routes a
/// selector. This is intentionally loose: it does not require the loupe
/// selectors themselves to be routed, and selector collisions do not make a
/// snapshot non-compliant. See [`ComplianceReport`] for the wider picture.
pub fn is_compliant(snapshot: &DiamondSnapshot) -> bool {
    !snapshot.facets.is_empty() && snapshot.facets.iter().any(|f| f.has_selectors())
}

/// A selector reported by more than one facet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorCollision {
    pub selector: SelectorId,
    /// Claiming facets, in snapshot order
    pub facets: Vec<FacetAddress>,
}

/// Summary of a snapshot for monitoring output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub compliant: bool,
    pub facet_count: usize,
    /// Selectors across all facets, repeats counted
    pub selector_count: usize,
    pub unique_selector_count: usize,
    pub verified_facet_count: usize,
    /// Facets whose selector set is empty
    pub empty_facets: Vec<FacetAddress>,
    /// Ordered by selector
    pub collisions: Vec<SelectorCollision>,
}

impl ComplianceReport {
    pub fn evaluate(snapshot: &DiamondSnapshot) -> Self {
        let mut claims: BTreeMap<SelectorId, Vec<FacetAddress>> = BTreeMap::new();
        for facet in &snapshot.facets {
            for selector in &facet.selectors {
                claims.entry(*selector).or_default().push(facet.facet_address);
            }
        }

        let collisions = claims
            .iter()
            .filter(|(_, facets)| facets.len() > 1)
            .map(|(selector, facets)| SelectorCollision {
                selector: *selector,
                facets: facets.clone(),
            })
            .collect();

        Self {
            compliant: is_compliant(snapshot),
            facet_count: snapshot.facets.len(),
            selector_count: snapshot.selector_count(),
            unique_selector_count: claims.len(),
            verified_facet_count: snapshot.facets.iter().filter(|f| f.verified).count(),
            empty_facets: snapshot
                .facets
                .iter()
                .filter(|f| !f.has_selectors())
                .map(|f| f.facet_address)
                .collect(),
            collisions,
        }
    }

    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }
}

/// Render a Markdown summary of a snapshot and its report
pub fn render_compliance_summary(snapshot: &DiamondSnapshot, report: &ComplianceReport) -> String {
    let mut out = String::new();

    out.push_str("## Diamond Compliance\n\n");
    let _ = writeln!(
        out,
        "**Diamond**: `{}` (chain {})  ",
        snapshot.diamond_address, snapshot.chain_id
    );
    let _ = writeln!(out, "**Taken**: {}  ", snapshot.timestamp.to_rfc3339());
    let _ = writeln!(
        out,
        "**Status**: {}\n",
        if report.compliant {
            "Compliant"
        } else {
            "Not compliant"
        }
    );

    out.push_str("| Facets | Selectors | Unique | Verified |\n|---|---|---|---|\n");
    let _ = writeln!(
        out,
        "| {} | {} | {} | {} |\n",
        report.facet_count,
        report.selector_count,
        report.unique_selector_count,
        report.verified_facet_count
    );

    if !snapshot.facets.is_empty() {
        out.push_str("### Facets\n\n");
        for facet in &snapshot.facets {
            let _ = writeln!(
                out,
                "- `{}`: {} selectors{}",
                facet.facet_address,
                facet.selectors.len(),
                if facet.verified { ", verified" } else { "" }
            );
            for selector in &facet.selectors {
                if let Some(signature) = selectors::describe(selector) {
                    let _ = writeln!(out, "  - `{}` {}", selector, signature);
                }
            }
        }
        out.push('\n');
    }

    if report.has_collisions() {
        let _ = writeln!(out, "### Selector Collisions ({})\n", report.collisions.len());
        for collision in &report.collisions {
            let facets: Vec<String> = collision
                .facets
                .iter()
                .map(|f| format!("`{}`", f))
                .collect();
            let _ = writeln!(out, "- `{}`: {}", collision.selector, facets.join(", "));
        }
        out.push('\n');
    }

    out
}
