//! Markdown rendering of a [`FacetDiff`] for alerts and review.

use crate::diff::model::FacetDiff;
use std::fmt::Write;

/// Render a Markdown summary of `diff`
pub fn render_diff_summary(diff: &FacetDiff) -> String {
    let mut out = String::new();

    out.push_str("## Diamond Facet Drift\n\n");
    let _ = writeln!(
        out,
        "**Diamond**: `{}` (chain {})  ",
        diff.diamond_address, diff.chain_id
    );
    let _ = writeln!(
        out,
        "**Window**: {} to {}\n",
        diff.old_timestamp.to_rfc3339(),
        diff.new_timestamp.to_rfc3339()
    );

    if diff.is_empty() {
        out.push_str("_No facet changes detected._\n");
        return out;
    }

    if !diff.added_facets.is_empty() {
        let _ = writeln!(out, "### Added Facets ({})\n", diff.added_facets.len());
        for facet in &diff.added_facets {
            let _ = writeln!(out, "- `{}`", facet);
        }
        out.push('\n');
    }

    if !diff.removed_facets.is_empty() {
        let _ = writeln!(out, "### Removed Facets ({})\n", diff.removed_facets.len());
        for facet in &diff.removed_facets {
            let _ = writeln!(out, "- `{}`", facet);
        }
        out.push('\n');
    }

    out
}
