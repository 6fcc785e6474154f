//! Facet drift detection between two snapshots of one Diamond.
//!
//! ```ignore
//! use loupex_core::diff::{diff, render_diff_summary};
//!
//! let drift = diff(&previous, &current)?;
//! println!("{}", render_diff_summary(&drift));
//! ```
//!
//! - Only snapshots of the same Diamond on the same chain are comparable.
//! - Facet additions and removals are reported; selector-level changes
//!   within a surviving facet are not.
//! - Output order follows the snapshots, so identical inputs always yield
//!   identical output.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::diff;
pub use human_summary::render_diff_summary;
pub use model::FacetDiff;
