//! Rules evaluated over an enumerated snapshot.

pub mod compliance;

pub use compliance::{
    is_compliant, render_compliance_summary, ComplianceReport, SelectorCollision,
};
