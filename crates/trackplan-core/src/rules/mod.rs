//! Document-level checks run before matching.
//!
//! `validation` fails fast on malformed input; `diagnostics` reports
//! suspicious but legal content without failing the run.

pub mod diagnostics;
pub mod validation;

pub use diagnostics::{collect_diagnostics, Diagnostics, NormalizedCollision, UnresolvedGroupLevel};
pub use validation::{validate_document, validate_documents};
