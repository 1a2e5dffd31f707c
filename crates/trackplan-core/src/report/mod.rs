//! Delta report assembly.
//!
//! ## Guarantees
//!
//! - **Completeness**: a document is only produced when every target event
//!   and every inventory event is accounted for exactly once.
//! - **Determinism**: identical inputs produce byte-identical documents; the
//!   emitter verifies its own output survives a JSON round-trip.
//! - **Hierarchy visibility**: an invalid hierarchy is reported as an
//!   `invalid` section, never omitted.

pub mod emit;
pub mod model;

pub use emit::{check_completeness, emit, EmitContext};
pub use model::{
    DeltaDocument, DeltaIdentity, DeltaSummary, GroupTypeChanges, HierarchyFailure,
    HierarchyReport, HierarchySection, PolicyEcho, Reparented, StatusBreakdown, StatusCounts,
};
