//! Trackplan Core - tracking-plan reconciliation engine
//!
//! This crate compares an observed event inventory against a desired target
//! plan and produces a deterministic delta:
//! - Document model for inventories, target plans and group hierarchies
//! - Name normalization across casing and separator conventions
//! - Greedy similarity matching with deterministic tie-breaks
//! - Classification into Add / Remove / Rename / Change / Keep
//! - Group hierarchy validation and attribution rollup
//! - Delta document assembly with completeness and determinism checks
//!
//! The engine performs no I/O; documents are handed to it already loaded.

pub mod classify;
pub mod delta;
pub mod digest;
pub mod engine;
pub mod errors;
pub mod hierarchy;
pub mod logging_facility;
pub mod matching;
pub mod model;
pub mod normalize;
pub mod options;
pub mod report;
pub mod rules;

// Re-export commonly used types
pub use delta::{Classification, DeltaEntry};
pub use engine::{check_hierarchy, reconcile};
pub use errors::{ExError, ExErrorKind, PlanError, Result};
pub use model::{Event, GroupInstance, GroupType, Inventory, ObservedEvent, TargetPlan};
pub use options::{NamingPolicy, ReconcileOptions};
pub use report::DeltaDocument;
