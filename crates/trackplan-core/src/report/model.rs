//! Delta document output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections are sorted `Vec`s or `BTree*` so serialization is
//! deterministic.

use serde::{Deserialize, Serialize};

use crate::delta::DeltaEntry;
use crate::errors::{ExError, PlanError};
use crate::hierarchy::HierarchyResult;
use crate::options::{NamingPolicy, ReconcileOptions};
use crate::rules::Diagnostics;

/// The reconciliation report between one inventory and one target plan.
///
/// `delta_schema_version` is always 1 for this implementation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeltaDocument {
    pub delta_schema_version: u32,
    pub identity: DeltaIdentity,
    pub policy: PolicyEcho,
    pub summary: DeltaSummary,
    /// Sorted by classification, then target name, then source name
    pub entries: Vec<DeltaEntry>,
    pub group_type_changes: GroupTypeChanges,
    pub hierarchy: HierarchyReport,
    pub diagnostics: Diagnostics,
}

/// Content digests of both inputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeltaIdentity {
    pub inventory_digest: String,
    pub target_digest: String,
}

/// The options that shaped the result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyEcho {
    pub naming_policy: NamingPolicy,
    pub rename_threshold: f64,
    pub name_weight: f64,
    pub property_weight: f64,
    pub require_single_root: bool,
}

impl From<&ReconcileOptions> for PolicyEcho {
    fn from(options: &ReconcileOptions) -> Self {
        Self {
            naming_policy: options.naming_policy,
            rename_threshold: options.rename_threshold,
            name_weight: options.name_weight,
            property_weight: options.property_weight,
            require_single_root: options.require_single_root,
        }
    }
}

/// Live/orphaned split of the inventory events absorbed by one classification
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub live: usize,
    pub orphaned: usize,
}

/// Status split for every classification that absorbs an inventory event
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusBreakdown {
    pub remove: StatusCounts,
    pub rename: StatusCounts,
    pub change: StatusCounts,
    pub keep: StatusCounts,
}

/// Per-classification counts
///
/// `add + rename + change + keep == target_events` and
/// `remove + rename + change + keep == inventory_events` always hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeltaSummary {
    pub add: usize,
    pub remove: usize,
    pub rename: usize,
    pub change: usize,
    pub keep: usize,
    pub target_events: usize,
    pub inventory_events: usize,
    pub status_breakdown: StatusBreakdown,
}

/// A group type present on both sides whose parent changed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reparented {
    /// Target-side name
    pub type_name: String,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Group type differences, compared by normalized type name
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupTypeChanges {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub reparented: Vec<Reparented>,
}

/// Why a hierarchy could not be validated
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HierarchyFailure {
    pub phase: String,
    pub code: String,
    pub message: String,
    pub offending: Vec<String>,
}

impl From<&PlanError> for HierarchyFailure {
    fn from(err: &PlanError) -> Self {
        let ex: ExError = err.clone().into();
        Self {
            phase: err.phase().as_str().to_string(),
            code: ex.code().to_string(),
            message: err.to_string(),
            offending: err.offending(),
        }
    }
}

/// Outcome of one side's hierarchy validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HierarchySection {
    Valid(HierarchyResult),
    Invalid(HierarchyFailure),
}

impl HierarchySection {
    pub fn is_valid(&self) -> bool {
        matches!(self, HierarchySection::Valid(_))
    }
}

impl From<Result<HierarchyResult, PlanError>> for HierarchySection {
    fn from(outcome: Result<HierarchyResult, PlanError>) -> Self {
        match outcome {
            Ok(result) => HierarchySection::Valid(result),
            Err(err) => HierarchySection::Invalid(HierarchyFailure::from(&err)),
        }
    }
}

/// Hierarchy sections for both documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HierarchyReport {
    pub inventory: HierarchySection,
    pub target: HierarchySection,
}
