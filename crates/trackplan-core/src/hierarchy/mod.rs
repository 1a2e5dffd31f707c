//! Group hierarchy validation and attribution rollup.
//!
//! Group types form a forest through `parent_type`; group instances form a
//! forest through `parent`. Validation runs in a fixed order and stops at
//! the first failure:
//!
//! 1. duplicate type/instance names
//! 2. `is_top_level` consistent with `parent_type`
//! 3. type parents exist (`DanglingParent`)
//! 4. type parent chains terminate (`CycleDetected`)
//! 5. a single top-level type, when required (`MultipleRoots`)
//! 6. instance types declared, instance parents exist, instance chains
//!    terminate, instance parent types agree with the type hierarchy
//! 7. attributions name declared instances
//!
//! Rollup then walks instances leaves-first so every instance's effective
//! attribution is its own events plus everything beneath it.

mod rollup;
mod validate;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::model::{Attributions, GroupInstance, GroupType};
use crate::options::ReconcileOptions;

pub use rollup::roll_up;

/// A validated group type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNode {
    pub type_name: String,
    pub parent_type: Option<String>,
    pub is_top_level: bool,
    /// Distance from the top-level type of its tree
    pub depth: usize,
    pub children: Vec<String>,
}

/// A validated group instance with its attribution sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceNode {
    pub id: String,
    #[serde(rename = "type")]
    pub group_type: String,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub depth: usize,
    /// Events attributed to this instance itself
    pub direct: BTreeSet<String>,
    /// `direct` plus the effective sets of every child
    pub effective: BTreeSet<String>,
}

/// Validated, rolled-up hierarchy of one document
///
/// `types` and `instances` are in topological order, roots first, with
/// siblings sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyResult {
    pub types: Vec<TypeNode>,
    pub roots: Vec<String>,
    pub instances: Vec<InstanceNode>,
}

impl HierarchyResult {
    pub fn instance(&self, id: &str) -> Option<&InstanceNode> {
        self.instances.iter().find(|node| node.id == id)
    }

    pub fn group_type(&self, type_name: &str) -> Option<&TypeNode> {
        self.types.iter().find(|node| node.type_name == type_name)
    }
}

/// Validate a document's group hierarchy and roll attributions up to ancestors.
///
/// An empty hierarchy is valid, and a hierarchy with no attributions rolls up
/// to empty sets everywhere.
///
/// # Errors
///
/// The first hierarchy violation found, in the order listed in the module docs.
pub fn validate_and_roll_up(
    types: &[GroupType],
    instances: &[GroupInstance],
    attributions: &Attributions,
    options: &ReconcileOptions,
) -> Result<HierarchyResult> {
    let type_nodes = validate::validate_types(types, options.require_single_root)?;
    let instance_nodes = validate::validate_instances(&type_nodes, instances, attributions)?;

    let roots = type_nodes
        .iter()
        .filter(|node| node.is_top_level)
        .map(|node| node.type_name.clone())
        .collect();

    let result = roll_up(&HierarchyResult {
        types: type_nodes,
        roots,
        instances: instance_nodes,
    });

    tracing::debug!(
        type_len = result.types.len(),
        root_len = result.roots.len(),
        instance_len = result.instances.len(),
        "validated hierarchy"
    );

    Ok(result)
}
