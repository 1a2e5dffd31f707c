use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Events attributed directly to each group instance, keyed by instance id
pub type Attributions = BTreeMap<String, BTreeSet<String>>;

/// A level in the product's grouping hierarchy (account, workspace, project, ...)
///
/// Exactly the types without a `parent_type` are top-level.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupType {
    pub type_name: String,
    pub parent_type: Option<String>,
    pub is_top_level: bool,
}

impl GroupType {
    /// A top-level group type
    pub fn root(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parent_type: None,
            is_top_level: true,
        }
    }

    /// A group type nested under `parent_type`
    pub fn child_of(type_name: impl Into<String>, parent_type: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parent_type: Some(parent_type.into()),
            is_top_level: false,
        }
    }
}

/// A concrete group (e.g. `acc_1`) of some group type
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupInstance {
    pub id: String,
    pub group_type: String,
    pub parent: Option<String>,
}

impl GroupInstance {
    pub fn new(id: impl Into<String>, group_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            group_type: group_type.into(),
            parent: None,
        }
    }

    pub fn under(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}
