//! Plan document format v1
//!
//! Defines the YAML/JSON structure shared by inventories and target plans

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use trackplan_core::model::{EventCategory, EventStatus, PropertySpec};

/// Which side of a reconciliation a document describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Inventory,
    TargetPlan,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Inventory => "inventory",
            DocumentKind::TargetPlan => "target_plan",
        }
    }
}

/// Top-level document structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentV1 {
    /// Schema version (must be 1 for this format)
    pub schema_version: u32,

    pub kind: DocumentKind,

    #[serde(default)]
    pub group_types: Vec<GroupTypeV1>,

    /// Concrete group instances
    #[serde(default)]
    pub groups: Vec<GroupV1>,

    #[serde(default)]
    pub events: Vec<EventV1>,

    /// Instance id -> names of events attributed directly to it
    #[serde(default)]
    pub attributions: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupTypeV1 {
    pub type_name: String,

    #[serde(default)]
    pub parent_type: Option<String>,

    /// Derived from `parent_type` when absent
    #[serde(default)]
    pub is_top_level: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupV1 {
    pub id: String,

    #[serde(rename = "type")]
    pub group_type: String,

    #[serde(default)]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventV1 {
    pub name: String,

    #[serde(default)]
    pub category: EventCategory,

    #[serde(default)]
    pub group_level: Option<String>,

    /// Inventory only
    #[serde(default)]
    pub status: Option<EventStatus>,

    #[serde(default)]
    pub properties: Vec<PropertySpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_document() {
        let yaml = r#"
schema_version: 1
kind: target_plan
"#;
        let doc: DocumentV1 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(doc.kind, DocumentKind::TargetPlan);
        assert!(doc.events.is_empty());
        assert!(doc.attributions.is_empty());
    }

    #[test]
    fn test_property_defaults() {
        let yaml = r#"
schema_version: 1
kind: inventory
events:
  - name: video_created
    properties:
      - name: duration
"#;
        let doc: DocumentV1 = serde_yaml::from_str(yaml).unwrap();
        let property = &doc.events[0].properties[0];
        assert_eq!(property.kind, "string");
        assert!(!property.required);
        assert_eq!(doc.events[0].category, EventCategory::Other);
        assert_eq!(doc.events[0].status, None);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
schema_version: 1
kind: inventory
evnts: []
"#;
        assert!(serde_yaml::from_str::<DocumentV1>(yaml).is_err());
    }
}
