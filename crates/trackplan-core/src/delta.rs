//! Delta rows produced by classification.

use serde::{Deserialize, Serialize};

use crate::model::{EventCategory, EventStatus, PropertySpec};

/// Terminal classification of one event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Target-only: instrumentation to add
    Add,
    /// Inventory-only: instrumentation to remove
    Remove,
    /// Paired under a different name
    Rename,
    /// Same name, different properties
    Change,
    /// Same name, same properties
    Keep,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Add => "add",
            Classification::Remove => "remove",
            Classification::Rename => "rename",
            Classification::Change => "change",
            Classification::Keep => "keep",
        }
    }

    /// True for classifications that account for a target event
    pub fn covers_target(&self) -> bool {
        !matches!(self, Classification::Remove)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyChangeKind {
    Added,
    Removed,
    /// Declared type differs (requiredness may differ too)
    TypeChanged,
    RequirednessChanged,
    /// Same normalized name, different raw name (literal naming policy only)
    Renamed,
}

/// One difference between the inventory and target property sets of a pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyChange {
    /// Target-side name when present, else the inventory-side name
    pub name: String,
    pub kind: PropertyChangeKind,
    pub before: Option<PropertySpec>,
    pub after: Option<PropertySpec>,
}

/// Before/after values of an informational field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange<T> {
    pub before: T,
    pub after: T,
}

impl<T: PartialEq> FieldChange<T> {
    /// `Some` only when the values differ
    pub fn between(before: T, after: T) -> Option<Self> {
        if before == after {
            None
        } else {
            Some(Self { before, after })
        }
    }
}

/// One row of the delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaEntry {
    pub classification: Classification,
    pub source_name: Option<String>,
    pub target_name: Option<String>,
    /// Status of the inventory event absorbed by this entry
    pub source_status: Option<EventStatus>,
    /// Combined similarity score of a paired entry
    pub similarity: Option<f64>,
    pub property_changes: Vec<PropertyChange>,
    pub category_change: Option<FieldChange<EventCategory>>,
    pub group_level_change: Option<FieldChange<Option<String>>>,
}

impl DeltaEntry {
    /// Ordering key used to lay entries out deterministically
    pub fn sort_key(&self) -> (Classification, &str, &str) {
        (
            self.classification,
            self.target_name.as_deref().unwrap_or(""),
            self.source_name.as_deref().unwrap_or(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_change_only_when_different() {
        assert!(FieldChange::between(1, 1).is_none());
        let change = FieldChange::between("a", "b").unwrap();
        assert_eq!(change.before, "a");
        assert_eq!(change.after, "b");
    }

    #[test]
    fn test_only_remove_leaves_target_uncovered() {
        assert!(Classification::Add.covers_target());
        assert!(Classification::Keep.covers_target());
        assert!(!Classification::Remove.covers_target());
    }

    #[test]
    fn test_classification_serializes_snake_case() {
        let s = serde_json::to_string(&Classification::Rename).unwrap();
        assert_eq!(s, "\"rename\"");
    }
}
