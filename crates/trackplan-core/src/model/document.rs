//! Inventory and target plan snapshots
//!
//! Both documents are immutable once built: construct them with the
//! builder methods, then hand shared references to the engine. A rerun
//! builds a fresh `Inventory` rather than editing the old one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::event::{Event, ObservedEvent};
use super::group::{Attributions, GroupInstance, GroupType};

/// Read-only view shared by both document kinds
pub trait PlanDocument {
    /// Label used in error messages and diagnostics ("inventory", "target_plan")
    fn label(&self) -> &'static str;

    fn events(&self) -> Vec<&Event>;

    fn group_types(&self) -> &[GroupType];

    fn groups(&self) -> &[GroupInstance];

    fn attributions(&self) -> &Attributions;

    fn event_names(&self) -> BTreeSet<&str> {
        self.events().into_iter().map(|e| e.name.as_str()).collect()
    }
}

/// Observed events and group types, as reverse-engineered from a codebase
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    events: Vec<ObservedEvent>,
    group_types: Vec<GroupType>,
    groups: Vec<GroupInstance>,
    attributions: Attributions,
}

impl Inventory {
    pub fn new(events: Vec<ObservedEvent>, group_types: Vec<GroupType>) -> Self {
        Self {
            events,
            group_types,
            groups: Vec::new(),
            attributions: Attributions::new(),
        }
    }

    pub fn with_groups(mut self, groups: Vec<GroupInstance>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_attributions(mut self, attributions: Attributions) -> Self {
        self.attributions = attributions;
        self
    }

    pub fn observed_events(&self) -> &[ObservedEvent] {
        &self.events
    }
}

impl PlanDocument for Inventory {
    fn label(&self) -> &'static str {
        "inventory"
    }

    fn events(&self) -> Vec<&Event> {
        self.events.iter().map(|o| &o.event).collect()
    }

    fn group_types(&self) -> &[GroupType] {
        &self.group_types
    }

    fn groups(&self) -> &[GroupInstance] {
        &self.groups
    }

    fn attributions(&self) -> &Attributions {
        &self.attributions
    }
}

/// The desired end state: every event listed here is intended to exist
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetPlan {
    events: Vec<Event>,
    group_types: Vec<GroupType>,
    groups: Vec<GroupInstance>,
    attributions: Attributions,
}

impl TargetPlan {
    pub fn new(events: Vec<Event>, group_types: Vec<GroupType>) -> Self {
        Self {
            events,
            group_types,
            groups: Vec::new(),
            attributions: Attributions::new(),
        }
    }

    pub fn with_groups(mut self, groups: Vec<GroupInstance>) -> Self {
        self.groups = groups;
        self
    }

    pub fn with_attributions(mut self, attributions: Attributions) -> Self {
        self.attributions = attributions;
        self
    }

    pub fn target_events(&self) -> &[Event] {
        &self.events
    }
}

impl PlanDocument for TargetPlan {
    fn label(&self) -> &'static str {
        "target_plan"
    }

    fn events(&self) -> Vec<&Event> {
        self.events.iter().collect()
    }

    fn group_types(&self) -> &[GroupType] {
        &self.group_types
    }

    fn groups(&self) -> &[GroupInstance] {
        &self.groups
    }

    fn attributions(&self) -> &Attributions {
        &self.attributions
    }
}
