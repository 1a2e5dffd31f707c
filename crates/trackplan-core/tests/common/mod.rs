use std::collections::BTreeSet;

use trackplan_core::model::{
    Attributions, Event, GroupInstance, GroupType, Inventory, ObservedEvent, PropertySpec,
    TargetPlan,
};

/// A required property of the given type
#[allow(dead_code)]
pub fn prop(name: &str, kind: &str) -> PropertySpec {
    PropertySpec::new(name, kind, true)
}

/// Live inventory event carrying the named string properties
#[allow(dead_code)]
pub fn live(name: &str, properties: &[&str]) -> ObservedEvent {
    properties
        .iter()
        .fold(ObservedEvent::live(name), |event, p| {
            event.with_property(prop(p, "string"))
        })
}

/// Orphaned inventory event carrying the named string properties
#[allow(dead_code)]
pub fn orphaned(name: &str, properties: &[&str]) -> ObservedEvent {
    properties
        .iter()
        .fold(ObservedEvent::orphaned(name), |event, p| {
            event.with_property(prop(p, "string"))
        })
}

/// Target plan event carrying the named string properties
#[allow(dead_code)]
pub fn planned(name: &str, properties: &[&str]) -> Event {
    properties
        .iter()
        .fold(Event::target(name), |event, p| {
            event.with_property(prop(p, "string"))
        })
}

#[allow(dead_code)]
pub fn inventory(events: Vec<ObservedEvent>) -> Inventory {
    Inventory::new(events, Vec::new())
}

#[allow(dead_code)]
pub fn target(events: Vec<Event>) -> TargetPlan {
    TargetPlan::new(events, Vec::new())
}

/// account <- workspace <- project
#[allow(dead_code)]
pub fn account_tree() -> Vec<GroupType> {
    vec![
        GroupType::root("account"),
        GroupType::child_of("workspace", "account"),
        GroupType::child_of("project", "workspace"),
    ]
}

/// acc_1 <- ws_1 <- proj_1, plus a sibling workspace ws_2
#[allow(dead_code)]
pub fn account_instances() -> Vec<GroupInstance> {
    vec![
        GroupInstance::new("acc_1", "account"),
        GroupInstance::new("ws_1", "workspace").under("acc_1"),
        GroupInstance::new("ws_2", "workspace").under("acc_1"),
        GroupInstance::new("proj_1", "project").under("ws_1"),
    ]
}

/// Build an attribution map from (instance, events) pairs
#[allow(dead_code)]
pub fn attribute(pairs: &[(&str, &[&str])]) -> Attributions {
    pairs
        .iter()
        .map(|(instance, events)| {
            (
                instance.to_string(),
                events.iter().map(|e| e.to_string()).collect::<BTreeSet<_>>(),
            )
        })
        .collect()
}
