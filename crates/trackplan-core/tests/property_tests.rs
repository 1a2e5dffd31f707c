#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use trackplan_core::delta::Classification;
use trackplan_core::errors::PlanError;
use trackplan_core::hierarchy::{roll_up, validate_and_roll_up};
use trackplan_core::model::{
    Attributions, Event, GroupInstance, GroupType, Inventory, ObservedEvent, PropertySpec,
    TargetPlan,
};
use trackplan_core::normalize::normalize;
use trackplan_core::{reconcile, NamingPolicy, ReconcileOptions};

const WORDS: &[&str] = &[
    "video", "report", "plan", "signup", "invite", "page", "button", "created", "viewed",
    "clicked", "upgraded", "sent", "exported", "deleted",
];
const PROPS: &[&str] = &["duration", "plan", "role", "format", "source", "count"];

fn event_name() -> impl Strategy<Value = String> {
    (
        prop::sample::select(WORDS),
        prop::sample::select(WORDS),
        prop::sample::select(&["_", ".", "-", ""][..]),
    )
        .prop_map(|(a, b, sep)| {
            if sep.is_empty() {
                let mut tail = b.to_string();
                if let Some(first) = tail.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                format!("{a}{tail}")
            } else {
                format!("{a}{sep}{b}")
            }
        })
}

fn properties() -> impl Strategy<Value = Vec<PropertySpec>> {
    prop::sample::subsequence(PROPS, 0..=3).prop_map(|names| {
        names
            .into_iter()
            .map(|n| PropertySpec::new(n, "string", false))
            .collect()
    })
}

fn unique_by_name<T>(items: Vec<(String, T)>) -> Vec<(String, T)> {
    let mut seen = BTreeSet::new();
    items
        .into_iter()
        .filter(|(name, _)| seen.insert(name.clone()))
        .collect()
}

fn documents() -> impl Strategy<Value = (Inventory, TargetPlan)> {
    let inv = prop::collection::vec((event_name(), properties(), any::<bool>()), 0..12);
    let tgt = prop::collection::vec((event_name(), properties()), 0..12);
    (inv, tgt).prop_map(|(inv, tgt)| {
        let inv = unique_by_name(
            inv.into_iter()
                .map(|(name, props, orphaned)| (name, (props, orphaned)))
                .collect(),
        );
        let tgt = unique_by_name(tgt);

        let observed = inv
            .into_iter()
            .map(|(name, (props, orphaned))| {
                let base = if orphaned {
                    ObservedEvent::orphaned(name)
                } else {
                    ObservedEvent::live(name)
                };
                props.into_iter().fold(base, |e, p| e.with_property(p))
            })
            .collect();
        let planned = tgt
            .into_iter()
            .map(|(name, props)| props.into_iter().fold(Event::target(name), |e, p| e.with_property(p)))
            .collect();

        (
            Inventory::new(observed, Vec::new()),
            TargetPlan::new(planned, Vec::new()),
        )
    })
}

/// A random forest of group types: type i's parent is some j < i, or none.
fn forest() -> impl Strategy<Value = (Vec<GroupType>, Vec<GroupInstance>, Attributions)> {
    prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 1..10).prop_map(
        |parents| {
            let types: Vec<GroupType> = parents
                .iter()
                .enumerate()
                .map(|(i, parent)| match parent {
                    Some(idx) if i > 0 => {
                        GroupType::child_of(format!("t{i}"), format!("t{}", idx.index(i)))
                    }
                    _ => GroupType::root(format!("t{i}")),
                })
                .collect();

            // one instance per type, chained along the type hierarchy
            let instances: Vec<GroupInstance> = types
                .iter()
                .map(|t| {
                    let instance = GroupInstance::new(format!("{}_1", t.type_name), &t.type_name);
                    match &t.parent_type {
                        Some(parent) => instance.under(format!("{parent}_1")),
                        None => instance,
                    }
                })
                .collect();

            let attributions = instances
                .iter()
                .enumerate()
                .filter(|(i, _)| i % 2 == 0)
                .map(|(i, inst)| (inst.id.clone(), BTreeSet::from([format!("event_{i}")])))
                .collect();

            (types, instances, attributions)
        },
    )
}

proptest! {
    #[test]
    fn prop_normalize_is_idempotent(name in "[A-Za-z0-9 ._-]{0,24}") {
        let once = normalize(&name);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn prop_every_target_event_referenced_once(
        (inv, tgt) in documents(),
        canonical in any::<bool>(),
    ) {
        let policy = if canonical { NamingPolicy::Canonical } else { NamingPolicy::Literal };
        let opts = ReconcileOptions::default().with_naming_policy(policy);
        let doc = reconcile(&inv, &tgt, &opts).unwrap();

        for event in tgt.target_events() {
            let refs = doc
                .entries
                .iter()
                .filter(|e| e.target_name.as_deref() == Some(event.name.as_str()))
                .count();
            prop_assert_eq!(refs, 1);
        }

        let s = &doc.summary;
        prop_assert_eq!(s.add + s.rename + s.change + s.keep, tgt.target_events().len());
        prop_assert_eq!(s.remove + s.rename + s.change + s.keep, inv.observed_events().len());
    }

    #[test]
    fn prop_removed_events_have_no_unmatched_counterpart((inv, tgt) in documents()) {
        let doc = reconcile(&inv, &tgt, &ReconcileOptions::default()).unwrap();

        let added: BTreeSet<String> = doc
            .entries
            .iter()
            .filter(|e| e.classification == Classification::Add)
            .filter_map(|e| e.target_name.as_deref().map(normalize))
            .collect();
        for entry in doc.entries.iter().filter(|e| e.classification == Classification::Remove) {
            let source = entry.source_name.as_deref().unwrap();
            prop_assert!(inv.observed_events().iter().any(|e| e.name() == source));
            prop_assert!(!added.contains(&normalize(source)));
        }
    }

    #[test]
    fn prop_reconcile_is_deterministic((inv, tgt) in documents()) {
        let opts = ReconcileOptions::default();
        let a = serde_json::to_vec(&reconcile(&inv, &tgt, &opts).unwrap()).unwrap();
        let b = serde_json::to_vec(&reconcile(&inv.clone(), &tgt.clone(), &opts).unwrap()).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_any_valid_threshold_survives_emission(
        (inv, tgt) in documents(),
        threshold in 0.0f64..=1.0,
    ) {
        let opts = ReconcileOptions::default().with_threshold(threshold);
        let doc = reconcile(&inv, &tgt, &opts).unwrap();
        prop_assert_eq!(doc.policy.rename_threshold.to_bits(), threshold.to_bits());
    }

    #[test]
    fn prop_roll_up_is_idempotent((types, instances, attributions) in forest()) {
        let result = validate_and_roll_up(&types, &instances, &attributions, &ReconcileOptions::default()).unwrap();
        let again = roll_up(&result);
        prop_assert_eq!(&roll_up(&again), &again);
        prop_assert_eq!(&again, &result);
    }

    #[test]
    fn prop_two_cycle_always_rejected((mut types, _, _) in forest()) {
        types.push(GroupType::child_of("cycle_a", "cycle_b"));
        types.push(GroupType::child_of("cycle_b", "cycle_a"));

        let err = validate_and_roll_up(&types, &[], &Attributions::new(), &ReconcileOptions::default()).unwrap_err();
        let is_cycle = matches!(err, PlanError::CycleDetected { .. });
        prop_assert!(is_cycle);
    }
}
