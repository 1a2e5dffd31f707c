use std::collections::{BTreeMap, BTreeSet};

use crate::delta::{Classification, DeltaEntry};
use crate::digest::document_digest;
use crate::errors::{PlanError, Result};
use crate::model::{EventStatus, GroupType, Inventory, PlanDocument, TargetPlan};
use crate::normalize::normalize;
use crate::options::ReconcileOptions;
use crate::rules::Diagnostics;

use super::model::{
    DeltaDocument, DeltaIdentity, DeltaSummary, GroupTypeChanges, HierarchyReport, PolicyEcho,
    Reparented, StatusCounts,
};

/// Inputs the emitter reads besides the entries and hierarchy
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub inventory: &'a Inventory,
    pub target: &'a TargetPlan,
    pub options: &'a ReconcileOptions,
    pub diagnostics: &'a Diagnostics,
}

/// Assemble the delta document.
///
/// Entries are sorted by classification, target name, then source name. The
/// completeness check runs before anything is assembled, and the finished
/// document must survive a JSON round-trip unchanged.
///
/// # Errors
///
/// - `IncompleteDelta` if the entries do not account for every event exactly once
/// - `Serialization` if an input document cannot be digested
/// - `NonDeterministicOutput` if the document fails its round-trip check
pub fn emit(
    mut entries: Vec<DeltaEntry>,
    hierarchy: HierarchyReport,
    ctx: EmitContext<'_>,
) -> Result<DeltaDocument> {
    check_completeness(&entries, ctx.inventory, ctx.target)?;

    entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

    let document = DeltaDocument {
        delta_schema_version: 1,
        identity: DeltaIdentity {
            inventory_digest: document_digest(ctx.inventory)?,
            target_digest: document_digest(ctx.target)?,
        },
        policy: PolicyEcho::from(ctx.options),
        summary: summarize(&entries, ctx.inventory, ctx.target),
        group_type_changes: group_type_changes(
            ctx.inventory.group_types(),
            ctx.target.group_types(),
        ),
        entries,
        hierarchy,
        diagnostics: ctx.diagnostics.clone(),
    };

    // Determinism guard: round-trip through JSON must produce an equal struct
    let serialized = serde_json::to_string(&document)?;
    let reparsed: DeltaDocument =
        serde_json::from_str(&serialized).map_err(|e| PlanError::NonDeterministicOutput {
            reason: format!("failed to re-parse: {e}"),
        })?;
    if reparsed != document {
        return Err(PlanError::NonDeterministicOutput {
            reason: "round-trip produced a different document".to_string(),
        });
    }

    tracing::debug!(entry_len = document.entries.len(), "emitted delta document");

    Ok(document)
}

/// Verify the entries account for every event exactly once.
///
/// - every target event is the `target_name` of exactly one entry, and that
///   entry is an Add, Rename, Change or Keep
/// - every inventory event is the `source_name` of exactly one entry, and
///   only Add entries have no source
/// - no entry names an event missing from its document
/// - no Remove shares a normalized name with an Add
///
/// # Errors
///
/// `IncompleteDelta` describing the first violation.
pub fn check_completeness(
    entries: &[DeltaEntry],
    inventory: &Inventory,
    target: &TargetPlan,
) -> Result<()> {
    let mut target_refs: BTreeMap<&str, usize> =
        target.event_names().into_iter().map(|n| (n, 0)).collect();
    let mut inventory_refs: BTreeMap<&str, usize> =
        inventory.event_names().into_iter().map(|n| (n, 0)).collect();

    for entry in entries {
        let covers_target = entry.classification.covers_target();
        match (&entry.target_name, covers_target) {
            (Some(name), true) => match target_refs.get_mut(name.as_str()) {
                Some(count) => *count += 1,
                None => return Err(incomplete(format!("unknown target event '{name}'"))),
            },
            (None, true) => {
                return Err(incomplete(format!(
                    "{} entry without a target event",
                    entry.classification.as_str()
                )))
            }
            (Some(name), false) => {
                return Err(incomplete(format!("remove entry names target event '{name}'")))
            }
            (None, false) => {}
        }

        let has_source = entry.classification != Classification::Add;
        match (&entry.source_name, has_source) {
            (Some(name), true) => match inventory_refs.get_mut(name.as_str()) {
                Some(count) => *count += 1,
                None => return Err(incomplete(format!("unknown inventory event '{name}'"))),
            },
            (None, true) => {
                return Err(incomplete(format!(
                    "{} entry without an inventory event",
                    entry.classification.as_str()
                )))
            }
            (Some(name), false) => {
                return Err(incomplete(format!("add entry names inventory event '{name}'")))
            }
            (None, false) => {}
        }
    }

    for (side, refs) in [("target", &target_refs), ("inventory", &inventory_refs)] {
        if let Some((name, count)) = refs.iter().find(|(_, count)| **count != 1) {
            return Err(incomplete(format!(
                "{side} event '{name}' referenced {count} times"
            )));
        }
    }

    let added: BTreeSet<String> = entries
        .iter()
        .filter(|e| e.classification == Classification::Add)
        .filter_map(|e| e.target_name.as_deref().map(normalize))
        .collect();
    if let Some(name) = entries
        .iter()
        .filter(|e| e.classification == Classification::Remove)
        .filter_map(|e| e.source_name.as_deref())
        .find(|name| added.contains(&normalize(name)))
    {
        return Err(incomplete(format!(
            "removed event '{name}' still has an unmatched target counterpart"
        )));
    }

    Ok(())
}

fn incomplete(reason: String) -> PlanError {
    PlanError::IncompleteDelta { reason }
}

fn summarize(entries: &[DeltaEntry], inventory: &Inventory, target: &TargetPlan) -> DeltaSummary {
    let mut summary = DeltaSummary {
        target_events: target.target_events().len(),
        inventory_events: inventory.observed_events().len(),
        ..DeltaSummary::default()
    };

    for entry in entries {
        let breakdown = &mut summary.status_breakdown;
        let (count, status_counts): (&mut usize, Option<&mut StatusCounts>) =
            match entry.classification {
                Classification::Add => (&mut summary.add, None),
                Classification::Remove => (&mut summary.remove, Some(&mut breakdown.remove)),
                Classification::Rename => (&mut summary.rename, Some(&mut breakdown.rename)),
                Classification::Change => (&mut summary.change, Some(&mut breakdown.change)),
                Classification::Keep => (&mut summary.keep, Some(&mut breakdown.keep)),
            };
        *count += 1;

        if let (Some(counts), Some(status)) = (status_counts, entry.source_status) {
            match status {
                EventStatus::Live => counts.live += 1,
                EventStatus::Orphaned => counts.orphaned += 1,
            }
        }
    }

    summary
}

/// Compare group types by normalized name.
pub(crate) fn group_type_changes(before: &[GroupType], after: &[GroupType]) -> GroupTypeChanges {
    let index = |types: &[GroupType]| -> BTreeMap<String, GroupType> {
        types
            .iter()
            .map(|t| (normalize(&t.type_name), t.clone()))
            .collect()
    };
    let before_by_key = index(before);
    let after_by_key = index(after);

    let mut changes = GroupTypeChanges::default();
    for (key, group_type) in &after_by_key {
        match before_by_key.get(key) {
            None => changes.added.push(group_type.type_name.clone()),
            Some(previous) => {
                let parent_key = |t: &GroupType| t.parent_type.as_deref().map(normalize);
                if parent_key(previous) != parent_key(group_type) {
                    changes.reparented.push(Reparented {
                        type_name: group_type.type_name.clone(),
                        before: previous.parent_type.clone(),
                        after: group_type.parent_type.clone(),
                    });
                }
            }
        }
    }
    changes.removed = before_by_key
        .iter()
        .filter(|(key, _)| !after_by_key.contains_key(*key))
        .map(|(_, t)| t.type_name.clone())
        .collect();

    changes.added.sort();
    changes.removed.sort();
    changes
}
