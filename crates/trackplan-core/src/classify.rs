//! Classification of match candidates into delta entries.
//!
//! Every event moves from unclassified to exactly one terminal
//! classification. The ledger below records those transitions; a second
//! transition for the same event is an engine bug and fails the run.

use std::collections::BTreeMap;

use crate::delta::{Classification, DeltaEntry, FieldChange};
use crate::errors::{PlanError, Result};
use crate::matching::{MatchCandidate, MatchKind};
use crate::model::EventSource;
use crate::options::{NamingPolicy, ReconcileOptions};

/// Transition ledger keyed by (side, raw event name)
#[derive(Debug, Default)]
struct Ledger<'a> {
    settled: BTreeMap<(EventSource, &'a str), Classification>,
}

impl<'a> Ledger<'a> {
    fn settle(
        &mut self,
        source: EventSource,
        name: &'a str,
        classification: Classification,
    ) -> Result<()> {
        if let Some(previous) = self.settled.insert((source, name), classification) {
            return Err(PlanError::IncompleteDelta {
                reason: format!(
                    "event '{name}' classified twice ({} then {})",
                    previous.as_str(),
                    classification.as_str()
                ),
            });
        }
        Ok(())
    }
}

/// Turn matcher output into delta entries, one per candidate.
///
/// # Errors
///
/// `IncompleteDelta` if an event shows up in more than one candidate.
pub fn classify(
    candidates: &[MatchCandidate<'_>],
    options: &ReconcileOptions,
) -> Result<Vec<DeltaEntry>> {
    let mut ledger = Ledger::default();
    let mut entries = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let entry = match candidate {
            MatchCandidate::InventoryOnly { inventory } => {
                ledger.settle(EventSource::Inventory, inventory.name(), Classification::Remove)?;
                DeltaEntry {
                    classification: Classification::Remove,
                    source_name: Some(inventory.name().to_string()),
                    target_name: None,
                    source_status: Some(inventory.status),
                    similarity: None,
                    property_changes: Vec::new(),
                    category_change: None,
                    group_level_change: None,
                }
            }
            MatchCandidate::TargetOnly { target } => {
                ledger.settle(EventSource::Target, &target.name, Classification::Add)?;
                DeltaEntry {
                    classification: Classification::Add,
                    source_name: None,
                    target_name: Some(target.name.clone()),
                    source_status: None,
                    similarity: None,
                    property_changes: Vec::new(),
                    category_change: None,
                    group_level_change: None,
                }
            }
            MatchCandidate::Paired {
                inventory,
                target,
                kind,
                similarity_score,
                property_diff,
                ..
            } => {
                let same_name = match options.naming_policy {
                    NamingPolicy::Literal => inventory.name() == target.name,
                    NamingPolicy::Canonical => *kind == MatchKind::Exact,
                };
                let classification = if !same_name {
                    Classification::Rename
                } else if property_diff.is_empty() {
                    Classification::Keep
                } else {
                    Classification::Change
                };

                ledger.settle(EventSource::Inventory, inventory.name(), classification)?;
                ledger.settle(EventSource::Target, &target.name, classification)?;

                DeltaEntry {
                    classification,
                    source_name: Some(inventory.name().to_string()),
                    target_name: Some(target.name.clone()),
                    source_status: Some(inventory.status),
                    similarity: Some(round_score(*similarity_score)),
                    property_changes: property_diff.clone(),
                    category_change: FieldChange::between(
                        inventory.event.category,
                        target.category,
                    ),
                    group_level_change: FieldChange::between(
                        inventory.event.group_level.clone(),
                        target.group_level.clone(),
                    ),
                }
            }
        };
        entries.push(entry);
    }

    tracing::debug!(
        entry_len = entries.len(),
        settled = ledger.settled.len(),
        "classified candidates"
    );

    Ok(entries)
}

/// Scores are reported to six decimal places so they read back from JSON
/// exactly.
fn round_score(score: f64) -> f64 {
    (score * 1e6).round() / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::match_events;
    use crate::model::{Event, EventCategory, EventStatus, ObservedEvent, PropertySpec};

    fn duration() -> PropertySpec {
        PropertySpec::new("duration", "number", true)
    }

    #[test]
    fn test_convention_rename_under_literal_policy() {
        let inventory = vec![ObservedEvent::live("video_created").with_property(duration())];
        let target = vec![Event::target("video.created").with_property(duration())];
        let opts = ReconcileOptions::default();

        let entries = classify(&match_events(&inventory, &target, &opts), &opts).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].classification, Classification::Rename);
        assert!(entries[0].property_changes.is_empty());
    }

    #[test]
    fn test_convention_keep_under_canonical_policy() {
        let inventory = vec![ObservedEvent::live("video_created").with_property(duration())];
        let target = vec![Event::target("video.created").with_property(duration())];
        let opts = ReconcileOptions::default().with_naming_policy(NamingPolicy::Canonical);

        let entries = classify(&match_events(&inventory, &target, &opts), &opts).unwrap();
        assert_eq!(entries[0].classification, Classification::Keep);
        assert_eq!(entries[0].similarity, Some(1.0));
    }

    #[test]
    fn test_change_carries_property_diff_and_drift() {
        let inventory = vec![ObservedEvent::orphaned("video_created")
            .with_property(duration())
            .with_category(EventCategory::Lifecycle)];
        let target = vec![Event::target("video_created")
            .with_property(PropertySpec::new("duration", "string", true))
            .with_category(EventCategory::CoreValue)
            .with_group_level("workspace")];
        let opts = ReconcileOptions::default();

        let entries = classify(&match_events(&inventory, &target, &opts), &opts).unwrap();
        let entry = &entries[0];
        assert_eq!(entry.classification, Classification::Change);
        assert_eq!(entry.property_changes.len(), 1);
        assert_eq!(entry.source_status, Some(EventStatus::Orphaned));
        assert_eq!(
            entry.category_change,
            Some(FieldChange {
                before: EventCategory::Lifecycle,
                after: EventCategory::CoreValue,
            })
        );
        assert_eq!(
            entry.group_level_change.as_ref().map(|c| c.after.as_deref()),
            Some(Some("workspace"))
        );
    }

    #[test]
    fn test_singletons_become_add_and_remove() {
        let inventory = vec![ObservedEvent::orphaned("button_clicked")];
        let target = vec![Event::target("plan.upgraded")];
        let opts = ReconcileOptions::default();

        let entries = classify(&match_events(&inventory, &target, &opts), &opts).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].classification, Classification::Remove);
        assert_eq!(entries[0].source_status, Some(EventStatus::Orphaned));
        assert_eq!(entries[1].classification, Classification::Add);
        assert_eq!(entries[1].source_name, None);
        assert_eq!(entries[1].target_name.as_deref(), Some("plan.upgraded"));
    }

    #[test]
    fn test_event_classified_twice_is_rejected() {
        let target = Event::target("plan.upgraded");
        let candidates = vec![
            MatchCandidate::TargetOnly { target: &target },
            MatchCandidate::TargetOnly { target: &target },
        ];

        let err = classify(&candidates, &ReconcileOptions::default()).unwrap_err();
        assert!(matches!(err, PlanError::IncompleteDelta { .. }));
    }
}
