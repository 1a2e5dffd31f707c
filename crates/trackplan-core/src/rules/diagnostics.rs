use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::PlanDocument;
use crate::normalize::normalize;

/// Distinct raw names in one document that normalize to the same form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCollision {
    pub document: String,
    pub normalized: String,
    pub names: Vec<String>,
}

/// An event whose `group_level` names no group type of its document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedGroupLevel {
    pub document: String,
    pub event: String,
    pub group_level: String,
}

/// Non-fatal findings about the input documents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub normalized_collisions: Vec<NormalizedCollision>,
    pub unresolved_group_levels: Vec<UnresolvedGroupLevel>,
}

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.normalized_collisions.is_empty() && self.unresolved_group_levels.is_empty()
    }
}

/// Inspect each document and merge the findings, in document order.
pub fn collect_diagnostics(documents: &[&dyn PlanDocument]) -> Diagnostics {
    let mut diagnostics = Diagnostics::default();

    for document in documents {
        let label = document.label();
        let events = document.events();

        let mut by_normalized: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
        for event in &events {
            by_normalized
                .entry(normalize(&event.name))
                .or_default()
                .insert(event.name.as_str());
        }
        for (normalized, names) in by_normalized {
            if names.len() > 1 {
                diagnostics.normalized_collisions.push(NormalizedCollision {
                    document: label.to_string(),
                    normalized,
                    names: names.into_iter().map(str::to_string).collect(),
                });
            }
        }

        let declared: BTreeSet<&str> = document
            .group_types()
            .iter()
            .map(|t| t.type_name.as_str())
            .collect();
        let mut unresolved: Vec<UnresolvedGroupLevel> = events
            .iter()
            .filter_map(|event| {
                let level = event.group_level.as_deref()?;
                (!declared.contains(level)).then(|| UnresolvedGroupLevel {
                    document: label.to_string(),
                    event: event.name.clone(),
                    group_level: level.to_string(),
                })
            })
            .collect();
        unresolved.sort_by(|a, b| a.event.cmp(&b.event));
        diagnostics.unresolved_group_levels.extend(unresolved);
    }

    tracing::debug!(
        collisions = diagnostics.normalized_collisions.len(),
        unresolved_group_levels = diagnostics.unresolved_group_levels.len(),
        "collected diagnostics"
    );

    diagnostics
}
