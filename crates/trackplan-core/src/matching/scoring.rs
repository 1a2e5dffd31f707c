//! Pairwise similarity scoring.
//!
//! Every (inventory, target) pair is scored independently, so the pass can
//! be sharded across threads; the results are merged by plain collection.

use std::collections::{BTreeMap, BTreeSet};

use crate::delta::{PropertyChange, PropertyChangeKind};
use crate::model::{Event, PropertySpec};
use crate::normalize::normalize;
use crate::options::{NamingPolicy, ReconcileOptions};

/// Per-event data computed once before scoring
#[derive(Debug, Clone)]
pub(crate) struct Prepared<'a> {
    pub event: &'a Event,
    pub normalized: String,
    pub normalized_len: usize,
    pub property_keys: BTreeSet<String>,
}

impl<'a> Prepared<'a> {
    pub fn new(event: &'a Event) -> Self {
        let normalized = normalize(&event.name);
        let normalized_len = normalized.chars().count();
        let property_keys = event.properties.iter().map(|p| normalize(&p.name)).collect();
        Self {
            event,
            normalized,
            normalized_len,
            property_keys,
        }
    }
}

/// Score of one (inventory, target) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PairScore {
    pub inventory: usize,
    pub target: usize,
    pub name_similarity: f64,
    pub property_similarity: f64,
    pub score: f64,
    /// Levenshtein distance between the normalized names
    pub name_distance: usize,
    /// Normalized names are equal
    pub exact: bool,
    /// Raw names are equal
    pub literal: bool,
}

/// `1.0` for equal normalized names, else `1 - levenshtein / max_len`.
pub fn name_similarity(a: &str, b: &str) -> f64 {
    let (na, nb) = (normalize(a), normalize(b));
    let (distance, max_len) = normalized_distance(&na, &nb);
    similarity_from_distance(distance, max_len)
}

/// Jaccard similarity of two property-name sets; two empty sets score `1.0`.
pub fn property_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

fn normalized_distance(a: &str, b: &str) -> (usize, usize) {
    if a == b {
        return (0, a.chars().count());
    }
    let max_len = a.chars().count().max(b.chars().count());
    (strsim::levenshtein(a, b), max_len)
}

fn similarity_from_distance(distance: usize, max_len: usize) -> f64 {
    if distance == 0 || max_len == 0 {
        1.0
    } else {
        1.0 - distance as f64 / max_len as f64
    }
}

fn score_pair(
    inventory: usize,
    target: usize,
    inv: &Prepared<'_>,
    tgt: &Prepared<'_>,
    options: &ReconcileOptions,
) -> PairScore {
    let exact = inv.normalized == tgt.normalized;
    let name_distance = if exact {
        0
    } else {
        strsim::levenshtein(&inv.normalized, &tgt.normalized)
    };
    let max_len = inv.normalized_len.max(tgt.normalized_len);
    let name_similarity = similarity_from_distance(name_distance, max_len);
    let property_similarity = property_similarity(&inv.property_keys, &tgt.property_keys);

    PairScore {
        inventory,
        target,
        name_similarity,
        property_similarity,
        score: options.name_weight * name_similarity
            + options.property_weight * property_similarity,
        name_distance,
        exact,
        literal: inv.event.name == tgt.event.name,
    }
}

/// Score the full cross product, in (inventory, target) index order.
pub(crate) fn score_all_pairs(
    inventory: &[Prepared<'_>],
    target: &[Prepared<'_>],
    options: &ReconcileOptions,
) -> Vec<PairScore> {
    #[cfg(feature = "parallel")]
    if options.parallel_scoring {
        use rayon::prelude::*;

        return (0..inventory.len())
            .into_par_iter()
            .flat_map_iter(|i| {
                (0..target.len())
                    .map(move |j| score_pair(i, j, &inventory[i], &target[j], options))
            })
            .collect();
    }

    #[cfg(not(feature = "parallel"))]
    if options.parallel_scoring {
        tracing::warn!(
            parallel_scoring = true,
            inventory_len = inventory.len(),
            target_len = target.len(),
            "parallel scoring requested without the `parallel` feature, scoring serially"
        );
    }

    let mut scores = Vec::with_capacity(inventory.len() * target.len());
    for (i, inv) in inventory.iter().enumerate() {
        for (j, tgt) in target.iter().enumerate() {
            scores.push(score_pair(i, j, inv, tgt, options));
        }
    }
    scores
}

/// Property differences going from `before` (inventory) to `after` (target).
///
/// Properties are identified by normalized name. Sorted by normalized name.
pub fn property_diff(
    before: &[PropertySpec],
    after: &[PropertySpec],
    policy: NamingPolicy,
) -> Vec<PropertyChange> {
    let before_by_key = index_properties(before);
    let after_by_key = index_properties(after);
    let keys: BTreeSet<&String> = before_by_key.keys().chain(after_by_key.keys()).collect();

    let mut changes = Vec::new();
    for key in keys {
        let change = match (before_by_key.get(key), after_by_key.get(key)) {
            (None, Some(a)) => Some((a.name.clone(), PropertyChangeKind::Added)),
            (Some(b), None) => Some((b.name.clone(), PropertyChangeKind::Removed)),
            (Some(b), Some(a)) => {
                if !b.same_type(a) {
                    Some((a.name.clone(), PropertyChangeKind::TypeChanged))
                } else if b.required != a.required {
                    Some((a.name.clone(), PropertyChangeKind::RequirednessChanged))
                } else if policy == NamingPolicy::Literal && b.name != a.name {
                    Some((a.name.clone(), PropertyChangeKind::Renamed))
                } else {
                    None
                }
            }
            (None, None) => None,
        };

        if let Some((name, kind)) = change {
            changes.push(PropertyChange {
                name,
                kind,
                before: before_by_key.get(key).map(|p| (*p).clone()),
                after: after_by_key.get(key).map(|p| (*p).clone()),
            });
        }
    }
    changes
}

fn index_properties(properties: &[PropertySpec]) -> BTreeMap<String, &PropertySpec> {
    let mut by_key = BTreeMap::new();
    for property in properties {
        by_key.entry(normalize(&property.name)).or_insert(property);
    }
    by_key
}
