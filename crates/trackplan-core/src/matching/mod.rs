//! Matching of inventory events against target plan events.
//!
//! ## Algorithm
//!
//! 1. Score every (inventory, target) pair:
//!    `score = name_weight * name_similarity + property_weight * property_jaccard`.
//! 2. Commit every pair whose normalized names are equal, before anything
//!    else, so an exact match is never taken by a higher-scoring partial one.
//! 3. Greedily commit the highest-scoring remaining pair strictly above
//!    `rename_threshold`, removing both sides, until none is left.
//! 4. Everything unpaired becomes a singleton candidate.
//!
//! Ties break on the smaller normalized-name edit distance, then on the
//! target name, then on the inventory name. Among exact pairs, a pair whose
//! raw names are identical wins over one that only normalizes equal.

pub mod scoring;

use std::cmp::Ordering;

use crate::delta::PropertyChange;
use crate::model::{Event, ObservedEvent};
use crate::options::ReconcileOptions;

use scoring::{score_all_pairs, PairScore, Prepared};

pub use scoring::{name_similarity, property_diff, property_similarity};

/// How a pair was committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Normalized names are equal
    Exact,
    /// Committed on score above the rename threshold
    Approximate,
}

/// Output of the matcher, consumed by the classifier
#[derive(Debug, Clone, PartialEq)]
pub enum MatchCandidate<'a> {
    Paired {
        inventory: &'a ObservedEvent,
        target: &'a Event,
        kind: MatchKind,
        name_similarity: f64,
        property_similarity: f64,
        similarity_score: f64,
        property_diff: Vec<PropertyChange>,
    },
    InventoryOnly {
        inventory: &'a ObservedEvent,
    },
    TargetOnly {
        target: &'a Event,
    },
}

impl<'a> MatchCandidate<'a> {
    pub fn inventory(&self) -> Option<&'a ObservedEvent> {
        match self {
            MatchCandidate::Paired { inventory, .. } | MatchCandidate::InventoryOnly { inventory } => {
                Some(*inventory)
            }
            MatchCandidate::TargetOnly { .. } => None,
        }
    }

    pub fn target(&self) -> Option<&'a Event> {
        match self {
            MatchCandidate::Paired { target, .. } | MatchCandidate::TargetOnly { target } => {
                Some(*target)
            }
            MatchCandidate::InventoryOnly { .. } => None,
        }
    }
}

/// Match inventory events against target events.
///
/// Output order: pairs by target name, then inventory-only by name, then
/// target-only by name. Every input event appears in exactly one candidate.
pub fn match_events<'a>(
    inventory: &'a [ObservedEvent],
    target: &'a [Event],
    options: &ReconcileOptions,
) -> Vec<MatchCandidate<'a>> {
    let inv: Vec<Prepared<'a>> = inventory.iter().map(|o| Prepared::new(&o.event)).collect();
    let tgt: Vec<Prepared<'a>> = target.iter().map(Prepared::new).collect();

    let scores = score_all_pairs(&inv, &tgt, options);
    let committed = commit_pairs(scores, &inv, &tgt, options.rename_threshold);

    let mut inv_used = vec![false; inventory.len()];
    let mut tgt_used = vec![false; target.len()];
    let mut paired = Vec::with_capacity(committed.len());
    let mut exact_count = 0usize;

    for pair in committed {
        inv_used[pair.inventory] = true;
        tgt_used[pair.target] = true;
        if pair.exact {
            exact_count += 1;
        }

        let inv_event = &inventory[pair.inventory];
        let tgt_event = &target[pair.target];
        paired.push(MatchCandidate::Paired {
            inventory: inv_event,
            target: tgt_event,
            kind: if pair.exact {
                MatchKind::Exact
            } else {
                MatchKind::Approximate
            },
            name_similarity: pair.name_similarity,
            property_similarity: pair.property_similarity,
            similarity_score: pair.score,
            property_diff: property_diff(
                &inv_event.event.properties,
                &tgt_event.properties,
                options.naming_policy,
            ),
        });
    }
    paired.sort_by(|a, b| by_name(a.target(), b.target()));

    let mut inventory_only: Vec<MatchCandidate<'a>> = inventory
        .iter()
        .zip(&inv_used)
        .filter(|(_, used)| !**used)
        .map(|(inventory, _)| MatchCandidate::InventoryOnly { inventory })
        .collect();
    inventory_only.sort_by(|a, b| {
        a.inventory()
            .map(ObservedEvent::name)
            .cmp(&b.inventory().map(ObservedEvent::name))
    });

    let mut target_only: Vec<MatchCandidate<'a>> = target
        .iter()
        .zip(&tgt_used)
        .filter(|(_, used)| !**used)
        .map(|(target, _)| MatchCandidate::TargetOnly { target })
        .collect();
    target_only.sort_by(|a, b| by_name(a.target(), b.target()));

    tracing::debug!(
        inventory_len = inventory.len(),
        target_len = target.len(),
        exact = exact_count,
        approximate = paired.len() - exact_count,
        inventory_only = inventory_only.len(),
        target_only = target_only.len(),
        "matched events"
    );

    let mut candidates = paired;
    candidates.extend(inventory_only);
    candidates.extend(target_only);
    candidates
}

fn by_name(a: Option<&Event>, b: Option<&Event>) -> Ordering {
    a.map(|e| e.name.as_str()).cmp(&b.map(|e| e.name.as_str()))
}

/// Greedy single-writer commit over the scored pairs.
fn commit_pairs(
    scores: Vec<PairScore>,
    inv: &[Prepared<'_>],
    tgt: &[Prepared<'_>],
    threshold: f64,
) -> Vec<PairScore> {
    let names = |p: &PairScore| (tgt[p.target].event.name.as_str(), inv[p.inventory].event.name.as_str());

    let (mut exact, mut approximate): (Vec<PairScore>, Vec<PairScore>) =
        scores.into_iter().partition(|p| p.exact);

    exact.sort_by(|a, b| {
        b.literal
            .cmp(&a.literal)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| names(a).cmp(&names(b)))
    });
    approximate.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.name_distance.cmp(&b.name_distance))
            .then_with(|| names(a).cmp(&names(b)))
    });

    let mut inv_taken = vec![false; inv.len()];
    let mut tgt_taken = vec![false; tgt.len()];
    let mut committed = Vec::new();

    let exact_then_approximate = exact.into_iter().chain(
        approximate
            .into_iter()
            .take_while(|p| p.score > threshold),
    );
    for pair in exact_then_approximate {
        if inv_taken[pair.inventory] || tgt_taken[pair.target] {
            continue;
        }
        inv_taken[pair.inventory] = true;
        tgt_taken[pair.target] = true;
        committed.push(pair);
    }

    committed
}
