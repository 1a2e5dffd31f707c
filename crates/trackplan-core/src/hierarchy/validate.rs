use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::errors::{PlanError, Result};
use crate::model::{Attributions, GroupInstance, GroupType};

use super::{InstanceNode, TypeNode};

const HIERARCHY_DOCUMENT: &str = "hierarchy";

/// Validate group types and lay them out in topological order.
pub(super) fn validate_types(
    types: &[GroupType],
    require_single_root: bool,
) -> Result<Vec<TypeNode>> {
    let mut by_name: BTreeMap<&str, &GroupType> = BTreeMap::new();
    for group_type in types {
        if by_name.insert(&group_type.type_name, group_type).is_some() {
            return Err(PlanError::DuplicateGroupType {
                document: HIERARCHY_DOCUMENT.to_string(),
                type_name: group_type.type_name.clone(),
            });
        }
    }

    for group_type in by_name.values() {
        if group_type.is_top_level != group_type.parent_type.is_none() {
            return Err(PlanError::InconsistentTopLevel {
                type_name: group_type.type_name.clone(),
                declared: group_type.is_top_level,
            });
        }
    }

    for group_type in by_name.values() {
        if let Some(parent) = &group_type.parent_type {
            if !by_name.contains_key(parent.as_str()) {
                return Err(PlanError::DanglingParent {
                    child: group_type.type_name.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    let parents: BTreeMap<&str, Option<&str>> = by_name
        .iter()
        .map(|(name, t)| (*name, t.parent_type.as_deref()))
        .collect();
    if let Some(path) = find_cycle(&parents) {
        return Err(cycle_error(path));
    }

    let roots: Vec<String> = by_name
        .values()
        .filter(|t| t.is_top_level)
        .map(|t| t.type_name.clone())
        .collect();
    if require_single_root && roots.len() > 1 {
        return Err(PlanError::MultipleRoots { roots });
    }

    let nodes = topological(&parents)
        .into_iter()
        .map(|(name, depth, children)| {
            let declared = by_name[name];
            TypeNode {
                type_name: declared.type_name.clone(),
                parent_type: declared.parent_type.clone(),
                is_top_level: declared.is_top_level,
                depth,
                children,
            }
        })
        .collect();

    Ok(nodes)
}

/// Validate group instances against the validated types and attach direct
/// attributions. Effective sets are left empty for rollup to fill.
pub(super) fn validate_instances(
    types: &[TypeNode],
    instances: &[GroupInstance],
    attributions: &Attributions,
) -> Result<Vec<InstanceNode>> {
    let types_by_name: BTreeMap<&str, &TypeNode> =
        types.iter().map(|t| (t.type_name.as_str(), t)).collect();

    let mut by_id: BTreeMap<&str, &GroupInstance> = BTreeMap::new();
    for instance in instances {
        if by_id.insert(&instance.id, instance).is_some() {
            return Err(PlanError::DuplicateGroupInstance {
                document: HIERARCHY_DOCUMENT.to_string(),
                instance: instance.id.clone(),
            });
        }
    }

    for instance in by_id.values() {
        if !types_by_name.contains_key(instance.group_type.as_str()) {
            return Err(PlanError::UnknownGroupType {
                instance: instance.id.clone(),
                type_name: instance.group_type.clone(),
            });
        }
    }

    for instance in by_id.values() {
        if let Some(parent) = &instance.parent {
            if !by_id.contains_key(parent.as_str()) {
                return Err(PlanError::DanglingParent {
                    child: instance.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    let parents: BTreeMap<&str, Option<&str>> = by_id
        .iter()
        .map(|(id, i)| (*id, i.parent.as_deref()))
        .collect();
    if let Some(path) = find_cycle(&parents) {
        return Err(cycle_error(path));
    }

    // A top-level type's instances have no parent; a nested type's instance
    // may omit its parent, but a given parent must be of the parent type.
    for instance in by_id.values() {
        let Some(parent_id) = &instance.parent else {
            continue;
        };
        let expected = types_by_name[instance.group_type.as_str()]
            .parent_type
            .clone()
            .unwrap_or_default();
        let actual = &by_id[parent_id.as_str()].group_type;
        if &expected != actual {
            return Err(PlanError::ParentTypeMismatch {
                instance: instance.id.clone(),
                parent: parent_id.clone(),
                expected,
                actual: actual.clone(),
            });
        }
    }

    if let Some(unknown) = attributions
        .keys()
        .find(|id| !by_id.contains_key(id.as_str()))
    {
        return Err(PlanError::UnknownAttributionTarget {
            instance: unknown.clone(),
        });
    }

    let nodes = topological(&parents)
        .into_iter()
        .map(|(id, depth, children)| {
            let declared = by_id[id];
            let direct: BTreeSet<String> = attributions.get(id).cloned().unwrap_or_default();
            InstanceNode {
                id: declared.id.clone(),
                group_type: declared.group_type.clone(),
                parent: declared.parent.clone(),
                children,
                depth,
                effective: BTreeSet::new(),
                direct,
            }
        })
        .collect();

    Ok(nodes)
}

/// Walk parent pointers from every node, in name order, and return the first
/// cycle found as `[start, .., start]`.
///
/// Nodes proven to reach a root are remembered, so each node is walked at
/// most once overall. Parents must already be known to exist.
fn find_cycle(parents: &BTreeMap<&str, Option<&str>>) -> Option<Vec<String>> {
    let mut terminates: BTreeSet<&str> = BTreeSet::new();

    for &start in parents.keys() {
        let mut path: Vec<&str> = Vec::new();
        let mut on_path: BTreeSet<&str> = BTreeSet::new();
        let mut current = Some(start);

        while let Some(node) = current {
            if terminates.contains(node) {
                break;
            }
            if !on_path.insert(node) {
                let first = path.iter().position(|n| *n == node).unwrap_or(0);
                let mut cycle: Vec<String> = path[first..].iter().map(|n| n.to_string()).collect();
                cycle.push(node.to_string());
                return Some(cycle);
            }
            path.push(node);
            current = parents.get(node).copied().flatten();
        }

        terminates.extend(path);
    }

    None
}

fn cycle_error(path: Vec<String>) -> PlanError {
    PlanError::CycleDetected {
        node: path.first().cloned().unwrap_or_default(),
        path,
    }
}

/// Breadth-first layout of an acyclic parent forest: `(name, depth, children)`
/// with roots first and siblings in name order.
fn topological<'a>(
    parents: &BTreeMap<&'a str, Option<&'a str>>,
) -> Vec<(&'a str, usize, Vec<String>)> {
    let mut children: BTreeMap<&'a str, Vec<&'a str>> = BTreeMap::new();
    let mut queue: VecDeque<(&'a str, usize)> = VecDeque::new();

    for (&node, parent) in parents {
        match parent {
            Some(parent) => children.entry(*parent).or_default().push(node),
            None => queue.push_back((node, 0)),
        }
    }

    let mut order = Vec::with_capacity(parents.len());
    while let Some((node, depth)) = queue.pop_front() {
        let kids = children.remove(node).unwrap_or_default();
        for &kid in &kids {
            queue.push_back((kid, depth + 1));
        }
        order.push((node, depth, kids.into_iter().map(str::to_string).collect()));
    }
    order
}
