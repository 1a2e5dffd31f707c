use std::collections::{BTreeMap, BTreeSet};

use super::HierarchyResult;

/// Recompute every instance's effective attribution from the direct sets.
///
/// Instances are visited leaves-first (reverse of the stored topological
/// order), so each child is final before its parent reads it. Only `direct`
/// and the tree shape are read, which makes the operation idempotent.
pub fn roll_up(hierarchy: &HierarchyResult) -> HierarchyResult {
    let mut effective: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();

    for node in hierarchy.instances.iter().rev() {
        let mut set = node.direct.clone();
        for child in &node.children {
            if let Some(child_set) = effective.get(child.as_str()) {
                set.extend(child_set.iter().cloned());
            }
        }
        effective.insert(node.id.as_str(), set);
    }

    let mut result = hierarchy.clone();
    for node in &mut result.instances {
        if let Some(set) = effective.remove(node.id.as_str()) {
            node.effective = set;
        }
    }
    result
}
