use crate::config::SiblingGrouping;
use crate::hierarchy::{Hierarchy, MetricNode};
use std::collections::HashMap;

/// Normalize with the default grouping (declared parent).
pub fn normalize_weights(hierarchy: Hierarchy) -> Hierarchy {
    normalize_weights_with(hierarchy, SiblingGrouping::default())
}

/// Set each node's `normalized_weight` to its share of the sibling group's
/// total weight. A group whose total is 0 splits evenly.
pub fn normalize_weights_with(mut hierarchy: Hierarchy, grouping: SiblingGrouping) -> Hierarchy {
    let mut groups: HashMap<Option<String>, (f64, usize)> = HashMap::new();
    for node in hierarchy.nodes() {
        let entry = groups.entry(group_key(node, grouping)).or_insert((0.0, 0));
        entry.0 += node.summary.weight;
        entry.1 += 1;
    }

    for node in hierarchy.nodes_mut() {
        let (total, size) = groups
            .get(&group_key(node, grouping))
            .copied()
            .unwrap_or((0.0, 1));
        node.normalized_weight = if total > 0.0 {
            node.summary.weight / total
        } else {
            1.0 / size as f64
        };
    }

    tracing::debug!(groups = groups.len(), ?grouping, "normalized sibling weights");
    hierarchy
}

fn group_key(node: &MetricNode, grouping: SiblingGrouping) -> Option<String> {
    match grouping {
        SiblingGrouping::DeclaredParent => node.summary.parent.clone(),
        SiblingGrouping::ResolvedParent => node.resolved_parent.clone(),
    }
}
