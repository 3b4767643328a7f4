//! Flattened, visibility-annotated rows for an expandable tree table.
//!
//! Collapsed subtrees are still emitted with `is_visible = false` so the
//! display layer can animate expand/collapse without re-querying. Expand
//! state is owned by the caller and only read here.

use crate::hierarchy::{Hierarchy, MetricNode};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    #[serde(flatten)]
    pub node: MetricNode,
    pub is_expanded: bool,
    pub has_children: bool,
    pub is_visible: bool,
}

impl DisplayRow {
    pub fn name(&self) -> &str {
        self.node.name()
    }
}

/// Pre-order walk from the roots. Siblings are ordered by weight descending,
/// then name ascending. Each node is emitted at most once.
pub fn generate_display_rows(hierarchy: &Hierarchy, expanded: &HashSet<String>) -> Vec<DisplayRow> {
    let mut roots: Vec<&MetricNode> = hierarchy.roots().collect();
    roots.sort_by(|a, b| display_order(a, b));

    let mut rows = Vec::with_capacity(hierarchy.len());
    let mut visited = HashSet::with_capacity(hierarchy.len());
    for root in roots {
        walk(hierarchy, root, expanded, true, &mut visited, &mut rows);
    }
    rows
}

fn walk<'a>(
    hierarchy: &'a Hierarchy,
    node: &'a MetricNode,
    expanded: &HashSet<String>,
    is_visible: bool,
    visited: &mut HashSet<&'a str>,
    rows: &mut Vec<DisplayRow>,
) {
    if !visited.insert(node.name()) {
        return;
    }

    let is_expanded = expanded.contains(node.name());
    rows.push(DisplayRow {
        node: node.clone(),
        is_expanded,
        has_children: node.has_children(),
        is_visible,
    });

    let mut children: Vec<&MetricNode> = hierarchy.children(node).collect();
    children.sort_by(|a, b| display_order(a, b));
    for child in children {
        walk(hierarchy, child, expanded, is_visible && is_expanded, visited, rows);
    }
}

fn display_order(a: &MetricNode, b: &MetricNode) -> Ordering {
    b.summary
        .weight
        .total_cmp(&a.summary.weight)
        .then_with(|| a.name().cmp(b.name()))
}

/// Ids of every node with children: the expand set for "expand all".
pub fn expand_all_ids(hierarchy: &Hierarchy) -> HashSet<String> {
    hierarchy
        .nodes()
        .filter(|n| n.has_children())
        .map(|n| n.name().to_string())
        .collect()
}
