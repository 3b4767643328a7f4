//! Hierarchy building: per-metric summaries → parent/child tree.
//!
//! The builder consumes the summary table and returns a new [`Hierarchy`];
//! nothing is shared with the input, so a hierarchy rebuilt for a filtered
//! subset cannot alias the unfiltered one.
//!
//! # Parent resolution
//!
//! Each node keeps its declared `parent` and gets a `resolved_parent`:
//!
//! - declared parent missing from the table → root ([`DataQualityWarning::DanglingParent`])
//! - declared parent chain loops → the cycle member with the smallest name
//!   becomes a root ([`DataQualityWarning::ParentCycle`])
//! - otherwise the declared parent
//!
//! Children, levels, and root detection all use the resolved parent, so the
//! level walk is bounded by construction.

use crate::classify::{NodeClassifier, NodeType, TokenClassifier};
use crate::summary::MetricSummary;
use crate::warnings::DataQualityWarning;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricNode {
    #[serde(flatten)]
    pub summary: MetricSummary,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Depth from the root; roots are 1.
    pub level: u32,
    /// Weight as a fraction of the sibling group; set by [`crate::normalize_weights`].
    pub normalized_weight: f64,
    /// Child names in ascending order.
    pub child_metrics: Vec<String>,
    pub resolved_parent: Option<String>,
}

impl MetricNode {
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn has_children(&self) -> bool {
        !self.child_metrics.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.resolved_parent.is_none()
    }
}

/// Immutable metric tree produced by one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hierarchy {
    nodes: BTreeMap<String, MetricNode>,
    roots: Vec<String>,
    warnings: Vec<DataQualityWarning>,
    dropped_rows: usize,
}

impl Hierarchy {
    pub fn get(&self, name: &str) -> Option<&MetricNode> {
        self.nodes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Nodes in ascending name order.
    pub fn nodes(&self) -> impl Iterator<Item = &MetricNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in ascending name order.
    pub fn roots(&self) -> impl Iterator<Item = &MetricNode> {
        self.roots.iter().filter_map(|name| self.nodes.get(name))
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|n| !n.has_children()).count()
    }

    pub fn children<'a>(&'a self, node: &'a MetricNode) -> impl Iterator<Item = &'a MetricNode> {
        node.child_metrics
            .iter()
            .filter_map(move |name| self.nodes.get(name))
    }

    /// Resolved ancestors of `name`, nearest first. Empty for roots and unknown names.
    pub fn ancestors(&self, name: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut cur = self.nodes.get(name).and_then(|n| n.resolved_parent.as_deref());
        while let Some(parent) = cur {
            // Resolved parents are acyclic; the length check only guards corrupted input.
            if out.len() >= self.nodes.len() {
                break;
            }
            out.push(parent);
            cur = self
                .nodes
                .get(parent)
                .and_then(|n| n.resolved_parent.as_deref());
        }
        out
    }

    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Input rows skipped by the aggregation pass this tree was built from.
    pub fn dropped_rows(&self) -> usize {
        self.dropped_rows
    }

    pub(crate) fn set_dropped_rows(&mut self, dropped: usize) {
        self.dropped_rows = dropped;
    }

    /// Prepend findings from earlier passes so row-level warnings come first.
    pub(crate) fn prepend_warnings(&mut self, mut earlier: Vec<DataQualityWarning>) {
        earlier.append(&mut self.warnings);
        self.warnings = earlier;
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut MetricNode> {
        self.nodes.values_mut()
    }
}

/// Build with the default [`TokenClassifier`].
pub fn build_hierarchy(summaries: BTreeMap<String, MetricSummary>) -> Hierarchy {
    build_hierarchy_with(summaries, &TokenClassifier::default())
}

pub fn build_hierarchy_with(
    summaries: BTreeMap<String, MetricSummary>,
    classifier: &dyn NodeClassifier,
) -> Hierarchy {
    let mut warnings = Vec::new();
    let resolved = resolve_parents(&summaries, &mut warnings);

    // Pass 1: children. BTreeMap order keeps child lists sorted and duplicate-free.
    let mut children: HashMap<&str, Vec<String>> = HashMap::new();
    for (name, parent) in &resolved {
        if let Some(parent) = parent {
            children.entry(*parent).or_default().push(name.to_string());
        }
    }

    // Pass 2: levels, breadth-first from the roots.
    let roots: Vec<String> = resolved
        .iter()
        .filter(|(_, parent)| parent.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    let mut levels: HashMap<&str, u32> = HashMap::with_capacity(summaries.len());
    let mut queue: VecDeque<(&str, u32)> = roots.iter().map(|r| (r.as_str(), 1)).collect();
    while let Some((name, level)) = queue.pop_front() {
        levels.insert(name, level);
        if let Some(kids) = children.get(name) {
            queue.extend(kids.iter().map(|k| (k.as_str(), level + 1)));
        }
    }

    let mut nodes = BTreeMap::new();
    for (name, summary) in &summaries {
        let child_metrics = children.get(name.as_str()).cloned().unwrap_or_default();
        let level = levels.get(name.as_str()).copied().unwrap_or(1);
        let node_type = classifier.classify(&summary.metric_type, level, !child_metrics.is_empty());
        let resolved_parent = resolved.get(name.as_str()).cloned().flatten().map(ToString::to_string);
        nodes.insert(
            name.clone(),
            MetricNode {
                summary: summary.clone(),
                node_type,
                level,
                normalized_weight: 0.0,
                child_metrics,
                resolved_parent,
            },
        );
    }

    tracing::debug!(
        nodes = nodes.len(),
        roots = roots.len(),
        warnings = warnings.len(),
        "built metric hierarchy"
    );

    Hierarchy {
        nodes,
        roots,
        warnings,
        dropped_rows: 0,
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Walk {
    InProgress,
    Done,
}

/// Effective parent per node: dangling parents and cycles resolved to `None`.
fn resolve_parents<'a>(
    summaries: &'a BTreeMap<String, MetricSummary>,
    warnings: &mut Vec<DataQualityWarning>,
) -> BTreeMap<&'a str, Option<&'a str>> {
    let mut resolved: BTreeMap<&str, Option<&str>> = BTreeMap::new();
    for (name, summary) in summaries {
        let parent = match summary.parent.as_deref() {
            None => None,
            Some(p) if summaries.contains_key(p) => Some(p),
            Some(p) => {
                warnings.push(DataQualityWarning::DanglingParent {
                    metric: name.clone(),
                    parent: p.to_string(),
                });
                None
            }
        };
        resolved.insert(name.as_str(), parent);
    }

    // Each node has at most one parent, so every cycle is found exactly once.
    let mut state: HashMap<&str, Walk> = HashMap::with_capacity(resolved.len());
    let names: Vec<&str> = resolved.keys().copied().collect();
    for start in names {
        let mut path: Vec<&str> = Vec::new();
        let mut cur = Some(start);
        while let Some(node) = cur {
            match state.get(node).copied() {
                Some(Walk::Done) => break,
                Some(Walk::InProgress) => {
                    let at = path.iter().position(|n| *n == node).unwrap_or(0);
                    break_cycle(&path[at..], &mut resolved, summaries, warnings);
                    break;
                }
                None => {
                    state.insert(node, Walk::InProgress);
                    path.push(node);
                    cur = resolved.get(node).copied().flatten();
                }
            }
        }
        for node in path {
            state.insert(node, Walk::Done);
        }
    }

    resolved
}

fn break_cycle<'a>(
    members: &[&'a str],
    resolved: &mut BTreeMap<&'a str, Option<&'a str>>,
    summaries: &BTreeMap<String, MetricSummary>,
    warnings: &mut Vec<DataQualityWarning>,
) {
    let Some(&breaker) = members.iter().min() else {
        return;
    };

    let mut cycle = vec![breaker.to_string()];
    let mut cur = resolved.get(breaker).copied().flatten();
    while let Some(node) = cur {
        cycle.push(node.to_string());
        if node == breaker || cycle.len() > members.len() {
            break;
        }
        cur = resolved.get(node).copied().flatten();
    }

    let declared_parent = summaries
        .get(breaker)
        .and_then(|s| s.parent.clone())
        .unwrap_or_default();
    tracing::warn!(
        metric = %breaker,
        declared_parent = %declared_parent,
        cycle = %cycle.join(" -> "),
        "parent cycle detected; treating metric as root"
    );
    warnings.push(DataQualityWarning::ParentCycle {
        metric: breaker.to_string(),
        declared_parent,
        cycle,
    });
    resolved.insert(breaker, None);
}
