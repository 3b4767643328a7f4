//! Roll-ups for the top-level summary cards.

use crate::hierarchy::Hierarchy;
use crate::summary::sample_std_dev;
use serde::Serialize;

/// Weighted mean of the roots' average scores, weighted by raw weight.
/// 0 when there are no roots or the root weights sum to 0.
pub fn calculate_weighted_score(hierarchy: &Hierarchy) -> f64 {
    let (weighted, total) = hierarchy
        .roots()
        .fold((0.0, 0.0), |(acc, total), node| {
            (
                acc + node.summary.avg_score * node.summary.weight,
                total + node.summary.weight,
            )
        });

    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

/// Sample standard deviation of the average score across all nodes.
pub fn calculate_score_variance(hierarchy: &Hierarchy) -> f64 {
    let scores: Vec<f64> = hierarchy.nodes().map(|n| n.summary.avg_score).collect();
    sample_std_dev(&scores)
}

/// Values shown on the KPI cards above the tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardSummary {
    pub weighted_score: f64,
    pub score_variance: f64,
    pub node_count: usize,
    pub root_count: usize,
    pub leaf_count: usize,
    pub warning_count: usize,
    pub dropped_rows: usize,
}

impl ScorecardSummary {
    pub fn from_hierarchy(hierarchy: &Hierarchy) -> Self {
        Self {
            weighted_score: calculate_weighted_score(hierarchy),
            score_variance: calculate_score_variance(hierarchy),
            node_count: hierarchy.len(),
            root_count: hierarchy.root_count(),
            leaf_count: hierarchy.leaf_count(),
            warning_count: hierarchy.warnings().len(),
            dropped_rows: hierarchy.dropped_rows(),
        }
    }
}
