//! One-call composition of the scoring passes.

use crate::aggregate::{aggregate_with_report, Aggregation};
use crate::classify::{NodeClassifier, TokenClassifier};
use crate::config::EngineConfig;
use crate::hierarchy::{build_hierarchy_with, Hierarchy};
use crate::row::MetricRow;
use crate::weights::normalize_weights_with;

/// aggregate → build hierarchy → normalize weights, with default settings.
pub fn build_scorecard(rows: &[MetricRow]) -> Hierarchy {
    let config = EngineConfig::default();
    build_scorecard_with(rows, &config, &TokenClassifier::new(config.classifier.clone()))
}

/// Full pass with explicit settings and classifier. Row-level warnings
/// (conflicts, invalid weights) are merged into the returned hierarchy.
pub fn build_scorecard_with(
    rows: &[MetricRow],
    config: &EngineConfig,
    classifier: &dyn NodeClassifier,
) -> Hierarchy {
    finish_scorecard(aggregate_with_report(rows, config), config, classifier)
}

/// Hierarchy and weight passes over an existing aggregation.
pub(crate) fn finish_scorecard(
    aggregation: Aggregation,
    config: &EngineConfig,
    classifier: &dyn NodeClassifier,
) -> Hierarchy {
    let mut hierarchy = build_hierarchy_with(aggregation.summaries, classifier);
    hierarchy.prepend_warnings(aggregation.warnings);
    hierarchy.set_dropped_rows(aggregation.dropped_rows);
    normalize_weights_with(hierarchy, config.sibling_grouping)
}
