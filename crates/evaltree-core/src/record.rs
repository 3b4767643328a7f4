//! Per-record projection for detail drill-downs.
//!
//! Tree structure (node set, parents, weights, type hints) always comes from
//! the full row set, so the detail view has the same shape as the aggregate.
//! Only the per-node statistics differ: each metric carries its one observed
//! score (the last one, if a record repeats a metric). Metrics the record
//! never scored stay in the tree with empty statistics.

use crate::aggregate::aggregate_with_report;
use crate::classify::{NodeClassifier, TokenClassifier};
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::hierarchy::Hierarchy;
use crate::pipeline::finish_scorecard;
use crate::row::MetricRow;
use crate::summary::MetricSummary;
use std::collections::{HashMap, HashSet};

/// Project one record with default settings. Unknown ids give an empty hierarchy.
pub fn project_single_record(rows: &[MetricRow], record_id: &str) -> Hierarchy {
    let config = EngineConfig::default();
    project_single_record_with(
        rows,
        record_id,
        &config,
        &TokenClassifier::new(config.classifier.clone()),
    )
}

pub fn project_single_record_with(
    rows: &[MetricRow],
    record_id: &str,
    config: &EngineConfig,
    classifier: &dyn NodeClassifier,
) -> Hierarchy {
    let mut last_score: HashMap<&str, f64> = HashMap::new();
    let mut record_rows = 0usize;
    let mut dropped = 0;
    for row in rows.iter().filter(|r| r.record() == Some(record_id)) {
        record_rows += 1;
        match (row.metric(), row.valid_score()) {
            (Some(name), Some(score)) => {
                last_score.insert(name, score);
            }
            _ => dropped += 1,
        }
    }
    if last_score.is_empty() {
        tracing::debug!(record_id, rows = record_rows, "record has no scored metrics");
        return Hierarchy::default();
    }

    let mut aggregation = aggregate_with_report(rows, config);
    for (name, summary) in aggregation.summaries.iter_mut() {
        match last_score.get(name.as_str()) {
            Some(&score) => collapse_to(summary, &[score]),
            None => collapse_to(summary, &[]),
        }
    }
    aggregation.dropped_rows = dropped;

    tracing::debug!(
        record_id,
        rows = record_rows,
        scored = last_score.len(),
        metrics = aggregation.summaries.len(),
        "projected single record"
    );
    finish_scorecard(aggregation, config, classifier)
}

/// Like [`project_single_record_with`], but an id with no usable rows is an error.
pub fn drill_down(
    rows: &[MetricRow],
    record_id: &str,
    config: &EngineConfig,
    classifier: &dyn NodeClassifier,
) -> EngineResult<Hierarchy> {
    let hierarchy = project_single_record_with(rows, record_id, config, classifier);
    if hierarchy.is_empty() {
        return Err(EngineError::UnknownRecord {
            record_id: record_id.to_string(),
        });
    }
    Ok(hierarchy)
}

/// Replace the statistics with those of `scores`, keeping structural fields.
fn collapse_to(summary: &mut MetricSummary, scores: &[f64]) {
    let point = MetricSummary::from_scores(summary.name.clone(), scores, summary.weight);
    summary.avg_score = point.avg_score;
    summary.min_score = point.min_score;
    summary.max_score = point.max_score;
    summary.std_dev = point.std_dev;
    summary.score_distribution = point.score_distribution;
    summary.test_case_count = point.test_case_count;
    summary.record_count = usize::from(!scores.is_empty());
}

/// Distinct record ids in first-seen order.
pub fn record_ids(rows: &[MetricRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(MetricRow::record)
        .filter(|id| seen.insert(*id))
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::build_scorecard;

    fn rows() -> Vec<MetricRow> {
        vec![
            MetricRow::new("quality", 0.9).with_record("r1").with_weight(2.0),
            MetricRow::new("faithfulness", 0.8).with_record("r1").with_parent("quality"),
            MetricRow::new("quality", 0.5).with_record("r2").with_weight(2.0),
            MetricRow::new("faithfulness", 0.4).with_record("r2").with_parent("quality"),
            MetricRow::new("faithfulness", 0.6).with_record("r2").with_parent("quality"),
        ]
    }

    #[test]
    fn single_record_has_point_statistics() {
        let h = project_single_record(&rows(), "r2");
        let f = h.get("faithfulness").unwrap();

        assert_eq!(f.summary.avg_score, 0.6);
        assert_eq!(f.summary.min_score, 0.6);
        assert_eq!(f.summary.max_score, 0.6);
        assert_eq!(f.summary.std_dev, 0.0);
        assert_eq!(f.summary.test_case_count, 1);
        assert_eq!(f.summary.score_distribution.total(), 1);
    }

    #[test]
    fn structure_matches_full_aggregate() {
        let full = build_scorecard(&rows());
        let single = project_single_record(&rows(), "r1");

        for node in full.nodes() {
            let other = single.get(node.name()).unwrap();
            assert_eq!(other.level, node.level);
            assert_eq!(other.node_type, node.node_type);
            assert_eq!(other.child_metrics, node.child_metrics);
            assert_eq!(other.normalized_weight, node.normalized_weight);
        }
        assert_eq!(single.len(), full.len());
    }

    #[test]
    fn partial_record_keeps_full_structure() {
        let rows = vec![
            MetricRow::new("quality", 0.9).with_record("r1").with_weight(3.0),
            MetricRow::new("faithfulness", 0.8)
                .with_record("r1")
                .with_parent("quality")
                .with_weight(2.0),
            MetricRow::new("relevance", 0.7).with_record("r1").with_parent("quality"),
            MetricRow::new("fluency", 0.6).with_record("r1"),
            MetricRow::new("faithfulness", 0.4).with_record("r2").with_parent("quality"),
            MetricRow::new("relevance", 0.5).with_record("r2").with_parent("quality"),
        ];
        let full = build_scorecard(&rows);
        let single = project_single_record(&rows, "r2");

        assert_eq!(single.len(), full.len());
        assert!(single.warnings().is_empty());
        for node in full.nodes() {
            let other = single.get(node.name()).unwrap();
            assert_eq!(other.level, node.level);
            assert_eq!(other.node_type, node.node_type);
            assert_eq!(other.resolved_parent, node.resolved_parent);
            assert_eq!(other.summary.weight, node.summary.weight);
            assert_eq!(other.normalized_weight, node.normalized_weight);
        }

        let f = single.get("faithfulness").unwrap();
        assert_eq!(f.level, 2);
        assert_eq!(f.summary.avg_score, 0.4);
        assert!((f.normalized_weight - 2.0 / 3.0).abs() < 1e-12);

        let q = single.get("quality").unwrap();
        assert_eq!(q.summary.test_case_count, 0);
        assert_eq!(q.summary.record_count, 0);
        assert_eq!(q.summary.score_distribution.total(), 0);
        assert_eq!(q.summary.weight, 3.0);
    }

    #[test]
    fn unknown_record_is_empty_or_error() {
        assert!(project_single_record(&rows(), "nope").is_empty());
        let err = drill_down(
            &rows(),
            "nope",
            &EngineConfig::default(),
            &TokenClassifier::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::UnknownRecord { .. }));
    }

    #[test]
    fn lists_record_ids_in_first_seen_order() {
        assert_eq!(record_ids(&rows()), vec!["r1".to_string(), "r2".to_string()]);
    }
}
