//! Row aggregation: flat score rows → one [`MetricSummary`] per metric name.
//!
//! Rows without a metric name or without a finite score are dropped without
//! error. Metric names are the join key; rows for the same name merge even
//! when they declare different parents (last declared parent wins, with a
//! [`DataQualityWarning::ConflictingParent`]).

use crate::config::EngineConfig;
use crate::row::MetricRow;
use crate::summary::MetricSummary;
use crate::warnings::DataQualityWarning;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Result of one aggregation pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregation {
    pub summaries: BTreeMap<String, MetricSummary>,
    /// Rows skipped for a missing name or non-numeric score.
    pub dropped_rows: usize,
    pub warnings: Vec<DataQualityWarning>,
}

/// Summaries with default settings.
pub fn aggregate(rows: &[MetricRow]) -> BTreeMap<String, MetricSummary> {
    aggregate_with_report(rows, &EngineConfig::default()).summaries
}

pub fn aggregate_with_report(rows: &[MetricRow], config: &EngineConfig) -> Aggregation {
    let mut agg = Aggregator::new(config.default_weight);
    for row in rows {
        agg.ingest(row);
    }
    agg.finish()
}

/// Streaming accumulator behind [`aggregate_with_report`].
#[derive(Debug)]
pub(crate) struct Aggregator {
    default_weight: f64,
    metrics: BTreeMap<String, MetricAccumulator>,
    dropped: usize,
    warnings: Vec<DataQualityWarning>,
}

#[derive(Debug, Default)]
struct MetricAccumulator {
    scores: Vec<f64>,
    records: HashSet<String>,
    anonymous_records: usize,
    weight: LastWins<f64>,
    parent: LastWins<String>,
    metric_type: String,
    explanation: String,
}

/// Last supplied value plus the most recent value it replaced, if different.
#[derive(Debug, Default)]
struct LastWins<T> {
    current: Option<T>,
    overridden: Option<T>,
}

impl<T: PartialEq + Clone> LastWins<T> {
    fn set(&mut self, value: T) {
        if let Some(prev) = self.current.take() {
            if prev != value {
                self.overridden = Some(prev);
            } else {
                self.current = Some(prev);
                return;
            }
        }
        self.current = Some(value);
    }

    fn conflict(&self) -> Option<(&T, &T)> {
        match (&self.overridden, &self.current) {
            (Some(prev), Some(cur)) if prev != cur => Some((prev, cur)),
            _ => None,
        }
    }
}

impl Aggregator {
    pub(crate) fn new(default_weight: f64) -> Self {
        Self {
            default_weight,
            metrics: BTreeMap::new(),
            dropped: 0,
            warnings: Vec::new(),
        }
    }

    /// Returns false when the row was dropped.
    pub(crate) fn ingest(&mut self, row: &MetricRow) -> bool {
        let (Some(name), Some(score)) = (row.metric(), row.valid_score()) else {
            self.dropped += 1;
            return false;
        };

        let acc = self.metrics.entry(name.to_string()).or_default();
        acc.scores.push(score);
        match row.record() {
            Some(id) => {
                acc.records.insert(id.to_string());
            }
            None => acc.anonymous_records += 1,
        }

        if let Some(w) = row.weight {
            if w.is_finite() && w >= 0.0 {
                acc.weight.set(w);
            } else {
                self.warnings.push(DataQualityWarning::InvalidWeight {
                    metric: name.to_string(),
                    record_id: row.record().map(ToString::to_string),
                });
            }
        }
        if let Some(parent) = row.parent_name() {
            acc.parent.set(parent.to_string());
        }
        if !row.metric_type.is_empty() {
            acc.metric_type.clone_from(&row.metric_type);
        }
        if !row.explanation.is_empty() {
            acc.explanation.clone_from(&row.explanation);
        }
        true
    }

    pub(crate) fn finish(mut self) -> Aggregation {
        let mut summaries = BTreeMap::new();
        for (name, acc) in self.metrics {
            if let Some((prev, cur)) = acc.parent.conflict() {
                tracing::warn!(metric = %name, previous = %prev, current = %cur, "conflicting parent for metric");
                self.warnings.push(DataQualityWarning::ConflictingParent {
                    metric: name.clone(),
                    previous: prev.clone(),
                    current: cur.clone(),
                });
            }
            if let Some((&prev, &cur)) = acc.weight.conflict() {
                tracing::warn!(metric = %name, previous = prev, current = cur, "conflicting weight for metric");
                self.warnings.push(DataQualityWarning::ConflictingWeight {
                    metric: name.clone(),
                    previous: prev,
                    current: cur,
                });
            }

            let mut summary = MetricSummary::from_scores(name.clone(), &acc.scores, self.default_weight);
            summary.record_count = acc.records.len() + acc.anonymous_records;
            if let Some(w) = acc.weight.current {
                summary.weight = w;
            }
            summary.parent = acc.parent.current;
            summary.metric_type = acc.metric_type;
            summary.explanation = acc.explanation;
            summaries.insert(name, summary);
        }

        tracing::debug!(
            metrics = summaries.len(),
            dropped = self.dropped,
            warnings = self.warnings.len(),
            "aggregated metric rows"
        );

        Aggregation {
            summaries,
            dropped_rows: self.dropped,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_rows_by_metric_name() {
        let rows = vec![
            MetricRow::new("faithfulness", 0.8).with_weight(2.0).with_record("r1"),
            MetricRow::new("faithfulness", 0.6).with_weight(2.0).with_record("r2"),
            MetricRow::new("fluency", 0.9).with_record("r1"),
        ];
        let map = aggregate(&rows);

        assert_eq!(map.len(), 2);
        let f = &map["faithfulness"];
        assert!((f.avg_score - 0.7).abs() < 1e-12);
        assert_eq!(f.test_case_count, 2);
        assert_eq!(f.record_count, 2);
        assert_eq!(f.weight, 2.0);
        assert_eq!(map["fluency"].weight, 1.0);
    }

    #[test]
    fn drops_malformed_rows_silently() {
        let rows = vec![
            MetricRow::new("ok", 0.5),
            MetricRow::new("", 0.5),
            MetricRow {
                metric_name: None,
                score: Some(0.5),
                ..MetricRow::default()
            },
            MetricRow::new("nan", f64::NAN),
            MetricRow {
                metric_name: Some("missing".into()),
                score: None,
                ..MetricRow::default()
            },
        ];
        let report = aggregate_with_report(&rows, &EngineConfig::default());

        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.dropped_rows, 4);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn metadata_is_last_supplied_wins() {
        let rows = vec![
            MetricRow::new("m", 0.1)
                .with_parent("a")
                .with_weight(1.0)
                .with_explanation("first"),
            MetricRow::new("m", 0.2).with_parent("b").with_weight(3.0),
            MetricRow::new("m", 0.3),
        ];
        let report = aggregate_with_report(&rows, &EngineConfig::default());
        let m = &report.summaries["m"];

        assert_eq!(m.parent.as_deref(), Some("b"));
        assert_eq!(m.weight, 3.0);
        assert_eq!(m.explanation, "first");
        assert_eq!(
            report.warnings,
            vec![
                DataQualityWarning::ConflictingParent {
                    metric: "m".into(),
                    previous: "a".into(),
                    current: "b".into(),
                },
                DataQualityWarning::ConflictingWeight {
                    metric: "m".into(),
                    previous: 1.0,
                    current: 3.0,
                },
            ]
        );
    }

    #[test]
    fn repeated_identical_metadata_is_not_a_conflict() {
        let rows = vec![
            MetricRow::new("m", 0.1).with_parent("a").with_weight(2.0),
            MetricRow::new("m", 0.2).with_parent("a").with_weight(2.0),
        ];
        let report = aggregate_with_report(&rows, &EngineConfig::default());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn invalid_weight_falls_back_to_default() {
        let rows = vec![MetricRow::new("m", 0.4).with_weight(-2.0).with_record("r9")];
        let cfg = EngineConfig {
            default_weight: 0.5,
            ..EngineConfig::default()
        };
        let report = aggregate_with_report(&rows, &cfg);

        assert_eq!(report.summaries["m"].weight, 0.5);
        assert_eq!(
            report.warnings,
            vec![DataQualityWarning::InvalidWeight {
                metric: "m".into(),
                record_id: Some("r9".into()),
            }]
        );
    }

    #[test]
    fn rows_without_record_id_count_as_distinct_records() {
        let rows = vec![
            MetricRow::new("m", 0.1),
            MetricRow::new("m", 0.2),
            MetricRow::new("m", 0.3).with_record("r1"),
            MetricRow::new("m", 0.4).with_record("r1"),
        ];
        let map = aggregate(&rows);
        assert_eq!(map["m"].test_case_count, 4);
        assert_eq!(map["m"].record_count, 3);
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(aggregate(&[]).is_empty());
    }
}
