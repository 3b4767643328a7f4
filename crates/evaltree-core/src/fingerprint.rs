//! Row-set fingerprints and memoization of the scoring pass.

use crate::classify::TokenClassifier;
use crate::config::EngineConfig;
use crate::hierarchy::Hierarchy;
use crate::pipeline::build_scorecard_with;
use crate::row::MetricRow;
use sha2::{Digest, Sha256};

/// SHA-256 over the JSON rendering of each row plus the exact bits of its
/// numeric fields, in order.
///
/// JSON writes both NaN and a missing number as `null`, so score and weight
/// are hashed separately. Row order is part of the fingerprint: last-wins
/// metadata depends on it.
pub fn rows_fingerprint(rows: &[MetricRow]) -> String {
    let mut h = Sha256::new();
    for row in rows {
        // MetricRow serialization is infallible (plain fields, no maps).
        let line = serde_json::to_string(row).unwrap_or_default();
        h.update(line.as_bytes());
        update_number(&mut h, row.score);
        update_number(&mut h, row.weight);
        h.update(b"\n");
    }
    hex::encode(h.finalize())
}

fn update_number(h: &mut Sha256, value: Option<f64>) {
    match value {
        None => h.update([0u8]),
        Some(v) => {
            h.update([1u8]);
            h.update(v.to_bits().to_le_bytes());
        }
    }
}

/// Rebuilds the hierarchy only when the fingerprint of the rows changes.
#[derive(Debug, Default)]
pub struct ScorecardCache {
    config: EngineConfig,
    entry: Option<(String, Hierarchy)>,
    builds: usize,
}

impl ScorecardCache {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            entry: None,
            builds: 0,
        }
    }

    pub fn get_or_build(&mut self, rows: &[MetricRow]) -> &Hierarchy {
        let fp = rows_fingerprint(rows);
        let stale = !matches!(&self.entry, Some((cached, _)) if *cached == fp);
        if stale {
            tracing::debug!(fingerprint = %fp, rows = rows.len(), "rebuilding scorecard");
            self.entry = None;
            self.builds += 1;
        }

        let config = &self.config;
        let (_, hierarchy) = self.entry.get_or_insert_with(|| {
            let classifier = TokenClassifier::new(config.classifier.clone());
            let hierarchy = build_scorecard_with(rows, config, &classifier);
            (fp, hierarchy)
        });
        hierarchy
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.entry.as_ref().map(|(fp, _)| fp.as_str())
    }

    /// Number of full rebuilds so far.
    pub fn builds(&self) -> usize {
        self.builds
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_order_sensitive() {
        let a = vec![MetricRow::new("x", 0.1), MetricRow::new("y", 0.2)];
        let b = vec![MetricRow::new("y", 0.2), MetricRow::new("x", 0.1)];

        assert_eq!(rows_fingerprint(&a), rows_fingerprint(&a.clone()));
        assert_ne!(rows_fingerprint(&a), rows_fingerprint(&b));
        assert_eq!(rows_fingerprint(&a).len(), 64);
    }

    #[test]
    fn nan_and_missing_scores_fingerprint_differently() {
        let nan = vec![MetricRow {
            score: Some(f64::NAN),
            ..MetricRow::new("x", 0.0)
        }];
        let missing = vec![MetricRow {
            score: None,
            ..MetricRow::new("x", 0.0)
        }];
        assert_ne!(rows_fingerprint(&nan), rows_fingerprint(&missing));
    }

    #[test]
    fn cache_rebuilds_only_on_change() {
        let mut cache = ScorecardCache::default();
        let rows = vec![MetricRow::new("x", 0.1)];

        assert_eq!(cache.get_or_build(&rows).len(), 1);
        assert_eq!(cache.get_or_build(&rows).len(), 1);
        assert_eq!(cache.builds(), 1);

        let more = vec![MetricRow::new("x", 0.1), MetricRow::new("y", 0.3)];
        assert_eq!(cache.get_or_build(&more).len(), 2);
        assert_eq!(cache.builds(), 2);

        cache.invalidate();
        assert!(cache.fingerprint().is_none());
        cache.get_or_build(&more);
        assert_eq!(cache.builds(), 3);
    }
}
