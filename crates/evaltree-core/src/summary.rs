use serde::{Deserialize, Serialize};

/// Number of histogram buckets over the nominal score range `[0, 1]`.
pub const BUCKET_COUNT: usize = 5;

/// Fixed 5-bucket histogram of raw scores. Counts, not normalized.
///
/// Out-of-range scores are clamped into the first or last bucket so the
/// histogram total always equals the number of observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreDistribution(pub [u32; BUCKET_COUNT]);

impl ScoreDistribution {
    pub fn bucket_index(score: f64) -> usize {
        let raw = (score * BUCKET_COUNT as f64).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(BUCKET_COUNT - 1)
        }
    }

    pub fn observe(&mut self, score: f64) {
        self.0[Self::bucket_index(score)] += 1;
    }

    pub fn counts(&self) -> &[u32; BUCKET_COUNT] {
        &self.0
    }

    pub fn total(&self) -> u64 {
        self.0.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Aggregated statistics for one metric name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSummary {
    pub name: String,
    pub avg_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    /// Sample standard deviation (n-1); 0 with fewer than two scores.
    pub std_dev: f64,
    pub score_distribution: ScoreDistribution,
    /// Number of contributing rows.
    pub test_case_count: usize,
    /// Number of distinct records that contributed.
    pub record_count: usize,
    /// Raw weight, last-wins across rows that supply one.
    pub weight: f64,
    pub parent: Option<String>,
    pub explanation: String,
    /// Raw type hint, last-wins across rows that supply one.
    pub metric_type: String,
}

impl MetricSummary {
    /// Summary over `scores` (finite, in encounter order) with default metadata.
    pub fn from_scores(name: impl Into<String>, scores: &[f64], default_weight: f64) -> Self {
        let mut distribution = ScoreDistribution::default();
        for &s in scores {
            distribution.observe(s);
        }
        let (min, max) = scores
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        let empty = scores.is_empty();

        Self {
            name: name.into(),
            avg_score: mean(scores),
            min_score: if empty { 0.0 } else { min },
            max_score: if empty { 0.0 } else { max },
            std_dev: sample_std_dev(scores),
            score_distribution: distribution,
            test_case_count: scores.len(),
            record_count: 0,
            weight: default_weight,
            parent: None,
            explanation: String::new(),
            metric_type: String::new(),
        }
    }
}

/// Arithmetic mean; 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation with the n-1 divisor; 0 for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_index_clamps_to_range() {
        assert_eq!(ScoreDistribution::bucket_index(0.0), 0);
        assert_eq!(ScoreDistribution::bucket_index(0.19), 0);
        assert_eq!(ScoreDistribution::bucket_index(0.2), 1);
        assert_eq!(ScoreDistribution::bucket_index(0.99), 4);
        assert_eq!(ScoreDistribution::bucket_index(1.0), 4);
        assert_eq!(ScoreDistribution::bucket_index(-3.0), 0);
        assert_eq!(ScoreDistribution::bucket_index(7.5), 4);
    }

    #[test]
    fn from_scores_computes_stats() {
        let s = MetricSummary::from_scores("faithfulness", &[0.8, 0.6], 1.0);
        assert!((s.avg_score - 0.7).abs() < 1e-12);
        assert_eq!(s.min_score, 0.6);
        assert_eq!(s.max_score, 0.8);
        // sqrt(((0.1)^2 + (0.1)^2) / 1)
        assert!((s.std_dev - 0.02f64.sqrt()).abs() < 1e-12);
        assert_eq!(s.score_distribution.counts(), &[0, 0, 0, 1, 1]);
        assert_eq!(s.test_case_count, 2);
    }

    #[test]
    fn single_score_has_zero_std_dev() {
        let s = MetricSummary::from_scores("fluency", &[0.9], 1.0);
        assert_eq!(s.std_dev, 0.0);
        assert_eq!(s.min_score, s.max_score);
    }

    #[test]
    fn serializes_camel_case() {
        let s = MetricSummary::from_scores("m", &[0.5], 1.0);
        let v = serde_json::to_value(&s).unwrap();
        assert!(v.get("avgScore").is_some());
        assert!(v.get("scoreDistribution").unwrap().is_array());
        assert!(v.get("testCaseCount").is_some());
    }
}
