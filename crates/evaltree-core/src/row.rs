//! Input rows as supplied by the ingestion layer.
//!
//! Uploaded data is messy: scores arrive as numbers, numeric strings, or
//! garbage; record ids arrive as strings or integers. Deserialization never
//! rejects a row for a bad value. Malformed values are kept as `NaN` (or
//! `None`) and filtered by the aggregator.

use serde::{Deserialize, Serialize};

/// One (metric, score) observation for one evaluated record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    /// Owning record (test case). Used for distinct record counting and drill-down.
    #[serde(
        default,
        alias = "recordId",
        alias = "test_case_id",
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub record_id: Option<String>,

    #[serde(
        default,
        alias = "metricName",
        alias = "metric",
        deserialize_with = "lenient::opt_string"
    )]
    pub metric_name: Option<String>,

    /// `NaN` when the source value was present but not numeric.
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub score: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient::opt_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,

    #[serde(
        default,
        alias = "metricType",
        alias = "type",
        deserialize_with = "lenient::string_or_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub metric_type: String,

    #[serde(
        default,
        deserialize_with = "lenient::string_or_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub explanation: String,
}

impl MetricRow {
    pub fn new(metric_name: impl Into<String>, score: f64) -> Self {
        Self {
            metric_name: Some(metric_name.into()),
            score: Some(score),
            ..Self::default()
        }
    }

    pub fn with_record(mut self, record_id: impl Into<String>) -> Self {
        self.record_id = Some(record_id.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_type(mut self, metric_type: impl Into<String>) -> Self {
        self.metric_type = metric_type.into();
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Metric name, or `None` for a missing/empty name.
    pub fn metric(&self) -> Option<&str> {
        self.metric_name.as_deref().filter(|s| !s.is_empty())
    }

    /// Score when it is a finite number.
    pub fn valid_score(&self) -> Option<f64> {
        self.score.filter(|s| s.is_finite())
    }

    /// Declared parent; an empty string means "no parent".
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref().filter(|s| !s.is_empty())
    }

    pub fn record(&self) -> Option<&str> {
        self.record_id.as_deref().filter(|s| !s.is_empty())
    }
}

/// Tolerant field deserializers for uploaded rows.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn opt_f64<'de, D>(d: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<Value> = Option::deserialize(d)?;
        Ok(match opt {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) => Some(n.as_f64().unwrap_or(f64::NAN)),
            Some(Value::String(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else {
                    Some(s.parse::<f64>().unwrap_or(f64::NAN))
                }
            }
            Some(_) => Some(f64::NAN),
        })
    }

    pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<Value> = Option::deserialize(d)?;
        Ok(match opt {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        })
    }

    pub fn string_or_empty<'de, D>(d: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_string(d)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_row() {
        let row: MetricRow = serde_json::from_value(serde_json::json!({
            "record_id": "tc-1",
            "metric_name": "faithfulness",
            "score": 0.8,
            "parent": "quality",
            "weight": 2,
            "metric_type": "metric",
            "explanation": "grounded"
        }))
        .unwrap();

        assert_eq!(row.record(), Some("tc-1"));
        assert_eq!(row.metric(), Some("faithfulness"));
        assert_eq!(row.valid_score(), Some(0.8));
        assert_eq!(row.parent_name(), Some("quality"));
        assert_eq!(row.weight, Some(2.0));
        assert_eq!(row.metric_type, "metric");
    }

    #[test]
    fn tolerates_messy_values() {
        let row: MetricRow = serde_json::from_value(serde_json::json!({
            "recordId": 17,
            "metric": "fluency",
            "score": " 0.25 ",
            "parent": null,
            "type": null
        }))
        .unwrap();

        assert_eq!(row.record(), Some("17"));
        assert_eq!(row.metric(), Some("fluency"));
        assert_eq!(row.valid_score(), Some(0.25));
        assert_eq!(row.parent_name(), None);
        assert!(row.metric_type.is_empty());
        assert_eq!(row.weight, None);
    }

    #[test]
    fn non_numeric_score_is_kept_as_nan() {
        let row: MetricRow = serde_json::from_value(serde_json::json!({
            "metric_name": "relevance",
            "score": "n/a"
        }))
        .unwrap();

        assert!(row.score.is_some_and(f64::is_nan));
        assert_eq!(row.valid_score(), None);
    }

    #[test]
    fn empty_strings_mean_absent() {
        let row = MetricRow::new("", 0.5).with_parent("");
        assert_eq!(row.metric(), None);
        assert_eq!(row.parent_name(), None);
    }
}
