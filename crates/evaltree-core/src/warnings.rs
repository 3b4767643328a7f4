//! Data-quality findings surfaced to the display layer.
//!
//! None of these fail a pass. Each one records how the engine degraded
//! (skipped a value, promoted a node to root, kept the last value seen).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataQualityWarning {
    /// Parent chain loops back on itself. `metric` was promoted to root.
    ParentCycle {
        metric: String,
        declared_parent: String,
        cycle: Vec<String>,
    },
    /// Declared parent is not an aggregated metric; node promoted to root.
    DanglingParent { metric: String, parent: String },
    /// Rows disagree on the parent of a metric; the last one wins.
    ConflictingParent {
        metric: String,
        previous: String,
        current: String,
    },
    /// Rows disagree on the weight of a metric; the last one wins.
    ConflictingWeight {
        metric: String,
        previous: f64,
        current: f64,
    },
    /// Weight was negative or not a number; the default weight was used.
    InvalidWeight {
        metric: String,
        record_id: Option<String>,
    },
}

impl DataQualityWarning {
    /// Stable code for downstream branching.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ParentCycle { .. } => "W_PARENT_CYCLE",
            Self::DanglingParent { .. } => "W_DANGLING_PARENT",
            Self::ConflictingParent { .. } => "W_CONFLICTING_PARENT",
            Self::ConflictingWeight { .. } => "W_CONFLICTING_WEIGHT",
            Self::InvalidWeight { .. } => "W_INVALID_WEIGHT",
        }
    }

    /// Cycles are a misconfigured rollup, not just noisy data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::ParentCycle { .. })
    }

    pub fn metric(&self) -> &str {
        match self {
            Self::ParentCycle { metric, .. }
            | Self::DanglingParent { metric, .. }
            | Self::ConflictingParent { metric, .. }
            | Self::ConflictingWeight { metric, .. }
            | Self::InvalidWeight { metric, .. } => metric,
        }
    }
}

impl fmt::Display for DataQualityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParentCycle {
                metric,
                declared_parent,
                cycle,
            } => write!(
                f,
                "parent cycle {}; '{metric}' (declared parent '{declared_parent}') treated as root",
                cycle.join(" -> ")
            ),
            Self::DanglingParent { metric, parent } => write!(
                f,
                "parent '{parent}' of '{metric}' is not a metric; treated as root"
            ),
            Self::ConflictingParent {
                metric,
                previous,
                current,
            } => write!(
                f,
                "'{metric}' declared under both '{previous}' and '{current}'; using '{current}'"
            ),
            Self::ConflictingWeight {
                metric,
                previous,
                current,
            } => write!(
                f,
                "'{metric}' has weights {previous} and {current}; using {current}"
            ),
            Self::InvalidWeight { metric, record_id } => match record_id {
                Some(id) => write!(f, "invalid weight for '{metric}' in record '{id}'"),
                None => write!(f, "invalid weight for '{metric}'"),
            },
        }
    }
}
