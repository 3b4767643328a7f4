//! Hierarchical metric aggregation and weighted scoring.
//!
//! Turns a flat table of per-record, per-metric score rows into a weighted
//! tree (category → component → sub-component → metric):
//!
//! ```text
//! rows ──► aggregate ──► build_hierarchy ──► normalize_weights ──┬─► generate_display_rows
//!                                                                └─► calculate_weighted_score
//!                                                                    calculate_score_variance
//! ```
//!
//! Every stage is a pure function over an in-memory snapshot. Data-quality
//! problems never fail a pass; they degrade to "skip the row" or "treat as
//! root" and are reported as [`DataQualityWarning`]s.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod display;
pub mod errors;
pub mod fingerprint;
pub mod hierarchy;
pub mod pipeline;
pub mod record;
pub mod row;
pub mod score;
pub mod summary;
pub mod warnings;
pub mod weights;

pub use aggregate::{aggregate, aggregate_with_report, Aggregation};
pub use classify::{ClassifierTokens, NodeClassifier, NodeType, TokenClassifier};
pub use config::{load_config, parse_config, EngineConfig, SiblingGrouping};
pub use display::{expand_all_ids, generate_display_rows, DisplayRow};
pub use errors::{ConfigError, EngineError, EngineResult};
pub use fingerprint::{rows_fingerprint, ScorecardCache};
pub use hierarchy::{build_hierarchy, build_hierarchy_with, Hierarchy, MetricNode};
pub use pipeline::{build_scorecard, build_scorecard_with};
pub use record::{drill_down, project_single_record, project_single_record_with, record_ids};
pub use row::MetricRow;
pub use score::{calculate_score_variance, calculate_weighted_score, ScorecardSummary};
pub use summary::{MetricSummary, ScoreDistribution};
pub use warnings::DataQualityWarning;
pub use weights::{normalize_weights, normalize_weights_with};
