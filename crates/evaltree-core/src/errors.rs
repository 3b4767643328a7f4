//! Error types for the engine.
//!
//! The scoring passes themselves are infallible for data-quality issues; see
//! [`crate::warnings`]. These errors cover configuration and caller input.

use std::path::PathBuf;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for [`crate::EngineConfig`].
    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Values parsed but are out of range.
    #[error("invalid config: {message}")]
    Invalid { message: String },
}

/// Engine errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Drill-down requested for a record with no usable rows.
    #[error("unknown record: {record_id}")]
    UnknownRecord { record_id: String },
}

impl EngineError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::UnknownRecord { .. } => 1,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
