use crate::classify::ClassifierTokens;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Engine settings. Every field has a default, so an empty file is valid.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub version: u32,

    /// Weight for rows that do not supply one (or supply an invalid one).
    pub default_weight: f64,

    /// Which parent value defines a sibling group for weight normalization.
    pub sibling_grouping: SiblingGrouping,

    /// Token lists for the default type classifier.
    pub classifier: ClassifierTokens,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            default_weight: 1.0,
            sibling_grouping: SiblingGrouping::default(),
            classifier: ClassifierTokens::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SiblingGrouping {
    /// Group by the parent string as declared on the rows. A dangling parent
    /// forms its own group, separate from the `null` root group.
    #[default]
    DeclaredParent,
    /// Group by the parent after dangling/cycle resolution. All roots share one group.
    ResolvedParent,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                supported: SUPPORTED_CONFIG_VERSION,
            });
        }
        if !self.default_weight.is_finite() || self.default_weight < 0.0 {
            return Err(ConfigError::Invalid {
                message: format!(
                    "default_weight must be a finite number >= 0, got {}",
                    self.default_weight
                ),
            });
        }
        self.classifier.validate()
    }
}

pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg = parse_config(&raw).map_err(|e| match e {
        ConfigError::Parse { message, .. } => ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })?;
    tracing::debug!(path = %path.display(), "loaded engine config");
    Ok(cfg)
}

/// Parse and validate YAML text.
pub fn parse_config(raw: &str) -> Result<EngineConfig, ConfigError> {
    // An empty document deserializes to unit, not to a map.
    let cfg: EngineConfig = if raw.trim().is_empty() {
        EngineConfig::default()
    } else {
        serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: "<inline>".into(),
            message: e.to_string(),
        })?
    };
    cfg.validate()?;
    Ok(cfg)
}
