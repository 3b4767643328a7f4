//! Display-type inference for hierarchy nodes.
//!
//! Two signals compete: a free-text `metric_type` hint on the rows and the
//! node's position in the tree. The hint wins when it names a known type;
//! otherwise the level and whether the node has children decide.
//!
//! Classification is a strategy ([`NodeClassifier`]) so callers can swap the
//! labeling rules without touching aggregation. Plain closures work too.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Category,
    Component,
    SubComponent,
    Metric,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Component => "component",
            Self::SubComponent => "sub-component",
            Self::Metric => "metric",
        }
    }
}

pub trait NodeClassifier {
    /// `hint` is the raw `metric_type`; `level` is 1 for roots.
    fn classify(&self, hint: &str, level: u32, has_children: bool) -> NodeType;
}

impl<F> NodeClassifier for F
where
    F: Fn(&str, u32, bool) -> NodeType,
{
    fn classify(&self, hint: &str, level: u32, has_children: bool) -> NodeType {
        self(hint, level, has_children)
    }
}

/// Substring tokens recognized in `metric_type` hints (case-insensitive).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierTokens {
    pub category_tokens: Vec<String>,
    /// Ignored when the hint also contains "sub".
    pub component_tokens: Vec<String>,
    pub sub_component_tokens: Vec<String>,
    pub metric_tokens: Vec<String>,
}

impl Default for ClassifierTokens {
    fn default() -> Self {
        Self {
            category_tokens: vec!["category".into(), "root".into()],
            component_tokens: vec!["component".into()],
            sub_component_tokens: vec!["sub-component".into(), "subcomponent".into()],
            metric_tokens: vec!["metric".into(), "leaf".into()],
        }
    }
}

impl ClassifierTokens {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lists = [
            ("category_tokens", &self.category_tokens),
            ("component_tokens", &self.component_tokens),
            ("sub_component_tokens", &self.sub_component_tokens),
            ("metric_tokens", &self.metric_tokens),
        ];
        for (field, tokens) in lists {
            if tokens.iter().any(|t| t.trim().is_empty()) {
                return Err(ConfigError::Invalid {
                    message: format!("classifier.{field} contains an empty token"),
                });
            }
        }
        Ok(())
    }
}

/// Default classifier: token match on the hint, then the level heuristic.
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    tokens: ClassifierTokens,
}

impl Default for TokenClassifier {
    fn default() -> Self {
        Self::new(ClassifierTokens::default())
    }
}

impl TokenClassifier {
    pub fn new(tokens: ClassifierTokens) -> Self {
        let lower = |v: Vec<String>| v.into_iter().map(|t| t.to_lowercase()).collect();
        Self {
            tokens: ClassifierTokens {
                category_tokens: lower(tokens.category_tokens),
                component_tokens: lower(tokens.component_tokens),
                sub_component_tokens: lower(tokens.sub_component_tokens),
                metric_tokens: lower(tokens.metric_tokens),
            },
        }
    }

    /// Type named by the hint, if any.
    pub fn from_hint(&self, hint: &str) -> Option<NodeType> {
        let hint = hint.trim().to_lowercase();
        if hint.is_empty() {
            return None;
        }
        let any = |tokens: &[String]| tokens.iter().any(|t| hint.contains(t.as_str()));

        if any(&self.tokens.category_tokens) {
            Some(NodeType::Category)
        } else if any(&self.tokens.component_tokens) && !hint.contains("sub") {
            Some(NodeType::Component)
        } else if any(&self.tokens.sub_component_tokens) {
            Some(NodeType::SubComponent)
        } else if any(&self.tokens.metric_tokens) {
            Some(NodeType::Metric)
        } else {
            None
        }
    }

    /// Structural fallback. Childless nodes are always metrics.
    pub fn from_structure(level: u32, has_children: bool) -> NodeType {
        match (level, has_children) {
            (_, false) => NodeType::Metric,
            (1, true) => NodeType::Category,
            (2, true) => NodeType::Component,
            (3, true) => NodeType::SubComponent,
            _ => NodeType::Metric,
        }
    }
}

impl NodeClassifier for TokenClassifier {
    fn classify(&self, hint: &str, level: u32, has_children: bool) -> NodeType {
        self.from_hint(hint)
            .unwrap_or_else(|| Self::from_structure(level, has_children))
    }
}
