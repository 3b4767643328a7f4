use super::args::InputArgs;
use anyhow::Context;
use evaltree_core::{load_config, EngineConfig, MetricRow};
use std::path::Path;

pub fn load_engine_config(input: &InputArgs) -> anyhow::Result<EngineConfig> {
    match &input.config {
        Some(path) => Ok(load_config(path).map_err(evaltree_core::EngineError::from)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Read a JSON array or JSONL file of rows. Individual values are parsed
/// leniently by the engine; only broken JSON fails here.
pub fn read_rows(path: &Path) -> anyhow::Result<Vec<MetricRow>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rows {}", path.display()))?;
    let rows = parse_rows(&raw).with_context(|| format!("failed to parse rows {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "read score rows");
    Ok(rows)
}

pub fn parse_rows(raw: &str) -> anyhow::Result<Vec<MetricRow>> {
    let trimmed = raw.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut rows = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row: MetricRow =
            serde_json::from_str(line).with_context(|| format!("line {}", idx + 1))?;
        rows.push(row);
    }
    Ok(rows)
}
