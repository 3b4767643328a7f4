use evaltree_core::{DataQualityWarning, DisplayRow, ScorecardSummary};
use std::fmt::Write;

pub fn summary_text(summary: &ScorecardSummary, records: usize) -> String {
    let mut s = String::from("Scorecard Summary:\n");
    let _ = writeln!(s, "  weighted score: {:.3}", summary.weighted_score);
    let _ = writeln!(s, "  score std dev:  {:.3}", summary.score_variance);
    let _ = writeln!(
        s,
        "  metrics: {} ({} roots, {} leaves)",
        summary.node_count, summary.root_count, summary.leaf_count
    );
    let _ = writeln!(s, "  records: {records}");
    if summary.dropped_rows > 0 {
        let _ = writeln!(s, "  dropped rows: {}", summary.dropped_rows);
    }
    s
}

pub fn warnings_text(warnings: &[DataQualityWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut s = format!("\nWarnings ({}):\n", warnings.len());
    for w in warnings {
        let _ = writeln!(s, "  [{}] {}", w.code(), w);
    }
    s
}

/// One line per row, indented by level. Hidden rows only with `show_hidden`.
pub fn tree_text(rows: &[DisplayRow], show_hidden: bool) -> String {
    let mut s = String::new();
    for row in rows.iter().filter(|r| show_hidden || r.is_visible) {
        let node = &row.node;
        let indent = "  ".repeat(node.level.saturating_sub(1) as usize);
        let marker = match (row.has_children, row.is_expanded) {
            (false, _) => '-',
            (true, true) => 'v',
            (true, false) => '>',
        };
        let _ = write!(
            s,
            "{indent}{marker} {} [{}] avg={:.3} sd={:.3} n={} w={:.3}",
            node.name(),
            node.node_type.as_str(),
            node.summary.avg_score,
            node.summary.std_dev,
            node.summary.test_case_count,
            node.normalized_weight,
        );
        if !row.is_visible {
            s.push_str(" (hidden)");
        }
        s.push('\n');
    }
    s
}
