//! Structural properties of the scoring pipeline over generated row sets.

use evaltree_core::{
    build_scorecard, generate_display_rows, Hierarchy, MetricRow,
};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

const NAMES: &[&str] = &[
    "quality", "rag", "faithfulness", "relevance", "fluency", "safety", "toxicity", "bias",
];

fn arb_row() -> impl Strategy<Value = MetricRow> {
    (
        0..NAMES.len(),
        prop_oneof![4 => (0.0f64..=1.0).prop_map(Some), 1 => Just(Some(f64::NAN)), 1 => Just(None)],
        prop::option::of(0..NAMES.len() + 2),
        prop::option::of(prop_oneof![Just(0.0), 0.0f64..5.0]),
        0..4usize,
    )
        .prop_map(|(name, score, parent, weight, record)| MetricRow {
            record_id: Some(format!("r{record}")),
            metric_name: Some(NAMES[name].to_string()),
            score,
            // Indices past the name table produce parents that never appear as metrics.
            parent: parent.map(|p| NAMES.get(p).map_or_else(|| format!("ghost{p}"), |n| n.to_string())),
            weight,
            ..MetricRow::default()
        })
}

fn arb_rows() -> impl Strategy<Value = Vec<MetricRow>> {
    prop::collection::vec(arb_row(), 0..40)
}

fn expanded_subset(h: &Hierarchy, mask: u32) -> HashSet<String> {
    h.nodes()
        .enumerate()
        .filter(|(i, _)| mask & (1 << (i % 32)) != 0)
        .map(|(_, n)| n.name().to_string())
        .collect()
}

proptest! {
    #[test]
    fn pipeline_is_idempotent(rows in arb_rows()) {
        prop_assert_eq!(build_scorecard(&rows), build_scorecard(&rows));
    }

    #[test]
    fn sibling_weights_sum_to_one(rows in arb_rows()) {
        let h = build_scorecard(&rows);
        let mut sums: HashMap<Option<String>, f64> = HashMap::new();
        for node in h.nodes() {
            *sums.entry(node.summary.parent.clone()).or_default() += node.normalized_weight;
        }
        for (group, sum) in sums {
            prop_assert!((sum - 1.0).abs() < 1e-9, "group {:?} sums to {}", group, sum);
        }
    }

    #[test]
    fn levels_follow_resolved_parents(rows in arb_rows()) {
        let h = build_scorecard(&rows);
        for node in h.nodes() {
            match &node.resolved_parent {
                None => prop_assert_eq!(node.level, 1),
                Some(p) => {
                    let parent = h.get(p).unwrap();
                    prop_assert_eq!(node.level, parent.level + 1);
                    prop_assert!(parent.child_metrics.iter().any(|c| c == node.name()));
                }
            }
        }
    }

    #[test]
    fn distribution_counts_every_score(rows in arb_rows()) {
        let h = build_scorecard(&rows);
        for node in h.nodes() {
            prop_assert_eq!(
                node.summary.score_distribution.total(),
                node.summary.test_case_count as u64
            );
        }
    }

    #[test]
    fn every_node_is_emitted_once(rows in arb_rows(), mask in any::<u32>()) {
        let h = build_scorecard(&rows);
        let display = generate_display_rows(&h, &expanded_subset(&h, mask));
        let names: HashSet<&str> = display.iter().map(|r| r.name()).collect();
        prop_assert_eq!(names.len(), display.len());
        prop_assert_eq!(display.len(), h.len());
    }

    #[test]
    fn visibility_requires_expanded_ancestors(rows in arb_rows(), mask in any::<u32>()) {
        let h = build_scorecard(&rows);
        let expanded = expanded_subset(&h, mask);
        for row in generate_display_rows(&h, &expanded) {
            let all_open = h.ancestors(row.name()).iter().all(|a| expanded.contains(*a));
            prop_assert_eq!(row.is_visible, all_open, "row {}", row.name());
        }
    }

    #[test]
    fn collapsing_only_hides_descendants(rows in arb_rows(), mask in any::<u32>(), pick in any::<usize>()) {
        let h = build_scorecard(&rows);
        let expanded = expanded_subset(&h, mask);
        prop_assume!(!expanded.is_empty());
        let mut ids: Vec<&String> = expanded.iter().collect();
        ids.sort();
        let collapsed_id = ids[pick % ids.len()].clone();
        let mut collapsed = expanded.clone();
        collapsed.remove(&collapsed_id);

        let before = generate_display_rows(&h, &expanded);
        let after = generate_display_rows(&h, &collapsed);
        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            prop_assert_eq!(&b.node, &a.node);
            prop_assert_eq!(b.has_children, a.has_children);
            let is_descendant = h.ancestors(b.name()).contains(&collapsed_id.as_str());
            if is_descendant {
                prop_assert!(!a.is_visible);
            } else {
                prop_assert_eq!(b.is_visible, a.is_visible);
            }
            if b.name() != collapsed_id {
                prop_assert_eq!(b.is_expanded, a.is_expanded);
            }
        }
    }
}
