pub mod record;
pub mod records;
pub mod summary;
pub mod tree;

mod dispatch;
pub use dispatch::dispatch;

use super::args::ViewArgs;
use evaltree_core::{expand_all_ids, Hierarchy};
use std::collections::HashSet;

/// Expand set requested on the command line.
pub(crate) fn expanded_ids(view: &ViewArgs, hierarchy: &Hierarchy) -> HashSet<String> {
    if view.expand_all {
        return expand_all_ids(hierarchy);
    }
    for id in &view.expand {
        if !hierarchy.contains(id) {
            tracing::warn!(metric = %id, "--expand names an unknown metric");
        }
    }
    view.expand.iter().cloned().collect()
}
