use super::expanded_ids;
use crate::cli::args::{OutputFormat, TreeArgs, ViewArgs};
use crate::cli::input::{load_engine_config, read_rows};
use crate::cli::render;
use crate::exit_codes::SUCCESS;
use evaltree_core::{build_scorecard_with, generate_display_rows, Hierarchy, TokenClassifier};

pub fn run(args: TreeArgs) -> anyhow::Result<i32> {
    let config = load_engine_config(&args.input)?;
    let rows = read_rows(&args.input.rows)?;
    let classifier = TokenClassifier::new(config.classifier.clone());
    let hierarchy = build_scorecard_with(&rows, &config, &classifier);
    print_tree(&hierarchy, &args.view)?;
    Ok(SUCCESS)
}

/// Shared by `tree` and `record`: both render through the same display rows.
pub(crate) fn print_tree(hierarchy: &Hierarchy, view: &ViewArgs) -> anyhow::Result<()> {
    let expanded = expanded_ids(view, hierarchy);
    let display = generate_display_rows(hierarchy, &expanded);
    match view.format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "rows": display,
                "warnings": hierarchy.warnings(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            print!("{}", render::tree_text(&display, view.show_hidden));
            print!("{}", render::warnings_text(hierarchy.warnings()));
        }
    }
    Ok(())
}
