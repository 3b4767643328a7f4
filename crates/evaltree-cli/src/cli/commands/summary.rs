use crate::cli::args::{OutputFormat, SummaryArgs};
use crate::cli::input::{load_engine_config, read_rows};
use crate::cli::render;
use crate::exit_codes::SUCCESS;
use evaltree_core::{build_scorecard_with, record_ids, ScorecardSummary, TokenClassifier};

pub fn run(args: SummaryArgs) -> anyhow::Result<i32> {
    let config = load_engine_config(&args.input)?;
    let rows = read_rows(&args.input.rows)?;
    let classifier = TokenClassifier::new(config.classifier.clone());
    let hierarchy = build_scorecard_with(&rows, &config, &classifier);
    let summary = ScorecardSummary::from_hierarchy(&hierarchy);
    let records = record_ids(&rows).len();

    match args.format {
        OutputFormat::Json => {
            let out = serde_json::json!({
                "summary": summary,
                "records": records,
                "warnings": hierarchy.warnings(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            print!("{}", render::summary_text(&summary, records));
            print!("{}", render::warnings_text(hierarchy.warnings()));
        }
    }
    Ok(SUCCESS)
}
