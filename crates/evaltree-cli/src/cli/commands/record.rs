use super::tree::print_tree;
use crate::cli::args::RecordArgs;
use crate::cli::input::{load_engine_config, read_rows};
use crate::exit_codes::{DATA_ERROR, SUCCESS};
use evaltree_core::{drill_down, EngineError, TokenClassifier};

pub fn run(args: RecordArgs) -> anyhow::Result<i32> {
    let config = load_engine_config(&args.input)?;
    let rows = read_rows(&args.input.rows)?;
    let classifier = TokenClassifier::new(config.classifier.clone());

    let hierarchy = match drill_down(&rows, &args.id, &config, &classifier) {
        Ok(h) => h,
        Err(e @ EngineError::UnknownRecord { .. }) => {
            eprintln!("error: {e}");
            return Ok(DATA_ERROR);
        }
        Err(e) => return Err(e.into()),
    };
    print_tree(&hierarchy, &args.view)?;
    Ok(SUCCESS)
}
