use crate::cli::args::{OutputFormat, RecordsArgs};
use crate::cli::input::read_rows;
use crate::exit_codes::SUCCESS;
use evaltree_core::record_ids;

pub fn run(args: RecordsArgs) -> anyhow::Result<i32> {
    let rows = read_rows(&args.input.rows)?;
    let ids = record_ids(&rows);
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&ids)?),
        OutputFormat::Text => {
            for id in ids {
                println!("{id}");
            }
        }
    }
    Ok(SUCCESS)
}
