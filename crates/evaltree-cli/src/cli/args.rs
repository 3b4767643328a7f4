use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "evaltree",
    version,
    about = "Weighted metric scorecards from flat evaluation score rows"
)]
pub struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Weighted score, dispersion, and data-quality warnings
    Summary(SummaryArgs),
    /// Expandable metric tree for the whole row set
    Tree(TreeArgs),
    /// Metric tree for a single record (drill-down)
    Record(RecordArgs),
    /// List distinct record ids
    Records(RecordsArgs),
    /// Print the evaltree version
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Score rows: a JSON array or JSONL (one row object per line)
    #[arg(long)]
    pub rows: PathBuf,

    /// Engine config (YAML)
    #[arg(long, env = "EVALTREE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Expand this node (repeatable)
    #[arg(long = "expand", value_name = "METRIC")]
    pub expand: Vec<String>,

    /// Expand every node that has children
    #[arg(long, conflicts_with = "expand")]
    pub expand_all: bool,

    /// Text output: also print rows hidden under collapsed nodes
    #[arg(long)]
    pub show_hidden: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Record (test case) id
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RecordsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
