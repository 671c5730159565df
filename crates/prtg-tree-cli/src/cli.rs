use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use prtg_types::ObjectId;

#[derive(Parser)]
#[command(
    name = "prtg-tree",
    about = "Inspect and compare PRTG object trees",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML file with rendering and diff defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Draw connectors with ASCII characters
    #[arg(long, global = true)]
    pub ascii: bool,

    /// Disable ANSI colours
    #[arg(long, global = true)]
    pub no_color: bool,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print a tree document
    Show(ShowArgs),
    /// Compare two tree documents
    Diff(DiffArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    pub path: PathBuf,
    /// Print only the sub-tree of the object with this ID
    #[arg(long)]
    pub root: Option<ObjectId>,
}

#[derive(Args)]
pub struct DiffArgs {
    pub first: PathBuf,
    pub second: PathBuf,
    /// Only show branches that changed
    #[arg(long)]
    pub reduce: bool,
    /// Differences to ignore, e.g. `--ignore name --ignore position`
    #[arg(long, value_parser = parse_difference)]
    pub ignore: Vec<prtg_tree_diff::TreeNodeDifference>,
}

fn parse_difference(s: &str) -> Result<prtg_tree_diff::TreeNodeDifference, String> {
    prtg_tree_diff::TreeNodeDifference::from_name(&s.to_ascii_uppercase().replace('-', "_"))
        .filter(|flag| !flag.is_empty())
        .ok_or_else(|| format!("unknown difference '{s}'"))
}
