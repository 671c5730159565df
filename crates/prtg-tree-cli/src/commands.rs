use std::path::Path;

use anyhow::{anyhow, Context};
use colored::Colorize;
use prtg_tree::{DocumentNode, PrtgNode};
use prtg_tree_diff::{changed_nodes, diff, DiffOptions};
use prtg_tree_pretty::{pretty_print, pretty_print_diff, Guides, PrettyLine, PrettyOptions};
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = effective_config(&cli)?;
    if !config.pretty.color {
        colored::control::set_override(false);
    }
    debug!(?config, "effective configuration");

    let output = match cli.command {
        Command::Show(args) => cmd_show(&args, &config.pretty, cli.format)?,
        Command::Diff(args) => {
            let mut options = config.diff.clone();
            options.reduce |= args.reduce;
            for flag in &args.ignore {
                options.ignore |= *flag;
            }
            cmd_diff(&args, &options, &config.pretty, cli.format)?
        }
    };
    print!("{output}");
    Ok(())
}

/// The `--config` file (or defaults) with command-line flags applied on top.
fn effective_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if cli.ascii {
        config.pretty.guides = Guides::Ascii;
    }
    if cli.no_color {
        config.pretty.color = false;
    }
    Ok(config)
}

fn load(path: &Path) -> anyhow::Result<PrtgNode> {
    DocumentNode::load_tree(path).with_context(|| format!("loading tree {}", path.display()))
}

fn render(lines: &[PrettyLine], options: &PrettyOptions, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(lines)? + "\n"),
        OutputFormat::Text => Ok(lines
            .iter()
            .map(|line| line.render(options.color) + "\n")
            .collect()),
    }
}

fn cmd_show(args: &ShowArgs, pretty: &PrettyOptions, format: OutputFormat) -> anyhow::Result<String> {
    let mut tree = load(&args.path)?;
    if let Some(id) = args.root {
        let node = tree
            .find_by_id(id)?
            .ok_or_else(|| anyhow!("object {id} not found in {}", args.path.display()))?;
        tree = PrtgNode::root(node.orphan().clone());
    }
    let lines = pretty_print(&tree, pretty)?;
    render(&lines, pretty, format)
}

fn cmd_diff(
    args: &DiffArgs,
    options: &DiffOptions,
    pretty: &PrettyOptions,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let first = load(&args.first)?;
    let second = load(&args.second)?;

    let Some(result) = diff(&first, &second, options)? else {
        return Ok(match format {
            OutputFormat::Json => "[]\n".to_string(),
            OutputFormat::Text if pretty.color => format!("{}\n", "No differences.".green()),
            OutputFormat::Text => "No differences.\n".to_string(),
        });
    };

    let mut output = render(&pretty_print_diff(&result, pretty)?, pretty, format)?;
    if format == OutputFormat::Text {
        let changed = changed_nodes(&result).len().to_string();
        let changed = if pretty.color {
            changed.bold().to_string()
        } else {
            changed
        };
        output.push_str(&format!(
            "\n{changed} changed, tree difference: {}\n",
            result.payload().tree_difference()
        ));
    }
    Ok(output)
}
