use std::path::Path;

use anyhow::Context;
use prtg_tree_diff::DiffOptions;
use prtg_tree_pretty::PrettyOptions;
use serde::{Deserialize, Serialize};

/// Settings read from the `--config` file.
///
/// ```toml
/// [pretty]
/// guides = "ascii"
/// color = false
///
/// [diff]
/// reduce = true
/// ignore = "POSITION | PARENT"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub pretty: PrettyOptions,
    pub diff: DiffOptions,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
