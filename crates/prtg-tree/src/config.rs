use serde::{Deserialize, Serialize};

/// How child lists of a built tree are materialized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Materialization {
    /// Every child list is fetched while the tree is built.
    #[default]
    Strict,
    /// Child lists are fetched the first time they are enumerated.
    Lazy,
}

/// Options controlling how a [`TreeBuilder`](crate::TreeBuilder) builds a tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Child list materialization policy.
    pub materialization: Materialization,
    /// Maximum depth below the root to include. `None` includes everything.
    pub max_depth: Option<usize>,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            materialization: Materialization::Strict,
            max_depth: None,
        }
    }
}

impl TreeOptions {
    /// Options for a lazily materialized tree of unlimited depth.
    pub fn lazy() -> Self {
        Self {
            materialization: Materialization::Lazy,
            ..Default::default()
        }
    }
}
