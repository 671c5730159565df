use serde::{Deserialize, Serialize};

use crate::difference::TreeNodeDifference;

/// Options for [`diff`](crate::diff).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    /// Prune branches without differences from the result.
    pub reduce: bool,
    /// Kinds of difference that are not recorded at all.
    pub ignore: TreeNodeDifference,
}

impl DiffOptions {
    /// Options that prune the result to changed branches.
    pub fn reduced() -> Self {
        Self {
            reduce: true,
            ..Default::default()
        }
    }
}
