use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Ways in which two aligned tree nodes can differ.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TreeNodeDifference: u16 {
        /// No difference.
        const NONE               = 0;
        /// The nodes model different kinds of entity.
        const TYPE               = 1 << 0;
        /// The values report different parent IDs.
        const PARENT             = 1 << 1;
        /// The names differ.
        const NAME               = 1 << 2;
        /// The values report different display positions.
        const POSITION           = 1 << 3;
        /// Property payloads differ.
        const VALUE              = 1 << 4;
        /// Only one of the nodes has children.
        const HAS_CHILDREN       = 1 << 5;
        /// Both nodes have children, but not the same number.
        const NUMBER_OF_CHILDREN = 1 << 6;
        /// The node only exists in the second tree.
        const ADDED              = 1 << 7;
        /// The node only exists in the first tree.
        const REMOVED            = 1 << 8;
    }
}

impl Default for TreeNodeDifference {
    fn default() -> Self {
        Self::NONE
    }
}

const LABELS: [(TreeNodeDifference, &str); 9] = [
    (TreeNodeDifference::TYPE, "Type"),
    (TreeNodeDifference::PARENT, "Parent"),
    (TreeNodeDifference::NAME, "Name"),
    (TreeNodeDifference::POSITION, "Position"),
    (TreeNodeDifference::VALUE, "Value"),
    (TreeNodeDifference::HAS_CHILDREN, "HasChildren"),
    (TreeNodeDifference::NUMBER_OF_CHILDREN, "NumberOfChildren"),
    (TreeNodeDifference::ADDED, "Added"),
    (TreeNodeDifference::REMOVED, "Removed"),
];

impl TreeNodeDifference {
    /// Human-readable names of the set flags, in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        LABELS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
            .collect()
    }
}

impl fmt::Display for TreeNodeDifference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        f.write_str(&self.labels().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        assert!(TreeNodeDifference::NONE.is_empty());
        assert_eq!(TreeNodeDifference::NONE.to_string(), "None");
    }

    #[test]
    fn labels_follow_declaration_order() {
        let diff = TreeNodeDifference::REMOVED | TreeNodeDifference::NAME | TreeNodeDifference::TYPE;
        assert_eq!(diff.labels(), vec!["Type", "Name", "Removed"]);
        assert_eq!(diff.to_string(), "Type, Name, Removed");
    }

    #[test]
    fn serde_roundtrip_uses_flag_names() {
        let diff = TreeNodeDifference::NAME | TreeNodeDifference::VALUE;
        let json = serde_json::to_string(&diff).unwrap();
        assert!(json.contains("NAME"));
        let parsed: TreeNodeDifference = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, diff);
    }
}
