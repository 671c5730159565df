use serde::{Deserialize, Serialize};

/// Characters used to draw tree connectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Guides {
    #[default]
    Unicode,
    Ascii,
}

impl Guides {
    /// Connector in front of a child that has later siblings.
    pub fn branch(&self) -> &'static str {
        match self {
            Self::Unicode => "├── ",
            Self::Ascii => "|-- ",
        }
    }

    /// Connector in front of the last child of a parent.
    pub fn last_branch(&self) -> &'static str {
        match self {
            Self::Unicode => "└── ",
            Self::Ascii => "`-- ",
        }
    }

    /// Continuation below an ancestor that has later siblings.
    pub fn vertical(&self) -> &'static str {
        match self {
            Self::Unicode => "│   ",
            Self::Ascii => "|   ",
        }
    }

    pub fn blank(&self) -> &'static str {
        "    "
    }
}

/// Options for rendering trees.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrettyOptions {
    pub guides: Guides,
    /// Emit ANSI colours when rendering lines.
    pub color: bool,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        Self {
            guides: Guides::Unicode,
            color: true,
        }
    }
}
