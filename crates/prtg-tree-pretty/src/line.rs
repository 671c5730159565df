use std::fmt;

use colored::{Color, Colorize};
use serde::{Deserialize, Serialize};

/// Colour attached to a rendered line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrettyColor {
    Green,
    Red,
    Yellow,
    Blue,
}

impl From<PrettyColor> for Color {
    fn from(color: PrettyColor) -> Self {
        match color {
            PrettyColor::Green => Color::Green,
            PrettyColor::Red => Color::Red,
            PrettyColor::Yellow => Color::Yellow,
            PrettyColor::Blue => Color::Blue,
        }
    }
}

/// One rendered line of a tree: connectors, name and an optional colour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrettyLine {
    pub text: String,
    pub color: Option<PrettyColor>,
}

impl PrettyLine {
    pub fn new(text: impl Into<String>, color: Option<PrettyColor>) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }

    /// Render the line, applying its colour when `colored` is set.
    pub fn render(&self, colored: bool) -> String {
        match self.color {
            Some(color) if colored => self.text.as_str().color(Color::from(color)).to_string(),
            _ => self.text.clone(),
        }
    }
}

impl fmt::Display for PrettyLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
