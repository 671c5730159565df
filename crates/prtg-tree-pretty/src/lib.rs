//! Rendering of PRTG trees and comparison trees as connector-drawn lines.
//!
//! ```text
//! dc-1
//! ├── Ping
//! └── CPU (Renamed 'Processor')
//! ```

pub mod compare;
pub mod config;
pub mod line;
pub mod prtg;
pub mod visitor;

pub use compare::{pretty_print_diff, CompareNodePrettyTreeVisitor};
pub use config::{Guides, PrettyOptions};
pub use line::{PrettyColor, PrettyLine};
pub use prtg::{pretty_print, PrtgNodePrettyTreeVisitor};
pub use visitor::{displayed_children, PrettyTreeVisitor};
