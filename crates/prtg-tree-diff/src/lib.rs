//! Structural diffing of PRTG object trees.
//!
//! Two trees are aligned position by position into a comparison tree whose
//! nodes pair the first tree's node with the second's and record how they
//! differ. The comparison tree can then be reduced to the branches that
//! actually changed.
//!
//! # Key Types
//!
//! - [`TreeNodeDifference`] — Bit set of difference kinds
//! - [`CompareTreeVisitor`] / [`CompareNode`] — Alignment and the resulting comparison tree
//! - [`CompareNodeReducer`] — Prunes unchanged branches
//! - [`DiffOptions`] — Reduction and ignored differences

pub mod compare;
pub mod config;
pub mod difference;
pub mod reduce;

pub use compare::{changed_nodes, compare, CompareNode, CompareOrphan, ComparePayload, CompareTreeVisitor};
pub use config::DiffOptions;
pub use difference::TreeNodeDifference;
pub use reduce::{reduce, CompareNodeReducer};

use prtg_tree::{PrtgNode, TreeResult};

/// Compare two trees according to `options`.
///
/// Returns `None` only when reducing and the trees are equal.
pub fn diff(first: &PrtgNode, second: &PrtgNode, options: &DiffOptions) -> TreeResult<Option<CompareNode>> {
    let result = CompareTreeVisitor::ignoring(options.ignore).compare(first, second)?;
    if options.reduce {
        reduce(&result)
    } else {
        Ok(Some(result))
    }
}
