//! Pruning of comparison trees down to what actually changed.

use prtg_tree::{rewrite, visit_children, Rewriter, TreeResult};
use tracing::debug;

use crate::compare::{CompareNode, CompareOrphan, ComparePayload};

/// Removes every branch of a comparison tree that contains no differences.
///
/// A node survives if it differs itself or if at least one of its
/// descendants survives. Kept sub-trees that were not pruned are shared with
/// the input tree.
#[derive(Debug, Default)]
pub struct CompareNodeReducer;

impl Rewriter<ComparePayload> for CompareNodeReducer {
    fn visit(&mut self, node: &CompareNode) -> TreeResult<Option<CompareOrphan>> {
        if node.payload().tree_difference().is_empty() {
            return Ok(None);
        }

        let rebuilt = visit_children(self, node)?;
        if node.payload().difference().is_empty() && rebuilt.children().is_empty() {
            return Ok(None);
        }
        Ok(Some(rebuilt))
    }
}

/// Reduce a comparison tree. Returns `None` when the compared trees are equal.
pub fn reduce(root: &CompareNode) -> TreeResult<Option<CompareNode>> {
    let reduced = rewrite(&mut CompareNodeReducer, root)?;
    debug!(
        before = root.descendants_and_self().len(),
        after = reduced.as_ref().map_or(0, |r| r.descendants_and_self().len()),
        "reduced comparison tree"
    );
    Ok(reduced)
}
