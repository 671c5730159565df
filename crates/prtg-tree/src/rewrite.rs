//! Structural-sharing tree rewrites.
//!
//! A [`Rewriter`] walks a live tree and produces orphans. The default walk
//! rebuilds a node only when at least one of its children came back as a
//! different orphan; otherwise the original orphan is returned, so untouched
//! sub-trees are shared by reference between the old and the new tree.

use tracing::debug;

use crate::error::TreeResult;
use crate::node::TreeNode;
use crate::node_list::NodeList;
use crate::orphan::{Orphan, OrphanList, TreePayload};

/// A visitor that reconstructs a tree, reusing unchanged sub-trees.
///
/// Returning `None` from [`visit`](Rewriter::visit) removes the node (and
/// everything below it) from the rewritten tree.
pub trait Rewriter<P: TreePayload> {
    fn visit(&mut self, node: &TreeNode<P>) -> TreeResult<Option<Orphan<P>>> {
        visit_children(self, node).map(Some)
    }

    fn visit_list(&mut self, list: &NodeList<P>) -> TreeResult<OrphanList<P>> {
        visit_list_default(self, list)
    }
}

/// Rewrite `node`'s children and rebuild it only if any child changed.
pub fn visit_children<P, R>(rewriter: &mut R, node: &TreeNode<P>) -> TreeResult<Orphan<P>>
where
    P: TreePayload,
    R: Rewriter<P> + ?Sized,
{
    let children = rewriter.visit_list(node.children())?;
    if children.ptr_eq(node.orphan().children()) {
        Ok(node.orphan().clone())
    } else {
        Ok(node.orphan().with_children(children))
    }
}

/// Map every child through [`Rewriter::visit`], dropping removed ones.
///
/// Returns the original orphan list when nothing changed.
pub fn visit_list_default<P, R>(rewriter: &mut R, list: &NodeList<P>) -> TreeResult<OrphanList<P>>
where
    P: TreePayload,
    R: Rewriter<P> + ?Sized,
{
    let mut changed = false;
    let mut rewritten = Vec::new();

    for child in list.iter() {
        match rewriter.visit(&child)? {
            Some(orphan) => {
                changed |= !orphan.ptr_eq(child.orphan());
                rewritten.push(orphan);
            }
            None => changed = true,
        }
    }

    if changed {
        Ok(OrphanList::strict(rewritten))
    } else {
        Ok(list.orphans().clone())
    }
}

/// Run `rewriter` over the tree rooted at `root`.
///
/// Returns `root` itself when nothing changed, a new root node otherwise, and
/// `None` when the root itself was removed.
pub fn rewrite<P, R>(rewriter: &mut R, root: &TreeNode<P>) -> TreeResult<Option<TreeNode<P>>>
where
    P: TreePayload,
    R: Rewriter<P> + ?Sized,
{
    match rewriter.visit(root)? {
        Some(orphan) if orphan.ptr_eq(root.orphan()) => Ok(Some(root.clone())),
        Some(orphan) => {
            debug!("rewrite produced a new root");
            Ok(Some(TreeNode::root(orphan)))
        }
        None => {
            debug!("rewrite removed the root");
            Ok(None)
        }
    }
}
