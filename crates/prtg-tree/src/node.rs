//! Live, parent-linked tree nodes.
//!
//! A [`TreeNode`] wraps an [`Orphan`] and knows its parent and its position in
//! the parent's child list. Nodes are created on demand when a child list is
//! indexed; the list caches them so the same position always yields the same
//! node.
//!
//! Ownership flows from the root down: parents own their cached children, and
//! children refer back to their parent through a [`Weak`] link. A node's
//! parent is therefore reachable only while some handle to an ancestor chain
//! up to the root is alive.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::node_list::NodeList;
use crate::orphan::{Orphan, TreePayload};

/// A live node of a tree.
pub struct TreeNode<P> {
    inner: Arc<NodeInner<P>>,
}

pub(crate) struct NodeInner<P> {
    orphan: Orphan<P>,
    parent: Option<Weak<NodeInner<P>>>,
    index: usize,
    children: NodeList<P>,
}

impl<P: TreePayload> TreeNode<P> {
    /// Create the root node of a tree.
    pub fn root(orphan: Orphan<P>) -> Self {
        Self::attach(orphan, None, 0)
    }

    /// Create a node for `orphan` sitting at `index` below `parent`.
    pub(crate) fn attach(orphan: Orphan<P>, parent: Option<Weak<NodeInner<P>>>, index: usize) -> Self {
        let inner = Arc::new_cyclic(|this| {
            let children = NodeList::new(this.clone(), orphan.children().clone());
            NodeInner {
                orphan,
                parent,
                index,
                children,
            }
        });
        Self { inner }
    }

    /// The parent node, if this is not the root and the parent is still alive.
    pub fn parent(&self) -> Option<TreeNode<P>> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| TreeNode { inner })
    }

    /// The root of the tree this node belongs to.
    pub fn root_node(&self) -> TreeNode<P> {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// All ancestors, nearest first.
    pub fn ancestors(&self) -> Vec<TreeNode<P>> {
        let mut result = Vec::new();
        let mut current = self.parent();
        while let Some(node) = current {
            current = node.parent();
            result.push(node);
        }
        result
    }

    /// Number of edges between this node and the root.
    pub fn depth(&self) -> usize {
        self.ancestors().len()
    }

    /// All descendants in pre-order. The node itself is **not** included.
    ///
    /// Enumerates every lazy child list below this node.
    pub fn descendants(&self) -> Vec<TreeNode<P>> {
        let mut result = Vec::new();
        self.collect_descendants(&mut result);
        result
    }

    /// This node followed by all of its descendants in pre-order.
    pub fn descendants_and_self(&self) -> Vec<TreeNode<P>> {
        let mut result = vec![self.clone()];
        self.collect_descendants(&mut result);
        result
    }

    fn collect_descendants(&self, out: &mut Vec<TreeNode<P>>) {
        for child in self.children().iter() {
            out.push(child.clone());
            child.collect_descendants(out);
        }
    }

    /// First node in pre-order (including this one) matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&TreeNode<P>) -> bool) -> Option<TreeNode<P>> {
        self.find_inner(&mut predicate)
    }

    fn find_inner(&self, predicate: &mut dyn FnMut(&TreeNode<P>) -> bool) -> Option<TreeNode<P>> {
        if predicate(self) {
            return Some(self.clone());
        }
        self.children().iter().find_map(|child| child.find_inner(predicate))
    }

    /// All nodes in pre-order (including this one) matching `predicate`.
    pub fn find_all(&self, mut predicate: impl FnMut(&TreeNode<P>) -> bool) -> Vec<TreeNode<P>> {
        self.descendants_and_self()
            .into_iter()
            .filter(|node| predicate(node))
            .collect()
    }
}

impl<P> TreeNode<P> {
    pub fn orphan(&self) -> &Orphan<P> {
        &self.inner.orphan
    }

    pub fn payload(&self) -> &P {
        self.inner.orphan.payload()
    }

    pub fn children(&self) -> &NodeList<P> {
        &self.inner.children
    }

    /// Position of this node in its parent's child list (0 for the root).
    pub fn index(&self) -> usize {
        self.inner.index
    }

    pub fn is_root(&self) -> bool {
        self.inner.parent.is_none()
    }

    /// Returns `true` if both handles refer to the very same live node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Returns `true` if both nodes wrap the same orphan, even when they
    /// belong to different live trees.
    pub fn same_orphan(&self, other: &Self) -> bool {
        self.inner.orphan.ptr_eq(&other.inner.orphan)
    }
}

impl<P> Clone for TreeNode<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for TreeNode<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("payload", self.payload())
            .field("index", &self.inner.index)
            .field("is_root", &self.is_root())
            .finish()
    }
}
