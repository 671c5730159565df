//! Edits built on the [`Rewriter`]: list edits, removal and replacement.
//!
//! Targets are matched by orphan identity, so a target is any node wrapping
//! the same orphan, whichever live tree it was obtained from.

use std::collections::HashSet;

use tracing::debug;

use crate::error::TreeResult;
use crate::node::TreeNode;
use crate::node_list::NodeList;
use crate::orphan::{Orphan, OrphanList, TreePayload};
use crate::rewrite::{rewrite, visit_children, visit_list_default, Rewriter};

/// The kind of edit a [`ListEditor`] performs around its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListEdit {
    /// Swap the target for the new nodes (no nodes removes it).
    Replace,
    /// Insert the new nodes right after the target.
    InsertAfter,
    /// Insert the new nodes right before the target.
    InsertBefore,
}

/// Performs a [`ListEdit`] in the child list containing the target.
///
/// A target that is not present in a visited list leaves that list to the
/// ordinary traversal; a target that is absent from the whole tree makes the
/// edit a no-op.
pub struct ListEditor<P> {
    target: Orphan<P>,
    nodes: Vec<Orphan<P>>,
    edit: ListEdit,
}

impl<P: TreePayload> ListEditor<P> {
    pub fn new(target: &TreeNode<P>, nodes: impl IntoIterator<Item = Orphan<P>>, edit: ListEdit) -> Self {
        Self {
            target: target.orphan().clone(),
            nodes: nodes.into_iter().collect(),
            edit,
        }
    }
}

impl<P: TreePayload> Rewriter<P> for ListEditor<P> {
    fn visit_list(&mut self, list: &NodeList<P>) -> TreeResult<OrphanList<P>> {
        let Some(index) = list.orphans().position(&self.target) else {
            return visit_list_default(self, list);
        };

        let mut orphans: Vec<Orphan<P>> = list.orphans().iter().collect();
        let range = match self.edit {
            ListEdit::Replace => index..index + 1,
            ListEdit::InsertAfter => index + 1..index + 1,
            ListEdit::InsertBefore => index..index,
        };
        orphans.splice(range, self.nodes.iter().cloned());
        debug!(edit = ?self.edit, index, inserted = self.nodes.len(), "edited child list");

        Ok(OrphanList::strict(orphans))
    }
}

/// Identity set of orphans. Holds the orphans so their addresses stay valid.
struct TargetSet<P> {
    keys: HashSet<usize>,
    _held: Vec<Orphan<P>>,
}

impl<P> TargetSet<P> {
    fn new<'a>(targets: impl IntoIterator<Item = &'a TreeNode<P>>) -> Self
    where
        P: 'a,
    {
        let held: Vec<Orphan<P>> = targets.into_iter().map(|node| node.orphan().clone()).collect();
        Self {
            keys: held.iter().map(Orphan::key).collect(),
            _held: held,
        }
    }

    fn contains(&self, node: &TreeNode<P>) -> bool {
        self.keys.contains(&node.orphan().key())
    }
}

/// Removes every node of the removal set together with its descendants.
pub struct NodeRemover<P> {
    targets: TargetSet<P>,
}

impl<P> NodeRemover<P> {
    pub fn new<'a>(targets: impl IntoIterator<Item = &'a TreeNode<P>>) -> Self
    where
        P: 'a,
    {
        Self {
            targets: TargetSet::new(targets),
        }
    }
}

impl<P: TreePayload> Rewriter<P> for NodeRemover<P> {
    fn visit(&mut self, node: &TreeNode<P>) -> TreeResult<Option<Orphan<P>>> {
        if self.targets.contains(node) {
            debug!(index = node.index(), "removing node");
            return Ok(None);
        }
        visit_children(self, node).map(Some)
    }
}

/// Replaces every node of the replacement set with the result of a function.
///
/// The function sees the original node and the node's orphan after its
/// descendants have been rewritten, and may return `None` to remove it.
pub struct NodeReplacer<P, F> {
    targets: TargetSet<P>,
    replace: F,
}

impl<P, F> NodeReplacer<P, F>
where
    F: FnMut(&TreeNode<P>, Orphan<P>) -> TreeResult<Option<Orphan<P>>>,
{
    pub fn new<'a>(targets: impl IntoIterator<Item = &'a TreeNode<P>>, replace: F) -> Self
    where
        P: 'a,
    {
        Self {
            targets: TargetSet::new(targets),
            replace,
        }
    }
}

impl<P, F> Rewriter<P> for NodeReplacer<P, F>
where
    P: TreePayload,
    F: FnMut(&TreeNode<P>, Orphan<P>) -> TreeResult<Option<Orphan<P>>>,
{
    fn visit(&mut self, node: &TreeNode<P>) -> TreeResult<Option<Orphan<P>>> {
        let rewritten = visit_children(self, node)?;
        if self.targets.contains(node) {
            return (self.replace)(node, rewritten);
        }
        Ok(Some(rewritten))
    }
}

/// Edit operations on the tree rooted at a node.
///
/// Each operation treats `self` as the root of the rewrite and returns the
/// root of the edited tree: `self` itself when nothing changed.
impl<P: TreePayload> TreeNode<P> {
    /// A detached copy of this node with different children.
    pub fn with_children(&self, children: impl IntoIterator<Item = Orphan<P>>) -> TreeNode<P> {
        TreeNode::root(self.orphan().with_children(OrphanList::strict(children)))
    }

    /// Replace `target` with `nodes`.
    pub fn replace_nodes(
        &self,
        target: &TreeNode<P>,
        nodes: impl IntoIterator<Item = Orphan<P>>,
    ) -> TreeResult<TreeNode<P>> {
        self.edit_list(ListEditor::new(target, nodes, ListEdit::Replace))
    }

    /// Insert `nodes` right after `target`.
    pub fn insert_nodes_after(
        &self,
        target: &TreeNode<P>,
        nodes: impl IntoIterator<Item = Orphan<P>>,
    ) -> TreeResult<TreeNode<P>> {
        self.edit_list(ListEditor::new(target, nodes, ListEdit::InsertAfter))
    }

    /// Insert `nodes` right before `target`.
    pub fn insert_nodes_before(
        &self,
        target: &TreeNode<P>,
        nodes: impl IntoIterator<Item = Orphan<P>>,
    ) -> TreeResult<TreeNode<P>> {
        self.edit_list(ListEditor::new(target, nodes, ListEdit::InsertBefore))
    }

    /// Remove `targets` and their descendants. `None` if `self` was removed.
    pub fn remove_nodes<'a>(
        &self,
        targets: impl IntoIterator<Item = &'a TreeNode<P>>,
    ) -> TreeResult<Option<TreeNode<P>>>
    where
        P: 'a,
    {
        rewrite(&mut NodeRemover::new(targets), self)
    }

    /// Replace each of `targets` with `replace(original, rewritten)`.
    pub fn replace_with<'a, F>(
        &self,
        targets: impl IntoIterator<Item = &'a TreeNode<P>>,
        replace: F,
    ) -> TreeResult<Option<TreeNode<P>>>
    where
        P: 'a,
        F: FnMut(&TreeNode<P>, Orphan<P>) -> TreeResult<Option<Orphan<P>>>,
    {
        rewrite(&mut NodeReplacer::new(targets, replace), self)
    }

    fn edit_list(&self, mut editor: ListEditor<P>) -> TreeResult<TreeNode<P>> {
        let orphan = visit_children(&mut editor, self)?;
        if orphan.ptr_eq(self.orphan()) {
            Ok(self.clone())
        } else {
            Ok(TreeNode::root(orphan))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Label(String);

    impl TreePayload for Label {}

    fn node(label: &str, children: Vec<Orphan<Label>>) -> Orphan<Label> {
        Orphan::new(Label(label.to_string()), OrphanList::strict(children))
    }

    fn leaf(label: &str) -> Orphan<Label> {
        node(label, vec![])
    }

    fn labels(node: &TreeNode<Label>) -> Vec<String> {
        node.descendants().iter().map(|n| n.payload().0.clone()).collect()
    }

    fn sample() -> TreeNode<Label> {
        TreeNode::root(node(
            "root",
            vec![
                node("a", vec![leaf("a1"), leaf("a2"), leaf("a3")]),
                node("b", vec![node("b1", vec![leaf("b1x")])]),
            ],
        ))
    }

    fn find(root: &TreeNode<Label>, label: &str) -> TreeNode<Label> {
        root.find(|n| n.payload().0 == label).unwrap()
    }

    #[test]
    fn replace_swaps_target_for_sequence() {
        let root = sample();
        let a2 = find(&root, "a2");
        let edited = root.replace_nodes(&a2, vec![leaf("n1"), leaf("n2")]).unwrap();
        assert_eq!(labels(&edited), vec!["a", "a1", "n1", "n2", "a3", "b", "b1", "b1x"]);
        // The original tree is untouched.
        assert_eq!(labels(&root), vec!["a", "a1", "a2", "a3", "b", "b1", "b1x"]);
    }

    #[test]
    fn replace_with_nothing_removes() {
        let root = sample();
        let a1 = find(&root, "a1");
        let edited = root.replace_nodes(&a1, Vec::new()).unwrap();
        assert_eq!(labels(&edited), vec!["a", "a2", "a3", "b", "b1", "b1x"]);
    }

    #[test]
    fn insert_after_and_before() {
        let root = sample();
        let b1 = find(&root, "b1");
        let after = root.insert_nodes_after(&b1, vec![leaf("b2")]).unwrap();
        assert_eq!(labels(&after), vec!["a", "a1", "a2", "a3", "b", "b1", "b1x", "b2"]);

        let a = find(&root, "a");
        let before = root.insert_nodes_before(&a, vec![leaf("first")]).unwrap();
        assert_eq!(labels(&before)[0], "first");
        assert_eq!(before.children().len(), 3);
    }

    #[test]
    fn editing_missing_target_is_a_no_op() {
        let root = sample();
        let stranger = TreeNode::root(leaf("stranger"));
        let edited = root.insert_nodes_after(&stranger, vec![leaf("x")]).unwrap();
        assert!(edited.ptr_eq(&root));
    }

    #[test]
    fn editing_root_target_is_a_no_op() {
        let root = sample();
        let edited = root.replace_nodes(&root, vec![leaf("x")]).unwrap();
        assert!(edited.ptr_eq(&root));
    }

    #[test]
    fn edit_shares_untouched_subtrees() {
        let root = sample();
        let a3 = find(&root, "a3");
        let edited = root.replace_nodes(&a3, vec![leaf("z")]).unwrap();

        let old_b = root.children().get(1).unwrap();
        let new_b = edited.children().get(1).unwrap();
        assert!(new_b.same_orphan(&old_b));

        let old_a1 = find(&root, "a1");
        let new_a1 = find(&edited, "a1");
        assert!(new_a1.same_orphan(&old_a1));
        assert!(!edited.children().get(0).unwrap().same_orphan(&root.children().get(0).unwrap()));
    }

    #[test]
    fn remove_excises_descendants() {
        let root = sample();
        let b1 = find(&root, "b1");
        let a2 = find(&root, "a2");
        let edited = root.remove_nodes([&b1, &a2]).unwrap().unwrap();
        assert_eq!(labels(&edited), vec!["a", "a1", "a3", "b"]);
    }

    #[test]
    fn remove_nothing_preserves_identity() {
        let root = sample();
        let edited = root.remove_nodes(std::iter::empty()).unwrap().unwrap();
        assert!(edited.ptr_eq(&root));
    }

    #[test]
    fn remove_root_yields_none() {
        let root = sample();
        assert!(root.remove_nodes([&root]).unwrap().is_none());
    }

    #[test]
    fn targets_from_another_live_tree_match_by_orphan() {
        let shared = node("shared", vec![leaf("inner")]);
        let t1 = TreeNode::root(node("r1", vec![shared.clone(), leaf("other")]));
        let t2 = TreeNode::root(node("r2", vec![shared]));
        let in_t2 = t2.children().get(0).unwrap();

        let edited = t1.remove_nodes([&in_t2]).unwrap().unwrap();
        assert_eq!(labels(&edited), vec!["other"]);
    }

    #[test]
    fn replacer_sees_rewritten_descendants() {
        let root = sample();
        let b = find(&root, "b");
        let b1x = find(&root, "b1x");

        let mut seen_children = Vec::new();
        let edited = root
            .replace_with([&b, &b1x], |original, rewritten| {
                if original.payload().0 == "b" {
                    // b1x has already been replaced below us.
                    let grandchild = rewritten.children().get(0)?.children().get(0)?;
                    seen_children.push(grandchild.payload().0.clone());
                }
                Ok(Some(Orphan::new(
                    Label(original.payload().0.to_uppercase()),
                    rewritten.children().clone(),
                )))
            })
            .unwrap()
            .unwrap();

        assert_eq!(seen_children, vec!["B1X"]);
        assert_eq!(labels(&edited), vec!["a", "a1", "a2", "a3", "B", "b1", "B1X"]);
    }

    #[test]
    fn replacer_can_remove() {
        let root = sample();
        let a = find(&root, "a");
        let edited = root.replace_with([&a], |_, _| Ok(None)).unwrap().unwrap();
        assert_eq!(labels(&edited), vec!["b", "b1", "b1x"]);
    }

    #[test]
    fn with_children_detaches() {
        let root = sample();
        let a = find(&root, "a");
        let detached = a.with_children(vec![leaf("only")]);
        assert!(detached.is_root());
        assert_eq!(labels(&detached), vec!["only"]);
        assert_eq!(detached.payload().0, "a");
    }

    fn arb_tree() -> impl Strategy<Value = Orphan<Label>> {
        let leaf = "[a-z]{1,3}".prop_map(|s| node(&s, vec![]));
        leaf.prop_recursive(4, 32, 4, |inner| {
            ("[a-z]{1,3}", prop::collection::vec(inner, 0..4))
                .prop_map(|(label, children)| node(&label, children))
        })
    }

    proptest! {
        #[test]
        fn edits_with_foreign_targets_preserve_identity(tree in arb_tree()) {
            let root = TreeNode::root(tree);
            let stranger = TreeNode::root(leaf("stranger"));

            prop_assert!(root.replace_nodes(&stranger, vec![leaf("x")]).unwrap().ptr_eq(&root));
            prop_assert!(root.insert_nodes_before(&stranger, vec![leaf("x")]).unwrap().ptr_eq(&root));
            prop_assert!(root.remove_nodes([&stranger]).unwrap().unwrap().ptr_eq(&root));
        }

        #[test]
        fn removed_nodes_never_survive(tree in arb_tree(), pick in any::<prop::sample::Index>()) {
            let root = TreeNode::root(tree);
            let candidates = root.descendants();
            prop_assume!(!candidates.is_empty());
            let target = pick.get(&candidates).clone();
            let doomed: Vec<Orphan<Label>> = target
                .descendants_and_self()
                .iter()
                .map(|n| n.orphan().clone())
                .collect();

            let edited = root.remove_nodes([&target]).unwrap().unwrap();
            for survivor in edited.descendants_and_self() {
                prop_assert!(!doomed.iter().any(|d| d.ptr_eq(survivor.orphan())));
            }
        }
    }
}
