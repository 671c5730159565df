//! Structural comparison of two PRTG trees.
//!
//! [`CompareTreeVisitor`] walks two trees in lock-step. Nodes are paired by
//! position; a pair whose IDs disagree means the trees diverged at that point,
//! and the pair is split into a removed branch (first tree only) and an added
//! branch (second tree only), each continuing on its own below. No attempt is
//! made to realign children that moved within a list: an insertion in the
//! middle of one list misaligns every later sibling.

use prtg_tree::{Orphan, OrphanList, PrtgNode, TreeNode, TreePayload, TreeResult};
use prtg_types::PrtgNodeType;
use tracing::{debug, trace};

use crate::difference::TreeNodeDifference;

/// Orphan of a comparison tree.
pub type CompareOrphan = Orphan<ComparePayload>;

/// Live node of a comparison tree.
pub type CompareNode = TreeNode<ComparePayload>;

/// Payload of a comparison tree node: two aligned nodes and how they differ.
#[derive(Clone, Debug)]
pub struct ComparePayload {
    first: Option<PrtgNode>,
    second: Option<PrtgNode>,
    node_type: PrtgNodeType,
    difference: TreeNodeDifference,
    tree_difference: TreeNodeDifference,
}

impl ComparePayload {
    /// The node from the first tree, if it exists there.
    pub fn first(&self) -> Option<&PrtgNode> {
        self.first.as_ref()
    }

    /// The node from the second tree, if it exists there.
    pub fn second(&self) -> Option<&PrtgNode> {
        self.second.as_ref()
    }

    /// Node type of the second node, falling back to the first. The root of
    /// two diverged trees is a [`PrtgNodeType::Collection`].
    pub fn node_type(&self) -> PrtgNodeType {
        self.node_type
    }

    /// How this pair of nodes differs.
    pub fn difference(&self) -> TreeNodeDifference {
        self.difference
    }

    /// [`difference`](Self::difference) of this node and all of its
    /// descendants combined.
    pub fn tree_difference(&self) -> TreeNodeDifference {
        self.tree_difference
    }

    /// Returns `true` for the synthetic root joining two diverged trees.
    pub fn is_divergence_root(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }

    /// Name of the second node, falling back to the first.
    pub fn name(&self) -> TreeResult<String> {
        match (&self.second, &self.first) {
            (Some(node), _) | (None, Some(node)) => node.name(),
            (None, None) => Ok("Comparison".to_string()),
        }
    }
}

impl TreePayload for ComparePayload {
    fn is_collection(&self) -> bool {
        self.node_type == PrtgNodeType::Collection
    }
}

fn compare_orphan(
    first: Option<PrtgNode>,
    second: Option<PrtgNode>,
    difference: TreeNodeDifference,
    children: Vec<CompareOrphan>,
) -> CompareOrphan {
    let tree_difference = children
        .iter()
        .fold(difference, |acc, child| acc | child.payload().tree_difference);
    let node_type = second
        .as_ref()
        .or(first.as_ref())
        .map_or(PrtgNodeType::Collection, PrtgNode::node_type);

    Orphan::new(
        ComparePayload {
            first,
            second,
            node_type,
            difference,
            tree_difference,
        },
        OrphanList::strict(children),
    )
}

/// Aligns two PRTG trees and classifies their differences.
#[derive(Clone, Debug)]
pub struct CompareTreeVisitor {
    /// Only these differences are recorded.
    considered: TreeNodeDifference,
}

impl Default for CompareTreeVisitor {
    fn default() -> Self {
        Self {
            considered: TreeNodeDifference::all(),
        }
    }
}

impl CompareTreeVisitor {
    /// A visitor that ignores the given kinds of difference.
    pub fn ignoring(ignored: TreeNodeDifference) -> Self {
        Self {
            considered: TreeNodeDifference::all() - ignored,
        }
    }

    /// Compare `first` against `second`.
    ///
    /// When the roots themselves diverge the result is a synthetic root with
    /// the removed and the added tree as its two children.
    pub fn compare(&self, first: &PrtgNode, second: &PrtgNode) -> TreeResult<CompareNode> {
        let mut orphans = self.visit(Some(first), Some(second))?;
        let root = if orphans.len() == 1 {
            orphans.remove(0)
        } else {
            debug!("trees diverge at the root");
            compare_orphan(None, None, TreeNodeDifference::NONE, orphans)
        };
        debug!(tree_difference = %root.payload().tree_difference, "compared trees");
        Ok(CompareNode::root(root))
    }

    fn visit(&self, first: Option<&PrtgNode>, second: Option<&PrtgNode>) -> TreeResult<Vec<CompareOrphan>> {
        if let (Some(f), Some(s)) = (first, second) {
            let (first_id, second_id) = (f.id()?, s.id()?);
            if first_id != second_id {
                trace!(?first_id, ?second_id, "trees diverge");
                let mut split = self.visit(Some(f), None)?;
                split.extend(self.visit(None, Some(s))?);
                return Ok(split);
            }
        }

        let first_len = first.map_or(0, |node| node.children().len());
        let second_len = second.map_or(0, |node| node.children().len());

        let mut children = Vec::new();
        for index in 0..first_len.max(second_len) {
            let a = match first {
                Some(node) if index < first_len => Some(node.children().get(index)?),
                _ => None,
            };
            let b = match second {
                Some(node) if index < second_len => Some(node.children().get(index)?),
                _ => None,
            };
            children.extend(self.visit(a.as_ref(), b.as_ref())?);
        }

        let difference = self.difference(first, second, first_len, second_len)? & self.considered;
        Ok(vec![compare_orphan(
            first.cloned(),
            second.cloned(),
            difference,
            children,
        )])
    }

    fn difference(
        &self,
        first: Option<&PrtgNode>,
        second: Option<&PrtgNode>,
        first_len: usize,
        second_len: usize,
    ) -> TreeResult<TreeNodeDifference> {
        let (f, s) = match (first, second) {
            (Some(f), Some(s)) => (f, s),
            (Some(_), None) => return Ok(TreeNodeDifference::REMOVED),
            (None, Some(_)) => return Ok(TreeNodeDifference::ADDED),
            (None, None) => return Ok(TreeNodeDifference::NONE),
        };

        let mut difference = TreeNodeDifference::NONE;

        if f.node_type() != s.node_type() {
            difference |= TreeNodeDifference::TYPE;
        }
        if f.name()? != s.name()? {
            difference |= TreeNodeDifference::NAME;
        }
        if let (Some(a), Some(b)) = (f.value()?, s.value()?) {
            if a.parent_id() != b.parent_id() {
                difference |= TreeNodeDifference::PARENT;
            }
            if a.position() != b.position() {
                difference |= TreeNodeDifference::POSITION;
            }
            if a.property_value() != b.property_value() {
                difference |= TreeNodeDifference::VALUE;
            }
        }
        if (first_len > 0) != (second_len > 0) {
            difference |= TreeNodeDifference::HAS_CHILDREN;
        } else if first_len != second_len {
            difference |= TreeNodeDifference::NUMBER_OF_CHILDREN;
        }

        Ok(difference)
    }
}

/// Compare two trees considering every kind of difference.
pub fn compare(first: &PrtgNode, second: &PrtgNode) -> TreeResult<CompareNode> {
    CompareTreeVisitor::default().compare(first, second)
}

/// Every node of a comparison tree that differs itself, in pre-order.
pub fn changed_nodes(root: &CompareNode) -> Vec<CompareNode> {
    root.find_all(|node| !node.payload().difference().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prtg_tree::PrtgOrphan;
    use prtg_types::{MonitorObject, ObjectId, PropertyValue};

    fn sensor(id: i32, name: &str) -> PrtgOrphan {
        PrtgOrphan::sensor(MonitorObject::new(id, name), None)
    }

    fn device(id: i32, name: &str, children: Vec<PrtgOrphan>) -> PrtgOrphan {
        PrtgOrphan::device(MonitorObject::new(id, name), children)
    }

    fn by_id(root: &CompareNode, id: i32) -> Vec<CompareNode> {
        root.find_all(|node| {
            let payload = node.payload();
            let side = payload.second().or(payload.first());
            side.map(|n| n.id().unwrap() == Some(ObjectId::new(id))).unwrap_or(false)
        })
    }

    #[test]
    fn identical_trees_have_no_differences() {
        let build = || PrtgNode::root(device(1, "dc-1", vec![sensor(2, "Ping"), sensor(3, "CPU")]));
        let result = compare(&build(), &build()).unwrap();
        assert!(result.payload().tree_difference().is_empty());
        assert!(result.descendants_and_self().iter().all(|n| n.payload().difference().is_empty()));
        assert_eq!(result.children().len(), 2);
    }

    #[test]
    fn rename_add_and_remove() {
        let a = PrtgNode::root(device(1, "Root", vec![sensor(2, "Child"), sensor(3, "Child")]));
        let b = PrtgNode::root(device(1, "Root", vec![sensor(2, "Renamed"), sensor(4, "Child")]));
        let result = compare(&a, &b).unwrap();

        assert_eq!(result.payload().difference(), TreeNodeDifference::NONE);
        let expected = TreeNodeDifference::NAME | TreeNodeDifference::ADDED | TreeNodeDifference::REMOVED;
        assert_eq!(result.payload().tree_difference(), expected);

        assert_eq!(by_id(&result, 2)[0].payload().difference(), TreeNodeDifference::NAME);
        assert_eq!(by_id(&result, 3)[0].payload().difference(), TreeNodeDifference::REMOVED);
        assert_eq!(by_id(&result, 4)[0].payload().difference(), TreeNodeDifference::ADDED);

        // The diverged position splits into two siblings.
        assert_eq!(result.children().len(), 3);
    }

    #[test]
    fn diverged_roots_split_in_two() {
        let a = PrtgNode::root(sensor(1, "A"));
        let b = PrtgNode::root(sensor(2, "B"));
        let result = compare(&a, &b).unwrap();

        assert!(result.payload().is_divergence_root());
        assert_eq!(result.children().len(), 2);

        let removed = result.children().get(0).unwrap();
        assert!(removed.payload().first().is_some());
        assert!(removed.payload().second().is_none());
        assert_eq!(removed.payload().difference(), TreeNodeDifference::REMOVED);

        let added = result.children().get(1).unwrap();
        assert!(added.payload().first().is_none());
        assert!(added.payload().second().is_some());
        assert_eq!(added.payload().difference(), TreeNodeDifference::ADDED);
    }

    #[test]
    fn divergence_is_permanent_below_the_split() {
        let a = PrtgNode::root(device(1, "r", vec![device(10, "x", vec![sensor(100, "s")])]));
        let b = PrtgNode::root(device(1, "r", vec![device(11, "y", vec![sensor(100, "s")])]));
        let result = compare(&a, &b).unwrap();

        // Sensor 100 exists on both sides but below diverged parents, so it
        // appears once as removed and once as added.
        let matches = by_id(&result, 100);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].payload().difference(), TreeNodeDifference::REMOVED);
        assert_eq!(matches[1].payload().difference(), TreeNodeDifference::ADDED);
    }

    #[test]
    fn mid_list_insertion_misaligns_later_siblings() {
        let a = PrtgNode::root(device(1, "r", vec![sensor(2, "a"), sensor(3, "b")]));
        let b = PrtgNode::root(device(1, "r", vec![sensor(2, "a"), sensor(9, "new"), sensor(3, "b")]));
        let result = compare(&a, &b).unwrap();

        let three = by_id(&result, 3);
        assert_eq!(three.len(), 2);
        assert_eq!(three[0].payload().difference(), TreeNodeDifference::REMOVED);
        assert_eq!(three[1].payload().difference(), TreeNodeDifference::ADDED);
        assert!(result
            .payload()
            .difference()
            .contains(TreeNodeDifference::NUMBER_OF_CHILDREN));
    }

    #[test]
    fn child_count_differences() {
        let a = PrtgNode::root(device(1, "r", vec![device(2, "d", vec![])]));
        let b = PrtgNode::root(device(1, "r", vec![device(2, "d", vec![sensor(3, "s")])]));
        let result = compare(&a, &b).unwrap();
        assert_eq!(by_id(&result, 2)[0].payload().difference(), TreeNodeDifference::HAS_CHILDREN);
    }

    #[test]
    fn value_parent_and_position_differences() {
        let a = PrtgNode::root(PrtgOrphan::device(
            MonitorObject::new(1, "d").with_parent(10).with_position(1),
            vec![PrtgOrphan::property(PropertyValue::new("interval", Some("60".into())))],
        ));
        let b = PrtgNode::root(PrtgOrphan::device(
            MonitorObject::new(1, "d").with_parent(11).with_position(2),
            vec![PrtgOrphan::property(PropertyValue::new("interval", Some("300".into())))],
        ));
        let result = compare(&a, &b).unwrap();
        assert_eq!(
            result.payload().difference(),
            TreeNodeDifference::PARENT | TreeNodeDifference::POSITION
        );
        let property = result.children().get(0).unwrap();
        assert_eq!(property.payload().difference(), TreeNodeDifference::VALUE);
    }

    #[test]
    fn ignored_differences_are_not_recorded() {
        let a = PrtgNode::root(device(1, "old", vec![]));
        let b = PrtgNode::root(device(1, "new", vec![]));
        let visitor = CompareTreeVisitor::ignoring(TreeNodeDifference::NAME);
        let result = visitor.compare(&a, &b).unwrap();
        assert!(result.payload().tree_difference().is_empty());
    }

    #[test]
    fn removed_subtree_is_removed_throughout() {
        let a = PrtgNode::root(device(1, "r", vec![device(2, "d", vec![sensor(3, "s")])]));
        let b = PrtgNode::root(device(1, "r", vec![]));
        let result = compare(&a, &b).unwrap();
        let changed = changed_nodes(&result);
        // root (HasChildren), device and sensor (Removed).
        assert_eq!(changed.len(), 3);
        assert_eq!(changed[2].payload().difference(), TreeNodeDifference::REMOVED);
    }

    #[test]
    fn compare_does_not_mutate_inputs() {
        let a = PrtgNode::root(device(1, "r", vec![sensor(2, "a")]));
        let b = PrtgNode::root(device(1, "r", vec![sensor(2, "b")]));
        let before_a = a.orphan().clone();
        compare(&a, &b).unwrap();
        assert!(a.orphan().ptr_eq(&before_a));
        assert_eq!(a.children().get(0).unwrap().name().unwrap(), "a");
    }
}
