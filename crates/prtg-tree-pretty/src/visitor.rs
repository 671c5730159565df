//! Generic tree rendering.
//!
//! Lines are produced in pre-order. Collection nodes carry no line of their
//! own (unless they are the root); their children are drawn as if they were
//! children of the collection's parent. The connector prefix of each line is
//! rebuilt by walking up the node's ancestors and checking, level by level,
//! whether that ancestor is the last of its displayed siblings.

use prtg_tree::{TreeNode, TreePayload, TreeResult};
use tracing::trace;

use crate::config::PrettyOptions;
use crate::line::{PrettyColor, PrettyLine};

/// Decides what a tree looks like when printed.
pub trait PrettyTreeVisitor<P: TreePayload> {
    /// Text shown for `node`, without connectors.
    fn name(&self, node: &TreeNode<P>) -> TreeResult<String>;

    /// Colour of `node`'s line.
    fn color(&self, _node: &TreeNode<P>) -> TreeResult<Option<PrettyColor>> {
        Ok(None)
    }

    /// Render the tree below and including `root`.
    fn print(&self, root: &TreeNode<P>, options: &PrettyOptions) -> TreeResult<Vec<PrettyLine>> {
        let mut lines = Vec::new();
        print_node(self, root, root, options, &mut lines)?;
        trace!(lines = lines.len(), "rendered tree");
        Ok(lines)
    }
}

fn print_node<P, V>(
    visitor: &V,
    root: &TreeNode<P>,
    node: &TreeNode<P>,
    options: &PrettyOptions,
    lines: &mut Vec<PrettyLine>,
) -> TreeResult<()>
where
    P: TreePayload,
    V: PrettyTreeVisitor<P> + ?Sized,
{
    let text = format!("{}{}", prefix(root, node, options), visitor.name(node)?);
    lines.push(PrettyLine::new(text, visitor.color(node)?));

    for child in displayed_children(node) {
        print_node(visitor, root, &child, options, lines)?;
    }
    Ok(())
}

/// Children of `node` as displayed, with collections replaced by their
/// own displayed children.
pub fn displayed_children<P: TreePayload>(node: &TreeNode<P>) -> Vec<TreeNode<P>> {
    let mut result = Vec::new();
    for child in node.children().iter() {
        if child.payload().is_collection() {
            result.extend(displayed_children(&child));
        } else {
            result.push(child);
        }
    }
    result
}

/// Nearest ancestor of `node` that has a line of its own.
fn displayed_parent<P: TreePayload>(root: &TreeNode<P>, node: &TreeNode<P>) -> Option<TreeNode<P>> {
    if node.ptr_eq(root) {
        return None;
    }
    let mut current = node.parent()?;
    while current.payload().is_collection() && !current.ptr_eq(root) {
        current = current.parent()?;
    }
    Some(current)
}

fn is_last<P: TreePayload>(root: &TreeNode<P>, node: &TreeNode<P>) -> bool {
    match displayed_parent(root, node) {
        Some(parent) => displayed_children(&parent)
            .last()
            .map_or(true, |last| last.ptr_eq(node)),
        None => true,
    }
}

fn prefix<P: TreePayload>(root: &TreeNode<P>, node: &TreeNode<P>, options: &PrettyOptions) -> String {
    let guides = options.guides;
    if node.ptr_eq(root) {
        return String::new();
    }

    let mut segments = vec![if is_last(root, node) {
        guides.last_branch()
    } else {
        guides.branch()
    }];

    let mut current = displayed_parent(root, node);
    while let Some(ancestor) = current {
        if ancestor.ptr_eq(root) {
            break;
        }
        segments.push(if is_last(root, &ancestor) {
            guides.blank()
        } else {
            guides.vertical()
        });
        current = displayed_parent(root, &ancestor);
    }

    segments.iter().rev().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Guides;
    use prtg_tree::{Orphan, OrphanList};

    #[derive(Clone, Debug)]
    struct Label(&'static str, bool);

    impl TreePayload for Label {
        fn is_collection(&self) -> bool {
            self.1
        }
    }

    struct Plain;

    impl PrettyTreeVisitor<Label> for Plain {
        fn name(&self, node: &TreeNode<Label>) -> TreeResult<String> {
            Ok(node.payload().0.to_string())
        }
    }

    fn node(label: &'static str, children: Vec<Orphan<Label>>) -> Orphan<Label> {
        Orphan::new(Label(label, false), OrphanList::strict(children))
    }

    fn collection(children: Vec<Orphan<Label>>) -> Orphan<Label> {
        Orphan::new(Label("<collection>", true), OrphanList::strict(children))
    }

    fn text(lines: &[PrettyLine]) -> Vec<String> {
        lines.iter().map(|l| l.text.clone()).collect()
    }

    #[test]
    fn draws_connectors() {
        let root = TreeNode::root(node(
            "root",
            vec![
                node("a", vec![node("a1", vec![]), node("a2", vec![])]),
                node("b", vec![node("b1", vec![])]),
            ],
        ));
        let lines = Plain.print(&root, &PrettyOptions::default()).unwrap();
        assert_eq!(
            text(&lines),
            vec![
                "root",
                "├── a",
                "│   ├── a1",
                "│   └── a2",
                "└── b",
                "    └── b1",
            ]
        );
    }

    #[test]
    fn ascii_guides() {
        let root = TreeNode::root(node("root", vec![node("a", vec![node("a1", vec![])]), node("b", vec![])]));
        let options = PrettyOptions {
            guides: Guides::Ascii,
            color: false,
        };
        let lines = Plain.print(&root, &options).unwrap();
        assert_eq!(text(&lines), vec!["root", "|-- a", "|   `-- a1", "`-- b"]);
    }

    #[test]
    fn collections_are_flattened() {
        let root = TreeNode::root(node(
            "device",
            vec![
                collection(vec![node("s1", vec![node("t", vec![])]), node("s2", vec![])]),
                collection(vec![node("p", vec![])]),
            ],
        ));
        let lines = Plain.print(&root, &PrettyOptions::default()).unwrap();
        assert_eq!(
            text(&lines),
            vec!["device", "├── s1", "│   └── t", "├── s2", "└── p"]
        );
    }

    #[test]
    fn collection_root_has_a_line() {
        let root = TreeNode::root(collection(vec![node("a", vec![]), node("b", vec![])]));
        let lines = Plain.print(&root, &PrettyOptions::default()).unwrap();
        assert_eq!(text(&lines), vec!["<collection>", "├── a", "└── b"]);
    }

    #[test]
    fn printing_a_sub_tree_starts_at_that_node() {
        let root = TreeNode::root(node("root", vec![node("a", vec![node("a1", vec![])]), node("b", vec![])]));
        let a = root.children().get(0).unwrap();
        let lines = Plain.print(&a, &PrettyOptions::default()).unwrap();
        assert_eq!(text(&lines), vec!["a", "└── a1"]);
    }
}
