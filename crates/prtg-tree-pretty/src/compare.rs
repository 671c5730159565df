use prtg_tree::TreeResult;
use prtg_tree_diff::{CompareNode, ComparePayload, TreeNodeDifference};

use crate::config::PrettyOptions;
use crate::line::{PrettyColor, PrettyLine};
use crate::visitor::PrettyTreeVisitor;

/// Renders comparison trees, annotating each node with how it changed.
///
/// A renamed node reads `New (Renamed 'Old')`; other differences are listed
/// in the same parentheses.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompareNodePrettyTreeVisitor;

impl PrettyTreeVisitor<ComparePayload> for CompareNodePrettyTreeVisitor {
    fn name(&self, node: &CompareNode) -> TreeResult<String> {
        let payload = node.payload();
        let difference = payload.difference();
        let mut notes = Vec::new();

        if difference.contains(TreeNodeDifference::NAME) {
            if let Some(first) = payload.first() {
                notes.push(format!("Renamed '{}'", first.name()?));
            }
        }
        notes.extend(
            (difference - TreeNodeDifference::NAME)
                .labels()
                .into_iter()
                .map(str::to_string),
        );

        let name = payload.name()?;
        if notes.is_empty() {
            Ok(name)
        } else {
            Ok(format!("{name} ({})", notes.join(", ")))
        }
    }

    fn color(&self, node: &CompareNode) -> TreeResult<Option<PrettyColor>> {
        let difference = node.payload().difference();
        Ok(if difference.contains(TreeNodeDifference::ADDED) {
            Some(PrettyColor::Green)
        } else if difference.contains(TreeNodeDifference::REMOVED) {
            Some(PrettyColor::Red)
        } else if !difference.is_empty() {
            Some(PrettyColor::Yellow)
        } else {
            None
        })
    }
}

/// Render a comparison tree.
pub fn pretty_print_diff(node: &CompareNode, options: &PrettyOptions) -> TreeResult<Vec<PrettyLine>> {
    CompareNodePrettyTreeVisitor.print(node, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prtg_tree::{PrtgNode, PrtgOrphan};
    use prtg_tree_diff::{compare, reduce};
    use prtg_types::MonitorObject;

    fn sensor(id: i32, name: &str) -> PrtgOrphan {
        PrtgOrphan::sensor(MonitorObject::new(id, name), None)
    }

    fn device(id: i32, name: &str, children: Vec<PrtgOrphan>) -> PrtgOrphan {
        PrtgOrphan::device(MonitorObject::new(id, name), children)
    }

    #[test]
    fn renders_rename_add_and_remove() {
        let a = PrtgNode::root(device(1, "Root", vec![sensor(2, "Child"), sensor(3, "Child")]));
        let b = PrtgNode::root(device(1, "Root", vec![sensor(2, "Renamed"), sensor(4, "Child")]));
        let result = compare(&a, &b).unwrap();

        let lines = pretty_print_diff(&result, &PrettyOptions::default()).unwrap();
        let rendered: Vec<_> = lines.iter().map(|l| (l.text.as_str(), l.color)).collect();
        assert_eq!(
            rendered,
            vec![
                ("Root", None),
                ("├── Renamed (Renamed 'Child')", Some(PrettyColor::Yellow)),
                ("├── Child (Removed)", Some(PrettyColor::Red)),
                ("└── Child (Added)", Some(PrettyColor::Green)),
            ]
        );
    }

    #[test]
    fn lists_other_differences() {
        let a = PrtgNode::root(device(1, "old", vec![]));
        let b = PrtgNode::root(device(1, "new", vec![sensor(2, "s")]));
        let reduced = reduce(&compare(&a, &b).unwrap()).unwrap().unwrap();
        let lines = pretty_print_diff(&reduced, &PrettyOptions::default()).unwrap();
        assert_eq!(lines[0].text, "new (Renamed 'old', HasChildren)");
        assert_eq!(lines[1].text, "└── s (Added)");
    }

    #[test]
    fn diverged_roots_render_under_a_synthetic_root() {
        let a = PrtgNode::root(sensor(1, "A"));
        let b = PrtgNode::root(sensor(2, "B"));
        let lines = pretty_print_diff(&compare(&a, &b).unwrap(), &PrettyOptions::default()).unwrap();
        let text: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(text, vec!["Comparison", "├── A (Removed)", "└── B (Added)"]);
    }
}
