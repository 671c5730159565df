use prtg_tree::{PrtgNode, PrtgPayload, TreeResult};
use prtg_types::{PrtgNodeType, Status};

use crate::config::PrettyOptions;
use crate::line::{PrettyColor, PrettyLine};
use crate::visitor::PrettyTreeVisitor;

/// Renders PRTG object trees, colouring sensors by status.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrtgNodePrettyTreeVisitor;

fn status_color(status: Status) -> Option<PrettyColor> {
    match status {
        Status::Up => Some(PrettyColor::Green),
        Status::Warning | Status::Unusual => Some(PrettyColor::Yellow),
        s if s.is_down() => Some(PrettyColor::Red),
        s if s.is_paused() => Some(PrettyColor::Blue),
        _ => None,
    }
}

impl PrettyTreeVisitor<PrtgPayload> for PrtgNodePrettyTreeVisitor {
    fn name(&self, node: &PrtgNode) -> TreeResult<String> {
        node.name()
    }

    fn color(&self, node: &PrtgNode) -> TreeResult<Option<PrettyColor>> {
        if node.node_type() != PrtgNodeType::Sensor {
            return Ok(None);
        }
        Ok(node.value()?.and_then(|value| value.status()).and_then(status_color))
    }
}

/// Render a PRTG tree.
pub fn pretty_print(node: &PrtgNode, options: &PrettyOptions) -> TreeResult<Vec<PrettyLine>> {
    PrtgNodePrettyTreeVisitor.print(node, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prtg_tree::PrtgOrphan;
    use prtg_types::{MonitorObject, NotificationTrigger, PropertyValue};

    fn sensor(id: i32, name: &str, status: Status) -> PrtgOrphan {
        PrtgOrphan::sensor(MonitorObject::new(id, name).with_status(status), None)
    }

    #[test]
    fn sensors_are_coloured_by_status() {
        let root = PrtgNode::root(PrtgOrphan::device(
            MonitorObject::new(1, "dc-1").with_status(Status::Down),
            vec![
                sensor(2, "Ping", Status::Up),
                sensor(3, "CPU", Status::DownPartial),
                sensor(4, "Disk", Status::Unusual),
                sensor(5, "Memory", Status::PausedBySchedule),
                sensor(6, "Uptime", Status::Unknown),
            ],
        ));
        let lines = pretty_print(&root, &PrettyOptions::default()).unwrap();
        let colors: Vec<_> = lines.iter().map(|l| l.color).collect();
        assert_eq!(
            colors,
            vec![
                None,
                Some(PrettyColor::Green),
                Some(PrettyColor::Red),
                Some(PrettyColor::Yellow),
                Some(PrettyColor::Blue),
                None,
            ]
        );
        assert_eq!(lines[0].text, "dc-1");
        assert_eq!(lines[5].text, "└── Uptime");
    }

    #[test]
    fn groupings_are_hidden() {
        let root = PrtgNode::root(PrtgOrphan::sensor(
            MonitorObject::new(2, "Ping"),
            vec![
                PrtgOrphan::collection(
                    "Triggers",
                    vec![PrtgOrphan::trigger(NotificationTrigger::new(2, 1, "State Trigger"))],
                ),
                PrtgOrphan::collection(
                    "Properties",
                    vec![PrtgOrphan::property(PropertyValue::new("interval", Some("60".into())))],
                ),
            ],
        ));
        let lines = pretty_print(&root, &PrettyOptions::default()).unwrap();
        let text: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(text, vec!["Ping", "├── State Trigger", "└── interval"]);
    }
}
