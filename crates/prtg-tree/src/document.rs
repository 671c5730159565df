//! JSON tree documents.
//!
//! A document is a nested description of a PRTG tree, used to load trees
//! captured offline and to export live trees:
//!
//! ```json
//! { "type": "device", "id": 3001, "name": "dc-1", "children": [
//!     { "type": "sensor", "id": 4001, "name": "Ping", "status": "Up" }
//! ] }
//! ```

use std::path::Path;
use std::sync::Arc;

use prtg_types::{
    MonitorObject, NotificationTrigger, ObjectId, PropertyValue, PrtgNodeType, Status,
};
use serde::{Deserialize, Serialize};

use crate::error::{TreeError, TreeResult};
use crate::prtg::{PrtgNode, PrtgOrphan};

/// One node of a tree document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentNode {
    #[serde(rename = "type")]
    pub node_type: PrtgNodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocumentNode>,
}

impl DocumentNode {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> TreeResult<Self> {
        serde_json::from_str(json).map_err(|e| TreeError::InvalidDocument(e.to_string()))
    }

    /// Read and parse a document file.
    pub fn load(path: &Path) -> TreeResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> TreeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TreeError::InvalidDocument(e.to_string()))
    }

    /// Convert into a strict orphan tree.
    pub fn to_orphan(&self) -> TreeResult<PrtgOrphan> {
        let children = self
            .children
            .iter()
            .map(DocumentNode::to_orphan)
            .collect::<TreeResult<Vec<_>>>()?;

        match self.node_type {
            PrtgNodeType::Collection => Ok(PrtgOrphan::collection(self.name.as_str(), children)),
            PrtgNodeType::Property => {
                self.expect_leaf()?;
                Ok(PrtgOrphan::property(PropertyValue {
                    object_id: self.parent_id,
                    name: self.name.clone(),
                    value: self.value.clone(),
                }))
            }
            PrtgNodeType::Trigger => {
                self.expect_leaf()?;
                let object_id = self.parent_id.ok_or_else(|| {
                    TreeError::InvalidDocument(format!("trigger '{}' has no parent_id", self.name))
                })?;
                Ok(PrtgOrphan::trigger(NotificationTrigger::new(
                    object_id,
                    self.require_id()?,
                    self.name.clone(),
                )))
            }
            node_type => {
                let value = MonitorObject {
                    id: self.require_id()?,
                    name: self.name.clone(),
                    parent_id: self.parent_id,
                    position: self.position,
                    status: self.status,
                };
                Ok(PrtgOrphan::object(node_type, Arc::new(value), children))
            }
        }
    }

    /// Load a document file straight into a live tree.
    pub fn load_tree(path: &Path) -> TreeResult<PrtgNode> {
        Ok(PrtgNode::root(Self::load(path)?.to_orphan()?))
    }

    /// Capture a live tree as a document. Resolves every proxy and enumerates
    /// every lazy list.
    pub fn from_node(node: &PrtgNode) -> TreeResult<Self> {
        let children = node
            .children()
            .iter()
            .map(|child| Self::from_node(&child))
            .collect::<TreeResult<Vec<_>>>()?;

        let mut document = DocumentNode {
            node_type: node.node_type(),
            id: None,
            name: node.name()?,
            parent_id: None,
            position: None,
            status: None,
            value: None,
            children,
        };
        if let Some(value) = node.value()? {
            document.id = value.id();
            document.parent_id = value.parent_id();
            document.position = value.position();
            document.status = value.status();
            document.value = value.property_value().map(str::to_string);
        }
        Ok(document)
    }

    fn require_id(&self) -> TreeResult<ObjectId> {
        self.id.ok_or_else(|| {
            TreeError::InvalidDocument(format!("{} '{}' has no id", self.node_type, self.name))
        })
    }

    fn expect_leaf(&self) -> TreeResult<()> {
        if self.children.is_empty() {
            Ok(())
        } else {
            Err(TreeError::InvalidDocument(format!(
                "{} '{}' cannot have children",
                self.node_type, self.name
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "device", "id": 3001, "name": "dc-1", "parent_id": 2000,
        "children": [
            { "type": "sensor", "id": 4001, "name": "Ping", "status": "Up", "position": 1 },
            { "type": "collection", "name": "Properties", "children": [
                { "type": "property", "name": "host", "value": "10.0.0.1", "parent_id": 3001 }
            ] },
            { "type": "trigger", "id": 1, "name": "State Trigger", "parent_id": 3001 }
        ]
    }"#;

    #[test]
    fn parses_into_tree() {
        let doc = DocumentNode::from_json(SAMPLE).unwrap();
        let root = PrtgNode::root(doc.to_orphan().unwrap());
        assert_eq!(root.node_type(), PrtgNodeType::Device);
        assert_eq!(root.children().len(), 3);

        let ping = root.child_by_name("Ping").unwrap().unwrap();
        assert_eq!(ping.value().unwrap().unwrap().status(), Some(Status::Up));

        let host = root.child_by_name("host").unwrap().unwrap();
        assert_eq!(host.value().unwrap().unwrap().property_value(), Some("10.0.0.1"));
    }

    #[test]
    fn object_without_id_is_rejected() {
        let err = DocumentNode::from_json(r#"{"type": "sensor", "name": "Ping"}"#)
            .unwrap()
            .to_orphan()
            .unwrap_err();
        assert!(matches!(err, TreeError::InvalidDocument(msg) if msg.contains("no id")));
    }

    #[test]
    fn property_with_children_is_rejected() {
        let json = r#"{"type": "property", "name": "p", "children": [{"type": "collection", "name": "c"}]}"#;
        let err = DocumentNode::from_json(json).unwrap().to_orphan().unwrap_err();
        assert!(matches!(err, TreeError::InvalidDocument(_)));
    }

    #[test]
    fn malformed_json_is_invalid_document() {
        assert!(matches!(
            DocumentNode::from_json("{ not json"),
            Err(TreeError::InvalidDocument(_))
        ));
    }

    #[test]
    fn export_matches_import() {
        let doc = DocumentNode::from_json(SAMPLE).unwrap();
        let root = PrtgNode::root(doc.to_orphan().unwrap());
        let exported = DocumentNode::from_node(&root).unwrap();
        assert_eq!(exported, doc);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let root = DocumentNode::load_tree(file.path()).unwrap();
        assert_eq!(root.name().unwrap(), "dc-1");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = DocumentNode::load(Path::new("/nonexistent/tree.json")).unwrap_err();
        assert!(matches!(err, TreeError::Io(_)));
    }
}
