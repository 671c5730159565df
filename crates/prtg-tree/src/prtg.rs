//! Trees of PRTG objects.
//!
//! [`PrtgOrphan`] and [`PrtgNode`] are the orphan and node types specialised
//! to [`PrtgPayload`]: a node type plus a [`ValueSource`] (an existing object
//! or a proxy for one that will be created on first access).
//!
//! Values are read through live nodes. A parametrized proxy is created below
//! the nearest ancestor that is not a collection, so the same orphan resolves
//! against whichever parent it sits under in the tree being read.

use std::sync::Arc;

use prtg_types::{
    MonitorObject, NotificationTrigger, ObjectId, PropertyValue, PrtgNodeType, TreeValue, ValueRef,
};

use crate::error::{TreeError, TreeResult};
use crate::node::TreeNode;
use crate::orphan::{Orphan, OrphanList, TreePayload};
use crate::proxy::{ValueProxy, ValueSource};

/// Orphan of a PRTG object tree.
pub type PrtgOrphan = Orphan<PrtgPayload>;

/// Live node of a PRTG object tree.
pub type PrtgNode = TreeNode<PrtgPayload>;

/// Payload of a PRTG tree node.
#[derive(Clone, Debug)]
pub struct PrtgPayload {
    node_type: PrtgNodeType,
    source: Option<ValueSource>,
    label: Option<Arc<str>>,
}

impl PrtgPayload {
    /// Payload for a node backed by a value or proxy.
    pub fn new(node_type: PrtgNodeType, source: ValueSource) -> Self {
        Self {
            node_type,
            source: Some(source),
            label: None,
        }
    }

    /// Payload for a grouping node that only carries a label.
    pub fn collection(label: impl Into<Arc<str>>) -> Self {
        Self {
            node_type: PrtgNodeType::Collection,
            source: None,
            label: Some(label.into()),
        }
    }

    pub fn node_type(&self) -> PrtgNodeType {
        self.node_type
    }

    pub fn source(&self) -> Option<&ValueSource> {
        self.source.as_ref()
    }

    /// Label shown for a node without a value.
    fn label(&self) -> String {
        self.label
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| self.node_type.to_string())
    }
}

impl TreePayload for PrtgPayload {
    fn is_collection(&self) -> bool {
        self.node_type == PrtgNodeType::Collection
    }
}

impl PrtgOrphan {
    /// An orphan backed by `source` with strict children.
    pub fn from_source(
        node_type: PrtgNodeType,
        source: ValueSource,
        children: impl IntoIterator<Item = PrtgOrphan>,
    ) -> Self {
        Orphan::new(PrtgPayload::new(node_type, source), OrphanList::strict(children))
    }

    /// An orphan for an existing value with strict children.
    pub fn object(
        node_type: PrtgNodeType,
        value: ValueRef,
        children: impl IntoIterator<Item = PrtgOrphan>,
    ) -> Self {
        Self::from_source(node_type, ValueSource::Value(value), children)
    }

    pub fn probe(value: MonitorObject, children: impl IntoIterator<Item = PrtgOrphan>) -> Self {
        Self::object(PrtgNodeType::Probe, Arc::new(value), children)
    }

    pub fn group(value: MonitorObject, children: impl IntoIterator<Item = PrtgOrphan>) -> Self {
        Self::object(PrtgNodeType::Group, Arc::new(value), children)
    }

    pub fn device(value: MonitorObject, children: impl IntoIterator<Item = PrtgOrphan>) -> Self {
        Self::object(PrtgNodeType::Device, Arc::new(value), children)
    }

    pub fn sensor(value: MonitorObject, children: impl IntoIterator<Item = PrtgOrphan>) -> Self {
        Self::object(PrtgNodeType::Sensor, Arc::new(value), children)
    }

    pub fn trigger(value: NotificationTrigger) -> Self {
        Self::object(PrtgNodeType::Trigger, Arc::new(value), None)
    }

    pub fn property(value: PropertyValue) -> Self {
        Self::object(PrtgNodeType::Property, Arc::new(value), None)
    }

    /// A grouping node; its children render as if they belonged to the
    /// collection's parent.
    pub fn collection(label: impl Into<Arc<str>>, children: impl IntoIterator<Item = PrtgOrphan>) -> Self {
        Orphan::new(PrtgPayload::collection(label), OrphanList::strict(children))
    }

    /// An orphan whose value is produced by `resolver` on first access.
    pub fn proxy<F>(node_type: PrtgNodeType, resolver: F, children: impl IntoIterator<Item = PrtgOrphan>) -> Self
    where
        F: Fn() -> TreeResult<ValueRef> + Send + Sync + 'static,
    {
        let proxy = ValueProxy::direct(node_type, resolver);
        Self::from_source(node_type, ValueSource::Proxy(Arc::new(proxy)), children)
    }

    /// An orphan whose value is created below its parent on first access.
    /// Resolved once per parent it is placed under.
    pub fn parametrized<F>(
        node_type: PrtgNodeType,
        resolver: F,
        children: impl IntoIterator<Item = PrtgOrphan>,
    ) -> Self
    where
        F: Fn(ObjectId) -> TreeResult<ValueRef> + Send + Sync + 'static,
    {
        let proxy = ValueProxy::parametrized(node_type, resolver);
        Self::from_source(node_type, ValueSource::Proxy(Arc::new(proxy)), children)
    }

    /// An orphan for an existing value whose children are pulled from
    /// `children` on demand.
    pub fn lazy<I>(node_type: PrtgNodeType, value: ValueRef, children: I) -> Self
    where
        I: IntoIterator<Item = PrtgOrphan>,
        I::IntoIter: Send + 'static,
    {
        Orphan::new(
            PrtgPayload::new(node_type, ValueSource::Value(value)),
            OrphanList::lazy(children),
        )
    }
}

impl PrtgNode {
    pub fn node_type(&self) -> PrtgNodeType {
        self.payload().node_type()
    }

    /// The node's value, resolving a proxy if necessary. `None` for
    /// collections.
    pub fn value(&self) -> TreeResult<Option<ValueRef>> {
        let Some(source) = self.payload().source() else {
            return Ok(None);
        };
        let value = source.resolve_under(|| match self.owner() {
            Some(owner) => owner.id(),
            None => Err(TreeError::MissingParentResolver {
                node_type: self.node_type(),
            }),
        })?;
        Ok(Some(value))
    }

    /// ID of the node's value.
    pub fn id(&self) -> TreeResult<Option<ObjectId>> {
        Ok(self.value()?.and_then(|value| value.id()))
    }

    /// Display name: the value's name, or the label of a collection.
    pub fn name(&self) -> TreeResult<String> {
        match self.value()? {
            Some(value) => Ok(value.name().to_string()),
            None => Ok(self.payload().label()),
        }
    }

    /// Nearest ancestor that is not a collection.
    fn owner(&self) -> Option<PrtgNode> {
        let mut parent = self.parent();
        while let Some(node) = parent {
            if !node.payload().is_collection() {
                return Some(node);
            }
            parent = node.parent();
        }
        None
    }

    /// First direct child with the given name, looking through collections.
    ///
    /// Names come from values, so every proxy passed on the way is resolved.
    pub fn child_by_name(&self, name: &str) -> TreeResult<Option<PrtgNode>> {
        for child in self.children().iter() {
            if child.node_type() == PrtgNodeType::Collection {
                if let Some(found) = child.child_by_name(name)? {
                    return Ok(Some(found));
                }
                continue;
            }
            if child.name()? == name {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    /// First node (including this one) whose value has the given ID.
    ///
    /// Resolves the proxies of every node visited before the match.
    pub fn find_by_id(&self, id: ObjectId) -> TreeResult<Option<PrtgNode>> {
        if self.id()? == Some(id) {
            return Ok(Some(self.clone()));
        }
        for child in self.children().iter() {
            if let Some(found) = child.find_by_id(id)? {
                return Ok(Some(found));
            }
        }
        Ok(None)
    }
}
