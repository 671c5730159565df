//! Building PRTG trees from an object source.
//!
//! A [`TreeSource`] answers "which object has this ID" and "which objects
//! live below this ID"; in a client these are API requests. A
//! [`TreeBuilder`] turns those answers into a tree, either fetching every
//! child list up front ([`Materialization::Strict`]) or deferring each child
//! list until it is first enumerated ([`Materialization::Lazy`]).
//!
//! Only probes, groups, devices and sensors are asked for children. An object
//! that turns up below itself ends the build with an error (strict) or drops
//! out of its parent's list (lazy).

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use prtg_types::{ObjectId, PrtgNodeType, ValueRef};
use tracing::{debug, warn};

use crate::config::{Materialization, TreeOptions};
use crate::error::{TreeError, TreeResult};
use crate::prtg::{PrtgNode, PrtgOrphan};

/// An object as returned by a [`TreeSource`].
#[derive(Clone, Debug)]
pub struct SourceObject {
    pub node_type: PrtgNodeType,
    pub value: ValueRef,
}

impl SourceObject {
    pub fn new(node_type: PrtgNodeType, value: ValueRef) -> Self {
        Self { node_type, value }
    }
}

/// Where a [`TreeBuilder`] gets its objects from.
///
/// Both methods may perform I/O.
pub trait TreeSource: Send + Sync {
    /// The object with the given ID, if it exists.
    fn object(&self, id: ObjectId) -> TreeResult<Option<SourceObject>>;

    /// The objects directly below `parent`, in display order.
    fn children(&self, parent: ObjectId) -> TreeResult<Vec<SourceObject>>;
}

/// In-memory [`TreeSource`] over a flat object list linked by parent IDs.
///
/// Intended for tests and offline use. Counts `children` requests so callers
/// can observe how much a build fetched.
pub struct InMemoryTreeSource {
    objects: RwLock<Vec<SourceObject>>,
    requests: AtomicUsize,
}

impl InMemoryTreeSource {
    pub fn new() -> Self {
        Self {
            objects: RwLock::new(Vec::new()),
            requests: AtomicUsize::new(0),
        }
    }

    /// Add an object. Its `parent_id` decides where it appears.
    pub fn insert(&self, node_type: PrtgNodeType, value: ValueRef) {
        self.objects
            .write()
            .expect("lock poisoned")
            .push(SourceObject::new(node_type, value));
    }

    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    /// Number of `children` requests served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryTreeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeSource for InMemoryTreeSource {
    fn object(&self, id: ObjectId) -> TreeResult<Option<SourceObject>> {
        let objects = self.objects.read().expect("lock poisoned");
        Ok(objects.iter().find(|o| o.value.id() == Some(id)).cloned())
    }

    fn children(&self, parent: ObjectId) -> TreeResult<Vec<SourceObject>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let objects = self.objects.read().expect("lock poisoned");
        let mut children: Vec<SourceObject> = objects
            .iter()
            .filter(|o| o.value.parent_id() == Some(parent) && o.value.id() != Some(parent))
            .cloned()
            .collect();
        children.sort_by_key(|o| o.value.position().unwrap_or(u32::MAX));
        Ok(children)
    }
}

/// Builds [`PrtgNode`] trees from a [`TreeSource`].
pub struct TreeBuilder<S> {
    source: Arc<S>,
    options: TreeOptions,
}

impl<S> Clone for TreeBuilder<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            options: self.options.clone(),
        }
    }
}

impl<S: TreeSource + 'static> TreeBuilder<S> {
    pub fn new(source: Arc<S>, options: TreeOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Build the tree rooted at the object with ID `root`.
    pub fn build(&self, root: ObjectId) -> TreeResult<PrtgNode> {
        let object = self
            .source
            .object(root)?
            .ok_or_else(|| TreeError::Resolution(format!("object {root} does not exist")))?;
        debug!(
            root = %root,
            materialization = ?self.options.materialization,
            "building tree"
        );
        Ok(PrtgNode::root(self.orphan(object, 0, &HashSet::new())?))
    }

    /// `path` holds the IDs of the objects above `object`.
    fn orphan(&self, object: SourceObject, depth: usize, path: &HashSet<ObjectId>) -> TreeResult<PrtgOrphan> {
        let SourceObject { node_type, value } = object;
        let at_limit = self.options.max_depth.is_some_and(|max| depth >= max);
        let id = match value.id() {
            Some(id) if node_type.is_object() && !at_limit => id,
            _ => return Ok(PrtgOrphan::object(node_type, value, None)),
        };
        let mut path = path.clone();
        if !path.insert(id) {
            return Err(TreeError::Resolution(format!("object {id} appears below itself")));
        }

        match self.options.materialization {
            Materialization::Strict => {
                let children = self
                    .source
                    .children(id)?
                    .into_iter()
                    .map(|child| self.orphan(child, depth + 1, &path))
                    .collect::<TreeResult<Vec<_>>>()?;
                Ok(PrtgOrphan::object(node_type, value, children))
            }
            Materialization::Lazy => {
                let children = LazyChildren {
                    builder: self.clone(),
                    parent: id,
                    depth: depth + 1,
                    path,
                    pending: None,
                };
                Ok(PrtgOrphan::lazy(node_type, value, children))
            }
        }
    }
}

/// Child list source of a lazily built node. Fetches on first pull.
struct LazyChildren<S> {
    builder: TreeBuilder<S>,
    parent: ObjectId,
    depth: usize,
    path: HashSet<ObjectId>,
    pending: Option<std::vec::IntoIter<SourceObject>>,
}

impl<S: TreeSource + 'static> Iterator for LazyChildren<S> {
    type Item = PrtgOrphan;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pending.is_none() {
            debug!(parent = %self.parent, "fetching children");
            let children = match self.builder.source.children(self.parent) {
                Ok(children) => children,
                Err(e) => {
                    warn!(parent = %self.parent, error = %e, "failed to fetch children; treating as empty");
                    Vec::new()
                }
            };
            self.pending = Some(children.into_iter());
        }

        let object = self.pending.as_mut()?.next()?;
        match self.builder.orphan(object, self.depth, &self.path) {
            Ok(orphan) => Some(orphan),
            Err(e) => {
                warn!(parent = %self.parent, error = %e, "failed to build child; truncating list");
                None
            }
        }
    }
}
