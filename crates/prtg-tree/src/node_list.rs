//! Child lists of live nodes.
//!
//! A [`NodeList`] converts the orphans of its owner's child list into live
//! [`TreeNode`]s the first time each position is requested and caches the
//! result, so repeated access to the same index yields the same node.
//!
//! Strict lists preallocate one once-cell per orphan; concurrent first access
//! to the same slot is resolved by whichever conversion lands first, the
//! others are dropped. Lazy lists cannot know their size up front, so the
//! slot vector grows on demand under a list-wide lock.

use std::fmt;
use std::sync::{Mutex, OnceLock, Weak};

use tracing::trace;

use crate::error::{TreeError, TreeResult};
use crate::node::{NodeInner, TreeNode};
use crate::orphan::{OrphanList, TreePayload};

/// Live child list of a [`TreeNode`].
pub struct NodeList<P> {
    owner: Weak<NodeInner<P>>,
    orphans: OrphanList<P>,
    slots: Slots<P>,
}

enum Slots<P> {
    Strict(Box<[OnceLock<TreeNode<P>>]>),
    Lazy(Mutex<Vec<Option<TreeNode<P>>>>),
}

impl<P> NodeList<P> {
    pub(crate) fn new(owner: Weak<NodeInner<P>>, orphans: OrphanList<P>) -> Self {
        let slots = if orphans.is_lazy() {
            Slots::Lazy(Mutex::new(Vec::new()))
        } else {
            Slots::Strict((0..orphans.len()).map(|_| OnceLock::new()).collect())
        };
        Self {
            owner,
            orphans,
            slots,
        }
    }

    /// The orphans backing this list.
    pub fn orphans(&self) -> &OrphanList<P> {
        &self.orphans
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.slots, Slots::Lazy(_))
    }

    /// Number of children. May enumerate a lazy source.
    pub fn len(&self) -> usize {
        match &self.slots {
            Slots::Strict(slots) => slots.len(),
            Slots::Lazy(_) => self.orphans.len(),
        }
    }

    /// Returns `true` if there are no children. Pulls at most one element
    /// from a lazy source.
    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty()
    }
}

impl<P: TreePayload> NodeList<P> {
    /// The child at `index`, converting its orphan into a node on first access.
    pub fn get(&self, index: usize) -> TreeResult<TreeNode<P>> {
        match &self.slots {
            Slots::Strict(slots) => {
                let slot = slots.get(index).ok_or(TreeError::IndexOutOfRange {
                    index,
                    len: slots.len(),
                })?;
                if let Some(node) = slot.get() {
                    return Ok(node.clone());
                }
                let candidate = self.element_to_node(index)?;
                // Whoever initialised the slot first wins; a losing candidate
                // is dropped here.
                Ok(slot.get_or_init(|| candidate).clone())
            }
            Slots::Lazy(slots) => {
                let mut slots = slots.lock().expect("lock poisoned");
                if let Some(Some(node)) = slots.get(index) {
                    return Ok(node.clone());
                }
                let node = self.element_to_node(index)?;
                if index >= slots.len() {
                    slots.resize_with(index + 1, || None);
                }
                slots[index] = Some(node.clone());
                Ok(node)
            }
        }
    }

    /// Iterate over the children, materializing nodes as they are reached.
    pub fn iter(&self) -> NodeIter<'_, P> {
        NodeIter { list: self, index: 0 }
    }

    fn element_to_node(&self, index: usize) -> TreeResult<TreeNode<P>> {
        let orphan = self.orphans.get(index)?;
        trace!(index, "materializing child node");
        Ok(TreeNode::attach(orphan, Some(self.owner.clone()), index))
    }
}

impl<P> fmt::Debug for NodeList<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cached = match &self.slots {
            Slots::Strict(slots) => slots.iter().filter(|slot| slot.get().is_some()).count(),
            Slots::Lazy(slots) => slots
                .lock()
                .expect("lock poisoned")
                .iter()
                .filter(|slot| slot.is_some())
                .count(),
        };
        f.debug_struct("NodeList")
            .field("lazy", &self.is_lazy())
            .field("cached", &cached)
            .finish()
    }
}

/// Iterator over a [`NodeList`].
pub struct NodeIter<'a, P> {
    list: &'a NodeList<P>,
    index: usize,
}

impl<P: TreePayload> Iterator for NodeIter<'_, P> {
    type Item = TreeNode<P>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.get(self.index).ok()?;
        self.index += 1;
        Some(node)
    }
}
