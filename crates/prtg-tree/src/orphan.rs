//! Detached, immutable tree fragments.
//!
//! An [`Orphan`] is a payload plus its child orphans, with no parent link. One
//! orphan can sit in any number of trees at once; live [`TreeNode`]s are
//! created on top of orphans on demand.
//!
//! [`TreeNode`]: crate::TreeNode

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::error::{TreeError, TreeResult};

/// Payload carried by every orphan of a tree.
///
/// Payloads are cloned whenever an edit rebuilds an ancestor, so cloning
/// should be cheap (shared handles rather than deep copies).
pub trait TreePayload: Clone + Send + Sync + 'static {
    /// Grouping nodes are flattened into their parent when rendered.
    fn is_collection(&self) -> bool {
        false
    }
}

/// An immutable, parentless tree fragment.
pub struct Orphan<P> {
    inner: Arc<OrphanData<P>>,
}

struct OrphanData<P> {
    payload: P,
    children: OrphanList<P>,
}

impl<P: TreePayload> Orphan<P> {
    /// Assemble an orphan from a payload and its children.
    pub fn new(payload: P, children: OrphanList<P>) -> Self {
        Self {
            inner: Arc::new(OrphanData { payload, children }),
        }
    }

    /// An orphan without children.
    pub fn leaf(payload: P) -> Self {
        Self::new(payload, OrphanList::empty())
    }

    /// A copy of this orphan with its children replaced.
    pub fn with_children(&self, children: OrphanList<P>) -> Self {
        Self::new(self.inner.payload.clone(), children)
    }
}

impl<P> Orphan<P> {
    pub fn payload(&self) -> &P {
        &self.inner.payload
    }

    pub fn children(&self) -> &OrphanList<P> {
        &self.inner.children
    }

    /// Returns `true` if both handles refer to the very same orphan.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Address-based identity key, valid while the orphan is alive.
    pub(crate) fn key(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl<P> Clone for Orphan<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: fmt::Debug> fmt::Debug for Orphan<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orphan")
            .field("payload", &self.inner.payload)
            .field("children", &self.inner.children)
            .finish()
    }
}

/// Child list of an [`Orphan`].
///
/// A strict list holds all of its orphans from the start. A lazy list pulls
/// them from an external source as they are requested; asking a lazy list for
/// its length enumerates the whole source and may block on I/O.
pub struct OrphanList<P> {
    repr: ListRepr<P>,
}

enum ListRepr<P> {
    Strict(Arc<[Orphan<P>]>),
    Lazy(Arc<LazyOrphans<P>>),
}

type OrphanSource<P> = Box<dyn Iterator<Item = Orphan<P>> + Send>;

struct LazyOrphans<P> {
    state: Mutex<LazyState<P>>,
}

struct LazyState<P> {
    items: Vec<Orphan<P>>,
    /// `None` once the source is exhausted.
    source: Option<OrphanSource<P>>,
}

impl<P> LazyState<P> {
    fn fill_to(&mut self, len: usize) {
        while self.items.len() < len {
            match self.source.as_mut().and_then(Iterator::next) {
                Some(orphan) => self.items.push(orphan),
                None => {
                    self.source = None;
                    break;
                }
            }
        }
    }

    fn drain(&mut self) {
        if let Some(source) = self.source.take() {
            let before = self.items.len();
            self.items.extend(source);
            trace!(pulled = self.items.len() - before, "drained lazy orphan source");
        }
    }
}

impl<P> OrphanList<P> {
    /// An empty strict list.
    pub fn empty() -> Self {
        Self {
            repr: ListRepr::Strict(Arc::from(Vec::new())),
        }
    }

    /// A strict list holding `orphans`.
    pub fn strict(orphans: impl IntoIterator<Item = Orphan<P>>) -> Self {
        Self {
            repr: ListRepr::Strict(orphans.into_iter().collect()),
        }
    }

    /// A lazy list that pulls its orphans from `source` on demand.
    pub fn lazy<I>(source: I) -> Self
    where
        I: IntoIterator<Item = Orphan<P>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            repr: ListRepr::Lazy(Arc::new(LazyOrphans {
                state: Mutex::new(LazyState {
                    items: Vec::new(),
                    source: Some(Box::new(source.into_iter())),
                }),
            })),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self.repr, ListRepr::Lazy(_))
    }

    /// Number of orphans in the list.
    ///
    /// For lazy lists this enumerates the remaining source.
    pub fn len(&self) -> usize {
        match &self.repr {
            ListRepr::Strict(items) => items.len(),
            ListRepr::Lazy(lazy) => {
                let mut state = lazy.state.lock().expect("lock poisoned");
                state.drain();
                state.items.len()
            }
        }
    }

    /// Returns `true` if the list has no orphans. Pulls at most one element
    /// from a lazy source.
    pub fn is_empty(&self) -> bool {
        match &self.repr {
            ListRepr::Strict(items) => items.is_empty(),
            ListRepr::Lazy(_) => self.get(0).is_err(),
        }
    }

    /// Number of orphans already pulled into memory. Never touches the source.
    pub fn materialized(&self) -> usize {
        match &self.repr {
            ListRepr::Strict(items) => items.len(),
            ListRepr::Lazy(lazy) => lazy.state.lock().expect("lock poisoned").items.len(),
        }
    }

    /// The orphan at `index`, pulling from a lazy source as needed.
    pub fn get(&self, index: usize) -> TreeResult<Orphan<P>> {
        match &self.repr {
            ListRepr::Strict(items) => items.get(index).cloned().ok_or(TreeError::IndexOutOfRange {
                index,
                len: items.len(),
            }),
            ListRepr::Lazy(lazy) => {
                let mut state = lazy.state.lock().expect("lock poisoned");
                state.fill_to(index + 1);
                state.items.get(index).cloned().ok_or(TreeError::IndexOutOfRange {
                    index,
                    len: state.items.len(),
                })
            }
        }
    }

    /// Iterate over the orphans, pulling lazily.
    pub fn iter(&self) -> OrphanIter<'_, P> {
        OrphanIter { list: self, index: 0 }
    }

    /// Index of `orphan` in this list by identity.
    pub fn position(&self, orphan: &Orphan<P>) -> Option<usize> {
        self.iter().position(|candidate| candidate.ptr_eq(orphan))
    }

    /// Returns `true` if both handles refer to the same list storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (ListRepr::Strict(a), ListRepr::Strict(b)) => Arc::ptr_eq(a, b),
            (ListRepr::Lazy(a), ListRepr::Lazy(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<P> Clone for OrphanList<P> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            ListRepr::Strict(items) => ListRepr::Strict(Arc::clone(items)),
            ListRepr::Lazy(lazy) => ListRepr::Lazy(Arc::clone(lazy)),
        };
        Self { repr }
    }
}

impl<P> Default for OrphanList<P> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<P> FromIterator<Orphan<P>> for OrphanList<P> {
    fn from_iter<T: IntoIterator<Item = Orphan<P>>>(iter: T) -> Self {
        Self::strict(iter)
    }
}

impl<P: fmt::Debug> fmt::Debug for OrphanList<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            ListRepr::Strict(items) => f.debug_list().entries(items.iter()).finish(),
            ListRepr::Lazy(_) => f
                .debug_struct("LazyOrphanList")
                .field("materialized", &self.materialized())
                .finish_non_exhaustive(),
        }
    }
}

/// Iterator over an [`OrphanList`].
pub struct OrphanIter<'a, P> {
    list: &'a OrphanList<P>,
    index: usize,
}

impl<P> Iterator for OrphanIter<'_, P> {
    type Item = Orphan<P>;

    fn next(&mut self) -> Option<Self::Item> {
        let orphan = self.list.get(self.index).ok()?;
        self.index += 1;
        Some(orphan)
    }
}
