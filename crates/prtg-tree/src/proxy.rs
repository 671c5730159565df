//! Deferred values for objects that do not exist yet.
//!
//! A [`ValueProxy`] stands in for a value that is produced on first access,
//! typically by creating the object on the server. Direct proxies need
//! nothing else. Parametrized proxies are created below a parent whose ID is
//! supplied by the tree the proxy is placed in, so the same proxy can sit
//! below different parents and resolve once per parent. This allows a whole
//! creation plan (probe, group, device, sensor) to be assembled before
//! anything is created, then resolved top-down.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use prtg_types::{ObjectId, PrtgNodeType, ValueRef};
use tracing::debug;

use crate::error::{TreeError, TreeResult};

/// Resolver for a direct proxy.
pub type DirectResolver = Box<dyn Fn() -> TreeResult<ValueRef> + Send + Sync>;

/// Resolver for a parametrized proxy; receives the parent's ID.
pub type ParametrizedResolver = Box<dyn Fn(ObjectId) -> TreeResult<ValueRef> + Send + Sync>;

#[derive(Default)]
enum MemoState {
    #[default]
    Unresolved,
    Resolving {
        thread: ThreadId,
    },
    Resolved(ValueRef),
}

/// A single memoized resolution. Concurrent callers wait for the one in
/// flight; a failed or panicking resolution leaves it unresolved.
#[derive(Default)]
struct Memo {
    state: Mutex<MemoState>,
    ready: Condvar,
}

impl Memo {
    fn resolve(&self, resolve: impl FnOnce() -> TreeResult<ValueRef>) -> TreeResult<ValueRef> {
        let current = thread::current().id();
        let mut state = self.state.lock().expect("lock poisoned");
        loop {
            match &*state {
                MemoState::Resolved(value) => return Ok(value.clone()),
                MemoState::Resolving { thread } if *thread == current => {
                    return Err(TreeError::CyclicResolution)
                }
                MemoState::Resolving { .. } => {}
                MemoState::Unresolved => break,
            }
            state = self.ready.wait(state).expect("lock poisoned");
        }
        *state = MemoState::Resolving { thread: current };
        drop(state);

        let mut pending = Pending { memo: self, value: None };
        let result = resolve();
        if let Ok(value) = &result {
            pending.value = Some(value.clone());
        }
        drop(pending);
        result
    }

    fn is_resolved(&self) -> bool {
        matches!(&*self.state.lock().expect("lock poisoned"), MemoState::Resolved(_))
    }
}

/// Publishes the outcome of a resolution when dropped, including during an
/// unwind out of the resolver.
struct Pending<'a> {
    memo: &'a Memo,
    value: Option<ValueRef>,
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        let mut state = self.memo.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = match self.value.take() {
            Some(value) => MemoState::Resolved(value),
            None => MemoState::Unresolved,
        };
        self.memo.ready.notify_all();
    }
}

enum ProxyKind {
    Direct {
        resolver: DirectResolver,
        memo: Memo,
    },
    Parametrized {
        resolver: ParametrizedResolver,
        placements: Mutex<HashMap<ObjectId, Arc<Memo>>>,
    },
}

/// A value resolved on first access and memoized afterwards.
pub struct ValueProxy {
    node_type: PrtgNodeType,
    kind: ProxyKind,
}

impl ValueProxy {
    /// A proxy whose value needs no further input.
    pub fn direct<F>(node_type: PrtgNodeType, resolver: F) -> Self
    where
        F: Fn() -> TreeResult<ValueRef> + Send + Sync + 'static,
    {
        Self {
            node_type,
            kind: ProxyKind::Direct {
                resolver: Box::new(resolver),
                memo: Memo::default(),
            },
        }
    }

    /// A proxy whose value is created below a parent that may itself be a
    /// proxy. Resolved once per parent ID.
    pub fn parametrized<F>(node_type: PrtgNodeType, resolver: F) -> Self
    where
        F: Fn(ObjectId) -> TreeResult<ValueRef> + Send + Sync + 'static,
    {
        Self {
            node_type,
            kind: ProxyKind::Parametrized {
                resolver: Box::new(resolver),
                placements: Mutex::new(HashMap::new()),
            },
        }
    }

    pub fn node_type(&self) -> PrtgNodeType {
        self.node_type
    }

    pub fn is_parametrized(&self) -> bool {
        matches!(self.kind, ProxyKind::Parametrized { .. })
    }

    /// For a parametrized proxy: resolved below at least one parent.
    pub fn is_resolved(&self) -> bool {
        match &self.kind {
            ProxyKind::Direct { memo, .. } => memo.is_resolved(),
            ProxyKind::Parametrized { placements, .. } => placements
                .lock()
                .expect("lock poisoned")
                .values()
                .any(|memo| memo.is_resolved()),
        }
    }

    /// Resolve a direct proxy, invoking the resolver on first access only.
    ///
    /// Other threads asking while a resolution is in flight wait for it. A
    /// resolver that re-enters its own proxy gets [`TreeError::CyclicResolution`].
    /// A failed resolution leaves the proxy unresolved so it can be retried.
    /// A parametrized proxy has no parent here and fails with
    /// [`TreeError::MissingParentResolver`].
    pub fn resolve(&self) -> TreeResult<ValueRef> {
        match &self.kind {
            ProxyKind::Direct { resolver, memo } => memo.resolve(|| {
                debug!(node_type = %self.node_type, "resolving direct proxy");
                resolver()
            }),
            ProxyKind::Parametrized { .. } => Err(TreeError::MissingParentResolver {
                node_type: self.node_type,
            }),
        }
    }

    /// Resolve below the parent whose ID `parent` yields.
    ///
    /// `parent` is only called for parametrized proxies. `Ok(None)` from it
    /// fails with [`TreeError::UnresolvedParentId`]. Each parent ID has its
    /// own memoized value.
    pub fn resolve_under<F>(&self, parent: F) -> TreeResult<ValueRef>
    where
        F: FnOnce() -> TreeResult<Option<ObjectId>>,
    {
        let ProxyKind::Parametrized { resolver, placements } = &self.kind else {
            return self.resolve();
        };
        let parent_id = parent()?.ok_or(TreeError::UnresolvedParentId {
            node_type: self.node_type,
        })?;
        let memo = Arc::clone(
            placements
                .lock()
                .expect("lock poisoned")
                .entry(parent_id)
                .or_default(),
        );
        memo.resolve(|| {
            debug!(node_type = %self.node_type, parent = %parent_id, "resolving parametrized proxy");
            resolver(parent_id)
        })
    }
}

impl fmt::Debug for ValueProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ValueProxy");
        out.field("node_type", &self.node_type);
        match &self.kind {
            ProxyKind::Direct { memo, .. } => {
                let state = match &*memo.state.lock().expect("lock poisoned") {
                    MemoState::Unresolved => "unresolved",
                    MemoState::Resolving { .. } => "resolving",
                    MemoState::Resolved(_) => "resolved",
                };
                out.field("state", &state);
            }
            ProxyKind::Parametrized { placements, .. } => {
                let parents: Vec<ObjectId> =
                    placements.lock().expect("lock poisoned").keys().copied().collect();
                out.field("parents", &parents);
            }
        }
        out.finish()
    }
}

/// Where a PRTG node gets its value from.
#[derive(Clone, Debug)]
pub enum ValueSource {
    /// An object that already exists.
    Value(ValueRef),
    /// An object produced on first access.
    Proxy(Arc<ValueProxy>),
}

impl ValueSource {
    /// The value, resolving a proxy below the parent `parent` yields if
    /// necessary.
    pub fn resolve_under<F>(&self, parent: F) -> TreeResult<ValueRef>
    where
        F: FnOnce() -> TreeResult<Option<ObjectId>>,
    {
        match self {
            Self::Value(value) => Ok(value.clone()),
            Self::Proxy(proxy) => proxy.resolve_under(parent),
        }
    }
}
