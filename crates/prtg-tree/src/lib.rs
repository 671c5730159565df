//! Persistent trees of PRTG objects.
//!
//! Trees are made of immutable [`Orphan`]s (payload plus children, no parent)
//! wrapped on demand by live [`TreeNode`]s that know their parent. Edits never
//! touch an existing orphan: they produce a new root that shares every
//! unaffected sub-tree with the original.
//!
//! # Key Types
//!
//! - [`Orphan`] / [`OrphanList`] — Immutable fragments with strict or lazy child lists
//! - [`TreeNode`] / [`NodeList`] — Live nodes; child nodes are created once per position
//! - [`PrtgOrphan`] / [`PrtgNode`] — Trees of probes, groups, devices, sensors, triggers, properties
//! - [`ValueProxy`] / [`ValueSource`] — Deferred values for objects that are yet to be created
//! - [`Rewriter`], [`ListEditor`], [`NodeRemover`], [`NodeReplacer`] — Structural-sharing edits
//! - [`TreeBuilder`] / [`TreeSource`] — Strict or lazy trees from an object source
//! - [`DocumentNode`] — JSON tree documents

pub mod builder;
pub mod config;
pub mod document;
pub mod edit;
pub mod error;
pub mod node;
pub mod node_list;
pub mod orphan;
pub mod proxy;
pub mod prtg;
pub mod rewrite;

pub use builder::{InMemoryTreeSource, SourceObject, TreeBuilder, TreeSource};
pub use config::{Materialization, TreeOptions};
pub use document::DocumentNode;
pub use edit::{ListEdit, ListEditor, NodeRemover, NodeReplacer};
pub use error::{TreeError, TreeResult};
pub use node::TreeNode;
pub use node_list::{NodeIter, NodeList};
pub use orphan::{Orphan, OrphanIter, OrphanList, TreePayload};
pub use proxy::{ValueProxy, ValueSource};
pub use prtg::{PrtgNode, PrtgOrphan, PrtgPayload};
pub use rewrite::{rewrite, visit_children, visit_list_default, Rewriter};
