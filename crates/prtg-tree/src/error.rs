//! Error types for tree construction, navigation and rewriting.

use prtg_types::PrtgNodeType;

/// Errors that can occur during tree operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A child list was indexed outside `[0, len)`.
    #[error("index {index} is out of range for a list of {len} elements")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of elements the list holds.
        len: usize,
    },

    /// A parametrized proxy was resolved without a parent to be created under.
    #[error("cannot resolve parametrized {node_type} proxy: it has no parent")]
    MissingParentResolver {
        /// The type of the node the proxy belongs to.
        node_type: PrtgNodeType,
    },

    /// The parent of a parametrized proxy resolved to a value without an ID.
    #[error("parent of {node_type} proxy resolved to a value without an ID")]
    UnresolvedParentId {
        /// The type of the node the proxy belongs to.
        node_type: PrtgNodeType,
    },

    /// A proxy resolver (directly or through its parent) re-entered itself.
    #[error("cyclic proxy resolution detected")]
    CyclicResolution,

    /// A resolver or tree source failed.
    #[error("resolution failed: {0}")]
    Resolution(String),

    /// A tree document could not be parsed or is malformed.
    #[error("invalid tree document: {0}")]
    InvalidDocument(String),

    /// Reading a tree document failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
