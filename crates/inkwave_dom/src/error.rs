//! Element tree error types

use inkwave_core::NodeId;
use thiserror::Error;

/// Element tree errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The node is not (or no longer) in the document
    #[error("Node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// The node is not a child of the given parent
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    /// Inserting the node would make it its own ancestor
    #[error("Inserting {child:?} under {parent:?} would create a cycle")]
    HierarchyCycle { parent: NodeId, child: NodeId },

    /// The document root cannot be moved or removed
    #[error("The document root cannot be detached")]
    RootDetach,
}

/// Result type for element tree operations
pub type Result<T> = std::result::Result<T, DomError>;
