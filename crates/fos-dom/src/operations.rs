//! DOM Node Operations
//!
//! Error type shared by tree manipulation and selector parsing.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("Node not found: {0}")]
    NotFound(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("Hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Invalid node type for the operation
    #[error("Invalid node type: {0} cannot hold children")]
    InvalidNodeType(NodeId),
    /// Node is not a child of the given parent
    #[error("Node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Malformed selector or tag name
    #[error("Syntax error: {0}")]
    Syntax(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DomError::NotAChild { parent: NodeId(1), child: NodeId(7) };
        assert_eq!(err.to_string(), "Node #7 is not a child of #1");

        let err = DomError::NotFound(NodeId::NONE);
        assert_eq!(err.to_string(), "Node not found: #none");
    }
}
