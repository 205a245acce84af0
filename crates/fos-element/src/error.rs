//! Wrapper errors

use fos_dom::{DomError, NodeId};

/// Errors from wrapper write operations
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error("{0} is not an element")]
    NotAnElement(NodeId),

    #[error("<{tag}> cannot take {kind} content")]
    UnsupportedContent { tag: String, kind: &'static str },

    #[error(transparent)]
    Dom(#[from] DomError),
}
