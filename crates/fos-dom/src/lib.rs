//! fOS DOM - Document Object Model
//!
//! Arena-based DOM tree acting as the host document for element wrappers:
//! tree manipulation, attributes, selector queries, capture/bubble event
//! dispatch and the handful of native element methods wrappers delegate to.

mod attributes;
mod document;
mod dom_events;
mod element;
mod native;
mod node;
mod operations;
mod tree;

pub use attributes::{Attr, NamedNodeMap};
pub use document::{Document, SharedDocument};
pub use dom_events::{
    dispatch_event, run_pending_events, DomEvent, EventPhase, ListenerId, ListenerRegistry,
    NativeListener,
};
pub use element::{ElementQuery, Selector};
pub use native::{invoke_native_method, NativeMethod};
pub use node::{ElementData, Node, NodeData, TextData};
pub use operations::{DomError, DomResult};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id points at a node rather than the sentinel
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Raw arena index
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
