//! Identity Cache
//!
//! Two index-aligned lists: `nodes[i]` is wrapped by `wrappers[i]`.
//! A node appears at most once.

use fos_dom::NodeId;

use crate::Element;

/// Node to wrapper registry
#[derive(Debug, Default)]
pub struct IdentityCache {
    nodes: Vec<NodeId>,
    wrappers: Vec<Element>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `wrapper` for `node` unless the node is already cached
    pub fn register(&mut self, node: NodeId, wrapper: Element) -> bool {
        if self.nodes.contains(&node) {
            return false;
        }
        self.nodes.push(node);
        self.wrappers.push(wrapper);
        true
    }

    /// Cached wrapper for a node
    pub fn lookup(&self, node: NodeId) -> Option<Element> {
        self.node_index(node).map(|i| self.wrappers[i].clone())
    }

    /// Position of a node
    pub fn node_index(&self, node: NodeId) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    /// Position of a wrapper, by identity
    pub fn wrapper_index(&self, wrapper: &Element) -> Option<usize> {
        self.wrappers.iter().position(|w| w == wrapper)
    }

    /// Drop the pair at `index`
    pub fn remove_at(&mut self, index: usize) -> Option<(NodeId, Element)> {
        if index >= self.nodes.len() {
            return None;
        }
        Some((self.nodes.remove(index), self.wrappers.remove(index)))
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
