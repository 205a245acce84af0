//! Element wrapper
//!
//! Construction, subtree queries and attach/detach. Event, value and state
//! accessors live in their own modules.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use fos_dom::{ElementQuery, ListenerId, NodeId, SharedDocument};

use crate::events::Subscriber;
use crate::registry::{Registry, RegistryInner};
use crate::{Config, ElementError};

/// What to wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// An existing element
    Node(NodeId),
    /// A new element with this tag name
    Tag(&'a str),
}

impl From<NodeId> for Source<'_> {
    fn from(node: NodeId) -> Self {
        Source::Node(node)
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(tag: &'a str) -> Self {
        Source::Tag(tag)
    }
}

/// Initial content applied at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    /// Caller-trusted markup; trimmed, newlines removed, assigned as inner HTML
    Markup(String),
    /// Nodes appended as children; anything that is not an element is skipped
    Nodes(Vec<NodeId>),
}

/// Query result with at least one match
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    One(Element),
    Many(Vec<Element>),
}

impl Selection {
    /// First match in document order
    pub fn first(&self) -> Option<&Element> {
        match self {
            Selection::One(element) => Some(element),
            Selection::Many(elements) => elements.first(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::One(_) => 1,
            Selection::Many(elements) => elements.len(),
        }
    }

    /// All matches in document order
    pub fn into_vec(self) -> Vec<Element> {
        match self {
            Selection::One(element) => vec![element],
            Selection::Many(elements) => elements,
        }
    }
}

pub(crate) struct ElementInner {
    pub(crate) node: NodeId,
    pub(crate) document: SharedDocument,
    pub(crate) config: Rc<Config>,
    pub(crate) registry: Weak<RegistryInner>,
    pub(crate) events: RefCell<HashMap<String, Vec<Subscriber>>>,
    pub(crate) listeners: RefCell<HashMap<String, ListenerId>>,
    pub(crate) next_subscriber: Cell<u64>,
}

/// Wrapper around one document element.
///
/// Cloning is cheap and yields the same wrapper; equality is identity.
#[derive(Clone)]
pub struct Element(pub(crate) Rc<ElementInner>);

pub(crate) fn construct(
    registry: &Registry,
    source: Source<'_>,
    template: Option<Template>,
) -> Option<Element> {
    let document = registry.document().clone();

    let node = match source {
        Source::Node(node) => {
            if !document.borrow().is_element(node) {
                tracing::debug!("not wrapping {}: not an element", node);
                return None;
            }
            node
        }
        Source::Tag(tag) => match document.borrow_mut().create_element(tag) {
            Ok(node) => node,
            Err(err) => {
                tracing::debug!("not wrapping <{}>: {}", tag, err);
                return None;
            }
        },
    };

    if let Some(template) = template {
        apply_template(&document, node, template);
    }

    let element = Element(Rc::new(ElementInner {
        node,
        document,
        config: registry.0.config.clone(),
        registry: Rc::downgrade(&registry.0),
        events: RefCell::new(HashMap::new()),
        listeners: RefCell::new(HashMap::new()),
        next_subscriber: Cell::new(0),
    }));

    let registered = registry.0.cache.borrow_mut().register(node, element.clone());
    tracing::debug!("wrapped {} (registered: {})", node, registered);
    Some(element)
}

fn apply_template(document: &SharedDocument, node: NodeId, template: Template) {
    let mut doc = document.borrow_mut();
    match template {
        Template::Nodes(children) => {
            for child in children {
                if !doc.is_element(child) {
                    continue;
                }
                if let Err(err) = doc.tree_mut().append_child(node, child) {
                    tracing::debug!("template child {} skipped: {}", child, err);
                }
            }
        }
        Template::Markup(markup) => {
            let markup = markup.trim().replace('\n', "");
            if let Err(err) = fos_html::set_inner_html(doc.tree_mut(), node, &markup) {
                tracing::debug!("template markup for {} rejected: {}", node, err);
            }
        }
    }
}

/// Wrap every match of `selector` below `root`, reusing registered wrappers
pub(crate) fn resolve(registry: &Registry, root: NodeId, selector: &str) -> Option<Selection> {
    let matches = registry.document().borrow().tree().query_selector_all(root, selector);
    let nodes = match matches {
        Ok(nodes) => nodes,
        Err(err) => {
            tracing::debug!("query '{}' failed: {}", selector, err);
            return None;
        }
    };

    let mut wrappers: Vec<Element> = nodes.into_iter().filter_map(|n| registry.wrap(n)).collect();
    match wrappers.len() {
        0 => None,
        1 => wrappers.pop().map(Selection::One),
        _ => Some(Selection::Many(wrappers)),
    }
}

impl Element {
    /// The wrapped node
    pub fn node(&self) -> NodeId {
        self.0.node
    }

    /// The document the node lives in
    pub fn document(&self) -> &SharedDocument {
        &self.0.document
    }

    /// The registry this wrapper was constructed by, while it is alive
    pub fn registry(&self) -> Option<Registry> {
        self.0.registry.upgrade().map(Registry)
    }

    /// Resolve a selector within this element's subtree
    pub fn query(&self, selector: &str) -> Option<Selection> {
        let registry = self.registry()?;
        resolve(&registry, self.node(), selector)
    }

    /// Append this element as the last child of `target`
    pub fn render(&self, target: NodeId) -> Result<(), ElementError> {
        let mut doc = self.0.document.borrow_mut();
        if !doc.is_element(target) {
            return Err(ElementError::NotAnElement(target));
        }
        doc.tree_mut().append_child(target, self.node())?;
        Ok(())
    }

    /// Remove this element from `target` and drop its cache entry.
    ///
    /// The cache entry is only dropped when the node and this wrapper sit at
    /// the same cache index; a wrapper built directly over an already cached
    /// node is not registered, and erasing through it leaves the cache alone.
    pub fn erase(&self, target: NodeId) -> Result<(), ElementError> {
        {
            let mut doc = self.0.document.borrow_mut();
            if !doc.is_element(target) {
                return Err(ElementError::NotAnElement(target));
            }
            doc.tree_mut().remove_child(target, self.node())?;
        }

        let Some(registry) = self.0.registry.upgrade() else {
            return Ok(());
        };
        let mut cache = registry.cache.borrow_mut();
        let node_index = cache.node_index(self.node());
        let wrapper_index = cache.wrapper_index(self);
        match (node_index, wrapper_index) {
            (Some(a), Some(b)) if a == b => {
                cache.remove_at(a);
            }
            (a, b) if a != b => {
                tracing::error!("Virtual DOM cache corruption for {} ({:?} != {:?})", self.node(), a, b);
                tracing::error!("Please use Registry::query(selector) to obtain wrappers.");
            }
            _ => {}
        }
        Ok(())
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("node", &self.0.node)
            .field("events", &self.0.events.borrow().keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
