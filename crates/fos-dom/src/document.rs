//! Document - High-level document API

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::{
    DomError, DomEvent, DomResult, DomTree, ElementQuery, ListenerId, ListenerRegistry,
    NativeListener, NativeMethod, NodeId,
};

/// Document shared between wrappers and the listeners registered on it.
///
/// Everything runs on one thread; callers must not hold a borrow across a
/// listener call (see [`crate::dispatch_event`]).
pub type SharedDocument = Rc<RefCell<Document>>;

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Native event listeners
    listeners: ListenerRegistry,
    /// Events queued by native methods, delivered by `run_pending_events`
    pending: VecDeque<(NodeId, DomEvent)>,
    /// Focused element
    focused: Option<NodeId>,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let root = doc.tree.root();

        let html = doc.tree.create_element("html");
        let head = doc.tree.create_element("head");
        let body = doc.tree.create_element("body");

        // Freshly created nodes under the document node cannot violate hierarchy rules
        let _ = doc.tree.append_child(root, html);
        let _ = doc.tree.append_child(html, head);
        let _ = doc.tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            listeners: ListenerRegistry::new(),
            pending: VecDeque::new(),
            focused: None,
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Wrap for sharing with element wrappers
    pub fn into_shared(self) -> SharedDocument {
        Rc::new(RefCell::new(self))
    }

    /// Locate html/head/body after the tree was filled by a parser
    pub fn finalize(&mut self) {
        let find = |tree: &DomTree, parent: NodeId, tag: &str| {
            tree.children(parent)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.tag_name == tag))
                .map(|(id, _)| id)
                .unwrap_or(NodeId::NONE)
        };
        self.html_element = find(&self.tree, self.tree.root(), "html");
        self.head_element = find(&self.tree, self.html_element, "head");
        self.body_element = find(&self.tree, self.html_element, "body");
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// `document.createElement`
    pub fn create_element(&mut self, tag_name: &str) -> DomResult<NodeId> {
        let valid = tag_name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && tag_name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(DomError::Syntax(format!("invalid tag name '{}'", tag_name)));
        }
        Ok(self.tree.create_element(tag_name))
    }

    /// Whether `id` names an element node of this document
    pub fn is_element(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|n| n.is_element())
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.tag_name(id)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .into_iter()
            .find(|&node| {
                self.tree.get(node).and_then(|n| n.as_element()).and_then(|e| e.id()) == Some(id)
            })
    }

    /// `document.querySelector`
    pub fn query_selector(&self, selector: &str) -> DomResult<Option<NodeId>> {
        self.tree.query_selector(self.tree.root(), selector)
    }

    /// `document.querySelectorAll`
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        self.tree.query_selector_all(self.tree.root(), selector)
    }

    fn element_mut(&mut self, id: NodeId) -> DomResult<&mut crate::ElementData> {
        self.tree
            .get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::InvalidNodeType(id))
    }

    /// `element.getAttribute`
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.get(id)?.as_element()?.get_attr(name)
    }

    /// `element.hasAttribute`
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// `element.setAttribute`
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    /// `element.removeAttribute`, returning whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> DomResult<bool> {
        Ok(self.element_mut(id)?.attrs.remove_named_item(name).is_some())
    }

    /// `element.className`
    pub fn class_name(&self, id: NodeId) -> &str {
        self.get_attribute(id, "class").unwrap_or("")
    }

    /// `element.className = value`
    pub fn set_class_name(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.set_attribute(id, "class", value)
    }

    /// `.value` of an input or textarea
    ///
    /// Inputs fall back to their `value` attribute, textareas to their text.
    pub fn form_value(&self, id: NodeId) -> Option<String> {
        let elem = self.tree.get(id)?.as_element()?;
        if let Some(value) = &elem.value {
            return Some(value.clone());
        }
        match elem.tag_name.as_str() {
            "input" => Some(elem.get_attr("value").unwrap_or("").to_string()),
            "textarea" => Some(self.tree.text_content(id)),
            _ => None,
        }
    }

    /// `.value = ...` of an input or textarea
    pub fn set_form_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        let elem = self.element_mut(id)?;
        if !elem.is_text_control() {
            return Err(DomError::InvalidNodeType(id));
        }
        elem.value = Some(value.to_string());
        elem.selection = None;
        Ok(())
    }

    /// Selected range of a text control
    pub fn selection(&self, id: NodeId) -> Option<(usize, usize)> {
        self.tree.get(id)?.as_element()?.selection
    }

    pub(crate) fn set_selection(&mut self, id: NodeId, range: (usize, usize)) -> DomResult<()> {
        self.element_mut(id)?.selection = Some(range);
        Ok(())
    }

    /// Currently focused element
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, id: Option<NodeId>) {
        self.focused = id;
    }

    /// Whether the element exposes a native method of that name
    pub fn has_native_method(&self, id: NodeId, name: &str) -> bool {
        self.tag_name(id)
            .is_some_and(|tag| NativeMethod::lookup(tag, name).is_some())
    }

    /// `element.addEventListener`
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        capture: bool,
        listener: NativeListener,
    ) -> DomResult<ListenerId> {
        if self.tree.get(id).is_none() {
            return Err(DomError::NotFound(id));
        }
        Ok(self.listeners.add(id, event_type, capture, listener))
    }

    /// `element.removeEventListener`
    pub fn remove_event_listener(
        &mut self,
        id: NodeId,
        event_type: &str,
        listener: ListenerId,
        capture: bool,
    ) -> bool {
        self.listeners.remove(id, event_type, listener, capture)
    }

    /// Native listener registry
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    /// Queue an event for the next `run_pending_events`
    pub fn queue_event(&mut self, target: NodeId, event: DomEvent) {
        self.pending.push_back((target, event));
    }

    /// Number of queued events
    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn next_pending(&mut self) -> Option<(NodeId, DomEvent)> {
        self.pending.pop_front()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
