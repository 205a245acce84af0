//! Native element methods
//!
//! The small set of built-in element methods (`click()`, `focus()`, ...)
//! that perform their default action and fire the matching event.

use crate::{dispatch_event, DomEvent, NodeId, SharedDocument};

/// Built-in element method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeMethod {
    Click,
    Focus,
    Blur,
    Select,
}

impl NativeMethod {
    /// Method `name` on an element with tag `tag`, if it exists
    pub fn lookup(tag: &str, name: &str) -> Option<Self> {
        match name {
            "click" => Some(Self::Click),
            "focus" => Some(Self::Focus),
            "blur" => Some(Self::Blur),
            "select" if matches!(tag, "input" | "textarea") => Some(Self::Select),
            _ => None,
        }
    }
}

fn is_disabled_control(doc: &SharedDocument, node: NodeId) -> bool {
    let doc = doc.borrow();
    matches!(doc.tag_name(node), Some("button" | "input" | "textarea" | "select"))
        && doc.has_attribute(node, "disabled")
}

/// Call native method `name` on `node`.
///
/// Returns `false` when the element has no such method. Events fired by
/// `click`, `focus` and `blur` are dispatched before returning; `select`
/// queues its event like browsers do.
pub fn invoke_native_method(doc: &SharedDocument, node: NodeId, name: &str) -> bool {
    let method = {
        let d = doc.borrow();
        match d.tag_name(node) {
            Some(tag) => NativeMethod::lookup(tag, name),
            None => None,
        }
    };
    let Some(method) = method else {
        return false;
    };
    tracing::debug!("native {:?}() on {}", method, node);

    match method {
        NativeMethod::Click => {
            if !is_disabled_control(doc, node) {
                dispatch_event(doc, node, DomEvent::new("click", true, true));
            }
        }
        NativeMethod::Focus => {
            let (connected, previous) = {
                let d = doc.borrow();
                (d.tree().is_connected(node), d.focused())
            };
            if !connected || is_disabled_control(doc, node) || previous == Some(node) {
                return true;
            }
            if let Some(previous) = previous {
                doc.borrow_mut().set_focused(None);
                dispatch_event(doc, previous, DomEvent::new("blur", false, false));
            }
            doc.borrow_mut().set_focused(Some(node));
            dispatch_event(doc, node, DomEvent::new("focus", false, false));
        }
        NativeMethod::Blur => {
            let focused = doc.borrow().focused() == Some(node);
            if focused {
                doc.borrow_mut().set_focused(None);
                dispatch_event(doc, node, DomEvent::new("blur", false, false));
            }
        }
        NativeMethod::Select => {
            let mut d = doc.borrow_mut();
            let len = d.form_value(node).map_or(0, |v| v.chars().count());
            if d.set_selection(node, (0, len)).is_ok() {
                d.queue_event(node, DomEvent::new("select", true, false));
            }
        }
    }
    true
}
