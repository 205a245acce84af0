//! DOM Events
//!
//! Listener registry and capture/target/bubble dispatch over a shared
//! document. Listeners are plain closures; dispatch snapshots the listeners
//! of each node and releases the document borrow before calling them, so a
//! listener may freely add or remove listeners or mutate the tree.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::{NodeId, SharedDocument};

/// Native listener callback
pub type NativeListener = Rc<dyn Fn(&mut DomEvent)>;

/// Handle returned by `add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Dispatch phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPhase {
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: NodeId,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Create an event; `target` is filled in by dispatch
    pub fn new(event_type: &str, bubbles: bool, cancelable: bool) -> Self {
        Self {
            event_type: event_type.to_string(),
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            phase: EventPhase::None,
            bubbles,
            cancelable,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation after the current node
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Check if default was prevented
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Check if propagation was stopped
    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

struct Entry {
    id: ListenerId,
    capture: bool,
    callback: NativeListener,
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("id", &self.id)
            .field("capture", &self.capture)
            .finish_non_exhaustive()
    }
}

/// Listeners by target node and event type
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    handlers: HashMap<(NodeId, String), Vec<Entry>>,
    live: HashSet<ListenerId>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener
    pub fn add(
        &mut self,
        target: NodeId,
        event_type: &str,
        capture: bool,
        callback: NativeListener,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.handlers
            .entry((target, event_type.to_string()))
            .or_default()
            .push(Entry { id, capture, callback });
        self.live.insert(id);
        tracing::trace!("listener {:?} added for '{}' on {}", id, event_type, target);
        id
    }

    /// Unregister a listener; the capture flag must match registration
    pub fn remove(
        &mut self,
        target: NodeId,
        event_type: &str,
        id: ListenerId,
        capture: bool,
    ) -> bool {
        let key = (target, event_type.to_string());
        let Some(entries) = self.handlers.get_mut(&key) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| !(e.id == id && e.capture == capture));
        let removed = entries.len() < before;
        if entries.is_empty() {
            self.handlers.remove(&key);
        }
        if removed {
            self.live.remove(&id);
            tracing::trace!("listener {:?} removed for '{}' on {}", id, event_type, target);
        }
        removed
    }

    /// Whether the listener is still registered
    pub fn contains(&self, id: ListenerId) -> bool {
        self.live.contains(&id)
    }

    /// Number of listeners for a node and event type
    pub fn count(&self, target: NodeId, event_type: &str) -> usize {
        self.handlers
            .get(&(target, event_type.to_string()))
            .map_or(0, Vec::len)
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    fn snapshot(
        &self,
        target: NodeId,
        event_type: &str,
        phase: EventPhase,
    ) -> Vec<(ListenerId, NativeListener)> {
        self.handlers
            .get(&(target, event_type.to_string()))
            .into_iter()
            .flatten()
            .filter(|e| match phase {
                EventPhase::Capturing => e.capture,
                EventPhase::Bubbling => !e.capture,
                EventPhase::AtTarget | EventPhase::None => true,
            })
            .map(|e| (e.id, e.callback.clone()))
            .collect()
    }
}

fn invoke(doc: &SharedDocument, node: NodeId, phase: EventPhase, event: &mut DomEvent) {
    let listeners = doc.borrow().listeners().snapshot(node, &event.event_type, phase);
    for (id, callback) in listeners {
        // Listeners removed by an earlier callback in this dispatch are skipped
        if !doc.borrow().listeners().contains(id) {
            continue;
        }
        event.current_target = node;
        event.phase = phase;
        callback(event);
    }
}

/// Dispatch `event` at `target`: capture down the ancestor chain, target,
/// then bubble back up when the event bubbles.
///
/// Returns `false` if a listener prevented the default action.
pub fn dispatch_event(doc: &SharedDocument, target: NodeId, mut event: DomEvent) -> bool {
    let path: Vec<NodeId> = doc.borrow().tree().ancestors(target).collect();
    event.target = target;
    tracing::debug!("dispatching '{}' at {} ({} ancestors)", event.event_type, target, path.len());

    for &node in path.iter().rev() {
        invoke(doc, node, EventPhase::Capturing, &mut event);
        if event.is_propagation_stopped() {
            return !event.is_default_prevented();
        }
    }

    invoke(doc, target, EventPhase::AtTarget, &mut event);

    if event.bubbles {
        for &node in &path {
            if event.is_propagation_stopped() {
                break;
            }
            invoke(doc, node, EventPhase::Bubbling, &mut event);
        }
    }

    event.phase = EventPhase::None;
    !event.is_default_prevented()
}

/// Deliver events queued by native methods, returning how many were dispatched
pub fn run_pending_events(doc: &SharedDocument) -> usize {
    let mut delivered = 0;
    loop {
        let next = doc.borrow_mut().next_pending();
        let Some((target, event)) = next else {
            break;
        };
        dispatch_event(doc, target, event);
        delivered += 1;
    }
    delivered
}
