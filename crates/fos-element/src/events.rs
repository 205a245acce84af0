//! Event subscriptions
//!
//! Each wrapper keeps an ordered subscriber list per event name and at most
//! one native listener per event name bridging document dispatch into
//! [`Element::emit`]. The listener exists exactly while the list is non-empty.

use std::rc::Rc;

use fos_dom::{invoke_native_method, DomEvent, NativeListener};

use crate::Element;

/// Argument or result passed through `emit`
#[derive(Debug, Clone)]
pub enum EventData {
    /// Native event delivered by the bridging listener
    Event(DomEvent),
    Text(String),
    Number(f64),
    Bool(bool),
    Element(Element),
}

type CallbackFn = dyn Fn(&[EventData]) -> anyhow::Result<Option<EventData>>;

/// Subscriber callback; `off` matches callbacks by identity, so keep a clone
/// of the handle passed to `on`/`once`.
#[derive(Clone)]
pub struct Callback(Rc<CallbackFn>);

impl Callback {
    pub fn new(f: impl Fn(&[EventData]) -> anyhow::Result<Option<EventData>> + 'static) -> Self {
        Self(Rc::new(f))
    }

    fn call(&self, args: &[EventData]) -> anyhow::Result<Option<EventData>> {
        (self.0)(args)
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

pub(crate) struct Subscriber {
    id: u64,
    callback: Callback,
    once: bool,
}

/// Outcome of [`Element::emit`]
#[derive(Debug, Default)]
pub struct Emission {
    value: Option<EventData>,
    errors: Vec<anyhow::Error>,
    delegated: bool,
}

impl Emission {
    /// Last non-empty value returned by a subscriber
    pub fn value(&self) -> Option<&EventData> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<EventData> {
        self.value
    }

    /// Failures of individual subscribers, in call order
    pub fn errors(&self) -> &[anyhow::Error] {
        &self.errors
    }

    /// The call went to the element's native method instead of subscribers
    pub fn is_delegated(&self) -> bool {
        self.delegated
    }
}

impl Element {
    /// Subscribe `callback` to `event`
    pub fn on(&self, event: &str, callback: &Callback) -> bool {
        self.subscribe(event, callback, false)
    }

    /// Subscribe `callback` to the next emission of `event` only
    pub fn once(&self, event: &str, callback: &Callback) -> bool {
        self.subscribe(event, callback, true)
    }

    fn subscribe(&self, event: &str, callback: &Callback, once: bool) -> bool {
        if event.is_empty() {
            return false;
        }

        let id = self.0.next_subscriber.get() + 1;
        self.0.next_subscriber.set(id);
        self.0
            .events
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Subscriber { id, callback: callback.clone(), once });

        self.attach_listener(event);
        true
    }

    /// Unsubscribe `callback`, or every subscriber when `None`.
    ///
    /// Returns `false` if `event` was never subscribed.
    pub fn off(&self, event: &str, callback: Option<&Callback>) -> bool {
        if event.is_empty() {
            return false;
        }

        let emptied = {
            let mut events = self.0.events.borrow_mut();
            let Some(list) = events.get_mut(event) else {
                return false;
            };
            match callback {
                Some(callback) => list.retain(|s| s.callback != *callback),
                None => list.clear(),
            }
            list.is_empty()
        };

        if emptied {
            self.detach_listener(event);
        }
        true
    }

    /// Emit `event` to the subscribers.
    ///
    /// Without arguments, an element with a registered listener and a native
    /// method of the same name has that method called instead, and no
    /// subscriber runs as part of this call.
    pub fn emit(&self, event: &str, args: Vec<EventData>) -> Emission {
        if event.is_empty() {
            return Emission::default();
        }

        if args.is_empty() && self.has_listener(event) {
            let native = self.0.document.borrow().has_native_method(self.node(), event);
            if native {
                invoke_native_method(&self.0.document, self.node(), event);
                return Emission { delegated: true, ..Emission::default() };
            }
        }

        if !self.0.events.borrow().contains_key(event) {
            return Emission::default();
        }

        let mut emission = Emission::default();
        let mut index = 0;
        loop {
            // No borrow is held while a callback runs; callbacks may re-enter
            let next = self
                .0
                .events
                .borrow()
                .get(event)
                .and_then(|list| list.get(index))
                .map(|s| (s.id, s.callback.clone(), s.once));
            let Some((id, callback, once)) = next else {
                break;
            };

            match callback.call(&args) {
                Ok(Some(value)) => emission.value = Some(value),
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!("subscriber of '{}' on {} failed: {:#}", event, self.node(), err);
                    emission.errors.push(err);
                }
            }

            let mut events = self.0.events.borrow_mut();
            let Some(list) = events.get_mut(event) else {
                break;
            };
            match list.iter().position(|s| s.id == id) {
                Some(pos) if once => {
                    list.remove(pos);
                    index = pos;
                }
                Some(pos) => index = pos + 1,
                // Removed by its own callback; its successor slid into `index`
                None => {}
            }
        }

        let emptied = self.0.events.borrow().get(event).is_some_and(Vec::is_empty);
        if emptied {
            self.detach_listener(event);
        }
        emission
    }

    /// Whether a bridging listener is registered for `event`
    pub fn has_listener(&self, event: &str) -> bool {
        self.0.listeners.borrow().contains_key(event)
    }

    /// Number of subscribers for `event`
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.0.events.borrow().get(event).map_or(0, Vec::len)
    }

    fn attach_listener(&self, event: &str) {
        if self.has_listener(event) {
            return;
        }

        let weak = Rc::downgrade(&self.0);
        let name = event.to_string();
        let bridge: NativeListener = Rc::new(move |native: &mut DomEvent| {
            if let Some(inner) = weak.upgrade() {
                Element(inner).emit(&name, vec![EventData::Event(native.clone())]);
            }
        });

        let registered = self.0.document.borrow_mut().add_event_listener(
            self.node(),
            event,
            self.0.config.capture,
            bridge,
        );
        match registered {
            Ok(id) => {
                self.0.listeners.borrow_mut().insert(event.to_string(), id);
            }
            Err(err) => tracing::warn!("no native listener for '{}' on {}: {}", event, self.node(), err),
        }
    }

    fn detach_listener(&self, event: &str) {
        let Some(id) = self.0.listeners.borrow_mut().remove(event) else {
            return;
        };
        self.0
            .document
            .borrow_mut()
            .remove_event_listener(self.node(), event, id, self.0.config.capture);
    }
}
