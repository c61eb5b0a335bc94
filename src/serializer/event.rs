//! Serialization events and subscribers.

use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PreSerialize,
    PostSerialize,
    PreDeserialize,
    PostDeserialize,
}

/// Data passed to subscribers. Pre-events may rewrite `data`.
#[derive(Debug)]
pub struct ObjectEvent<'a> {
    pub kind: EventKind,
    pub format: &'a str,
    pub data: &'a mut Value,
}

/// Reacts to serialization events.
pub trait EventSubscriber: Send + Sync {
    fn subscribed_events(&self) -> Vec<EventKind>;

    fn on_event(&self, event: &mut ObjectEvent<'_>);
}

/// Fans events out to subscribers in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    subscribers: Vec<(Vec<EventKind>, Arc<dyn EventSubscriber>)>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_subscriber(&mut self, subscriber: Arc<dyn EventSubscriber>) {
        let events = subscriber.subscribed_events();
        self.subscribers.push((events, subscriber));
    }

    pub fn has_listeners(&self, kind: EventKind) -> bool {
        self.subscribers
            .iter()
            .any(|(events, _)| events.contains(&kind))
    }

    pub fn dispatch(&self, kind: EventKind, format: &str, data: &mut Value) {
        let mut event = ObjectEvent { kind, format, data };
        for (events, subscriber) in &self.subscribers {
            if events.contains(&kind) {
                subscriber.on_event(&mut event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// Subscribers registered by `add_default_listeners`.
///
/// There are no built-in subscribers yet; requesting the defaults only marks
/// the listeners as configured.
pub fn default_listeners() -> Vec<Arc<dyn EventSubscriber>> {
    Vec::new()
}
