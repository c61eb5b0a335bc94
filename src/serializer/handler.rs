//! Subscribing handlers and their registry.

use rustc_hash::FxHashMap;
use std::{fmt, sync::Arc};

/// Which way data flows through the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Serialization,
    Deserialization,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialization => f.write_str("serialization"),
            Self::Deserialization => f.write_str("deserialization"),
        }
    }
}

/// A (direction, type, format) slot a handler subscribes to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerMethod {
    pub direction: Direction,
    pub type_name: String,
    pub format: String,
}

impl HandlerMethod {
    pub fn new(direction: Direction, type_name: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            direction,
            type_name: type_name.into(),
            format: format.into(),
        }
    }
}

/// Custom (de)serialization logic for specific types.
///
/// The reference [`Serializer`](super::Serializer) only records handlers in
/// its [`HandlerRegistry`]; encoding and decoding go through serde and never
/// call them. Callers look handlers up with [`HandlerRegistry::get_handler`].
pub trait SubscribingHandler: Send + Sync {
    fn subscribing_methods(&self) -> Vec<HandlerMethod>;
}

/// Handlers indexed by the slots they subscribe to.
///
/// A later registration for the same slot replaces the earlier one.
#[derive(Default)]
pub struct HandlerRegistry {
    slots: FxHashMap<HandlerMethod, Arc<dyn SubscribingHandler>>,
    registered: Vec<Arc<dyn SubscribingHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_subscribing_handler(&mut self, handler: Arc<dyn SubscribingHandler>) {
        for method in handler.subscribing_methods() {
            self.slots.insert(method, Arc::clone(&handler));
        }
        self.registered.push(handler);
    }

    pub fn get_handler(
        &self,
        direction: Direction,
        type_name: &str,
        format: &str,
    ) -> Option<Arc<dyn SubscribingHandler>> {
        self.slots
            .get(&HandlerMethod::new(direction, type_name, format))
            .cloned()
    }

    /// Handlers in registration order.
    pub fn handlers(&self) -> &[Arc<dyn SubscribingHandler>] {
        &self.registered
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }
}

// ============================================================================
// Default handlers
// ============================================================================

/// Date/time values in every built-in format.
#[derive(Debug, Default)]
pub struct DateTimeHandler;

impl SubscribingHandler for DateTimeHandler {
    fn subscribing_methods(&self) -> Vec<HandlerMethod> {
        let mut methods = Vec::new();
        for format in ["json", "toml"] {
            for direction in [Direction::Serialization, Direction::Deserialization] {
                methods.push(HandlerMethod::new(direction, "DateTime", format));
            }
        }
        methods
    }
}

/// Handlers registered by `add_default_handlers`.
pub fn default_handlers() -> Vec<Arc<dyn SubscribingHandler>> {
    vec![Arc::new(DateTimeHandler)]
}
