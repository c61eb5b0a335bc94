//! Type-erased service handles.
//!
//! A [`Service`] carries one or more *views* of the same object. Each view is
//! an `Arc<T>` where `T` may be a trait object, so a capability check is a
//! plain downcast:
//!
//! ```ignore
//! let handler: Arc<dyn SubscribingHandler> = Arc::new(DateHandler);
//! let service = Service::from_arc(handler);
//!
//! assert!(service.get::<dyn SubscribingHandler>().is_some());
//! assert!(service.get::<dyn EventSubscriber>().is_none());
//! ```

use std::{
    any::{Any, type_name},
    fmt,
    sync::Arc,
};

type View = Arc<dyn Any + Send + Sync>;

/// Cloneable handle to an object held by a container.
#[derive(Clone)]
pub struct Service {
    views: Vec<View>,
    type_name: &'static str,
}

impl Service {
    /// Wrap a concrete value; it can be retrieved as `T` only.
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wrap a shared object, typically an `Arc<dyn Trait>`.
    pub fn from_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Self {
            views: vec![Arc::new(value) as View],
            type_name: type_name::<T>(),
        }
    }

    /// Expose one more view of the same object.
    ///
    /// Used when an object implements several capabilities, e.g. a visitor
    /// factory that handles both directions of a format.
    pub fn with_view<T: ?Sized + Send + Sync + 'static>(mut self, value: Arc<T>) -> Self {
        self.views.push(Arc::new(value) as View);
        self
    }

    /// Downcast to a view of type `T`, if the service provides one.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.views
            .iter()
            .find_map(|view| view.downcast_ref::<Arc<T>>())
            .cloned()
    }

    pub fn is<T: ?Sized + Send + Sync + 'static>(&self) -> bool {
        self.views.iter().any(|view| view.is::<Arc<T>>())
    }

    /// Name of the type the service was created from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("type_name", &self.type_name)
            .field("views", &self.views.len())
            .finish()
    }
}
