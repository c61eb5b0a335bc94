//! Service lookup.
//!
//! | Module    | Purpose                                         |
//! |-----------|-------------------------------------------------|
//! | `error`   | `ContainerError`                                |
//! | `service` | `Service` handles and capability downcasts      |
//! | `store`   | `ServiceContainer` and `ServiceFactory`         |
//!
//! The dispatcher only ever needs [`Lookup`]: "give me the object registered
//! under this identifier". Any closure with the right signature is a lookup,
//! so callers are not tied to [`ServiceContainer`].

mod error;
mod service;
mod store;

pub use error::ContainerError;
pub use service::Service;
pub use store::{ServiceContainer, ServiceFactory};

/// Resolve an identifier into a service.
pub trait Lookup {
    fn get(&self, id: &str) -> Result<Service, ContainerError>;
}

impl<F> Lookup for F
where
    F: Fn(&str) -> Result<Service, ContainerError>,
{
    fn get(&self, id: &str) -> Result<Service, ContainerError> {
        self(id)
    }
}
