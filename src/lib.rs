//! Serializer factory: build serializers from configuration.
//!
//! A [`ConfigPath`] selects a section of the root configuration; the section's
//! keys are dispatched to [`SerializerBuilder`] calls, with service
//! identifiers resolved through a [`Lookup`].
//!
//! ```ignore
//! let container = ServiceContainer::new()
//!     .with_value("config", load_config(Path::new("serializer.toml"))?)
//!     .with_service(
//!         "naming.camel",
//!         Service::from_arc::<dyn PropertyNamingStrategy>(Arc::new(CamelCaseNamingStrategy::default())),
//!     )
//!     .with_factory("serializer", SerializerResolver::new(ConfigPath::new(["serializer"])));
//!
//! let serializer = container.get("serializer")?.get::<Serializer>();
//! ```

pub mod logger;

pub mod config;
pub mod container;
pub mod dispatch;
pub mod resolver;
pub mod serializer;

pub use config::{ConfigPath, ConfigSection, load_config};
pub use container::{Lookup, Service, ServiceContainer, ServiceFactory};
pub use dispatch::{Dispatch, Dispatcher, ResolveError, resolve};
pub use resolver::{ConfigResolver, Resolver, ResolverRegistry, SerializerResolver};
pub use serializer::{Serializer, SerializerBuilder};
