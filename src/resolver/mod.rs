//! Resolvers: turn a lookup into a service.
//!
//! | Resolver             | Produces                                  |
//! |----------------------|-------------------------------------------|
//! | `ConfigResolver`     | The config value at a path                |
//! | `SerializerResolver` | A `Serializer` built from the config      |
//!
//! Wiring code picks resolvers by name through a [`ResolverRegistry`].

mod config;
mod serializer;

pub use config::{ConfigResolver, DEFAULT_CONFIG_ALIAS};
pub use serializer::SerializerResolver;

use crate::container::{Lookup, Service};
use crate::dispatch::ResolveError;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Produces a service from whatever `lookup` provides.
pub trait Resolver: Send + Sync {
    fn resolve(&self, lookup: &dyn Lookup) -> Result<Service, ResolveError>;
}

// ============================================================================
// ResolverRegistry
// ============================================================================

/// Resolvers by name, filled in during wiring.
#[derive(Default, Clone)]
pub struct ResolverRegistry {
    resolvers: FxHashMap<String, Arc<dyn Resolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `resolver` under `name`, replacing any earlier one.
    pub fn register(&mut self, name: impl Into<String>, resolver: Arc<dyn Resolver>) {
        self.resolvers.insert(name.into(), resolver);
    }

    pub fn with(mut self, name: impl Into<String>, resolver: impl Resolver + 'static) -> Self {
        self.register(name, Arc::new(resolver));
        self
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn Resolver>, ResolveError> {
        self.resolvers
            .get(name)
            .ok_or_else(|| ResolveError::Unregistered(name.to_string()))
    }

    /// Run the resolver registered under `name`.
    pub fn resolve(&self, name: &str, lookup: &dyn Lookup) -> Result<Service, ResolveError> {
        self.get(name)?.resolve(lookup)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
