//! Map-backed service container.
//!
//! Services are either registered up front or produced on first request by a
//! [`ServiceFactory`]. Factory results are shared: the second request for the
//! same id returns the cached service.

use super::{ContainerError, Lookup, Service};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

// ============================================================================
// ServiceFactory
// ============================================================================

/// Produces a service on demand.
///
/// The factory receives a [`Lookup`] scoped to the current resolution chain,
/// so nested lookups take part in cycle detection.
pub trait ServiceFactory: Send + Sync {
    fn create(&self, lookup: &dyn Lookup, id: &str) -> anyhow::Result<Service>;
}

impl<F> ServiceFactory for F
where
    F: Fn(&dyn Lookup, &str) -> anyhow::Result<Service> + Send + Sync,
{
    fn create(&self, lookup: &dyn Lookup, id: &str) -> anyhow::Result<Service> {
        self(lookup, id)
    }
}

// ============================================================================
// ServiceContainer
// ============================================================================

#[derive(Default)]
pub struct ServiceContainer {
    services: FxHashMap<String, Service>,
    factories: FxHashMap<String, Arc<dyn ServiceFactory>>,
    aliases: FxHashMap<String, String>,
    /// Services created by factories so far.
    shared: Mutex<FxHashMap<String, Service>>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready-made service.
    pub fn with_service(mut self, id: impl Into<String>, service: Service) -> Self {
        self.services.insert(id.into(), service);
        self
    }

    /// Register a concrete value, retrievable as `T`.
    pub fn with_value<T: Send + Sync + 'static>(self, id: impl Into<String>, value: T) -> Self {
        self.with_service(id, Service::new(value))
    }

    /// Register a factory invoked on first lookup of `id`.
    pub fn with_factory(
        mut self,
        id: impl Into<String>,
        factory: impl ServiceFactory + 'static,
    ) -> Self {
        self.factories.insert(id.into(), Arc::new(factory));
        self
    }

    /// Make `alias` resolve to whatever `target` resolves to.
    pub fn with_alias(mut self, alias: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    /// Whether `id` can be looked up (without running any factory).
    pub fn has(&self, id: &str) -> bool {
        let id = self.canonical(id);
        self.services.contains_key(id) || self.factories.contains_key(id)
    }

    fn canonical<'a>(&'a self, id: &'a str) -> &'a str {
        let mut current = id;
        // Alias chains are short; the bound stops alias loops.
        for _ in 0..=self.aliases.len() {
            match self.aliases.get(current) {
                Some(target) => current = target,
                None => break,
            }
        }
        current
    }

    fn resolve(&self, id: &str, chain: &[String]) -> Result<Service, ContainerError> {
        let id = self.canonical(id);

        if let Some(service) = self.services.get(id) {
            return Ok(service.clone());
        }
        let Some(factory) = self.factories.get(id) else {
            return Err(ContainerError::NotFound(id.to_string()));
        };
        if chain.iter().any(|entry| entry == id) {
            return Err(ContainerError::CircularDependency(id.to_string()));
        }
        if let Some(service) = self.shared.lock().get(id) {
            return Ok(service.clone());
        }

        crate::debug!("container"; "creating `{}`", id);
        let scope = Scope {
            container: self,
            chain: chain.iter().cloned().chain([id.to_string()]).collect(),
        };
        // Lock is not held while the factory runs: it may look up other services.
        let service = factory.create(&scope, id).map_err(|err| factory_error(id, err))?;

        let mut shared = self.shared.lock();
        Ok(shared.entry(id.to_string()).or_insert(service).clone())
    }
}

impl Lookup for ServiceContainer {
    fn get(&self, id: &str) -> Result<Service, ContainerError> {
        self.resolve(id, &[])
    }
}

/// Keep cycle reports intact; wrap everything else.
fn factory_error(id: &str, err: anyhow::Error) -> ContainerError {
    match err.downcast::<ContainerError>() {
        Ok(cycle @ ContainerError::CircularDependency(_)) => cycle,
        Ok(other) => ContainerError::Factory {
            id: id.to_string(),
            source: other.into(),
        },
        Err(err) => ContainerError::Factory {
            id: id.to_string(),
            source: err,
        },
    }
}

/// Lookup handed to factories; remembers which ids are being created.
struct Scope<'a> {
    container: &'a ServiceContainer,
    chain: Vec<String>,
}

impl Lookup for Scope<'_> {
    fn get(&self, id: &str) -> Result<Service, ContainerError> {
        self.container.resolve(id, &self.chain)
    }
}

// ============================================================================
// tests
// ============================================================================
