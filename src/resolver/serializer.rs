//! Build a [`Serializer`] from a section of the root configuration.

use super::Resolver;
use super::config::{DEFAULT_CONFIG_ALIAS, default_alias, root_config};
use crate::config::ConfigPath;
use crate::container::{ContainerError, Lookup, Service, ServiceFactory};
use crate::dispatch::{DispatchObserver, Dispatcher, ResolveError};
use crate::serializer::{Serializer, SerializerBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Resolves the section at `keys` into a [`Serializer`].
///
/// Also a [`ServiceFactory`], so it can be registered directly:
///
/// ```ignore
/// let container = ServiceContainer::new()
///     .with_value("config", config)
///     .with_factory("serializer.api", SerializerResolver::new(path));
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct SerializerResolver {
    pub keys: ConfigPath,
    #[serde(default = "default_alias")]
    pub config_alias: String,
    #[serde(skip)]
    observer: Option<Arc<dyn DispatchObserver + Send + Sync>>,
}

impl SerializerResolver {
    pub fn new(keys: ConfigPath) -> Self {
        Self {
            keys,
            config_alias: DEFAULT_CONFIG_ALIAS.to_string(),
            observer: None,
        }
    }

    pub fn with_config_alias(mut self, alias: impl Into<String>) -> Self {
        self.config_alias = alias.into();
        self
    }

    /// Report skipped entries and unknown keys of every resolution.
    pub fn with_observer(mut self, observer: Arc<dyn DispatchObserver + Send + Sync>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn resolve_serializer(&self, lookup: &dyn Lookup) -> Result<Serializer, ResolveError> {
        let root = root_config(lookup, &self.config_alias)?;

        let mut dispatcher = Dispatcher::new(lookup);
        if let Some(observer) = &self.observer {
            dispatcher = dispatcher.with_observer(observer.as_ref());
        }
        let serializer = dispatcher.resolve::<SerializerBuilder>(&root, &self.keys)?;

        crate::debug!("resolve"; "serializer built from `{}`", self.keys);
        Ok(serializer)
    }
}

impl Resolver for SerializerResolver {
    fn resolve(&self, lookup: &dyn Lookup) -> Result<Service, ResolveError> {
        self.resolve_serializer(lookup).map(Service::new)
    }
}

impl ServiceFactory for SerializerResolver {
    fn create(&self, lookup: &dyn Lookup, id: &str) -> anyhow::Result<Service> {
        match self.resolve_serializer(lookup) {
            Ok(serializer) => Ok(Service::new(serializer)),
            // Let the container report the cycle itself.
            Err(ResolveError::Lookup {
                source: cycle @ ContainerError::CircularDependency(_),
                ..
            }) => Err(cycle.into()),
            Err(err) => {
                crate::debug!("resolve"; "serializer `{}` failed: {}", id, err);
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ServiceContainer;
    use crate::dispatch::SkipLog;
    use serde_json::json;

    #[test]
    fn test_resolve_from_container() {
        let container = ServiceContainer::new().with_value(
            "config",
            json!({"serializers": {"default": {"debug": true}}}),
        );
        let resolver = SerializerResolver::new(ConfigPath::new(["serializers", "default"]));

        let serializer = resolver.resolve_serializer(&container).unwrap();
        assert!(serializer.is_debug());
    }

    #[test]
    fn test_registered_as_factory() {
        let container = ServiceContainer::new()
            .with_value("app.config", json!({"debug": true}))
            .with_factory(
                "serializer",
                SerializerResolver::new(ConfigPath::root()).with_config_alias("app.config"),
            );

        let service = container.get("serializer").unwrap();
        let again = container.get("serializer").unwrap();
        let (first, second) = (
            service.get::<Serializer>().unwrap(),
            again.get::<Serializer>().unwrap(),
        );
        assert!(first.is_debug());
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_factory_cycle_is_reported() {
        // The serializer's own id doubles as its type parser.
        let container = ServiceContainer::new()
            .with_value("config", json!({"typeParser": "serializer"}))
            .with_factory("serializer", SerializerResolver::new(ConfigPath::root()));

        let err = container.get("serializer").unwrap_err();
        assert!(matches!(err, ContainerError::CircularDependency(_)));
    }

    #[test]
    fn test_factory_wraps_resolution_errors() {
        let container = ServiceContainer::new()
            .with_value("config", json!({"typeParser": "missing"}))
            .with_factory("serializer", SerializerResolver::new(ConfigPath::root()));

        let err = container.get("serializer").unwrap_err();
        let ContainerError::Factory { id, source } = err else {
            panic!("expected a factory error");
        };
        assert_eq!(id, "serializer");

        let cause = source.downcast_ref::<ResolveError>().unwrap();
        assert!(matches!(cause, ResolveError::Lookup { key, id, .. } if key == "typeParser" && id == "missing"));
    }

    #[test]
    fn test_observer_sees_unknown_keys() {
        let log = Arc::new(SkipLog::new());
        let container = ServiceContainer::new().with_value("config", json!({"debugg": true}));
        let resolver = SerializerResolver::new(ConfigPath::root()).with_observer(log.clone());

        resolver.resolve_serializer(&container).unwrap();
        assert_eq!(log.unknown_keys(), vec!["debugg".to_string()]);
    }

    #[test]
    fn test_serde_keeps_keys_and_alias() {
        let resolver = SerializerResolver::new(ConfigPath::new(["a", "b"])).with_config_alias("cfg");
        let encoded = serde_json::to_value(&resolver).unwrap();
        assert_eq!(encoded, json!({"keys": ["a", "b"], "config_alias": "cfg"}));

        let decoded: SerializerResolver = serde_json::from_value(json!({"keys": ["a"]})).unwrap();
        assert_eq!(decoded.config_alias, "config");
        assert_eq!(decoded.keys, ConfigPath::new(["a"]));
    }
}
