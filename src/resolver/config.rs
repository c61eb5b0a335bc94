//! Resolve a section of the root configuration.

use super::Resolver;
use crate::config::{ConfigPath, ConfigSection};
use crate::container::{Lookup, Service};
use crate::dispatch::ResolveError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Identifier the root configuration is registered under unless a resolver
/// says otherwise.
pub const DEFAULT_CONFIG_ALIAS: &str = "config";

/// Resolves to the config value at `keys`, as a `serde_json::Value`.
///
/// A missing path resolves to an empty object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigResolver {
    pub keys: ConfigPath,
    #[serde(default = "default_alias")]
    pub config_alias: String,
}

impl ConfigResolver {
    pub fn new(keys: ConfigPath) -> Self {
        Self {
            keys,
            config_alias: DEFAULT_CONFIG_ALIAS.to_string(),
        }
    }

    /// Read the root configuration from `alias` instead of `config`.
    pub fn with_config_alias(mut self, alias: impl Into<String>) -> Self {
        self.config_alias = alias.into();
        self
    }

    pub fn section(&self, lookup: &dyn Lookup) -> Result<ConfigSection, ResolveError> {
        let root = root_config(lookup, &self.config_alias)?;
        Ok(self.keys.section(&root))
    }
}

impl Resolver for ConfigResolver {
    fn resolve(&self, lookup: &dyn Lookup) -> Result<Service, ResolveError> {
        Ok(Service::new(self.section(lookup)?.into_value()))
    }
}

pub(super) fn default_alias() -> String {
    DEFAULT_CONFIG_ALIAS.to_string()
}

/// Fetch the root configuration registered under `alias`.
pub(super) fn root_config(lookup: &dyn Lookup, alias: &str) -> Result<Arc<Value>, ResolveError> {
    let service = lookup.get(alias).map_err(|source| ResolveError::Lookup {
        key: alias.to_string(),
        id: alias.to_string(),
        source,
    })?;
    service.get::<Value>().ok_or_else(|| ResolveError::Incompatible {
        key: alias.to_string(),
        id: alias.to_string(),
        expected: "a configuration value",
    })
}
