//! Operation tables: which config key drives which builder call.
//!
//! Tables are `const` data declared next to the builder they drive. Every
//! entry is a key plus a plain function pointer, so dispatch order is the
//! declaration order and never depends on the config document.

use super::ResolveError;
use crate::container::Service;
use serde_json::Value;

/// Value at `key` is a service id; the service is handed to a setter.
pub struct DependencyOp<B> {
    pub key: &'static str,
    /// Capability the service must provide, for error messages.
    pub expected: &'static str,
    /// Returns `false` when the service lacks the capability.
    pub apply: fn(&mut B, &Service) -> bool,
}

/// Value at `key` is passed to a setter as-is.
pub struct ValueOp<B> {
    pub key: &'static str,
    pub apply: fn(&mut B, &Value) -> Result<(), ResolveError>,
}

/// Strict `true` at `key` triggers a zero-argument operation.
pub struct FlagOp<B> {
    pub key: &'static str,
    pub apply: fn(&mut B),
}

/// Value at `key` is a list of service ids registered in one go.
pub struct ListOp<B> {
    pub key: &'static str,
    pub expected: &'static str,
    pub accepts: fn(&Service) -> bool,
    /// Receives the accepted services, in config order. Called whenever the
    /// key is present, even if nothing was accepted.
    pub register: fn(&mut B, Vec<Service>),
}

/// Value at `key` maps sub-keys to service ids; each accepted service is
/// registered under its sub-key.
pub struct CollectionOp<B> {
    pub key: &'static str,
    pub expected: &'static str,
    pub accepts: fn(&Service) -> bool,
    pub register: fn(&mut B, &str, Service),
}

/// All operations of one builder, grouped by pass.
pub struct OperationTable<B: 'static> {
    pub dependencies: &'static [DependencyOp<B>],
    pub values: &'static [ValueOp<B>],
    pub flags: &'static [FlagOp<B>],
    pub lists: &'static [ListOp<B>],
    pub collections: &'static [CollectionOp<B>],
}

impl<B: 'static> OperationTable<B> {
    /// Whether any pass reads `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().any(|known| known == key)
    }

    /// Every key in dispatch order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        let dependencies = self.dependencies.iter().map(|op| op.key);
        let values = self.values.iter().map(|op| op.key);
        let flags = self.flags.iter().map(|op| op.key);
        let lists = self.lists.iter().map(|op| op.key);
        let collections = self.collections.iter().map(|op| op.key);
        dependencies
            .chain(values)
            .chain(flags)
            .chain(lists)
            .chain(collections)
    }
}

// ============================================================================
// Value helpers for ValueOp implementations
// ============================================================================

/// Read a boolean setting.
pub fn expect_bool(key: &'static str, value: &Value) -> Result<bool, ResolveError> {
    value.as_bool().ok_or(ResolveError::InvalidValue {
        key,
        expected: "a boolean",
    })
}

/// Read a string setting.
pub fn expect_str<'v>(key: &'static str, value: &'v Value) -> Result<&'v str, ResolveError> {
    value.as_str().ok_or(ResolveError::InvalidValue {
        key,
        expected: "a string",
    })
}

/// Read a mapping of string values, keeping document order.
pub fn expect_str_map(
    key: &'static str,
    value: &Value,
) -> Result<Vec<(String, String)>, ResolveError> {
    let invalid = ResolveError::InvalidValue {
        key,
        expected: "a mapping of strings",
    };
    let Some(map) = value.as_object() else {
        return Err(invalid);
    };
    map.iter()
        .map(|(name, entry)| match entry.as_str() {
            Some(entry) => Ok((name.clone(), entry.to_string())),
            None => Err(ResolveError::InvalidValue {
                key,
                expected: "a mapping of strings",
            }),
        })
        .collect()
}
