//! Config-to-builder dispatch.
//!
//! Given a config section, a fresh builder and a [`Lookup`], dispatch runs
//! the builder's [`OperationTable`] pass by pass:
//!
//! | Pass         | Config value                 | Builder call                       |
//! |--------------|------------------------------|------------------------------------|
//! | dependencies | service id                   | setter with the looked-up service  |
//! | values       | any                          | setter with the raw value          |
//! | flags        | `true`                       | zero-argument operation            |
//! | lists        | `[id, ...]`                  | one registration with all accepted |
//! | collections  | `{ sub-key: id, ... }`       | one registration per accepted      |
//!
//! Missing keys (or `null`) leave the builder default in place. Entries whose
//! service lacks the capability of a list or collection are dropped without a
//! trace unless a [`DispatchObserver`] is installed. The first lookup failure
//! aborts the whole resolution.

mod error;
mod observer;
mod table;

#[cfg(test)]
mod tests;

pub use error::ResolveError;
pub use observer::{DispatchObserver, SkipLog, SkippedEntry};
pub use table::{
    CollectionOp, DependencyOp, FlagOp, ListOp, OperationTable, ValueOp, expect_bool, expect_str,
    expect_str_map,
};

use crate::config::{ConfigPath, ConfigSection};
use crate::container::{Lookup, Service};
use serde_json::Value;

// ============================================================================
// Dispatch trait
// ============================================================================

/// A builder that can be driven from configuration.
pub trait Dispatch: Default + 'static {
    type Artifact;

    /// Operations in dispatch order.
    const TABLE: OperationTable<Self>;

    /// Terminal operation, run after every pass.
    fn build(self) -> Result<Self::Artifact, ResolveError>;
}

/// Resolve `path` inside `root` and build `B` from it.
pub fn resolve<B: Dispatch>(
    root: &Value,
    path: &ConfigPath,
    lookup: &dyn Lookup,
) -> Result<B::Artifact, ResolveError> {
    Dispatcher::new(lookup).resolve::<B>(root, path)
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Runs operation tables against config sections.
pub struct Dispatcher<'a> {
    lookup: &'a dyn Lookup,
    observer: Option<&'a dyn DispatchObserver>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(lookup: &'a dyn Lookup) -> Self {
        Self {
            lookup,
            observer: None,
        }
    }

    /// Report skipped entries and unknown keys to `observer`.
    pub fn with_observer(mut self, observer: &'a dyn DispatchObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn resolve<B: Dispatch>(
        &self,
        root: &Value,
        path: &ConfigPath,
    ) -> Result<B::Artifact, ResolveError> {
        let section = ConfigSection::from_root(root, path);
        crate::debug!("dispatch"; "section `{}` has {} keys", path, section.as_map().len());
        self.dispatch::<B>(&section)
    }

    /// Run every pass of `B`'s table over `section`, then build.
    pub fn dispatch<B: Dispatch>(
        &self,
        section: &ConfigSection,
    ) -> Result<B::Artifact, ResolveError> {
        let table = &B::TABLE;
        let mut builder = B::default();

        self.report_unknown_keys(table, section);
        self.apply_dependencies(table, section, &mut builder)?;
        apply_values(table, section, &mut builder)?;
        apply_flags(table, section, &mut builder);
        self.apply_lists(table, section, &mut builder)?;
        self.apply_collections(table, section, &mut builder)?;

        builder.build()
    }

    fn report_unknown_keys<B: Dispatch>(&self, table: &OperationTable<B>, section: &ConfigSection) {
        let Some(observer) = self.observer else {
            return;
        };
        for key in section.keys().filter(|key| !table.contains_key(key)) {
            observer.unknown_key(key);
        }
    }

    fn apply_dependencies<B: Dispatch>(
        &self,
        table: &OperationTable<B>,
        section: &ConfigSection,
        builder: &mut B,
    ) -> Result<(), ResolveError> {
        for op in table.dependencies {
            let Some(value) = section.get(op.key) else {
                continue;
            };
            let id = identifier(op.key, value)?;
            let service = self.fetch(op.key, id)?;
            if !(op.apply)(builder, &service) {
                return Err(ResolveError::Incompatible {
                    key: op.key.to_string(),
                    id: id.to_string(),
                    expected: op.expected,
                });
            }
            crate::debug!("dispatch"; "{} <- `{}`", op.key, id);
        }
        Ok(())
    }

    fn apply_lists<B: Dispatch>(
        &self,
        table: &OperationTable<B>,
        section: &ConfigSection,
        builder: &mut B,
    ) -> Result<(), ResolveError> {
        for op in table.lists {
            let Some(value) = section.get(op.key) else {
                continue;
            };
            let entries = match value.as_array() {
                Some(entries) => entries.as_slice(),
                None => {
                    self.report_malformed(op.key, "a list of service identifiers");
                    &[]
                }
            };

            let mut accepted = Vec::with_capacity(entries.len());
            for (index, entry) in entries.iter().enumerate() {
                let key = format!("{}[{index}]", op.key);
                let id = identifier(&key, entry)?;
                let service = self.fetch(&key, id)?;
                if (op.accepts)(&service) {
                    accepted.push(service);
                } else {
                    self.report_skipped(op.key, index.to_string(), id, op.expected, &service);
                }
            }

            crate::debug!("dispatch"; "{} <- {} of {} entries", op.key, accepted.len(), entries.len());
            (op.register)(builder, accepted);
        }
        Ok(())
    }

    fn apply_collections<B: Dispatch>(
        &self,
        table: &OperationTable<B>,
        section: &ConfigSection,
        builder: &mut B,
    ) -> Result<(), ResolveError> {
        for op in table.collections {
            let Some(value) = section.get(op.key) else {
                continue;
            };
            let Some(entries) = value.as_object() else {
                self.report_malformed(op.key, "a mapping of service identifiers");
                continue;
            };

            for (name, entry) in entries {
                let key = format!("{}.{name}", op.key);
                let id = identifier(&key, entry)?;
                let service = self.fetch(&key, id)?;
                if (op.accepts)(&service) {
                    crate::debug!("dispatch"; "{} <- `{}`", key, id);
                    (op.register)(builder, name, service);
                } else {
                    self.report_skipped(op.key, name.clone(), id, op.expected, &service);
                }
            }
        }
        Ok(())
    }

    fn fetch(&self, key: &str, id: &str) -> Result<Service, ResolveError> {
        self.lookup.get(id).map_err(|source| ResolveError::Lookup {
            key: key.to_string(),
            id: id.to_string(),
            source,
        })
    }

    fn report_skipped(
        &self,
        key: &'static str,
        entry: String,
        id: &str,
        expected: &'static str,
        service: &Service,
    ) {
        if let Some(observer) = self.observer {
            observer.skipped(&SkippedEntry {
                key,
                entry,
                id: id.to_string(),
                expected,
                found: service.type_name(),
            });
        }
    }

    fn report_malformed(&self, key: &'static str, expected: &'static str) {
        if let Some(observer) = self.observer {
            observer.malformed(key, expected);
        }
    }
}

fn apply_values<B: Dispatch>(
    table: &OperationTable<B>,
    section: &ConfigSection,
    builder: &mut B,
) -> Result<(), ResolveError> {
    for op in table.values {
        if let Some(value) = section.get(op.key) {
            (op.apply)(builder, value)?;
            crate::debug!("dispatch"; "{} <- {}", op.key, value);
        }
    }
    Ok(())
}

fn apply_flags<B: Dispatch>(table: &OperationTable<B>, section: &ConfigSection, builder: &mut B) {
    for op in table.flags {
        if section.get(op.key) == Some(&Value::Bool(true)) {
            (op.apply)(builder);
            crate::debug!("dispatch"; "{} applied", op.key);
        }
    }
}

/// Service ids must be strings.
fn identifier<'v>(key: &str, value: &'v Value) -> Result<&'v str, ResolveError> {
    value.as_str().ok_or_else(|| ResolveError::InvalidIdentifier {
        key: key.to_string(),
    })
}
