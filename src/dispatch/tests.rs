//! Dispatch tests against a builder that records every call.

use super::*;
use crate::container::{ContainerError, ServiceContainer};
use serde_json::json;
use std::sync::Arc;

// ============================================================================
// Recording builder
// ============================================================================

trait Tool: Send + Sync {
    fn name(&self) -> &str;
}

trait Handler: Send + Sync {
    fn name(&self) -> &str;
}

struct NamedTool(&'static str);

impl Tool for NamedTool {
    fn name(&self) -> &str {
        self.0
    }
}

struct NamedHandler(&'static str);

impl Handler for NamedHandler {
    fn name(&self) -> &str {
        self.0
    }
}

#[derive(Default)]
struct RecordingBuilder {
    calls: Vec<String>,
}

impl RecordingBuilder {
    fn record(&mut self, call: String) {
        self.calls.push(call);
    }
}

impl Dispatch for RecordingBuilder {
    type Artifact = Vec<String>;

    const TABLE: OperationTable<Self> = OperationTable {
        dependencies: &[
            DependencyOp {
                key: "accessorStrategy",
                expected: "Tool",
                apply: |builder: &mut RecordingBuilder, service: &Service| {
                    let Some(tool) = service.get::<dyn Tool>() else {
                        return false;
                    };
                    builder.record(format!("accessorStrategy={}", tool.name()));
                    true
                },
            },
            DependencyOp {
                key: "typeParser",
                expected: "Tool",
                apply: |builder: &mut RecordingBuilder, service: &Service| {
                    let Some(tool) = service.get::<dyn Tool>() else {
                        return false;
                    };
                    builder.record(format!("typeParser={}", tool.name()));
                    true
                },
            },
        ],
        values: &[
            ValueOp {
                key: "debug",
                apply: |builder: &mut RecordingBuilder, value: &Value| {
                    let debug = expect_bool("debug", value)?;
                    builder.record(format!("debug={debug}"));
                    Ok(())
                },
            },
            ValueOp {
                key: "cacheDir",
                apply: |builder: &mut RecordingBuilder, value: &Value| {
                    let dir = expect_str("cacheDir", value)?;
                    builder.record(format!("cacheDir={dir}"));
                    Ok(())
                },
            },
        ],
        flags: &[
            FlagOp {
                key: "addDefaultHandlers",
                apply: |builder: &mut RecordingBuilder| builder.record("addDefaultHandlers".into()),
            },
            FlagOp {
                key: "addDefaultListeners",
                apply: |builder: &mut RecordingBuilder| builder.record("addDefaultListeners".into()),
            },
        ],
        lists: &[ListOp {
            key: "handlers",
            expected: "Handler",
            accepts: |service: &Service| service.is::<dyn Handler>(),
            register: |builder: &mut RecordingBuilder, services: Vec<Service>| {
                let names: Vec<_> = services
                    .iter()
                    .filter_map(|service| service.get::<dyn Handler>())
                    .map(|handler| handler.name().to_string())
                    .collect();
                builder.record(format!("handlers[{}]", names.join(",")));
            },
        }],
        collections: &[CollectionOp {
            key: "visitors",
            expected: "Tool",
            accepts: |service: &Service| service.is::<dyn Tool>(),
            register: |builder: &mut RecordingBuilder, format: &str, service: Service| {
                if let Some(tool) = service.get::<dyn Tool>() {
                    builder.record(format!("visitors.{format}={}", tool.name()));
                }
            },
        }],
    };

    fn build(self) -> Result<Vec<String>, ResolveError> {
        Ok(self.calls)
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn container() -> ServiceContainer {
    ServiceContainer::new()
        .with_service("tool.a", Service::from_arc::<dyn Tool>(Arc::new(NamedTool("a"))))
        .with_service("tool.b", Service::from_arc::<dyn Tool>(Arc::new(NamedTool("b"))))
        .with_service("h1", Service::from_arc::<dyn Tool>(Arc::new(NamedTool("h1"))))
        .with_service("h2", Service::from_arc::<dyn Handler>(Arc::new(NamedHandler("h2"))))
}

fn run(config: Value) -> Result<Vec<String>, ResolveError> {
    resolve::<RecordingBuilder>(&config, &ConfigPath::root(), &container())
}

fn run_observed(config: Value, log: &SkipLog) -> Result<Vec<String>, ResolveError> {
    let container = container();
    Dispatcher::new(&container)
        .with_observer(log)
        .resolve::<RecordingBuilder>(&config, &ConfigPath::root())
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_empty_section_is_builder_default() {
    let default = RecordingBuilder::default().build().unwrap();
    assert_eq!(run(json!({})).unwrap(), default);
    assert_eq!(run(json!(null)).unwrap(), default);
}

#[test]
fn test_passes_follow_table_order() {
    let calls = run(json!({
        "visitors": {"json": "tool.b"},
        "handlers": ["h2"],
        "addDefaultHandlers": true,
        "cacheDir": "/tmp",
        "debug": true,
        "typeParser": "tool.a",
        "accessorStrategy": "tool.b",
    }))
    .unwrap();

    assert_eq!(
        calls,
        vec![
            "accessorStrategy=b",
            "typeParser=a",
            "debug=true",
            "cacheDir=/tmp",
            "addDefaultHandlers",
            "handlers[h2]",
            "visitors.json=b",
        ]
    );
}

#[test]
fn test_values_only() {
    let calls = run(json!({"debug": true, "cacheDir": "/tmp"})).unwrap();
    assert_eq!(calls, vec!["debug=true", "cacheDir=/tmp"]);

    let calls = run(json!({"debug": false})).unwrap();
    assert_eq!(calls, vec!["debug=false"]);
}

#[test]
fn test_flags_require_strict_true() {
    for value in [json!(false), json!(1), json!("true"), json!([true]), json!(null)] {
        let calls = run(json!({"addDefaultListeners": value})).unwrap();
        assert!(calls.is_empty(), "{value} should not trigger the flag");
    }

    let calls = run(json!({"addDefaultListeners": true})).unwrap();
    assert_eq!(calls, vec!["addDefaultListeners"]);
}

#[test]
fn test_null_counts_as_absent() {
    let calls = run(json!({
        "typeParser": null,
        "debug": null,
        "handlers": null,
        "visitors": null,
    }))
    .unwrap();
    assert!(calls.is_empty());
}

#[test]
fn test_list_skips_entries_without_capability() {
    let log = SkipLog::new();
    let calls = run_observed(json!({"handlers": ["h1", "h2"]}), &log).unwrap();
    assert_eq!(calls, vec!["handlers[h2]"]);

    let skipped = log.skipped_entries();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].key, "handlers");
    assert_eq!(skipped[0].entry, "0");
    assert_eq!(skipped[0].id, "h1");
    assert_eq!(skipped[0].expected, "Handler");
}

#[test]
fn test_present_list_always_registers() {
    assert_eq!(run(json!({"handlers": []})).unwrap(), vec!["handlers[]"]);
    assert_eq!(run(json!({"handlers": ["h1"]})).unwrap(), vec!["handlers[]"]);

    let log = SkipLog::new();
    let calls = run_observed(json!({"handlers": "h2"}), &log).unwrap();
    assert_eq!(calls, vec!["handlers[]"]);
    assert_eq!(log.malformed_keys(), vec!["handlers"]);
}

#[test]
fn test_collection_registers_per_entry_in_order() {
    let log = SkipLog::new();
    let calls = run_observed(
        json!({"visitors": {"toml": "tool.b", "xml": "h2", "json": "tool.a"}}),
        &log,
    )
    .unwrap();
    assert_eq!(calls, vec!["visitors.toml=b", "visitors.json=a"]);

    let skipped = log.skipped_entries();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].entry, "xml");
}

#[test]
fn test_malformed_collection_is_ignored() {
    let log = SkipLog::new();
    let calls = run_observed(json!({"visitors": ["tool.a"]}), &log).unwrap();
    assert!(calls.is_empty());
    assert_eq!(log.malformed_keys(), vec!["visitors"]);
}

#[test]
fn test_lookup_failure_aborts() {
    let err = run(json!({"debug": true, "typeParser": "missing"})).unwrap_err();
    match err {
        ResolveError::Lookup { key, id, source } => {
            assert_eq!(key, "typeParser");
            assert_eq!(id, "missing");
            assert!(matches!(source, ContainerError::NotFound(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_lookup_failure_inside_list() {
    let err = run(json!({"handlers": ["h2", "missing"]})).unwrap_err();
    assert!(matches!(err, ResolveError::Lookup { ref key, .. } if key == "handlers[1]"));

    let err = run(json!({"visitors": {"json": "missing"}})).unwrap_err();
    assert!(matches!(err, ResolveError::Lookup { ref key, .. } if key == "visitors.json"));
}

#[test]
fn test_dependency_errors() {
    let err = run(json!({"typeParser": 5})).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidIdentifier { ref key } if key == "typeParser"));

    let err = run(json!({"handlers": [true]})).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidIdentifier { ref key } if key == "handlers[0]"));

    let err = run(json!({"typeParser": "h2"})).unwrap_err();
    assert!(matches!(
        err,
        ResolveError::Incompatible { ref id, expected: "Tool", .. } if id == "h2"
    ));
}

#[test]
fn test_invalid_scalar_value() {
    let err = run(json!({"debug": "yes"})).unwrap_err();
    assert!(matches!(err, ResolveError::InvalidValue { key: "debug", .. }));
}

#[test]
fn test_unknown_keys_reported_to_observer() {
    let log = SkipLog::new();
    run_observed(json!({"debug": true, "debugMode": true, "extra": 1}), &log).unwrap();
    assert_eq!(log.unknown_keys(), vec!["debugMode", "extra"]);
}

#[test]
fn test_resolve_walks_path() {
    let root = json!({"serializers": [{"debug": true}, {"cacheDir": "/var"}]});
    let lookup = container();

    let path = ConfigPath::new(["serializers"]).child(1_u64);
    let calls = resolve::<RecordingBuilder>(&root, &path, &lookup).unwrap();
    assert_eq!(calls, vec!["cacheDir=/var"]);

    for missing in [
        ConfigPath::new(["serializers"]).child(5_u64),
        ConfigPath::new(["nope", "deeper"]),
        ConfigPath::new(["serializers"]),
    ] {
        let calls = resolve::<RecordingBuilder>(&root, &missing, &lookup).unwrap();
        assert!(calls.is_empty(), "`{missing}` should resolve to an empty section");
    }
}

#[test]
fn test_closure_as_lookup() {
    let lookup = |id: &str| -> Result<Service, ContainerError> {
        match id {
            "tool" => Ok(Service::from_arc::<dyn Tool>(Arc::new(NamedTool("closure")))),
            other => Err(ContainerError::NotFound(other.to_string())),
        }
    };
    let calls =
        resolve::<RecordingBuilder>(&json!({"typeParser": "tool"}), &ConfigPath::root(), &lookup)
            .unwrap();
    assert_eq!(calls, vec!["typeParser=closure"]);
}
