//! Reference serializer driven by the config dispatcher.
//!
//! # Module Structure
//!
//! | Module         | Purpose                                           |
//! |----------------|---------------------------------------------------|
//! | `builder`      | `SerializerBuilder` setters and defaults          |
//! | `collaborator` | Capability traits and naming strategies           |
//! | `event`        | Pre/post (de)serialization events                 |
//! | `handler`      | Subscribing handlers and their registry           |
//! | `naming`       | Naming strategy applied on output and input       |
//! | `visitor`      | Format visitors (`json`, `toml`)                  |
//! | `table`        | Config keys mapped to builder calls               |
//!
//! A [`Serializer`] works on the `serde_json::Value` data model: values are
//! converted, run through the naming strategy and events, then encoded by the
//! visitor registered for the requested format. Decoding maps serialized
//! names back onto struct fields, so the default builder reads what it writes.

mod builder;
mod collaborator;
mod error;
mod event;
mod handler;
mod naming;
mod table;
mod visitor;

pub use builder::SerializerBuilder;
pub use collaborator::{
    AccessorStrategy, AnnotationReader, CamelCaseNamingStrategy, DeserializationContextFactory,
    ExpressionEvaluator, IdenticalNamingStrategy, MetadataCache, MetadataDriverFactory,
    ObjectConstructor, PropertyNamingStrategy, SerializationContextFactory, TypeParser,
};
pub use error::{BuilderError, SerializeError};
pub use event::{EventDispatcher, EventKind, EventSubscriber, ObjectEvent};
pub use handler::{DateTimeHandler, Direction, HandlerMethod, HandlerRegistry, SubscribingHandler};
pub use visitor::{
    DeserializationVisitorFactory, JsonVisitor, SerializationVisitorFactory, TomlVisitor,
};

use crate::config::key;
use builder::Visitors;
use naming::{Renamed, rename_keys};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{fmt, path::PathBuf, sync::Arc};

/// Everything the builder collected besides handlers, listeners and visitors.
struct Settings {
    accessor_strategy: Option<Arc<dyn AccessorStrategy>>,
    expression_evaluator: Option<Arc<dyn ExpressionEvaluator>>,
    type_parser: Option<Arc<dyn TypeParser>>,
    annotation_reader: Option<Arc<dyn AnnotationReader>>,
    object_constructor: Option<Arc<dyn ObjectConstructor>>,
    property_naming_strategy: Option<Arc<dyn PropertyNamingStrategy>>,
    metadata_driver_factory: Option<Arc<dyn MetadataDriverFactory>>,
    serialization_context_factory: Option<Arc<dyn SerializationContextFactory>>,
    deserialization_context_factory: Option<Arc<dyn DeserializationContextFactory>>,
    metadata_cache: Option<Arc<dyn MetadataCache>>,
    debug: bool,
    cache_dir: Option<PathBuf>,
    include_interface_metadata: bool,
    metadata_dirs: Vec<(String, PathBuf)>,
    docblock_type_resolver: bool,
}

impl Settings {
    /// Config keys of the collaborators that were set explicitly.
    fn collaborators(&self) -> Vec<&'static str> {
        [
            (key::ACCESSOR_STRATEGY, self.accessor_strategy.is_some()),
            (key::EXPRESSION_EVALUATOR, self.expression_evaluator.is_some()),
            (key::TYPE_PARSER, self.type_parser.is_some()),
            (key::ANNOTATION_READER, self.annotation_reader.is_some()),
            (key::OBJECT_CONSTRUCTOR, self.object_constructor.is_some()),
            (key::PROPERTY_NAMING_STRATEGY, self.property_naming_strategy.is_some()),
            (key::METADATA_DRIVER_FACTORY, self.metadata_driver_factory.is_some()),
            (
                key::SERIALIZATION_CONTEXT_FACTORY,
                self.serialization_context_factory.is_some(),
            ),
            (
                key::DESERIALIZATION_CONTEXT_FACTORY,
                self.deserialization_context_factory.is_some(),
            ),
            (key::METADATA_CACHE, self.metadata_cache.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, set)| set.then_some(key))
        .collect()
    }
}

// ============================================================================
// Serializer
// ============================================================================

/// A configured serializer. Immutable once built.
pub struct Serializer {
    naming: Arc<dyn PropertyNamingStrategy>,
    handlers: HandlerRegistry,
    listeners: EventDispatcher,
    serialization_visitors: Visitors<dyn SerializationVisitorFactory>,
    deserialization_visitors: Visitors<dyn DeserializationVisitorFactory>,
    settings: Settings,
}

impl Serializer {
    /// Encode `data` as `format`.
    ///
    /// Object keys are renamed with the naming strategy before the
    /// `PostSerialize` event fires.
    pub fn serialize<T: Serialize + ?Sized>(
        &self,
        data: &T,
        format: &str,
    ) -> Result<String, SerializeError> {
        let visitor = find_visitor(&self.serialization_visitors, Direction::Serialization, format)?;

        let mut value = serde_json::to_value(data)?;
        self.listeners.dispatch(EventKind::PreSerialize, format, &mut value);
        let mut value = rename_keys(value, self.naming.as_ref());
        self.listeners.dispatch(EventKind::PostSerialize, format, &mut value);

        visitor.serialize(&value)
    }

    /// Decode `input`, read as `format`, into `T`.
    ///
    /// Struct fields are matched by their translated names once the
    /// `PostDeserialize` event has run.
    pub fn deserialize<T: DeserializeOwned>(
        &self,
        input: &str,
        format: &str,
    ) -> Result<T, SerializeError> {
        let visitor =
            find_visitor(&self.deserialization_visitors, Direction::Deserialization, format)?;

        let mut value = visitor.deserialize(input)?;
        self.listeners.dispatch(EventKind::PreDeserialize, format, &mut value);
        self.listeners.dispatch(EventKind::PostDeserialize, format, &mut value);

        Ok(T::deserialize(Renamed::new(value, self.naming.as_ref()))?)
    }

    /// Registered subscribing handlers.
    ///
    /// The serializer records them for callers to look up; `serialize` and
    /// `deserialize` never consult the registry.
    pub fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    pub fn listeners(&self) -> &EventDispatcher {
        &self.listeners
    }

    pub fn naming_strategy(&self) -> &Arc<dyn PropertyNamingStrategy> {
        &self.naming
    }

    pub fn accessor_strategy(&self) -> Option<&Arc<dyn AccessorStrategy>> {
        self.settings.accessor_strategy.as_ref()
    }

    pub fn expression_evaluator(&self) -> Option<&Arc<dyn ExpressionEvaluator>> {
        self.settings.expression_evaluator.as_ref()
    }

    pub fn type_parser(&self) -> Option<&Arc<dyn TypeParser>> {
        self.settings.type_parser.as_ref()
    }

    pub fn annotation_reader(&self) -> Option<&Arc<dyn AnnotationReader>> {
        self.settings.annotation_reader.as_ref()
    }

    pub fn object_constructor(&self) -> Option<&Arc<dyn ObjectConstructor>> {
        self.settings.object_constructor.as_ref()
    }

    pub fn metadata_driver_factory(&self) -> Option<&Arc<dyn MetadataDriverFactory>> {
        self.settings.metadata_driver_factory.as_ref()
    }

    pub fn serialization_context_factory(&self) -> Option<&Arc<dyn SerializationContextFactory>> {
        self.settings.serialization_context_factory.as_ref()
    }

    pub fn deserialization_context_factory(
        &self,
    ) -> Option<&Arc<dyn DeserializationContextFactory>> {
        self.settings.deserialization_context_factory.as_ref()
    }

    pub fn metadata_cache(&self) -> Option<&Arc<dyn MetadataCache>> {
        self.settings.metadata_cache.as_ref()
    }

    pub fn is_debug(&self) -> bool {
        self.settings.debug
    }

    pub fn cache_dir(&self) -> Option<&PathBuf> {
        self.settings.cache_dir.as_ref()
    }

    pub fn metadata_dirs(&self) -> &[(String, PathBuf)] {
        &self.settings.metadata_dirs
    }

    /// Comparable snapshot of the configuration.
    pub fn summary(&self) -> SerializerSummary {
        let settings = &self.settings;
        SerializerSummary {
            debug: settings.debug,
            cache_dir: settings.cache_dir.clone(),
            include_interface_metadata: settings.include_interface_metadata,
            metadata_dirs: settings.metadata_dirs.clone(),
            docblock_type_resolver: settings.docblock_type_resolver,
            collaborators: settings.collaborators(),
            handlers: self.handlers.len(),
            listeners: self.listeners.len(),
            serialization_formats: formats(&self.serialization_visitors),
            deserialization_formats: formats(&self.deserialization_visitors),
        }
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer")
            .field("handlers", &self.handlers.len())
            .field("listeners", &self.listeners.len())
            .field("serialization_formats", &formats(&self.serialization_visitors))
            .field("deserialization_formats", &formats(&self.deserialization_visitors))
            .finish_non_exhaustive()
    }
}

/// What a [`Serializer`] was built with, minus the collaborators themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SerializerSummary {
    pub debug: bool,
    pub cache_dir: Option<PathBuf>,
    pub include_interface_metadata: bool,
    pub metadata_dirs: Vec<(String, PathBuf)>,
    pub docblock_type_resolver: bool,
    /// Config keys of explicitly set collaborators.
    pub collaborators: Vec<&'static str>,
    pub handlers: usize,
    pub listeners: usize,
    pub serialization_formats: Vec<String>,
    pub deserialization_formats: Vec<String>,
}

fn find_visitor<'a, V: ?Sized>(
    visitors: &'a Visitors<V>,
    direction: Direction,
    format: &str,
) -> Result<&'a Arc<V>, SerializeError> {
    visitors
        .iter()
        .find(|(known, _)| known == format)
        .map(|(_, visitor)| visitor)
        .ok_or_else(|| SerializeError::UnknownFormat {
            direction,
            format: format.to_string(),
        })
}

fn formats<V: ?Sized>(visitors: &Visitors<V>) -> Vec<String> {
    visitors.iter().map(|(format, _)| format.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Account {
        #[serde(rename = "firstName")]
        first_name: String,
        tags: Vec<String>,
    }

    struct Audit;

    impl EventSubscriber for Audit {
        fn subscribed_events(&self) -> Vec<EventKind> {
            vec![EventKind::PreSerialize, EventKind::PostDeserialize]
        }

        fn on_event(&self, event: &mut ObjectEvent<'_>) {
            if let Some(map) = event.data.as_object_mut() {
                match event.kind {
                    EventKind::PreSerialize => {
                        map.insert("auditedAt".to_string(), json!("never"));
                    }
                    _ => {
                        map.remove("auditedAt");
                    }
                }
            }
        }
    }

    #[test]
    fn test_serialize_applies_naming_strategy() {
        let serializer = SerializerBuilder::new().build().unwrap();
        let account = Account {
            first_name: "Ada".to_string(),
            tags: vec!["admin".to_string()],
        };

        let output = serializer.serialize(&account, "json").unwrap();
        assert_eq!(output, r#"{"first_name":"Ada","tags":["admin"]}"#);
    }

    #[test]
    fn test_serialize_with_identical_naming_round_trips() {
        let mut builder = SerializerBuilder::new();
        builder.set_property_naming_strategy(Arc::new(IdenticalNamingStrategy));
        let serializer = builder.build().unwrap();

        let account = Account {
            first_name: "Ada".to_string(),
            tags: vec![],
        };
        let output = serializer.serialize(&account, "toml").unwrap();
        let back: Account = serializer.deserialize(&output, "toml").unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_events_run_around_serialization() {
        let mut builder = SerializerBuilder::new();
        builder
            .add_listener(Arc::new(Audit))
            .set_property_naming_strategy(Arc::new(IdenticalNamingStrategy));
        let serializer = builder.build().unwrap();

        let output = serializer.serialize(&json!({"id": 7}), "json").unwrap();
        assert_eq!(output, r#"{"id":7,"auditedAt":"never"}"#);

        let value: Value = serializer.deserialize(&output, "json").unwrap();
        assert_eq!(value, json!({"id": 7}));
    }

    #[test]
    fn test_unknown_format() {
        let serializer = SerializerBuilder::new().build().unwrap();
        assert!(matches!(
            serializer.serialize(&json!({}), "xml"),
            Err(SerializeError::UnknownFormat { direction: Direction::Serialization, .. })
        ));
        assert!(matches!(
            serializer.deserialize::<Value>("<a/>", "xml"),
            Err(SerializeError::UnknownFormat { direction: Direction::Deserialization, .. })
        ));
    }

    #[test]
    fn test_summary_lists_configured_collaborators() {
        struct Reader;
        impl AnnotationReader for Reader {}

        let mut builder = SerializerBuilder::new();
        builder.set_annotation_reader(Arc::new(Reader)).set_debug(true);
        let serializer = builder.build().unwrap();

        let summary = serializer.summary();
        assert!(summary.debug);
        assert_eq!(summary.collaborators, vec![key::ANNOTATION_READER]);
        assert!(serializer.annotation_reader().is_some());
        assert!(serializer.type_parser().is_none());
    }

    #[test]
    fn test_default_builder_reads_its_own_output() {
        let serializer = SerializerBuilder::new().build().unwrap();
        let account = Account {
            first_name: "Ada".to_string(),
            tags: vec!["admin".to_string()],
        };

        for format in ["json", "toml"] {
            let output = serializer.serialize(&account, format).unwrap();
            let back: Account = serializer.deserialize(&output, format).unwrap();
            assert_eq!(back, account, "{format} round trip");
        }
    }

    #[test]
    fn test_deserialize_matches_translated_field_names() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Profile {
            #[serde(rename = "displayName")]
            display_name: String,
            owner: Account,
        }

        let serializer = SerializerBuilder::new().build().unwrap();
        let input = r#"{"display_name":"ada","owner":{"first_name":"Ada","tags":[]}}"#;
        let profile: Profile = serializer.deserialize(input, "json").unwrap();
        assert_eq!(profile.display_name, "ada");
        assert_eq!(profile.owner.first_name, "Ada");
    }

    #[test]
    fn test_debug_lists_formats() {
        let serializer = SerializerBuilder::new().build().unwrap();
        let debug = format!("{serializer:?}");
        assert!(debug.starts_with("Serializer {"));
        assert!(debug.contains("\"json\""));
    }
}
