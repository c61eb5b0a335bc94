//! Config keys of [`SerializerBuilder`], in dispatch order.

use super::{
    AccessorStrategy, AnnotationReader, DeserializationContextFactory,
    DeserializationVisitorFactory, EventSubscriber, ExpressionEvaluator, MetadataCache,
    MetadataDriverFactory, ObjectConstructor, PropertyNamingStrategy, SerializationContextFactory,
    SerializationVisitorFactory, Serializer, SerializerBuilder, SubscribingHandler, TypeParser,
};
use crate::config::key;
use crate::container::Service;
use crate::dispatch::{
    CollectionOp, DependencyOp, Dispatch, FlagOp, ListOp, OperationTable, ResolveError, ValueOp,
    expect_bool, expect_str, expect_str_map,
};
use serde_json::Value;

type Builder = SerializerBuilder;

/// `key` names a service providing `$capability`, passed to `$setter`.
macro_rules! dependency {
    ($key:expr, $capability:ident, $setter:ident) => {
        DependencyOp {
            key: $key,
            expected: stringify!($capability),
            apply: |builder: &mut Builder, service: &Service| match service.get::<dyn $capability>() {
                Some(collaborator) => {
                    builder.$setter(collaborator);
                    true
                }
                None => false,
            },
        }
    };
}

macro_rules! flag {
    ($key:expr, $op:ident) => {
        FlagOp {
            key: $key,
            apply: |builder: &mut Builder| {
                builder.$op();
            },
        }
    };
}

const DEPENDENCIES: &[DependencyOp<Builder>] = &[
    dependency!(key::ACCESSOR_STRATEGY, AccessorStrategy, set_accessor_strategy),
    dependency!(key::EXPRESSION_EVALUATOR, ExpressionEvaluator, set_expression_evaluator),
    dependency!(key::TYPE_PARSER, TypeParser, set_type_parser),
    dependency!(key::ANNOTATION_READER, AnnotationReader, set_annotation_reader),
    dependency!(key::OBJECT_CONSTRUCTOR, ObjectConstructor, set_object_constructor),
    dependency!(
        key::PROPERTY_NAMING_STRATEGY,
        PropertyNamingStrategy,
        set_property_naming_strategy
    ),
    dependency!(
        key::METADATA_DRIVER_FACTORY,
        MetadataDriverFactory,
        set_metadata_driver_factory
    ),
    dependency!(
        key::SERIALIZATION_CONTEXT_FACTORY,
        SerializationContextFactory,
        set_serialization_context_factory
    ),
    dependency!(
        key::DESERIALIZATION_CONTEXT_FACTORY,
        DeserializationContextFactory,
        set_deserialization_context_factory
    ),
    dependency!(key::METADATA_CACHE, MetadataCache, set_metadata_cache),
];

const VALUES: &[ValueOp<Builder>] = &[
    ValueOp {
        key: key::DEBUG,
        apply: |builder: &mut Builder, value: &Value| {
            builder.set_debug(expect_bool(key::DEBUG, value)?);
            Ok(())
        },
    },
    ValueOp {
        key: key::CACHE_DIR,
        apply: |builder: &mut Builder, value: &Value| {
            builder.set_cache_dir(expect_str(key::CACHE_DIR, value)?)?;
            Ok(())
        },
    },
    ValueOp {
        key: key::INCLUDE_INTERFACE_METADATA,
        apply: |builder: &mut Builder, value: &Value| {
            builder.include_interface_metadata(expect_bool(key::INCLUDE_INTERFACE_METADATA, value)?);
            Ok(())
        },
    },
    ValueOp {
        key: key::METADATA_DIRS,
        apply: |builder: &mut Builder, value: &Value| {
            builder.set_metadata_dirs(expect_str_map(key::METADATA_DIRS, value)?)?;
            Ok(())
        },
    },
    ValueOp {
        key: key::DOC_BLOCK_TYPE_RESOLVER,
        apply: |builder: &mut Builder, value: &Value| {
            builder.set_docblock_type_resolver(expect_bool(key::DOC_BLOCK_TYPE_RESOLVER, value)?);
            Ok(())
        },
    },
];

const FLAGS: &[FlagOp<Builder>] = &[
    flag!(key::ADD_DEFAULT_HANDLERS, add_default_handlers),
    flag!(key::ADD_DEFAULT_LISTENERS, add_default_listeners),
    flag!(
        key::ADD_DEFAULT_SERIALIZATION_VISITORS,
        add_default_serialization_visitors
    ),
    flag!(
        key::ADD_DEFAULT_DESERIALIZATION_VISITORS,
        add_default_deserialization_visitors
    ),
];

const LISTS: &[ListOp<Builder>] = &[
    ListOp {
        key: key::HANDLERS,
        expected: "SubscribingHandler",
        accepts: |service: &Service| service.is::<dyn SubscribingHandler>(),
        register: |builder: &mut Builder, services: Vec<Service>| {
            builder.configure_handlers(|registry| {
                for handler in services.iter().filter_map(|s| s.get::<dyn SubscribingHandler>()) {
                    registry.register_subscribing_handler(handler);
                }
            });
        },
    },
    ListOp {
        key: key::LISTENERS,
        expected: "EventSubscriber",
        accepts: |service: &Service| service.is::<dyn EventSubscriber>(),
        register: |builder: &mut Builder, services: Vec<Service>| {
            builder.configure_listeners(|dispatcher| {
                for listener in services.iter().filter_map(|s| s.get::<dyn EventSubscriber>()) {
                    dispatcher.add_subscriber(listener);
                }
            });
        },
    },
];

const COLLECTIONS: &[CollectionOp<Builder>] = &[
    CollectionOp {
        key: key::SERIALIZATION_VISITORS,
        expected: "SerializationVisitorFactory",
        accepts: |service: &Service| service.is::<dyn SerializationVisitorFactory>(),
        register: |builder: &mut Builder, format: &str, service: Service| {
            if let Some(visitor) = service.get::<dyn SerializationVisitorFactory>() {
                builder.set_serialization_visitor(format, visitor);
            }
        },
    },
    CollectionOp {
        key: key::DESERIALIZATION_VISITORS,
        expected: "DeserializationVisitorFactory",
        accepts: |service: &Service| service.is::<dyn DeserializationVisitorFactory>(),
        register: |builder: &mut Builder, format: &str, service: Service| {
            if let Some(visitor) = service.get::<dyn DeserializationVisitorFactory>() {
                builder.set_deserialization_visitor(format, visitor);
            }
        },
    },
];

impl Dispatch for SerializerBuilder {
    type Artifact = Serializer;

    const TABLE: OperationTable<Self> = OperationTable {
        dependencies: DEPENDENCIES,
        values: VALUES,
        flags: FLAGS,
        lists: LISTS,
        collections: COLLECTIONS,
    };

    fn build(self) -> Result<Serializer, ResolveError> {
        Ok(SerializerBuilder::build(self)?)
    }
}
