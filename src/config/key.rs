//! Configuration keys understood by the serializer factory.
//!
//! Values are camelCase to match the keys found in existing config files.

pub const ACCESSOR_STRATEGY: &str = "accessorStrategy";
pub const EXPRESSION_EVALUATOR: &str = "expressionEvaluator";
pub const TYPE_PARSER: &str = "typeParser";
pub const ANNOTATION_READER: &str = "annotationReader";
pub const DEBUG: &str = "debug";
pub const CACHE_DIR: &str = "cacheDir";
pub const ADD_DEFAULT_HANDLERS: &str = "addDefaultHandlers";
pub const HANDLERS: &str = "handlers";
pub const ADD_DEFAULT_LISTENERS: &str = "addDefaultListeners";
pub const LISTENERS: &str = "listeners";
pub const OBJECT_CONSTRUCTOR: &str = "objectConstructor";
pub const PROPERTY_NAMING_STRATEGY: &str = "propertyNamingStrategy";
pub const SERIALIZATION_VISITORS: &str = "serializationVisitors";
pub const DESERIALIZATION_VISITORS: &str = "deserializationVisitors";
pub const ADD_DEFAULT_SERIALIZATION_VISITORS: &str = "addDefaultSerializationVisitors";
pub const ADD_DEFAULT_DESERIALIZATION_VISITORS: &str = "addDefaultDeserializationVisitors";
pub const INCLUDE_INTERFACE_METADATA: &str = "includeInterfaceMetadata";
pub const METADATA_DIRS: &str = "metadataDirs";
pub const METADATA_DRIVER_FACTORY: &str = "metadataDriverFactory";
pub const SERIALIZATION_CONTEXT_FACTORY: &str = "serializationContextFactory";
pub const DESERIALIZATION_CONTEXT_FACTORY: &str = "deserializationContextFactory";
pub const METADATA_CACHE: &str = "metadataCache";
pub const DOC_BLOCK_TYPE_RESOLVER: &str = "docblockTypeResolver";
