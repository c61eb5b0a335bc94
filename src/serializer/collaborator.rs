//! Collaborator capabilities accepted by [`SerializerBuilder`].
//!
//! Most of these are plain capability markers: the builder stores them and
//! the built [`Serializer`] exposes them to whoever walks object graphs.
//! Only the naming strategy takes part in the reference serialize path.
//!
//! [`SerializerBuilder`]: super::SerializerBuilder
//! [`Serializer`]: super::Serializer

/// Reads and writes properties of objects being (de)serialized.
pub trait AccessorStrategy: Send + Sync {}

/// Evaluates exclusion and accessor expressions.
pub trait ExpressionEvaluator: Send + Sync {}

/// Parses type declarations such as `array<string, int>`.
pub trait TypeParser: Send + Sync {}

/// Reads annotation metadata from type declarations.
pub trait AnnotationReader: Send + Sync {}

/// Creates empty objects before deserialization fills them in.
pub trait ObjectConstructor: Send + Sync {}

/// Produces metadata drivers for the configured metadata directories.
pub trait MetadataDriverFactory: Send + Sync {}

/// Creates the per-call serialization context.
pub trait SerializationContextFactory: Send + Sync {}

/// Creates the per-call deserialization context.
pub trait DeserializationContextFactory: Send + Sync {}

/// Stores class metadata between runs.
pub trait MetadataCache: Send + Sync {}

/// Maps property names to serialized names.
pub trait PropertyNamingStrategy: Send + Sync {
    fn translate_name(&self, property: &str) -> String;
}

// ============================================================================
// Naming strategies
// ============================================================================

/// Keeps property names unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdenticalNamingStrategy;

impl PropertyNamingStrategy for IdenticalNamingStrategy {
    fn translate_name(&self, property: &str) -> String {
        property.to_string()
    }
}

/// Splits camelCase names on upper-case letters: `firstName` -> `first_name`.
#[derive(Debug, Clone)]
pub struct CamelCaseNamingStrategy {
    separator: String,
    lower_case: bool,
}

impl CamelCaseNamingStrategy {
    pub fn new(separator: impl Into<String>, lower_case: bool) -> Self {
        Self {
            separator: separator.into(),
            lower_case,
        }
    }
}

impl Default for CamelCaseNamingStrategy {
    fn default() -> Self {
        Self::new("_", true)
    }
}

impl PropertyNamingStrategy for CamelCaseNamingStrategy {
    fn translate_name(&self, property: &str) -> String {
        let mut name = String::with_capacity(property.len() + 4);
        for (i, ch) in property.chars().enumerate() {
            if ch.is_uppercase() && i > 0 {
                name.push_str(&self.separator);
            }
            name.push(ch);
        }
        if self.lower_case {
            name.to_lowercase()
        } else {
            name
        }
    }
}
