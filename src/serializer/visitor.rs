//! Format visitors: turn values into text and back.
//!
//! | Format | Visitor        |
//! |--------|----------------|
//! | `json` | `JsonVisitor`  |
//! | `toml` | `TomlVisitor`  |

use super::SerializeError;
use serde_json::Value;
use std::sync::Arc;

/// Encodes a value for one output format.
pub trait SerializationVisitorFactory: Send + Sync {
    fn serialize(&self, data: &Value) -> Result<String, SerializeError>;
}

/// Decodes one input format into a value.
pub trait DeserializationVisitorFactory: Send + Sync {
    fn deserialize(&self, input: &str) -> Result<Value, SerializeError>;
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonVisitor {
    pretty: bool,
}

impl JsonVisitor {
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SerializationVisitorFactory for JsonVisitor {
    fn serialize(&self, data: &Value) -> Result<String, SerializeError> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(data)
        } else {
            serde_json::to_string(data)
        };
        encoded.map_err(|err| SerializeError::Encode {
            format: "json",
            source: err.into(),
        })
    }
}

impl DeserializationVisitorFactory for JsonVisitor {
    fn deserialize(&self, input: &str) -> Result<Value, SerializeError> {
        serde_json::from_str(input).map_err(|err| SerializeError::Decode {
            format: "json",
            source: err.into(),
        })
    }
}

// ============================================================================
// TOML
// ============================================================================

/// TOML documents must be tables at the top level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlVisitor;

impl SerializationVisitorFactory for TomlVisitor {
    fn serialize(&self, data: &Value) -> Result<String, SerializeError> {
        toml::to_string(data).map_err(|err| SerializeError::Encode {
            format: "toml",
            source: err.into(),
        })
    }
}

impl DeserializationVisitorFactory for TomlVisitor {
    fn deserialize(&self, input: &str) -> Result<Value, SerializeError> {
        toml::from_str(input).map_err(|err| SerializeError::Decode {
            format: "toml",
            source: err.into(),
        })
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub fn default_serialization_visitors() -> Vec<(String, Arc<dyn SerializationVisitorFactory>)> {
    vec![
        ("json".to_string(), Arc::new(JsonVisitor::new())),
        ("toml".to_string(), Arc::new(TomlVisitor)),
    ]
}

pub fn default_deserialization_visitors() -> Vec<(String, Arc<dyn DeserializationVisitorFactory>)>
{
    vec![
        ("json".to_string(), Arc::new(JsonVisitor::new())),
        ("toml".to_string(), Arc::new(TomlVisitor)),
    ]
}
