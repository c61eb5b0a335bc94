//! Loading root configuration documents from disk.
//!
//! Both TOML and JSON documents are read into a [`Value`] so that the same
//! section walking applies regardless of the file format. Key order of the
//! document is preserved.

use super::ConfigError;
use serde_json::Value;
use std::{fs, path::Path};

/// Load a configuration file, picking the parser from its extension.
pub fn load_config(path: &Path) -> Result<Value, ConfigError> {
    let parse = match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => parse_toml,
        Some("json") => parse_json,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
    };

    let content =
        fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
    let value = parse(&content)?;

    crate::debug!("config"; "loaded {}", path.display());
    Ok(value)
}

/// Parse configuration from a TOML string
pub fn parse_toml(content: &str) -> Result<Value, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Parse configuration from a JSON string
pub fn parse_json(content: &str) -> Result<Value, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

// ============================================================================
// tests
// ============================================================================
