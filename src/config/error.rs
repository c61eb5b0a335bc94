//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config file parsing error")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format `{0}` (expected .toml or .json)")]
    UnsupportedFormat(PathBuf),
}
