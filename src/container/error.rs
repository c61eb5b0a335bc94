//! Container error types.

use thiserror::Error;

/// Errors raised while looking up a service.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("service `{0}` is not registered")]
    NotFound(String),

    #[error("factory for service `{id}` failed")]
    Factory {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("circular dependency while resolving `{0}`")]
    CircularDependency(String),
}

impl ContainerError {
    /// Identifier of the service the error is about.
    pub fn id(&self) -> &str {
        match self {
            Self::NotFound(id) | Self::CircularDependency(id) => id,
            Self::Factory { id, .. } => id,
        }
    }
}
