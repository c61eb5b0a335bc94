//! Resolution error types.

use crate::container::ContainerError;
use crate::serializer::BuilderError;
use thiserror::Error;

/// Errors that abort a resolution. No artifact is produced once one occurs.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup collaborator could not provide `id`.
    #[error("failed to look up `{id}` configured at `{key}`")]
    Lookup {
        key: String,
        id: String,
        #[source]
        source: ContainerError,
    },

    #[error("`{key}` must hold a service identifier string")]
    InvalidIdentifier { key: String },

    /// A dependency resolved to a service lacking the setter's capability.
    #[error("service `{id}` configured at `{key}` is not {expected}")]
    Incompatible {
        key: String,
        id: String,
        expected: &'static str,
    },

    #[error("`{key}` expects {expected}")]
    InvalidValue {
        key: &'static str,
        expected: &'static str,
    },

    #[error("no resolver registered for `{0}`")]
    Unregistered(String),

    #[error(transparent)]
    Builder(#[from] BuilderError),
}

impl ResolveError {
    /// Whether the error came from the lookup collaborator.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup { .. })
    }
}
