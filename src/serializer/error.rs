//! Builder and serializer errors.

use super::Direction;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Errors raised while configuring or building a serializer.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("could not create cache directory `{}`", path.display())]
    CacheDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cache path `{}` exists but is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("metadata directory `{}` for namespace `{namespace}` does not exist", path.display())]
    MissingMetadataDir { namespace: String, path: PathBuf },
}

/// Errors raised by a built serializer.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("no {direction} visitor registered for format `{format}`")]
    UnknownFormat { direction: Direction, format: String },

    #[error("failed to encode {format}")]
    Encode {
        format: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to decode {format}")]
    Decode {
        format: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// The value could not be converted to or from the data model.
    #[error(transparent)]
    Data(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SerializeError::UnknownFormat {
            direction: Direction::Deserialization,
            format: "xml".to_string(),
        };
        assert_eq!(err.to_string(), "no deserialization visitor registered for format `xml`");

        let err = BuilderError::MissingMetadataDir {
            namespace: "App".to_string(),
            path: PathBuf::from("/missing"),
        };
        assert!(err.to_string().contains("`App`"));
    }
}
