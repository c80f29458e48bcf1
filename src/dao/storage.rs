use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by storage backends regardless of the underlying medium.
///
/// Both variants are recoverable: callers fall back to defaults and keep their state in
/// memory for the rest of the session.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not be read or written (disabled, full, I/O failure).
    #[error("storage unavailable: {message}")]
    Unavailable {
        message: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A stored value could not be decoded into the expected shape.
    #[error("malformed value stored under `{key}`")]
    Malformed {
        key: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a malformed-data error for the value stored under `key`.
    pub fn malformed(key: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Malformed {
            key: key.into(),
            source: Box::new(source),
        }
    }

    /// Whether the failure comes from undecodable data rather than the backend itself.
    pub fn is_malformed(&self) -> bool {
        matches!(self, StorageError::Malformed { .. })
    }
}
