use thiserror::Error;

/// Errors surfaced by an [`ObjectStore`](crate::ObjectStore) backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("object `{key}` not found in container `{container}`")]
    NotFound { container: String, key: String },

    #[error("access denied to `{container}/{key}`: {message}")]
    AccessDenied {
        container: String,
        key: String,
        message: String,
    },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("failed to read object body: {0}")]
    Body(String),

    #[error("invalid storage configuration: {0}")]
    Config(String),
}

impl StorageError {
    /// Message reported by the backend, without the local context prefix
    pub fn backend_message(&self) -> &str {
        match self {
            StorageError::NotFound { .. } => "The specified key does not exist.",
            StorageError::AccessDenied { message, .. } => message,
            StorageError::Backend(message)
            | StorageError::Body(message)
            | StorageError::Config(message) => message,
        }
    }
}
