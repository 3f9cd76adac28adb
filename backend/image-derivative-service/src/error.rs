/// Error types for the image derivative service
///
/// Skips (unrecognized or non-image keys) are not errors; they are reported
/// through `InvocationOutcome`. Everything here fails the invocation.
use s3_utils::StorageError;
use thiserror::Error;

/// Result type for image-derivative-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Notification payload violates the handler's preconditions
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Source object could not be fetched
    #[error("Failed to fetch source object: {0}")]
    Fetch(#[source] StorageError),

    /// Source bytes are not a valid image of the claimed type
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// Resize produced an unusable raster
    #[error("Failed to transform image: {0}")]
    Transform(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    /// A derivative write was rejected; later derivatives were not attempted
    #[error("Failed to store {container}/{key}: {source}")]
    Store {
        container: String,
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Write failures end the process in the Lambda entry point
    pub fn is_store_failure(&self) -> bool {
        matches!(self, AppError::Store { .. })
    }

    /// Whether re-delivering the same event could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Fetch(StorageError::Backend(_) | StorageError::Body(_)) => true,
            AppError::Fetch(_)
            | AppError::InvalidEvent(_)
            | AppError::Decode(_)
            | AppError::Transform(_)
            | AppError::Encode(_)
            | AppError::Store { .. }
            | AppError::Config(_) => false,
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Fetch(err)
    }
}
