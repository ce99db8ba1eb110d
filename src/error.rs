use thiserror::Error;

/// Application-wide error types.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type '{content_type}'. Allowed types: {allowed}")]
    UnsupportedType {
        content_type: String,
        allowed: String,
    },

    #[error("File is too large. The size limit is {limit}")]
    FileTooLarge { limit: String },

    #[error("{0}")]
    BadRequest(String),

    /// A stored file already occupies the destination key.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::UnsupportedType { .. } | AppError::FileTooLarge { .. } | AppError::BadRequest(_)
        )
    }
}
