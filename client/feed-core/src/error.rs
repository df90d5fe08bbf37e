/// Error types for the feed core
use provider_api::ProviderError;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("remote failure: {0}")]
    Remote(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound => AppError::NotFound("row not found".into()),
            ProviderError::UniqueViolation(msg) => AppError::Conflict(msg),
            ProviderError::Unauthorized => AppError::Unauthorized,
            ProviderError::Remote(msg) => AppError::Remote(msg),
            ProviderError::Storage(msg) => AppError::Remote(msg),
            ProviderError::ChannelClosed => AppError::Remote("realtime channel closed".into()),
        }
    }
}

/// Result type alias for feed-core operations
pub type AppResult<T> = Result<T, AppError>;
