/// Error types shared by all provider contracts
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    #[error("row not found")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("remote service error: {0}")]
    Remote(String),

    #[error("object storage error: {0}")]
    Storage(String),

    #[error("realtime channel closed")]
    ChannelClosed,
}

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
