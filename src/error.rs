use thiserror::Error;

/// Main error type for cinedex operations
#[derive(Error, Debug)]
pub enum CinedexError {
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Failed to read records from source: {0}")]
    SourceRead(String),

    #[error("Metadata provider error: {0}")]
    Provider(String),

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background worker unavailable")]
    WorkerUnavailable,
}

/// Result type alias for cinedex operations
pub type Result<T> = std::result::Result<T, CinedexError>;

impl CinedexError {
    /// Check if this error indicates a defect rather than bad input or a failing collaborator
    pub fn is_fatal(&self) -> bool {
        matches!(self, CinedexError::InternalInvariant(_))
    }

    /// Check if the caller sent malformed query input
    pub fn is_invalid_query(&self) -> bool {
        matches!(self, CinedexError::InvalidQuery(_))
    }
}
