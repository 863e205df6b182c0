use std::error::Error;
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure surfaced by the leaderboard store, whichever backend is wired in.
///
/// Adapters keep their own rich error enums; by the time a failure crosses the
/// store trait it collapses into this single variant, which the HTTP boundary
/// maps to a 500.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected or could not complete the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable description carried up to the HTTP error body.
        message: String,
        /// Backend-specific failure this collapsed from.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Wrap a backend-specific failure, keeping its message for the response body.
    pub fn backend(source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message: source.to_string(),
            source: Box::new(source),
        }
    }
}
