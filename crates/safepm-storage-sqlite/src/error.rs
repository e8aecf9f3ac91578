//! Error types

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Duplicate row
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl Error {
    /// Check whether a rusqlite error is a uniqueness violation.
    pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(info, _)
                if info.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
