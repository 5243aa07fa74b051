use std::sync::PoisonError;

use thiserror::Error;

/// Failures that are never the caller's fault. They are logged in full and
/// surface to clients only as a generic 500.
#[derive(Debug, Error)]
pub enum InternalError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("database connection poisoned: {0}")]
    Poisoned(String),
}

impl<T> From<PoisonError<T>> for InternalError {
    fn from(e: PoisonError<T>) -> InternalError {
        InternalError::Poisoned(e.to_string())
    }
}

pub type InternalResult<T> = Result<T, InternalError>;
