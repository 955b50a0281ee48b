use thiserror::Error;

/// Rejected input. Always recoverable by resubmitting corrected data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("invalid status: {0}")]
    InvalidStatus(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("complaint not found: {0}")]
    NotFound(String),
}
