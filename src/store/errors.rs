//! # Store Errors
//!
//! Errors raised by the document store. They pass through the query layer
//! unmodified.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store rejected the query shape (e.g. an invalid filter combination)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The query needs something the store does not have (e.g. a composite index)
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),

    /// Caller may not read the collection
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Store unreachable
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// Anything else
    #[error("internal: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::InvalidArgument(_) => "AERO_STORE_INVALID_ARGUMENT",
            StoreError::FailedPrecondition(_) => "AERO_STORE_FAILED_PRECONDITION",
            StoreError::PermissionDenied(_) => "AERO_STORE_PERMISSION_DENIED",
            StoreError::Unavailable(_) => "AERO_STORE_UNAVAILABLE",
            StoreError::Internal(_) => "AERO_STORE_INTERNAL",
        }
    }
}
