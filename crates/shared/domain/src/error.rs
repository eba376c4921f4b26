//! Domain-level errors.
//!
//! These errors represent rule violations of the shared value objects.
//! They are independent of infrastructure concerns (database, transport).

use thiserror::Error;

/// Domain-specific errors for value-object rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A sort entry cannot be applied
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),
}

impl DomainError {
    /// Create an invalid sort error
    pub fn invalid_sort(msg: impl Into<String>) -> Self {
        DomainError::InvalidSort(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
