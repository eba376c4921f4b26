//! Unified error handling for the data-access layer.
//!
//! Every failure the repository engine, the mapping layer or the transaction
//! boundary can report is a variant of `AppError`. Nothing is retried
//! internally: errors always travel to the immediate caller.

use domain::DomainError;
use thiserror::Error;
use uuid::Uuid;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Lookup errors
    #[error("An entity of type {entity} with id {id} was not found")]
    NotFound { entity: String, id: Uuid },

    #[error("No {0} matched the filter")]
    NoMatch(String),

    #[error("More than one {0} matched the filter")]
    NotUnique(String),

    // Input errors
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    #[error("{}", .0.join("\n"))]
    ValidationFailed(Vec<String>),

    #[error("Required argument '{0}' is missing")]
    ArgumentMissing(&'static str),

    // Unit of work
    #[error("Another transaction has already started")]
    TransactionAlreadyStarted,

    #[error("No transaction is active")]
    TransactionNotActive,

    // Boundary guards
    #[error("Handler is not invokable")]
    NotInvokable,

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound { .. } => "NOT_FOUND",
            AppError::NoMatch(_) => "NO_MATCH",
            AppError::NotUnique(_) => "NOT_UNIQUE",
            AppError::InvalidSort(_) => "INVALID_SORT",
            AppError::ValidationFailed(_) => "VALIDATION_ERROR",
            AppError::ArgumentMissing(_) => "ARGUMENT_MISSING",
            AppError::TransactionAlreadyStarted => "TRANSACTION_ALREADY_STARTED",
            AppError::TransactionNotActive => "TRANSACTION_NOT_ACTIVE",
            AppError::NotInvokable => "NOT_INVOKABLE",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller caused the error (as opposed to the store or a bug)
    pub fn is_client_error(&self) -> bool {
        match self {
            #[cfg(feature = "database")]
            AppError::Database(_) => false,
            AppError::Internal(_)
            | AppError::TransactionAlreadyStarted
            | AppError::TransactionNotActive => false,
            _ => true,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Hide details for internal errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidSort(msg) => AppError::InvalidSort(msg),
            DomainError::Validation(msg) => AppError::ValidationFailed(vec![msg]),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn not_found(entity: impl Into<String>, id: Uuid) -> Self {
        AppError::NotFound {
            entity: entity.into(),
            id,
        }
    }

    pub fn no_match(entity: impl Into<String>) -> Self {
        AppError::NoMatch(entity.into())
    }

    pub fn not_unique(entity: impl Into<String>) -> Self {
        AppError::NotUnique(entity.into())
    }

    pub fn invalid_sort(msg: impl Into<String>) -> Self {
        AppError::InvalidSort(msg.into())
    }

    pub fn validation(messages: Vec<String>) -> Self {
        AppError::ValidationFailed(messages)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
