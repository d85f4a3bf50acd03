//! Domain-level error types.

use thiserror::Error;

use crate::ports::{AuthError, StorageError};

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::Internal("Entity vanished mid-operation".into()),
            RepoError::Constraint(msg) => DomainError::Validation(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::MissingAuth => DomainError::Unauthorized,
            AuthError::HashingError(msg) => DomainError::Internal(msg),
        }
    }
}

impl From<StorageError> for DomainError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidName(name) => {
                DomainError::Validation(format!("Invalid file name: {name}"))
            }
            StorageError::Io(msg) => DomainError::Internal(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violation_is_validation() {
        let err: DomainError = RepoError::Constraint("login taken".into()).into();
        assert!(matches!(err, DomainError::Validation(msg) if msg == "login taken"));
    }

    #[test]
    fn test_query_failure_is_internal() {
        let err: DomainError = RepoError::Query("boom".into()).into();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[test]
    fn test_token_errors_are_unauthorized() {
        let err: DomainError = AuthError::TokenExpired.into();
        assert!(matches!(err, DomainError::Unauthorized));
    }
}
