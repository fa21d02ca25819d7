//! Error types for port operations.

use cantstop_domain::{ContentRef, DomainError};

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Entity not found - includes entity type and ID for actionable error messages.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Storage operation failed - includes operation name for tracing.
    #[error("Storage error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// Serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Business constraint violated.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The stored version moved on since the record was loaded.
    #[error("Stale write for {entity_type} {id}: expected version {expected}, found {actual}")]
    Conflict {
        entity_type: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },
}

impl RepoError {
    /// Create a NotFound error with entity type and ID context.
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }

    /// Create a ConstraintViolation error.
    pub fn constraint(message: impl ToString) -> Self {
        Self::ConstraintViolation(message.to_string())
    }

    pub fn conflict(entity_type: &'static str, id: impl ToString, expected: u64, actual: u64) -> Self {
        Self::Conflict {
            entity_type,
            id: id.to_string(),
            expected,
            actual,
        }
    }

    /// Check if this is a NotFound error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Errors raised by the content catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown content: {0}")]
    UnknownContent(ContentRef),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// The item exists but cannot be used right now.
    #[error("{item} cannot be used: {reason}")]
    NotUsable { item: String, reason: String },

    #[error("{item} needs {argument}")]
    MissingArgument {
        item: String,
        argument: &'static str,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CatalogError {
    pub fn not_usable(item: impl ToString, reason: impl ToString) -> Self {
        Self::NotUsable {
            item: item.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn missing(item: impl ToString, argument: &'static str) -> Self {
        Self::MissingArgument {
            item: item.to_string(),
            argument,
        }
    }
}
