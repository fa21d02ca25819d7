//! Unified error types for the domain layer
//!
//! Every rule the game enforces reports through `DomainError`. The engine maps
//! the variants onto the user-facing taxonomy (validation, state, resource,
//! content) without inspecting message text.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed input: column, move value, choice answer, dice split
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Action not legal in the current round state
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// Not enough score, item not owned, limit exhausted
    #[error("Insufficient resources: {0}")]
    Resource(String),

    /// Lookup miss (content, item, player)
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for malformed input.
    ///
    /// # Example
    /// ```ignore
    /// if values.is_empty() {
    ///     return Err(DomainError::validation("record at least one value"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Create an insufficient resources error
    pub fn resource(msg: impl Into<String>) -> Self {
        Self::Resource(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("column 2 does not exist");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: column 2 does not exist");
    }

    #[test]
    fn test_state_error() {
        let err = DomainError::invalid_state_transition("no active round");
        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        assert!(err.to_string().contains("no active round"));
    }

    #[test]
    fn test_resource_error() {
        let err = DomainError::resource("need 10 points, have 4");
        assert!(matches!(err, DomainError::Resource(_)));
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Item", "I42");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Item"));
        assert!(err.to_string().contains("I42"));
    }
}
