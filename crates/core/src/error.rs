//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Deterministic business failures only (validation and invariants).
/// Missing records, conflicts and authorization are decided by the layers
/// that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more values failed validation. Every failing field is listed.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(vec![msg.into()])
    }

    /// Collapse a list of validation problems into `Ok(())` when empty.
    pub fn check_all(problems: Vec<String>) -> DomainResult<()> {
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Self::Validation(problems))
        }
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// The individual validation messages, if this is a validation error.
    pub fn problems(&self) -> &[String] {
        match self {
            Self::Validation(p) => p,
            _ => &[],
        }
    }
}
