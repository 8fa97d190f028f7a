//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the checklist tree rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("node not found: {0}")]
    NotFound(String),

    #[error("cannot insert under file node: {0}")]
    InvalidParent(String),

    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    #[error("invalid document node {id}: {message}")]
    InvalidDocument { id: String, message: String },
}

/// Result type for tree and selection operations.
pub type TreeResult<T> = Result<T, DomainError>;
