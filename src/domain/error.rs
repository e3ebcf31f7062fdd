//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::NodeId;

/// Domain errors represent misuse of the forest structure.
///
/// None of them leave the forest partially modified: every operation that
/// returns one of these has not touched the structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid node handle: {0}")]
    InvalidHandle(NodeId),

    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("invalid forest handle")]
    InvalidForestHandle,

    #[error("unknown translation: {0}")]
    UnknownTranslation(String),

    #[error("unknown traversal order: {0}")]
    UnknownOrder(String),

    #[error("unknown node kind: {0}")]
    UnknownKind(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
