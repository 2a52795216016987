//! Error types for the document tree

use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("Index {index} out of range for {len} children")]
    OutOfRange { index: usize, len: usize },

    #[error("Duplicate node id: {0}")]
    DuplicateId(NodeId),

    #[error("Document already has a root: {0}")]
    RootExists(NodeId),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Cannot move the root node")]
    CannotMoveRoot,

    #[error("Cannot remove the root node")]
    CannotRemoveRoot,

    #[error("Document has no root")]
    EmptyDocument,

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::Json(e.to_string())
    }
}

pub type DocumentResult<T> = Result<T, DocumentError>;
