use std::fmt;

use pagecraft_document::{DocumentError, NodeId};
use serde::Serialize;
use thiserror::Error;

use crate::canvas::Canvas;
use crate::registry::RenderHandle;

/// A reversible unit of mutation.
///
/// `execute` and `undo` must be exact inverses with respect to the document
/// tree's observable state. Each implementation stores exactly the state it
/// needs to invert itself, captured either at construction or during the
/// first `execute`.
///
/// A command whose target cannot be resolved returns an error and leaves the
/// canvas untouched; the undo stack logs it and keeps going.
pub trait Command: fmt::Debug {
    /// Name of the operation for grouping and display
    fn label(&self) -> &str;

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError>;

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError>;
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Node not found: {0}")]
    NotFound(NodeId),

    #[error("{0} has not been executed")]
    NotExecuted(String),

    #[error("Document error: {0}")]
    Document(DocumentError),
}

impl From<DocumentError> for CommandError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::NodeNotFound(id) | DocumentError::ParentNotFound(id) => {
                CommandError::NotFound(id)
            }
            other => CommandError::Document(other),
        }
    }
}

/// What a command did, surfaced so the rendering layer can create, destroy or
/// reposition its own visual handles
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Change {
    #[serde(rename_all = "camelCase")]
    Inserted {
        id: NodeId,
        parent_id: Option<NodeId>,
        index: usize,
    },

    #[serde(rename_all = "camelCase")]
    Removed {
        id: NodeId,
        parent_id: Option<NodeId>,
        index: usize,
    },

    #[serde(rename_all = "camelCase")]
    Reordered {
        id: NodeId,
        parent_id: NodeId,
        from: usize,
        to: usize,
    },

    /// The node moved to another container; handles must be re-resolved by id
    #[serde(rename_all = "camelCase")]
    Reparented {
        id: NodeId,
        from_parent: NodeId,
        from_index: usize,
        to_parent: NodeId,
        to_index: usize,
    },

    /// Text changed; `handle` is the visual instance mirroring it, if any
    #[serde(rename_all = "camelCase")]
    ContentChanged {
        id: NodeId,
        content: String,
        handle: Option<RenderHandle>,
    },

    AttributesChanged { id: NodeId },

    StyleChanged { id: NodeId },

    ClassesChanged { id: NodeId },
}

impl Change {
    /// The node this change is about
    pub fn node_id(&self) -> &str {
        match self {
            Change::Inserted { id, .. }
            | Change::Removed { id, .. }
            | Change::Reordered { id, .. }
            | Change::Reparented { id, .. }
            | Change::ContentChanged { id, .. }
            | Change::AttributesChanged { id }
            | Change::StyleChanged { id }
            | Change::ClassesChanged { id } => id,
        }
    }

    /// Resulting index of the node among its siblings, for structural changes
    pub fn index(&self) -> Option<usize> {
        match self {
            Change::Inserted { index, .. } => Some(*index),
            Change::Reordered { to, .. } => Some(*to),
            Change::Reparented { to_index, .. } => Some(*to_index),
            _ => None,
        }
    }
}
