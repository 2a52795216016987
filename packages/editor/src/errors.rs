//! Error types for the editor

use pagecraft_document::{DocumentError, NodeId};
use thiserror::Error;

use crate::command::CommandError;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid mutation: {0}")]
    InvalidMutation(String),

    #[error("No drag in progress")]
    NoActiveDrag,

    #[error("No drop target for {0}")]
    NoDropTarget(NodeId),

    #[error("Cannot drop {node_id} into itself or its descendant {target_id}")]
    CyclicDrop { node_id: NodeId, target_id: NodeId },
}
