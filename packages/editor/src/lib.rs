//! # Pagecraft Editor
//!
//! Editing engine for Pagecraft documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ document: DocumentTree (source of truth)    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: Canvas = tree + visual registry     │
//! │  - Reversible commands                      │
//! │  - Bounded undo/redo history                │
//! │  - Drag-drop insertion and commit           │
//! │  - Session: selection, pending changes      │
//! └─────────────────────────────────────────────┘
//!                     ↓ Change
//! ┌─────────────────────────────────────────────┐
//! │ rendering layer (owns the render handles)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Tree is source of truth**: render handles are tracked by id only
//! 2. **Commands are the only writers**: every edit is undoable
//! 3. **One gesture, one undo step**: drops and batches record a single entry
//! 4. **Replay never aborts**: a failing command is logged and skipped
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_document::NodeDefinition;
//! use pagecraft_editor::{EditSession, EditorConfig};
//!
//! let page = NodeDefinition::new("body")
//!     .with_id("root")
//!     .with_child(NodeDefinition::new("h1").with_id("x"))
//!     .with_child(NodeDefinition::new("p").with_id("y"))
//!     .with_child(NodeDefinition::new("p").with_id("z"));
//! let mut session = EditSession::from_definition("local", &page, &EditorConfig::default()).unwrap();
//!
//! session.move_child("root", 0, 2).unwrap();
//! assert_eq!(session.tree().children_of("root"), ["y", "z", "x"]);
//!
//! session.undo();
//! assert_eq!(session.tree().children_of("root"), ["x", "y", "z"]);
//! ```

mod canvas;
mod command;
mod commands;
mod config;
mod drag_drop;
mod errors;
mod mutations;
mod registry;
mod session;
mod undo_stack;

pub use canvas::Canvas;
pub use command::{Change, Command, CommandError};
pub use commands::{
    AddComponentCommand, CrossContainerMoveCommand, DeleteCommand, DuplicateCommand,
    EditTextCommand, MoveCommand, UpdateAttributesCommand, UpdateClassesCommand,
    UpdateStyleCommand,
};
pub use config::{EditorConfig, DEFAULT_CONFIG_NAME};
pub use drag_drop::{
    insertion_index, ChildBounds, ContainerGeometry, DragDropEngine, DragState, DropIndicator,
    DropPlan, DEFAULT_LAST_DROP_ZONE_THRESHOLD,
};
pub use errors::EditorError;
pub use mutations::Mutation;
pub use registry::{RenderHandle, VisualRegistry};
pub use session::{EditSession, Selection};
pub use undo_stack::{UndoEntry, UndoStack, DEFAULT_MAX_UNDO_LEVELS};

// Re-export document types for convenience
pub use pagecraft_document::{
    get_document_id, DocumentNode, DocumentTree, NodeDefinition, NodeId,
};
