//! # Edit Session Management
//!
//! Everything one editor instance needs: the canvas, its history, the drag in
//! progress and the current selection.
//!
//! All mutation goes through the session. Each applied command is recorded
//! on the undo stack and its [`Change`] queued for the rendering layer, which
//! collects them with [`EditSession::drain_changes`].

use pagecraft_document::{AttributeMap, DocumentTree, NodeDefinition, NodeId, StyleMap};
use tracing::{debug, info, warn};

use crate::canvas::Canvas;
use crate::command::{Change, Command};
use crate::commands::{
    AddComponentCommand, CrossContainerMoveCommand, DeleteCommand, DuplicateCommand,
    EditTextCommand, MoveCommand, UpdateAttributesCommand, UpdateClassesCommand,
    UpdateStyleCommand,
};
use crate::config::EditorConfig;
use crate::drag_drop::{ContainerGeometry, DragDropEngine, DropIndicator};
use crate::registry::RenderHandle;
use crate::undo_stack::UndoStack;
use crate::EditorError;

/// Selected nodes and the node whose text is being edited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    selected: Vec<NodeId>,
    editing: Option<NodeId>,
}

impl Selection {
    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.editing.is_none()
    }

    /// Drop ids that no longer exist in `tree`
    fn prune(&mut self, tree: &DocumentTree) {
        self.selected.retain(|id| tree.contains(id));
        if self.editing.as_deref().is_some_and(|id| !tree.contains(id)) {
            self.editing = None;
        }
    }
}

/// Single editing session over one document
#[derive(Debug)]
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    canvas: Canvas,
    history: UndoStack,
    drag: DragDropEngine,
    selection: Selection,

    /// Changes not yet collected by the rendering layer
    changes: Vec<Change>,
}

impl EditSession {
    pub fn new(id: impl Into<String>, tree: DocumentTree, config: &EditorConfig) -> Self {
        let id = id.into();
        info!(session = %id, nodes = tree.len(), "edit session created");
        Self {
            id,
            canvas: Canvas::new(tree),
            history: UndoStack::with_max_levels(config.max_undo_levels),
            drag: DragDropEngine::new(config.last_drop_zone_threshold),
            selection: Selection::default(),
            changes: Vec::new(),
        }
    }

    /// Build the document from a root definition, generating ids from the
    /// configured seed
    pub fn from_definition(
        id: impl Into<String>,
        root: &NodeDefinition,
        config: &EditorConfig,
    ) -> Result<Self, EditorError> {
        let mut tree = DocumentTree::new(&config.id_seed);
        tree.create_node(root, None, None)?;
        Ok(Self::new(id, tree, config))
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn tree(&self) -> &DocumentTree {
        self.canvas.tree()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn drag(&self) -> &DragDropEngine {
        &self.drag
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn into_tree(self) -> DocumentTree {
        self.canvas.into_tree()
    }

    // ---------------------------------------------------------------------
    // Render handles
    // ---------------------------------------------------------------------

    pub fn register_handle(&mut self, handle: RenderHandle, node_id: &str) -> Result<(), EditorError> {
        Ok(self.canvas.register_handle(handle, node_id)?)
    }

    pub fn unregister_handle(&mut self, handle: RenderHandle) -> Option<NodeId> {
        self.canvas.unregister_handle(handle)
    }

    // ---------------------------------------------------------------------
    // Commands and history
    // ---------------------------------------------------------------------

    /// Execute a command and record it.
    ///
    /// A command that fails is recorded anyway, and will fail again as a
    /// no-op when undone.
    pub fn apply(&mut self, command: impl Command + 'static) -> Result<Change, EditorError> {
        self.apply_boxed(Box::new(command))
    }

    pub fn apply_boxed(&mut self, mut command: Box<dyn Command>) -> Result<Change, EditorError> {
        let result = command.execute(&mut self.canvas);
        let label = command.label().to_string();
        self.history.record(command);

        match result {
            Ok(change) => {
                debug!(session = %self.id, %label, node_id = change.node_id(), "applied command");
                self.push_change(change.clone());
                Ok(change)
            }
            Err(e) => {
                warn!(session = %self.id, %label, error = %e, "command had no effect");
                Err(e.into())
            }
        }
    }

    /// Execute several commands as a single undo step.
    ///
    /// Failures are logged and skipped; the changes of the commands that
    /// applied are returned.
    pub fn apply_batch(&mut self, label: &str, commands: Vec<Box<dyn Command>>) -> Vec<Change> {
        let mut applied = Vec::with_capacity(commands.len());
        let mut executed = Vec::with_capacity(commands.len());

        for mut command in commands {
            match command.execute(&mut self.canvas) {
                Ok(change) => applied.push(change),
                Err(e) => {
                    warn!(session = %self.id, batch = label, command = command.label(), error = %e, "command had no effect");
                }
            }
            executed.push(command);
        }

        self.history.record_batch(label, executed);
        for change in &applied {
            self.push_change(change.clone());
        }
        applied
    }

    /// Returns false when there is nothing to undo
    pub fn undo(&mut self) -> bool {
        let mut replayed = Vec::new();
        let undone = self.history.undo_into(&mut self.canvas, &mut replayed);
        for change in replayed {
            self.push_change(change);
        }
        undone
    }

    /// Returns false when there is nothing to redo
    pub fn redo(&mut self) -> bool {
        let mut replayed = Vec::new();
        let redone = self.history.redo_into(&mut self.canvas, &mut replayed);
        for change in replayed {
            self.push_change(change);
        }
        redone
    }

    fn push_change(&mut self, change: Change) {
        if matches!(change, Change::Removed { .. }) {
            self.selection.prune(self.canvas.tree());
        }
        self.changes.push(change);
    }

    /// Hand the pending changes to the rendering layer
    pub fn drain_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    pub fn pending_changes(&self) -> &[Change] {
        &self.changes
    }

    // ---------------------------------------------------------------------
    // Convenience
    // ---------------------------------------------------------------------

    pub fn move_child(&mut self, parent_id: &str, from: usize, to: usize) -> Result<Change, EditorError> {
        self.apply(MoveCommand::new(parent_id, from, to))
    }

    /// Duplicate a node right after itself. Returns the copy's id.
    pub fn duplicate(&mut self, id: &str) -> Result<NodeId, EditorError> {
        let command = DuplicateCommand::after(self.tree(), id)?;
        Ok(self.apply(command)?.node_id().to_string())
    }

    pub fn delete(&mut self, id: &str) -> Result<Change, EditorError> {
        self.apply(DeleteCommand::new(id))
    }

    pub fn edit_text(&mut self, id: &str, content: &str) -> Result<Change, EditorError> {
        let mut command = EditTextCommand::capture(self.tree(), id, content)?;
        if let Some(handle) = self.canvas.registry().handle_for(id) {
            command = command.with_handle(handle);
        }
        self.apply(command)
    }

    /// Insert a component. Returns the new node's id.
    pub fn add_component(
        &mut self,
        definition: NodeDefinition,
        parent_id: &str,
        index: Option<usize>,
    ) -> Result<NodeId, EditorError> {
        let change = self.apply(AddComponentCommand::new(definition, parent_id, index))?;
        Ok(change.node_id().to_string())
    }

    pub fn update_attributes(&mut self, id: &str, attributes: AttributeMap) -> Result<Change, EditorError> {
        let command = UpdateAttributesCommand::capture(self.tree(), id, attributes)?;
        self.apply(command)
    }

    pub fn update_style(&mut self, id: &str, style: StyleMap) -> Result<Change, EditorError> {
        let command = UpdateStyleCommand::capture(self.tree(), id, style)?;
        self.apply(command)
    }

    pub fn update_classes(&mut self, id: &str, classes: Vec<String>) -> Result<Change, EditorError> {
        let command = UpdateClassesCommand::capture(self.tree(), id, classes)?;
        self.apply(command)
    }

    /// Move a node to `index` under `target_parent_id`.
    ///
    /// Within the same parent `index` is the final position; across parents
    /// it is the insertion index among the target's children.
    pub fn move_node(&mut self, id: &str, target_parent_id: &str, index: usize) -> Result<Change, EditorError> {
        self.check_drop_target(id, target_parent_id)?;

        let tree = self.tree();
        let current_parent = tree.parent_of(id);
        if current_parent == Some(target_parent_id) {
            let from = tree.index_in_parent(id).unwrap_or(0);
            self.apply(MoveCommand::new(target_parent_id, from, index))
        } else {
            let command = CrossContainerMoveCommand::new(tree, id, target_parent_id, index);
            self.apply(command)
        }
    }

    // ---------------------------------------------------------------------
    // Drag and drop
    // ---------------------------------------------------------------------

    pub fn begin_drag(&mut self, id: &str) -> Result<(), EditorError> {
        self.drag.begin(self.canvas.tree(), id)
    }

    pub fn drag_over(
        &mut self,
        container_id: &str,
        geometry: &ContainerGeometry,
        pointer_y: f64,
    ) -> Option<DropIndicator> {
        self.drag.hover(container_id, geometry, pointer_y)
    }

    /// Pointer left every drop surface; the drag itself continues
    pub fn leave_drop_target(&mut self) {
        self.drag.clear_indicator();
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Commit the drag in progress as one undoable step.
    ///
    /// Drops onto the dragged node itself or one of its descendants end the
    /// drag and fail with [`EditorError::CyclicDrop`].
    pub fn drop_dragged(&mut self, explicit: Option<DropIndicator>) -> Result<Change, EditorError> {
        let state = self.drag.state().ok_or(EditorError::NoActiveDrag)?;
        let target = explicit.as_ref().or(state.indicator.as_ref());

        if let Some(target) = target {
            let (node_id, container_id) = (state.node_id.clone(), target.container_id.clone());
            if let Err(e) = self.check_drop_target(&node_id, &container_id) {
                self.drag.cancel();
                return Err(e);
            }
        }

        let plan = self.drag.commit(self.canvas.tree(), explicit)?;
        self.apply_boxed(plan.into_command())
    }

    fn check_drop_target(&self, node_id: &str, target_id: &str) -> Result<(), EditorError> {
        if node_id == target_id || self.tree().is_ancestor(node_id, target_id) {
            warn!(session = %self.id, node_id, target_id, "rejected drop into own subtree");
            return Err(EditorError::CyclicDrop {
                node_id: node_id.to_string(),
                target_id: target_id.to_string(),
            });
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    /// Replace the selection; unknown ids are ignored
    pub fn select(&mut self, ids: Vec<NodeId>) {
        let tree = self.canvas.tree();
        self.selection.selected = ids.into_iter().filter(|id| tree.contains(id)).collect();
    }

    pub fn set_editing(&mut self, id: Option<&str>) -> Result<(), EditorError> {
        if let Some(id) = id {
            if !self.tree().contains(id) {
                return Err(pagecraft_document::DocumentError::NodeNotFound(id.to_string()).into());
            }
        }
        self.selection.editing = id.map(str::to_string);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandError;

    fn session() -> EditSession {
        let root = NodeDefinition::new("body")
            .with_id("root")
            .with_child(NodeDefinition::new("h1").with_id("x").with_content("Title"))
            .with_child(
                NodeDefinition::new("section")
                    .with_id("y")
                    .with_child(NodeDefinition::new("p").with_id("y-text")),
            )
            .with_child(NodeDefinition::new("footer").with_id("z"));
        EditSession::from_definition("client-1", &root, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn test_session_creation() {
        let session = session();
        assert_eq!(session.id, "client-1");
        assert_eq!(session.tree().len(), 5);
        assert!(!session.history().can_undo());
        assert!(session.selection().is_empty());
    }

    #[test]
    fn test_apply_queues_changes() {
        let mut session = session();
        session.move_child("root", 0, 2).unwrap();
        session.undo();

        let changes = session.drain_changes();
        assert_eq!(changes.len(), 2);
        assert!(session.pending_changes().is_empty());
    }

    #[test]
    fn test_failed_command_is_recorded() {
        let mut session = session();
        let err = session.delete("ghost").unwrap_err();
        assert!(matches!(err, EditorError::Command(CommandError::NotFound(_))));
        assert_eq!(session.history().undo_levels(), 1);

        assert!(session.undo());
        assert_eq!(session.history().replay_failures(), 1);
        assert_eq!(session.tree().len(), 5);
    }

    #[test]
    fn test_delete_prunes_selection() {
        let mut session = session();
        session.select(vec!["y".into(), "x".into(), "ghost".into()]);
        session.set_editing(Some("y-text")).unwrap();
        assert_eq!(session.selection().selected(), ["y", "x"]);

        session.delete("y").unwrap();
        assert_eq!(session.selection().selected(), ["x"]);
        assert_eq!(session.selection().editing(), None);
    }

    #[test]
    fn test_duplicate_returns_new_id() {
        let mut session = session();
        let copy = session.duplicate("x").unwrap();
        assert_eq!(session.tree().children_of("root")[1], copy);
        assert!(copy.starts_with(session.tree().ids().seed()));
    }

    #[test]
    fn test_edit_text_uses_registered_handle() {
        let mut session = session();
        session.register_handle(RenderHandle(11), "x").unwrap();
        let change = session.edit_text("x", "Hello").unwrap();
        assert!(matches!(
            change,
            Change::ContentChanged { handle: Some(RenderHandle(11)), .. }
        ));
    }

    #[test]
    fn test_move_node_rejects_cycles() {
        let mut session = session();
        assert!(matches!(
            session.move_node("y", "y-text", 0),
            Err(EditorError::CyclicDrop { .. })
        ));
        assert!(matches!(
            session.move_node("y", "y", 0),
            Err(EditorError::CyclicDrop { .. })
        ));
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_drop_into_descendant_is_rejected() {
        let mut session = session();
        session.begin_drag("y").unwrap();
        session.drag_over("y", &ContainerGeometry::new(0.0, 100.0), 10.0);

        assert!(matches!(session.drop_dragged(None), Err(EditorError::CyclicDrop { .. })));
        assert!(!session.drag().is_dragging());
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_apply_batch_is_one_step() {
        let mut session = session();
        // Undo replays in recorded order, so delete from the back.
        let commands: Vec<Box<dyn Command>> = vec![
            Box::new(DeleteCommand::new("z")),
            Box::new(DeleteCommand::new("x")),
        ];
        let changes = session.apply_batch("Clear", commands);
        assert_eq!(changes.len(), 2);
        assert_eq!(session.tree().children_of("root"), ["y"]);
        assert_eq!(session.history().undo_levels(), 1);

        session.undo();
        assert_eq!(session.tree().children_of("root"), ["x", "y", "z"]);
    }
}
