//! # Commands
//!
//! The concrete reversible operations over the canvas.
//!
//! ## Captured state
//!
//! | Command | Captured at construction | Captured on first execute |
//! |---|---|---|
//! | `MoveCommand` | parent, from, to | |
//! | `DuplicateCommand` | source, parent, index | produced subtree (with ids) |
//! | `DeleteCommand` | node id | subtree (with ids), parent, index |
//! | `EditTextCommand` | old and new content | |
//! | `AddComponentCommand` | definition, parent, index | produced subtree (with ids) |
//! | `UpdateAttributesCommand` | old and new maps | |
//! | `UpdateStyleCommand` | old and new maps | |
//! | `UpdateClassesCommand` | old and new lists | |
//! | `CrossContainerMoveCommand` | original parent and index | |
//!
//! Snapshots carry every node id, so undoing a delete brings the subtree back
//! under its original ids and redoing an insertion recreates the same ids.

use pagecraft_document::{AttributeMap, DocumentTree, NodeDefinition, NodeId, StyleMap};
use serde_json::Value;

use crate::canvas::Canvas;
use crate::command::{Change, Command, CommandError};
use crate::registry::RenderHandle;

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Reorder a child within its parent
#[derive(Debug, Clone)]
pub struct MoveCommand {
    parent_id: NodeId,
    from: usize,
    to: usize,
}

impl MoveCommand {
    pub fn new(parent_id: impl Into<NodeId>, from: usize, to: usize) -> Self {
        Self {
            parent_id: parent_id.into(),
            from,
            to,
        }
    }

    fn apply(&self, canvas: &mut Canvas, from: usize, to: usize) -> Result<Change, CommandError> {
        canvas.reorder_child(&self.parent_id, from, to)?;
        let id = canvas.tree().children_of(&self.parent_id)[to].clone();
        Ok(Change::Reordered {
            id,
            parent_id: self.parent_id.clone(),
            from,
            to,
        })
    }
}

impl Command for MoveCommand {
    fn label(&self) -> &str {
        "Move"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        self.apply(canvas, self.from, self.to)
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        self.apply(canvas, self.to, self.from)
    }
}

// ---------------------------------------------------------------------------
// Insertions (duplicate, add)
// ---------------------------------------------------------------------------

/// Shared bookkeeping for commands that create a subtree
#[derive(Debug, Clone, Default)]
struct Insertion {
    snapshot: Option<NodeDefinition>,
    produced: Option<NodeId>,
}

impl Insertion {
    fn execute(
        &mut self,
        canvas: &mut Canvas,
        parent_id: &str,
        index: Option<usize>,
        fresh: impl FnOnce(&Canvas) -> Result<NodeDefinition, CommandError>,
    ) -> Result<Change, CommandError> {
        let def = match &self.snapshot {
            Some(snapshot) => snapshot.clone(),
            None => fresh(&*canvas)?,
        };

        let id = canvas.create_node(&def, Some(parent_id), index)?;
        if self.snapshot.is_none() {
            self.snapshot = canvas.tree().to_json_with_ids(&id);
        }
        self.produced = Some(id.clone());

        let index = canvas.tree().index_in_parent(&id).unwrap_or(0);
        Ok(Change::Inserted {
            id,
            parent_id: Some(parent_id.to_string()),
            index,
        })
    }

    fn undo(&mut self, canvas: &mut Canvas, label: &str) -> Result<Change, CommandError> {
        let id = self
            .produced
            .clone()
            .ok_or_else(|| CommandError::NotExecuted(label.to_string()))?;
        let (parent_id, index) = canvas.remove_node(&id)?;
        Ok(Change::Removed {
            id,
            parent_id,
            index,
        })
    }
}

/// Clone a node's subtree under fresh ids
#[derive(Debug, Clone)]
pub struct DuplicateCommand {
    source_id: NodeId,
    parent_id: NodeId,
    insert_index: usize,
    insertion: Insertion,
}

impl DuplicateCommand {
    pub fn new(source_id: impl Into<NodeId>, parent_id: impl Into<NodeId>, insert_index: usize) -> Self {
        Self {
            source_id: source_id.into(),
            parent_id: parent_id.into(),
            insert_index,
            insertion: Insertion::default(),
        }
    }

    /// Duplicate `source_id` right after itself
    pub fn after(tree: &DocumentTree, source_id: &str) -> Result<Self, CommandError> {
        let parent = tree
            .parent_of(source_id)
            .ok_or_else(|| CommandError::NotFound(source_id.to_string()))?;
        let index = tree.index_in_parent(source_id).unwrap_or(0);
        Ok(Self::new(source_id, parent, index + 1))
    }

    /// Id of the copy, once executed
    pub fn produced_id(&self) -> Option<&str> {
        self.insertion.produced.as_deref()
    }
}

impl Command for DuplicateCommand {
    fn label(&self) -> &str {
        "Duplicate"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        let source_id = self.source_id.clone();
        self.insertion.execute(
            canvas,
            &self.parent_id,
            Some(self.insert_index),
            |canvas| {
                let mut def = canvas
                    .tree()
                    .to_json(&source_id)
                    .ok_or_else(|| CommandError::NotFound(source_id.clone()))?;
                def.strip_ids();
                Ok(def)
            },
        )
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        self.insertion.undo(canvas, "Duplicate")
    }
}

/// Insert a new component from a definition
#[derive(Debug, Clone)]
pub struct AddComponentCommand {
    definition: NodeDefinition,
    parent_id: NodeId,
    index: Option<usize>,
    insertion: Insertion,
}

impl AddComponentCommand {
    /// Insert at `index`, or append when `None`
    pub fn new(definition: NodeDefinition, parent_id: impl Into<NodeId>, index: Option<usize>) -> Self {
        Self {
            definition,
            parent_id: parent_id.into(),
            index,
            insertion: Insertion::default(),
        }
    }

    pub fn produced_id(&self) -> Option<&str> {
        self.insertion.produced.as_deref()
    }
}

impl Command for AddComponentCommand {
    fn label(&self) -> &str {
        "Add component"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        let definition = &self.definition;
        self.insertion
            .execute(canvas, &self.parent_id, self.index, |_| Ok(definition.clone()))
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        self.insertion.undo(canvas, "Add component")
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct DeletedNode {
    definition: NodeDefinition,
    parent_id: Option<NodeId>,
    index: usize,
}

/// Remove a node and everything below it
#[derive(Debug, Clone)]
pub struct DeleteCommand {
    node_id: NodeId,
    deleted: Option<DeletedNode>,
}

impl DeleteCommand {
    pub fn new(node_id: impl Into<NodeId>) -> Self {
        Self {
            node_id: node_id.into(),
            deleted: None,
        }
    }
}

impl Command for DeleteCommand {
    fn label(&self) -> &str {
        "Delete"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        let definition = canvas
            .tree()
            .to_json_with_ids(&self.node_id)
            .ok_or_else(|| CommandError::NotFound(self.node_id.clone()))?;
        let (parent_id, index) = canvas.remove_node(&self.node_id)?;

        self.deleted = Some(DeletedNode {
            definition,
            parent_id: parent_id.clone(),
            index,
        });
        Ok(Change::Removed {
            id: self.node_id.clone(),
            parent_id,
            index,
        })
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        let deleted = self
            .deleted
            .as_ref()
            .ok_or_else(|| CommandError::NotExecuted("Delete".to_string()))?;

        // The snapshot embeds every id, so recreation restores them all.
        let id = canvas.create_node(
            &deleted.definition,
            deleted.parent_id.as_deref(),
            Some(deleted.index),
        )?;
        let index = canvas.tree().index_in_parent(&id).unwrap_or(0);
        Ok(Change::Inserted {
            id,
            parent_id: deleted.parent_id.clone(),
            index,
        })
    }
}

// ---------------------------------------------------------------------------
// Content edits
// ---------------------------------------------------------------------------

/// Replace a node's text
#[derive(Debug, Clone)]
pub struct EditTextCommand {
    node_id: NodeId,
    old_content: String,
    new_content: String,
    handle: Option<RenderHandle>,
}

impl EditTextCommand {
    pub fn new(
        node_id: impl Into<NodeId>,
        old_content: impl Into<String>,
        new_content: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            old_content: old_content.into(),
            new_content: new_content.into(),
            handle: None,
        }
    }

    /// Read the current content as the old value
    pub fn capture(
        tree: &DocumentTree,
        node_id: &str,
        new_content: impl Into<String>,
    ) -> Result<Self, CommandError> {
        let node = tree
            .get(node_id)
            .ok_or_else(|| CommandError::NotFound(node_id.to_string()))?;
        Ok(Self::new(node_id, node.content(), new_content))
    }

    /// Mirror the text into a live visual instance as well
    pub fn with_handle(mut self, handle: RenderHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    fn apply(&self, canvas: &mut Canvas, content: &str) -> Result<Change, CommandError> {
        canvas.set_content(&self.node_id, content)?;
        Ok(Change::ContentChanged {
            id: self.node_id.clone(),
            content: content.to_string(),
            handle: self.handle,
        })
    }
}

impl Command for EditTextCommand {
    fn label(&self) -> &str {
        "Edit text"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        self.apply(canvas, &self.new_content)
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        self.apply(canvas, &self.old_content)
    }
}

/// Replace a node's attribute map wholesale
#[derive(Debug, Clone)]
pub struct UpdateAttributesCommand {
    node_id: NodeId,
    old_attributes: AttributeMap,
    new_attributes: AttributeMap,
}

impl UpdateAttributesCommand {
    pub fn new(node_id: impl Into<NodeId>, old_attributes: AttributeMap, new_attributes: AttributeMap) -> Self {
        Self {
            node_id: node_id.into(),
            old_attributes,
            new_attributes,
        }
    }

    /// Snapshot the current attributes as the old value.
    ///
    /// When the new map carries `class` or `style`, the current class list or
    /// style map is captured under the same key so undo restores it too.
    pub fn capture(
        tree: &DocumentTree,
        node_id: &str,
        new_attributes: AttributeMap,
    ) -> Result<Self, CommandError> {
        let node = tree
            .get(node_id)
            .ok_or_else(|| CommandError::NotFound(node_id.to_string()))?;

        let mut old = node.attributes().clone();
        if new_attributes.contains_key(pagecraft_document::CLASS_ATTRIBUTE) {
            old.insert(
                pagecraft_document::CLASS_ATTRIBUTE.to_string(),
                Value::Array(node.classes().iter().cloned().map(Value::String).collect()),
            );
        }
        if new_attributes.contains_key(pagecraft_document::STYLE_ATTRIBUTE) {
            old.insert(
                pagecraft_document::STYLE_ATTRIBUTE.to_string(),
                Value::Object(node.style().clone().into_iter().collect()),
            );
        }

        Ok(Self::new(node_id, old, new_attributes))
    }
}

impl Command for UpdateAttributesCommand {
    fn label(&self) -> &str {
        "Update attributes"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        canvas.set_attributes(&self.node_id, &self.new_attributes)?;
        Ok(Change::AttributesChanged {
            id: self.node_id.clone(),
        })
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        canvas.set_attributes(&self.node_id, &self.old_attributes)?;
        Ok(Change::AttributesChanged {
            id: self.node_id.clone(),
        })
    }
}

/// Replace a node's inline style wholesale
#[derive(Debug, Clone)]
pub struct UpdateStyleCommand {
    node_id: NodeId,
    old_style: StyleMap,
    new_style: StyleMap,
}

impl UpdateStyleCommand {
    pub fn new(node_id: impl Into<NodeId>, old_style: StyleMap, new_style: StyleMap) -> Self {
        Self {
            node_id: node_id.into(),
            old_style,
            new_style,
        }
    }

    pub fn capture(tree: &DocumentTree, node_id: &str, new_style: StyleMap) -> Result<Self, CommandError> {
        let node = tree
            .get(node_id)
            .ok_or_else(|| CommandError::NotFound(node_id.to_string()))?;
        Ok(Self::new(node_id, node.style().clone(), new_style))
    }
}

impl Command for UpdateStyleCommand {
    fn label(&self) -> &str {
        "Update style"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        canvas.set_style(&self.node_id, self.new_style.clone())?;
        Ok(Change::StyleChanged {
            id: self.node_id.clone(),
        })
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        canvas.set_style(&self.node_id, self.old_style.clone())?;
        Ok(Change::StyleChanged {
            id: self.node_id.clone(),
        })
    }
}

/// Replace a node's class list wholesale
#[derive(Debug, Clone)]
pub struct UpdateClassesCommand {
    node_id: NodeId,
    old_classes: Vec<String>,
    new_classes: Vec<String>,
}

impl UpdateClassesCommand {
    pub fn new(node_id: impl Into<NodeId>, old_classes: Vec<String>, new_classes: Vec<String>) -> Self {
        Self {
            node_id: node_id.into(),
            old_classes,
            new_classes,
        }
    }

    pub fn capture(
        tree: &DocumentTree,
        node_id: &str,
        new_classes: Vec<String>,
    ) -> Result<Self, CommandError> {
        let node = tree
            .get(node_id)
            .ok_or_else(|| CommandError::NotFound(node_id.to_string()))?;
        Ok(Self::new(node_id, node.classes().to_vec(), new_classes))
    }
}

impl Command for UpdateClassesCommand {
    fn label(&self) -> &str {
        "Update classes"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        canvas.set_classes(&self.node_id, &self.new_classes)?;
        Ok(Change::ClassesChanged {
            id: self.node_id.clone(),
        })
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        canvas.set_classes(&self.node_id, &self.old_classes)?;
        Ok(Change::ClassesChanged {
            id: self.node_id.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Cross-container move
// ---------------------------------------------------------------------------

/// Move a node under a different parent.
///
/// The original location is read from the node's current parent when the
/// command is built. The node keeps its id and subtree in both directions;
/// renderers still receive a `Change::Reparented` and must re-resolve any
/// handle by id.
#[derive(Debug, Clone)]
pub struct CrossContainerMoveCommand {
    node_id: NodeId,
    target_parent_id: NodeId,
    target_index: usize,
    original: Option<(NodeId, usize)>,
}

impl CrossContainerMoveCommand {
    pub fn new(
        tree: &DocumentTree,
        node_id: impl Into<NodeId>,
        target_parent_id: impl Into<NodeId>,
        target_index: usize,
    ) -> Self {
        let node_id = node_id.into();
        let original = tree.parent_of(&node_id).and_then(|parent| {
            tree.index_in_parent(&node_id)
                .map(|index| (parent.to_string(), index))
        });
        Self {
            node_id,
            target_parent_id: target_parent_id.into(),
            target_index,
            original,
        }
    }

    pub fn original_location(&self) -> Option<(&str, usize)> {
        self.original
            .as_ref()
            .map(|(parent, index)| (parent.as_str(), *index))
    }

    fn relocate(&self, canvas: &mut Canvas, parent_id: &str, index: usize) -> Result<Change, CommandError> {
        let (from_parent, from_index) = canvas.reparent(&self.node_id, parent_id, index)?;
        let to_index = canvas.tree().index_in_parent(&self.node_id).unwrap_or(index);
        Ok(Change::Reparented {
            id: self.node_id.clone(),
            from_parent,
            from_index,
            to_parent: parent_id.to_string(),
            to_index,
        })
    }
}

impl Command for CrossContainerMoveCommand {
    fn label(&self) -> &str {
        "Move to container"
    }

    fn execute(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        if self.original.is_none() {
            return Err(CommandError::NotFound(self.node_id.clone()));
        }
        let target = self.target_parent_id.clone();
        self.relocate(canvas, &target, self.target_index)
    }

    fn undo(&mut self, canvas: &mut Canvas) -> Result<Change, CommandError> {
        let (parent, index) = self
            .original
            .clone()
            .ok_or_else(|| CommandError::NotFound(self.node_id.clone()))?;
        self.relocate(canvas, &parent, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canvas() -> Canvas {
        let root = NodeDefinition::new("body")
            .with_id("root")
            .with_child(NodeDefinition::new("h1").with_id("x").with_content("Title"))
            .with_child(
                NodeDefinition::new("section")
                    .with_id("y")
                    .with_class("card")
                    .with_child(NodeDefinition::new("p").with_id("y-text").with_content("Body")),
            )
            .with_child(NodeDefinition::new("footer").with_id("z"));
        Canvas::new(DocumentTree::from_definition("commands", &root).unwrap())
    }

    fn children(canvas: &Canvas, id: &str) -> Vec<String> {
        canvas.tree().children_of(id).to_vec()
    }

    #[test]
    fn test_move_and_undo() {
        let mut canvas = canvas();
        let mut cmd = MoveCommand::new("root", 0, 2);

        let change = cmd.execute(&mut canvas).unwrap();
        assert_eq!(children(&canvas, "root"), vec!["y", "z", "x"]);
        assert_eq!(change.node_id(), "x");
        assert_eq!(change.index(), Some(2));

        cmd.undo(&mut canvas).unwrap();
        assert_eq!(children(&canvas, "root"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_move_out_of_range_is_rejected() {
        let mut canvas = canvas();
        let mut cmd = MoveCommand::new("root", 0, 3);
        assert!(cmd.execute(&mut canvas).is_err());
        assert_eq!(children(&canvas, "root"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_delete_restores_subtree_with_ids() {
        let mut canvas = canvas();
        let mut cmd = DeleteCommand::new("y");

        cmd.execute(&mut canvas).unwrap();
        assert_eq!(children(&canvas, "root"), vec!["x", "z"]);
        assert!(canvas.get_node("y-text").is_none());

        let change = cmd.undo(&mut canvas).unwrap();
        assert_eq!(change, Change::Inserted { id: "y".into(), parent_id: Some("root".into()), index: 1 });
        assert_eq!(children(&canvas, "root"), vec!["x", "y", "z"]);
        assert_eq!(canvas.get_node("y-text").unwrap().content(), "Body");
        assert!(canvas.get_node("y").unwrap().has_class("card"));
        canvas.check_integrity().unwrap();
    }

    #[test]
    fn test_delete_missing_node_is_noop() {
        let mut canvas = canvas();
        let mut cmd = DeleteCommand::new("ghost");
        assert_eq!(cmd.execute(&mut canvas), Err(CommandError::NotFound("ghost".into())));
        assert!(matches!(cmd.undo(&mut canvas), Err(CommandError::NotExecuted(_))));
        assert_eq!(canvas.tree().len(), 5);
    }

    #[test]
    fn test_duplicate_generates_fresh_ids() {
        let mut canvas = canvas();
        let mut cmd = DuplicateCommand::after(canvas.tree(), "y").unwrap();

        cmd.execute(&mut canvas).unwrap();
        let copy = cmd.produced_id().unwrap().to_string();
        assert_ne!(copy, "y");
        assert_eq!(children(&canvas, "root"), vec!["x", "y", copy.as_str(), "z"]);

        let copy_text = &canvas.tree().children_of(&copy)[0];
        assert_ne!(copy_text, "y-text");
        assert_eq!(canvas.get_node(copy_text).unwrap().content(), "Body");

        cmd.undo(&mut canvas).unwrap();
        assert_eq!(children(&canvas, "root"), vec!["x", "y", "z"]);

        cmd.execute(&mut canvas).unwrap();
        assert_eq!(cmd.produced_id(), Some(copy.as_str()));
        canvas.check_integrity().unwrap();
    }

    #[test]
    fn test_add_component_and_undo() {
        let mut canvas = canvas();
        let def = NodeDefinition::new("button").with_content("Buy");
        let mut cmd = AddComponentCommand::new(def, "y", Some(0));

        let change = cmd.execute(&mut canvas).unwrap();
        let id = cmd.produced_id().unwrap().to_string();
        assert_eq!(change.index(), Some(0));
        assert_eq!(children(&canvas, "y"), vec![id.as_str(), "y-text"]);

        cmd.undo(&mut canvas).unwrap();
        assert_eq!(children(&canvas, "y"), vec!["y-text"]);
    }

    #[test]
    fn test_edit_text_mirrors_handle() {
        let mut canvas = canvas();
        let mut cmd = EditTextCommand::capture(canvas.tree(), "x", "New title")
            .unwrap()
            .with_handle(RenderHandle(4));

        let change = cmd.execute(&mut canvas).unwrap();
        assert_eq!(
            change,
            Change::ContentChanged {
                id: "x".into(),
                content: "New title".into(),
                handle: Some(RenderHandle(4)),
            }
        );
        cmd.undo(&mut canvas).unwrap();
        assert_eq!(canvas.get_node("x").unwrap().content(), "Title");
    }

    #[test]
    fn test_update_attributes_restores_mirrored_keys() {
        let mut canvas = canvas();
        let mut new_attrs = AttributeMap::new();
        new_attrs.insert("role".into(), json!("region"));
        new_attrs.insert("class".into(), json!("card wide"));

        let mut cmd = UpdateAttributesCommand::capture(canvas.tree(), "y", new_attrs).unwrap();
        cmd.execute(&mut canvas).unwrap();
        let node = canvas.get_node("y").unwrap();
        assert_eq!(node.classes(), ["card", "wide"]);
        assert_eq!(node.attribute("role"), Some(&json!("region")));

        cmd.undo(&mut canvas).unwrap();
        let node = canvas.get_node("y").unwrap();
        assert_eq!(node.classes(), ["card"]);
        assert!(node.attributes().is_empty());
    }

    #[test]
    fn test_update_style_and_classes() {
        let mut canvas = canvas();
        let mut style = StyleMap::new();
        style.insert("color".into(), json!("red"));

        let mut style_cmd = UpdateStyleCommand::capture(canvas.tree(), "x", style).unwrap();
        style_cmd.execute(&mut canvas).unwrap();
        assert_eq!(canvas.get_node("x").unwrap().style().len(), 1);
        style_cmd.undo(&mut canvas).unwrap();
        assert!(canvas.get_node("x").unwrap().style().is_empty());

        let mut class_cmd =
            UpdateClassesCommand::capture(canvas.tree(), "x", vec!["hero".into(), "hero".into()])
                .unwrap();
        class_cmd.execute(&mut canvas).unwrap();
        assert_eq!(canvas.get_node("x").unwrap().classes(), ["hero"]);
        class_cmd.undo(&mut canvas).unwrap();
        assert!(canvas.get_node("x").unwrap().classes().is_empty());
    }

    #[test]
    fn test_cross_container_move() {
        let mut canvas = canvas();
        let mut cmd = CrossContainerMoveCommand::new(canvas.tree(), "x", "y", 1);
        assert_eq!(cmd.original_location(), Some(("root", 0)));

        let change = cmd.execute(&mut canvas).unwrap();
        assert_eq!(
            change,
            Change::Reparented {
                id: "x".into(),
                from_parent: "root".into(),
                from_index: 0,
                to_parent: "y".into(),
                to_index: 1,
            }
        );
        assert_eq!(children(&canvas, "root"), vec!["y", "z"]);
        assert_eq!(children(&canvas, "y"), vec!["y-text", "x"]);

        cmd.undo(&mut canvas).unwrap();
        assert_eq!(children(&canvas, "root"), vec!["x", "y", "z"]);
        assert_eq!(children(&canvas, "y"), vec!["y-text"]);
        canvas.check_integrity().unwrap();
    }

    #[test]
    fn test_cross_container_move_of_unknown_node() {
        let mut canvas = canvas();
        let mut cmd = CrossContainerMoveCommand::new(canvas.tree(), "ghost", "y", 0);
        assert_eq!(cmd.execute(&mut canvas), Err(CommandError::NotFound("ghost".into())));
        assert_eq!(cmd.undo(&mut canvas), Err(CommandError::NotFound("ghost".into())));
    }
}
