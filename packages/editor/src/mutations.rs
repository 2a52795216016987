//! # Mutations
//!
//! Serializable edit operations, one per user-level action.
//!
//! A mutation is the wire form of a command: it names its targets by id and
//! carries only the new values. Applying it against an [`EditSession`]
//! captures whatever old state the command needs at that moment, so the same
//! script can be replayed against any document with matching ids.
//!
//! Scripts are JSON arrays:
//!
//! ```json
//! [
//!   { "type": "moveChild", "parentId": "root", "from": 0, "to": 2 },
//!   { "type": "editText", "nodeId": "title", "content": "Hello" },
//!   { "type": "undo" }
//! ]
//! ```

use pagecraft_document::{AttributeMap, NodeDefinition, NodeId, StyleMap};
use serde::{Deserialize, Serialize};

use crate::drag_drop::ContainerGeometry;
use crate::session::EditSession;
use crate::EditorError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Mutation {
    /// Reorder a child within its parent
    #[serde(rename_all = "camelCase")]
    MoveChild {
        parent_id: NodeId,
        from: usize,
        to: usize,
    },

    /// Copy a node (and its subtree) right after itself
    #[serde(rename_all = "camelCase")]
    Duplicate { node_id: NodeId },

    #[serde(rename_all = "camelCase")]
    Delete { node_id: NodeId },

    #[serde(rename_all = "camelCase")]
    EditText { node_id: NodeId, content: String },

    /// Insert a new component; appends when `index` is absent
    #[serde(rename_all = "camelCase")]
    AddComponent {
        parent_id: NodeId,
        #[serde(default)]
        index: Option<usize>,
        definition: NodeDefinition,
    },

    #[serde(rename_all = "camelCase")]
    UpdateAttributes {
        node_id: NodeId,
        attributes: AttributeMap,
    },

    #[serde(rename_all = "camelCase")]
    UpdateStyle { node_id: NodeId, style: StyleMap },

    #[serde(rename_all = "camelCase")]
    UpdateClasses {
        node_id: NodeId,
        classes: Vec<String>,
    },

    /// Move a node under any parent, reordering if the parent is unchanged
    #[serde(rename_all = "camelCase")]
    MoveNode {
        node_id: NodeId,
        parent_id: NodeId,
        index: usize,
    },

    /// A complete drag gesture released over `container_id`
    #[serde(rename_all = "camelCase")]
    Drop {
        node_id: NodeId,
        container_id: NodeId,
        geometry: ContainerGeometry,
        pointer_y: f64,
    },

    Undo,

    Redo,
}

impl Mutation {
    /// Parse a JSON array of mutations
    pub fn parse_script(source: &str) -> Result<Vec<Mutation>, EditorError> {
        serde_json::from_str(source).map_err(|e| EditorError::InvalidMutation(e.to_string()))
    }

    /// Apply to a session.
    ///
    /// Returns false only for an undo or redo with nothing to replay.
    pub fn apply(&self, session: &mut EditSession) -> Result<bool, EditorError> {
        self.validate()?;

        match self {
            Mutation::MoveChild { parent_id, from, to } => {
                session.move_child(parent_id, *from, *to)?;
            }

            Mutation::Duplicate { node_id } => {
                session.duplicate(node_id)?;
            }

            Mutation::Delete { node_id } => {
                session.delete(node_id)?;
            }

            Mutation::EditText { node_id, content } => {
                session.edit_text(node_id, content)?;
            }

            Mutation::AddComponent {
                parent_id,
                index,
                definition,
            } => {
                session.add_component(definition.clone(), parent_id, *index)?;
            }

            Mutation::UpdateAttributes { node_id, attributes } => {
                session.update_attributes(node_id, attributes.clone())?;
            }

            Mutation::UpdateStyle { node_id, style } => {
                session.update_style(node_id, style.clone())?;
            }

            Mutation::UpdateClasses { node_id, classes } => {
                session.update_classes(node_id, classes.clone())?;
            }

            Mutation::MoveNode {
                node_id,
                parent_id,
                index,
            } => {
                session.move_node(node_id, parent_id, *index)?;
            }

            Mutation::Drop {
                node_id,
                container_id,
                geometry,
                pointer_y,
            } => {
                session.begin_drag(node_id)?;
                session.drag_over(container_id, geometry, *pointer_y);
                session.drop_dragged(None)?;
            }

            Mutation::Undo => return Ok(session.undo()),

            Mutation::Redo => return Ok(session.redo()),
        }

        Ok(true)
    }

    /// Reject mutations that cannot target anything
    pub fn validate(&self) -> Result<(), EditorError> {
        let ids: Vec<&NodeId> = match self {
            Mutation::MoveChild { parent_id, .. } | Mutation::AddComponent { parent_id, .. } => {
                vec![parent_id]
            }
            Mutation::Duplicate { node_id }
            | Mutation::Delete { node_id }
            | Mutation::EditText { node_id, .. }
            | Mutation::UpdateAttributes { node_id, .. }
            | Mutation::UpdateStyle { node_id, .. }
            | Mutation::UpdateClasses { node_id, .. } => vec![node_id],
            Mutation::MoveNode {
                node_id, parent_id, ..
            } => vec![node_id, parent_id],
            Mutation::Drop {
                node_id,
                container_id,
                ..
            } => vec![node_id, container_id],
            Mutation::Undo | Mutation::Redo => Vec::new(),
        };

        if ids.iter().any(|id| id.is_empty()) {
            return Err(EditorError::InvalidMutation(format!(
                "{} with an empty node id",
                self.name()
            )));
        }

        if let Mutation::Drop { pointer_y, .. } = self {
            if !pointer_y.is_finite() {
                return Err(EditorError::InvalidMutation(
                    "drop pointer position must be finite".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::MoveChild { .. } => "moveChild",
            Mutation::Duplicate { .. } => "duplicate",
            Mutation::Delete { .. } => "delete",
            Mutation::EditText { .. } => "editText",
            Mutation::AddComponent { .. } => "addComponent",
            Mutation::UpdateAttributes { .. } => "updateAttributes",
            Mutation::UpdateStyle { .. } => "updateStyle",
            Mutation::UpdateClasses { .. } => "updateClasses",
            Mutation::MoveNode { .. } => "moveNode",
            Mutation::Drop { .. } => "drop",
            Mutation::Undo => "undo",
            Mutation::Redo => "redo",
        }
    }
}
