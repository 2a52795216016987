//! # Drag and Drop
//!
//! Turns pointer gestures into reorder or cross-container commands.
//!
//! A drag starts on a node, hovers over containers (each hover computes an
//! insertion indicator from the container's layout), and ends either with a
//! cancel, which touches nothing, or a commit, which yields a [`DropPlan`].
//! No command exists until the commit.
//!
//! Geometry is supplied by the rendering layer in whatever vertical
//! coordinate space the pointer uses.

use pagecraft_document::{DocumentError, DocumentTree, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::Command;
use crate::commands::{CrossContainerMoveCommand, MoveCommand};
use crate::EditorError;

/// Height of the bottom band of a container where drops always append, in px
pub const DEFAULT_LAST_DROP_ZONE_THRESHOLD: f64 = 80.0;

/// Vertical extent of one rendered child
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChildBounds {
    pub top: f64,
    pub height: f64,
}

impl ChildBounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Vertical layout of a container and its children, in document order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerGeometry {
    pub top: f64,
    pub height: f64,
    #[serde(default)]
    pub children: Vec<ChildBounds>,
}

impl ContainerGeometry {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, top: f64, height: f64) -> Self {
        self.children.push(ChildBounds::new(top, height));
        self
    }

    /// Stack `heights` from the top of the container with no gaps
    pub fn stacked(top: f64, height: f64, heights: &[f64]) -> Self {
        let mut geometry = Self::new(top, height);
        let mut y = top;
        for h in heights {
            geometry.children.push(ChildBounds::new(y, *h));
            y += h;
        }
        geometry
    }
}

/// Index at which an item dropped at `pointer_y` lands among the children.
///
/// Pointers within `threshold` of the container's bottom always append.
/// Otherwise the result is the first child whose midpoint lies below the
/// pointer, or the child count if there is none.
pub fn insertion_index(geometry: &ContainerGeometry, pointer_y: f64, threshold: f64) -> usize {
    let offset = pointer_y - geometry.top;
    let count = geometry.children.len();

    if offset > geometry.height - threshold {
        return count;
    }

    geometry
        .children
        .iter()
        .position(|child| child.midpoint() - geometry.top > offset)
        .unwrap_or(count)
}

/// Where a drop would currently land
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIndicator {
    pub container_id: NodeId,
    /// Gap index among the container's current children
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub node_id: NodeId,
    pub source_parent: NodeId,
    pub source_index: usize,
    pub indicator: Option<DropIndicator>,
}

/// The command a committed drop turns into
#[derive(Debug, Clone)]
pub enum DropPlan {
    /// Same container: move `from` to the post-removal index `to`
    Reorder(MoveCommand),
    CrossContainer(CrossContainerMoveCommand),
}

impl DropPlan {
    pub fn into_command(self) -> Box<dyn Command> {
        match self {
            DropPlan::Reorder(cmd) => Box::new(cmd),
            DropPlan::CrossContainer(cmd) => Box::new(cmd),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DragDropEngine {
    threshold: f64,
    state: Option<DragState>,
}

impl DragDropEngine {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            state: None,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&DragState> {
        self.state.as_ref()
    }

    pub fn indicator(&self) -> Option<&DropIndicator> {
        self.state.as_ref().and_then(|s| s.indicator.as_ref())
    }

    /// Start dragging `node_id`. Replaces any drag already in progress.
    pub fn begin(&mut self, tree: &DocumentTree, node_id: &str) -> Result<(), EditorError> {
        if !tree.contains(node_id) {
            return Err(DocumentError::NodeNotFound(node_id.to_string()).into());
        }
        let source_parent = tree.parent_of(node_id).ok_or(DocumentError::CannotMoveRoot)?;
        let source_index = tree.index_in_parent(node_id).unwrap_or(0);

        debug!(node_id, source_parent, source_index, "drag started");
        self.state = Some(DragState {
            node_id: node_id.to_string(),
            source_parent: source_parent.to_string(),
            source_index,
            indicator: None,
        });
        Ok(())
    }

    /// Update the indicator for the pointer hovering over `container_id`
    pub fn hover(
        &mut self,
        container_id: &str,
        geometry: &ContainerGeometry,
        pointer_y: f64,
    ) -> Option<DropIndicator> {
        let threshold = self.threshold;
        let state = self.state.as_mut()?;
        let indicator = DropIndicator {
            container_id: container_id.to_string(),
            index: insertion_index(geometry, pointer_y, threshold),
        };
        state.indicator = Some(indicator.clone());
        Some(indicator)
    }

    /// Pointer left every drop surface
    pub fn clear_indicator(&mut self) {
        if let Some(state) = &mut self.state {
            state.indicator = None;
        }
    }

    /// Abort the drag. Only the engine's own state is touched.
    pub fn cancel(&mut self) -> Option<DragState> {
        let state = self.state.take();
        if let Some(state) = &state {
            debug!(node_id = %state.node_id, "drag cancelled");
        }
        state
    }

    /// End the drag and build the command for it.
    ///
    /// `explicit` overrides the hover indicator. The drag is over after this
    /// call whether or not a plan could be built. Ancestry is not checked here.
    pub fn commit(
        &mut self,
        tree: &DocumentTree,
        explicit: Option<DropIndicator>,
    ) -> Result<DropPlan, EditorError> {
        let state = self.state.take().ok_or(EditorError::NoActiveDrag)?;
        let target = explicit
            .or(state.indicator)
            .ok_or_else(|| EditorError::NoDropTarget(state.node_id.clone()))?;

        let source_parent = tree
            .parent_of(&state.node_id)
            .ok_or_else(|| DocumentError::NodeNotFound(state.node_id.clone()))?;
        let from = tree.index_in_parent(&state.node_id).unwrap_or(state.source_index);

        if target.container_id == source_parent {
            let last = tree.children_of(source_parent).len().saturating_sub(1);
            let to = if target.index > from {
                target.index - 1
            } else {
                target.index
            };
            let to = to.min(last);

            debug!(node_id = %state.node_id, from, to, "drop reorders within container");
            Ok(DropPlan::Reorder(MoveCommand::new(source_parent, from, to)))
        } else {
            debug!(
                node_id = %state.node_id,
                target = %target.container_id,
                index = target.index,
                "drop moves across containers"
            );
            Ok(DropPlan::CrossContainer(CrossContainerMoveCommand::new(
                tree,
                state.node_id.as_str(),
                target.container_id,
                target.index,
            )))
        }
    }
}

impl Default for DragDropEngine {
    fn default() -> Self {
        Self::new(DEFAULT_LAST_DROP_ZONE_THRESHOLD)
    }
}
