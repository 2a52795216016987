//! # Canvas
//!
//! The document tree and the visual registry, mutated together.
//!
//! Every structural operation here changes the tree first and then brings the
//! registry's container lists (and, for removals, its handle maps) in line
//! before returning. Commands only ever mutate through a `Canvas`, so neither
//! structure can drift from the other.

use pagecraft_document::{
    AttributeMap, DocumentError, DocumentNode, DocumentResult, DocumentTree, NodeDefinition,
    NodeId, StyleMap,
};

use crate::registry::{RenderHandle, VisualRegistry};

#[derive(Debug, Clone, Default)]
pub struct Canvas {
    tree: DocumentTree,
    registry: VisualRegistry,
}

impl Canvas {
    pub fn new(tree: DocumentTree) -> Self {
        Self {
            tree,
            registry: VisualRegistry::new(),
        }
    }

    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    pub fn registry(&self) -> &VisualRegistry {
        &self.registry
    }

    pub fn into_tree(self) -> DocumentTree {
        self.tree
    }

    pub fn get_node(&self, id: &str) -> Option<&DocumentNode> {
        self.tree.get(id)
    }

    pub fn root(&self) -> Option<&DocumentNode> {
        self.tree.root()
    }

    /// Create a node (and its subtree) under `parent_id`, or as the root
    pub fn create_node(
        &mut self,
        def: &NodeDefinition,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> DocumentResult<NodeId> {
        let id = self.tree.create_node(def, parent_id, index)?;
        if let Some(parent) = parent_id {
            self.registry.resync_container(&self.tree, parent);
        }
        Ok(id)
    }

    /// Remove a node, forgetting the handles of everything it contained.
    ///
    /// Returns the former parent and index.
    pub fn remove_node(&mut self, id: &str) -> DocumentResult<(Option<NodeId>, usize)> {
        let parent = self.tree.parent_of(id).map(str::to_string);
        let index = self.tree.index_in_parent(id).unwrap_or(0);

        let removed = self.tree.take_node(id)?;
        self.registry.forget(&removed);
        if let Some(parent) = &parent {
            self.registry.resync_container(&self.tree, parent);
        }
        Ok((parent, index))
    }

    pub fn reorder_child(&mut self, parent_id: &str, from: usize, to: usize) -> DocumentResult<()> {
        self.tree.move_child(parent_id, from, to)?;
        self.registry.resync_container(&self.tree, parent_id);
        Ok(())
    }

    /// Move a node under a different parent. Returns where it came from.
    pub fn reparent(
        &mut self,
        id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> DocumentResult<(NodeId, usize)> {
        let (old_parent, old_index) = self.tree.reparent(id, new_parent_id, index)?;
        self.registry.resync_container(&self.tree, &old_parent);
        self.registry.resync_container(&self.tree, new_parent_id);
        Ok((old_parent, old_index))
    }

    pub fn set_attributes(&mut self, id: &str, attributes: &AttributeMap) -> DocumentResult<()> {
        self.tree.set_attributes(id, attributes)
    }

    pub fn set_style(&mut self, id: &str, style: StyleMap) -> DocumentResult<()> {
        self.tree.set_style(id, style)
    }

    pub fn set_classes(&mut self, id: &str, classes: &[String]) -> DocumentResult<()> {
        self.tree.set_classes(id, classes)
    }

    pub fn set_content(&mut self, id: &str, content: &str) -> DocumentResult<()> {
        self.tree.set_content(id, content)
    }

    /// Record that the rendering layer created `handle` for `node_id`
    pub fn register_handle(&mut self, handle: RenderHandle, node_id: &str) -> DocumentResult<()> {
        if !self.tree.contains(node_id) {
            return Err(DocumentError::NodeNotFound(node_id.to_string()));
        }
        self.registry.register(handle, node_id);
        if let Some(parent) = self.tree.parent_of(node_id) {
            self.registry.resync_container(&self.tree, parent);
        }
        Ok(())
    }

    /// Record that the rendering layer destroyed `handle`
    pub fn unregister_handle(&mut self, handle: RenderHandle) -> Option<NodeId> {
        let node_id = self.registry.unregister(handle)?;
        if let Some(parent) = self.tree.parent_of(&node_id) {
            self.registry.resync_container(&self.tree, parent);
        }
        Some(node_id)
    }

    /// Tree invariants hold and the registry mirrors the tree
    pub fn check_integrity(&self) -> DocumentResult<()> {
        self.tree.check_integrity()?;
        if !self.registry.is_synchronized_with(&self.tree) {
            return Err(DocumentError::Integrity(
                "visual registry out of sync with document tree".to_string(),
            ));
        }
        Ok(())
    }
}
