//! # Visual Registry
//!
//! Bidirectional mapping between render handles and document node ids, plus
//! the ordered handle list of every container.
//!
//! A [`RenderHandle`] is minted by the rendering layer for each visual
//! instance it creates. The registry never looks inside a handle; it only
//! tracks which node the handle renders and where that handle sits among its
//! siblings. Container lists always follow the document tree's child order,
//! filtered to the children that currently have a handle.

use std::collections::HashMap;

use pagecraft_document::{DocumentTree, NodeId};
use serde::{Deserialize, Serialize};

/// Opaque identifier of an externally owned visual instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RenderHandle(pub u64);

#[derive(Debug, Clone, Default)]
pub struct VisualRegistry {
    handle_to_node: HashMap<RenderHandle, NodeId>,
    node_to_handle: HashMap<NodeId, RenderHandle>,
    containers: HashMap<NodeId, Vec<RenderHandle>>,
}

impl VisualRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `handle` to `node_id`, replacing any earlier mapping of either side.
    ///
    /// Returns the handle that previously rendered `node_id`, if any. Container
    /// ordering is not touched; call [`resync_container`](Self::resync_container)
    /// for the node's parent afterwards.
    pub fn register(&mut self, handle: RenderHandle, node_id: &str) -> Option<RenderHandle> {
        if let Some(old_node) = self.handle_to_node.remove(&handle) {
            self.node_to_handle.remove(&old_node);
            self.detach_handle(handle);
        }
        let previous = self.node_to_handle.insert(node_id.to_string(), handle);
        if let Some(previous) = previous {
            self.handle_to_node.remove(&previous);
            self.detach_handle(previous);
        }
        self.handle_to_node.insert(handle, node_id.to_string());
        previous.filter(|p| *p != handle)
    }

    /// Drop a handle. Returns the node it rendered.
    pub fn unregister(&mut self, handle: RenderHandle) -> Option<NodeId> {
        let node_id = self.handle_to_node.remove(&handle)?;
        self.node_to_handle.remove(&node_id);
        self.detach_handle(handle);
        Some(node_id)
    }

    /// Drop the handle of a node, if it has one
    pub fn unregister_node(&mut self, node_id: &str) -> Option<RenderHandle> {
        let handle = self.node_to_handle.get(node_id).copied()?;
        self.unregister(handle);
        Some(handle)
    }

    /// Forget every handle and container list belonging to removed nodes
    pub fn forget(&mut self, node_ids: &[NodeId]) {
        for id in node_ids {
            self.unregister_node(id);
            self.containers.remove(id);
        }
    }

    pub fn node_for(&self, handle: RenderHandle) -> Option<&str> {
        self.handle_to_node.get(&handle).map(String::as_str)
    }

    pub fn handle_for(&self, node_id: &str) -> Option<RenderHandle> {
        self.node_to_handle.get(node_id).copied()
    }

    /// Ordered handles rendered inside `container_id`
    pub fn container(&self, container_id: &str) -> &[RenderHandle] {
        self.containers
            .get(container_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.handle_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handle_to_node.is_empty()
    }

    /// Rebuild the handle list of `container_id` from the tree's child order
    pub fn resync_container(&mut self, tree: &DocumentTree, container_id: &str) {
        let handles: Vec<RenderHandle> = tree
            .children_of(container_id)
            .iter()
            .filter_map(|child| self.node_to_handle.get(child).copied())
            .collect();

        if handles.is_empty() {
            self.containers.remove(container_id);
        } else {
            self.containers.insert(container_id.to_string(), handles);
        }
    }

    /// Whether both maps are inverse and every container list matches the tree
    pub fn is_synchronized_with(&self, tree: &DocumentTree) -> bool {
        if self.handle_to_node.len() != self.node_to_handle.len() {
            return false;
        }
        let inverse = self
            .handle_to_node
            .iter()
            .all(|(handle, node)| self.node_to_handle.get(node) == Some(handle));
        let live = self.node_to_handle.keys().all(|id| tree.contains(id));

        let mut parents: Vec<&str> = self
            .node_to_handle
            .keys()
            .filter_map(|id| tree.parent_of(id))
            .collect();
        parents.extend(self.containers.keys().map(String::as_str));
        parents.sort_unstable();
        parents.dedup();

        let ordered = parents.into_iter().all(|parent| {
            let expected: Vec<RenderHandle> = tree
                .children_of(parent)
                .iter()
                .filter_map(|child| self.node_to_handle.get(child).copied())
                .collect();
            self.container(parent) == expected.as_slice()
        });

        inverse && live && ordered
    }

    fn detach_handle(&mut self, handle: RenderHandle) {
        self.containers.retain(|_, handles| {
            handles.retain(|h| *h != handle);
            !handles.is_empty()
        });
    }
}
