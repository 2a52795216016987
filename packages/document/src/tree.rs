//! # Document Tree
//!
//! Arena storage for [`DocumentNode`]s keyed by id.
//!
//! ## Invariants
//!
//! - The tree is empty or has exactly one root (the only node without a parent)
//! - A node's `parent`, when set, lists that node exactly once in its `children`
//! - Ids are unique across the whole tree and never change while a node lives
//! - The parent chain of every node ends at the root (no cycles)
//!
//! `check_integrity` verifies all of the above.
//!
//! ## Ids
//!
//! A definition carrying `attributes.id` keeps that id when instantiated; every
//! other node gets a fresh id from the tree's [`IdGenerator`]. Instantiating a
//! definition whose embedded id is already live fails with
//! [`DocumentError::DuplicateId`] before anything is attached.

use std::collections::{HashMap, HashSet};

use crate::definition::split_mirrored;
use crate::{
    AttributeMap, DocumentError, DocumentNode, DocumentResult, IdGenerator, NodeDefinition,
    NodeId, StyleMap,
};

/// Authoritative, serializable document model
#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    nodes: HashMap<NodeId, DocumentNode>,
    root: Option<NodeId>,
    ids: IdGenerator,
}

impl DocumentTree {
    /// Create an empty tree whose generated ids derive from `name`
    pub fn new(name: &str) -> Self {
        Self::with_id_generator(IdGenerator::new(name))
    }

    pub fn with_id_generator(ids: IdGenerator) -> Self {
        Self {
            nodes: HashMap::new(),
            root: None,
            ids,
        }
    }

    /// Rebuild a tree from a root definition (parent links come from nesting)
    pub fn from_definition(name: &str, root: &NodeDefinition) -> DocumentResult<Self> {
        let mut tree = Self::new(name);
        tree.create_node(root, None, None)?;
        Ok(tree)
    }

    pub fn from_json_str(name: &str, source: &str) -> DocumentResult<Self> {
        let root = NodeDefinition::from_json_str(source)?;
        Self::from_definition(name, &root)
    }

    // ---------------------------------------------------------------------
    // Lookup
    // ---------------------------------------------------------------------

    pub fn get(&self, id: &str) -> Option<&DocumentNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn root(&self) -> Option<&DocumentNode> {
        self.root.as_deref().and_then(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        self.nodes.get(id).and_then(DocumentNode::parent)
    }

    /// Children of `id`, or an empty slice when the node does not exist
    pub fn children_of(&self, id: &str) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(DocumentNode::children)
            .unwrap_or(&[])
    }

    /// Position of `id` among its siblings
    pub fn index_in_parent(&self, id: &str) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.children_of(parent).iter().position(|c| c == id)
    }

    /// Whether `ancestor` is a strict ancestor of `id`
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        let mut current = self.parent_of(id);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.parent_of(parent);
        }
        false
    }

    /// Depth-first (pre-order) walk of the subtree rooted at `id`
    pub fn depth_first(&self, id: &str) -> DepthFirst<'_> {
        let stack = self
            .nodes
            .get_key_value(id)
            .map(|(key, _)| key.as_str())
            .into_iter()
            .collect();
        DepthFirst { tree: self, stack }
    }

    /// Depth-first, self-first search for `id` within the subtree of `scope`
    pub fn find_by_id(&self, scope: &str, id: &str) -> Option<&DocumentNode> {
        self.depth_first(scope).find(|node| node.id == id)
    }

    // ---------------------------------------------------------------------
    // Structure
    // ---------------------------------------------------------------------

    /// Create a node from a definition and attach it.
    ///
    /// Without a parent the node becomes the root, which fails if the tree
    /// already has one.
    pub fn create_node(
        &mut self,
        def: &NodeDefinition,
        parent_id: Option<&str>,
        index: Option<usize>,
    ) -> DocumentResult<NodeId> {
        match parent_id {
            Some(parent_id) => self.create_child(parent_id, def, index),
            None => {
                if let Some(root) = &self.root {
                    return Err(DocumentError::RootExists(root.clone()));
                }
                let reserved = self.check_embedded_ids(def)?;
                let id = self.instantiate(def, None, &reserved);
                self.root = Some(id.clone());
                Ok(id)
            }
        }
    }

    /// Create a child under `parent_id` at `index` (clamped), or append
    pub fn create_child(
        &mut self,
        parent_id: &str,
        def: &NodeDefinition,
        index: Option<usize>,
    ) -> DocumentResult<NodeId> {
        if !self.nodes.contains_key(parent_id) {
            return Err(DocumentError::ParentNotFound(parent_id.to_string()));
        }
        let reserved = self.check_embedded_ids(def)?;
        let id = self.instantiate(def, Some(parent_id.to_string()), &reserved);

        let parent = self
            .nodes
            .get_mut(parent_id)
            .ok_or_else(|| DocumentError::ParentNotFound(parent_id.to_string()))?;
        let at = index
            .unwrap_or(parent.children.len())
            .min(parent.children.len());
        parent.children.insert(at, id.clone());

        Ok(id)
    }

    /// Remove `id` from the subtree of `scope`.
    ///
    /// Direct children are checked first, then each child's own subtree in
    /// order. Returns false when `id` is not found anywhere below `scope`.
    pub fn remove_child(&mut self, scope: &str, id: &str) -> bool {
        let children = match self.nodes.get(scope) {
            Some(node) => node.children.clone(),
            None => return false,
        };

        if let Some(pos) = children.iter().position(|c| c == id) {
            if let Some(node) = self.nodes.get_mut(scope) {
                node.children.remove(pos);
            }
            self.drop_subtree(id);
            return true;
        }

        children.iter().any(|child| self.remove_child(child, id))
    }

    /// Remove a node anywhere below the root
    pub fn remove_node(&mut self, id: &str) -> bool {
        self.take_node(id).is_ok()
    }

    /// Remove a node and return the ids of the removed subtree.
    ///
    /// The root stays put: a document always has exactly one.
    pub fn take_node(&mut self, id: &str) -> DocumentResult<Vec<NodeId>> {
        if self.root.as_deref() == Some(id) {
            return Err(DocumentError::CannotRemoveRoot);
        }

        let (parent, pos) = self
            .locate(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.to_string()))?;
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.remove(pos);
        }
        Ok(self.drop_subtree(id))
    }

    /// Move a child of `parent_id` from one index to another.
    ///
    /// Both indices must lie in `[0, child_count)`; otherwise nothing changes.
    pub fn move_child(&mut self, parent_id: &str, from: usize, to: usize) -> DocumentResult<()> {
        let parent = self
            .nodes
            .get_mut(parent_id)
            .ok_or_else(|| DocumentError::ParentNotFound(parent_id.to_string()))?;

        let len = parent.children.len();
        for index in [from, to] {
            if index >= len {
                return Err(DocumentError::OutOfRange { index, len });
            }
        }

        if from != to {
            let child = parent.children.remove(from);
            parent.children.insert(to, child);
        }
        Ok(())
    }

    /// Detach `id` and attach it under `new_parent_id` at `index` (clamped).
    ///
    /// The node keeps its id, attributes and subtree. Returns where it was.
    pub fn reparent(
        &mut self,
        id: &str,
        new_parent_id: &str,
        index: usize,
    ) -> DocumentResult<(NodeId, usize)> {
        if !self.nodes.contains_key(id) {
            return Err(DocumentError::NodeNotFound(id.to_string()));
        }
        if !self.nodes.contains_key(new_parent_id) {
            return Err(DocumentError::ParentNotFound(new_parent_id.to_string()));
        }
        if id == new_parent_id || self.is_ancestor(id, new_parent_id) {
            return Err(DocumentError::CycleDetected);
        }
        let (old_parent, old_index) = self.locate(id).ok_or(DocumentError::CannotMoveRoot)?;

        if let Some(node) = self.nodes.get_mut(&old_parent) {
            node.children.remove(old_index);
        }
        let parent = self
            .nodes
            .get_mut(new_parent_id)
            .ok_or_else(|| DocumentError::ParentNotFound(new_parent_id.to_string()))?;
        let at = index.min(parent.children.len());
        parent.children.insert(at, id.to_string());

        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = Some(new_parent_id.to_string());
        }

        Ok((old_parent, old_index))
    }

    // ---------------------------------------------------------------------
    // Content
    // ---------------------------------------------------------------------

    /// Replace the attribute map wholesale.
    ///
    /// `class` and `style` keys replace the class list and style map; an `id`
    /// key is ignored because ids never change.
    pub fn set_attributes(&mut self, id: &str, attributes: &AttributeMap) -> DocumentResult<()> {
        let split = split_mirrored(attributes);
        let node = self.node_mut(id)?;

        node.attributes = split.attributes;
        if let Some(classes) = split.classes {
            node.classes = classes;
        }
        if let Some(style) = split.style {
            node.style = style;
        }
        Ok(())
    }

    pub fn set_style(&mut self, id: &str, style: StyleMap) -> DocumentResult<()> {
        self.node_mut(id)?.style = style;
        Ok(())
    }

    /// Add a class; returns false if it was already present
    pub fn add_class(&mut self, id: &str, class: &str) -> DocumentResult<bool> {
        Ok(self.node_mut(id)?.add_class(class))
    }

    pub fn remove_class(&mut self, id: &str, class: &str) -> DocumentResult<bool> {
        Ok(self.node_mut(id)?.remove_class(class))
    }

    /// Replace the class list, dropping duplicates
    pub fn set_classes(&mut self, id: &str, classes: &[String]) -> DocumentResult<()> {
        let node = self.node_mut(id)?;
        node.classes.clear();
        for class in classes {
            node.add_class(class);
        }
        Ok(())
    }

    pub fn set_content(&mut self, id: &str, content: impl Into<String>) -> DocumentResult<()> {
        self.node_mut(id)?.content = content.into();
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Serialization
    // ---------------------------------------------------------------------

    /// Serialize a subtree without ids
    pub fn to_json(&self, id: &str) -> Option<NodeDefinition> {
        self.to_definition(id, false)
    }

    /// Serialize a subtree with every node's id embedded in `attributes.id`
    pub fn to_json_with_ids(&self, id: &str) -> Option<NodeDefinition> {
        self.to_definition(id, true)
    }

    /// Serialize the whole document (ids embedded) as pretty JSON
    pub fn to_json_string(&self) -> DocumentResult<String> {
        match self.root.as_deref().and_then(|root| self.to_json_with_ids(root)) {
            Some(def) => def.to_json_string(),
            None => Err(DocumentError::EmptyDocument),
        }
    }

    fn to_definition(&self, id: &str, with_ids: bool) -> Option<NodeDefinition> {
        let node = self.nodes.get(id)?;
        let mut def = NodeDefinition {
            tag_name: node.tag_name.clone(),
            attributes: node.attributes.clone(),
            style: node.style.clone(),
            classes: node.classes.clone(),
            content: node.content.clone(),
            components: node
                .children
                .iter()
                .filter_map(|child| self.to_definition(child, with_ids))
                .collect(),
        };
        if with_ids {
            def = def.with_id(node.id.clone());
        }
        Some(def)
    }

    // ---------------------------------------------------------------------
    // Integrity
    // ---------------------------------------------------------------------

    /// Verify the arena invariants listed in the module docs
    pub fn check_integrity(&self) -> DocumentResult<()> {
        let root = match &self.root {
            Some(root) => root,
            None if self.nodes.is_empty() => return Ok(()),
            None => return Err(integrity("nodes present but no root")),
        };

        match self.nodes.get(root) {
            Some(node) if node.parent.is_none() => {}
            Some(_) => return Err(integrity(format!("root {} has a parent", root))),
            None => return Err(integrity(format!("root {} is not in the arena", root))),
        }

        for (id, node) in &self.nodes {
            if node.id != *id {
                return Err(integrity(format!("node keyed {} claims id {}", id, node.id)));
            }
            match &node.parent {
                None if id != root => {
                    return Err(integrity(format!("{} has no parent but is not the root", id)))
                }
                None => {}
                Some(parent) => {
                    let listed = self
                        .nodes
                        .get(parent)
                        .map(|p| p.children.iter().filter(|c| *c == id).count())
                        .unwrap_or(0);
                    if listed != 1 {
                        return Err(integrity(format!(
                            "{} is listed {} times by parent {}",
                            id, listed, parent
                        )));
                    }
                }
            }
            for child in &node.children {
                let child_parent = self.nodes.get(child).and_then(|c| c.parent.as_deref());
                if child_parent != Some(id.as_str()) {
                    return Err(integrity(format!(
                        "child {} of {} points at {:?}",
                        child, id, child_parent
                    )));
                }
            }
        }

        let mut seen = HashSet::new();
        for node in self.depth_first(root) {
            if !seen.insert(node.id.as_str()) {
                return Err(integrity(format!("{} reached twice", node.id)));
            }
        }
        if seen.len() != self.nodes.len() {
            return Err(integrity(format!(
                "{} of {} nodes reachable from root",
                seen.len(),
                self.nodes.len()
            )));
        }

        Ok(())
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn node_mut(&mut self, id: &str) -> DocumentResult<&mut DocumentNode> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.to_string()))
    }

    /// Parent id and sibling index of a non-root node
    fn locate(&self, id: &str) -> Option<(NodeId, usize)> {
        let parent = self.parent_of(id)?;
        let pos = self.children_of(parent).iter().position(|c| c == id)?;
        Some((parent.to_string(), pos))
    }

    fn check_embedded_ids(&self, def: &NodeDefinition) -> DocumentResult<HashSet<NodeId>> {
        let mut reserved = HashSet::new();
        for id in def.embedded_ids() {
            if self.nodes.contains_key(&id) || !reserved.insert(id.clone()) {
                return Err(DocumentError::DuplicateId(id));
            }
        }
        Ok(reserved)
    }

    fn fresh_id(&mut self, reserved: &HashSet<NodeId>) -> NodeId {
        loop {
            let id = self.ids.new_id();
            if !self.nodes.contains_key(&id) && !reserved.contains(&id) {
                return id;
            }
        }
    }

    fn instantiate(
        &mut self,
        def: &NodeDefinition,
        parent: Option<NodeId>,
        reserved: &HashSet<NodeId>,
    ) -> NodeId {
        let split = split_mirrored(&def.attributes);
        let id = match split.id {
            Some(id) => id,
            None => self.fresh_id(reserved),
        };

        let mut classes = Vec::with_capacity(def.classes.len());
        for class in def.classes.iter().chain(split.classes.iter().flatten()) {
            if !classes.contains(class) {
                classes.push(class.clone());
            }
        }

        let mut style = def.style.clone();
        if let Some(inline) = split.style {
            style.extend(inline);
        }

        self.nodes.insert(
            id.clone(),
            DocumentNode {
                id: id.clone(),
                tag_name: def.tag_name.clone(),
                attributes: split.attributes,
                style,
                classes,
                content: def.content.clone(),
                children: Vec::with_capacity(def.components.len()),
                parent,
            },
        );

        for child_def in &def.components {
            let child = self.instantiate(child_def, Some(id.clone()), reserved);
            if let Some(node) = self.nodes.get_mut(&id) {
                node.children.push(child);
            }
        }

        id
    }

    /// Drop a detached subtree from the arena, returning the removed ids
    fn drop_subtree(&mut self, id: &str) -> Vec<NodeId> {
        let mut removed = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.into_iter().rev());
                removed.push(current);
            }
        }
        removed
    }
}

fn integrity(message: impl Into<String>) -> DocumentError {
    DocumentError::Integrity(message.into())
}

/// Pre-order iterator over a subtree
pub struct DepthFirst<'a> {
    tree: &'a DocumentTree,
    stack: Vec<&'a str>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a DocumentNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.nodes.get(id) {
                self.stack
                    .extend(node.children.iter().rev().map(String::as_str));
                return Some(node);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree_with(children: &[&str]) -> DocumentTree {
        let mut root = NodeDefinition::new("body").with_id("root");
        for id in children {
            root = root.with_child(NodeDefinition::new("div").with_id(*id));
        }
        DocumentTree::from_definition("test", &root).unwrap()
    }

    fn child_ids(tree: &DocumentTree, id: &str) -> Vec<String> {
        tree.children_of(id).to_vec()
    }

    #[test]
    fn test_create_root_and_children() {
        let mut tree = DocumentTree::new("test");
        let root = tree
            .create_node(&NodeDefinition::new("body"), None, None)
            .unwrap();
        let a = tree
            .create_node(&NodeDefinition::new("h1"), Some(&root), None)
            .unwrap();
        let b = tree
            .create_node(&NodeDefinition::new("p"), Some(&root), Some(0))
            .unwrap();

        assert_eq!(tree.root_id(), Some(root.as_str()));
        assert_eq!(child_ids(&tree, &root), vec![b.clone(), a.clone()]);
        assert_eq!(tree.parent_of(&a), Some(root.as_str()));
        assert_ne!(a, b);
        tree.check_integrity().unwrap();
    }

    #[test]
    fn test_second_root_rejected() {
        let mut tree = tree_with(&[]);
        let err = tree
            .create_node(&NodeDefinition::new("body"), None, None)
            .unwrap_err();
        assert_eq!(err, DocumentError::RootExists("root".into()));
    }

    #[test]
    fn test_create_child_clamps_index() {
        let mut tree = tree_with(&["a"]);
        let id = tree
            .create_child("root", &NodeDefinition::new("p"), Some(99))
            .unwrap();
        assert_eq!(tree.index_in_parent(&id), Some(1));
    }

    #[test]
    fn test_create_child_missing_parent() {
        let mut tree = tree_with(&[]);
        let err = tree
            .create_child("ghost", &NodeDefinition::new("p"), None)
            .unwrap_err();
        assert_eq!(err, DocumentError::ParentNotFound("ghost".into()));
    }

    #[test]
    fn test_embedded_id_is_kept_and_duplicates_rejected() {
        let mut tree = tree_with(&["a"]);
        let id = tree
            .create_child("root", &NodeDefinition::new("p").with_id("keep-me"), None)
            .unwrap();
        assert_eq!(id, "keep-me");

        let before = tree.len();
        let dup = NodeDefinition::new("section").with_child(NodeDefinition::new("p").with_id("a"));
        let err = tree.create_child("root", &dup, None).unwrap_err();
        assert_eq!(err, DocumentError::DuplicateId("a".into()));
        assert_eq!(tree.len(), before);
        tree.check_integrity().unwrap();
    }

    #[test]
    fn test_generated_ids_skip_live_ids() {
        let mut tree = DocumentTree::with_id_generator(IdGenerator::from_seed("n"));
        let root = NodeDefinition::new("body")
            .with_id("n-1")
            .with_child(NodeDefinition::new("p").with_id("n-2"));
        tree.create_node(&root, None, None).unwrap();

        let id = tree
            .create_child("n-1", &NodeDefinition::new("p"), None)
            .unwrap();
        assert_eq!(id, "n-3");
    }

    #[test]
    fn test_move_child_reorders() {
        let mut tree = tree_with(&["x", "y", "z"]);
        tree.move_child("root", 0, 2).unwrap();
        assert_eq!(child_ids(&tree, "root"), vec!["y", "z", "x"]);
        tree.move_child("root", 2, 0).unwrap();
        assert_eq!(child_ids(&tree, "root"), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_move_child_out_of_range_does_not_mutate() {
        let mut tree = tree_with(&["x", "y"]);
        let err = tree.move_child("root", 0, 2).unwrap_err();
        assert_eq!(err, DocumentError::OutOfRange { index: 2, len: 2 });
        let err = tree.move_child("root", 5, 0).unwrap_err();
        assert_eq!(err, DocumentError::OutOfRange { index: 5, len: 2 });
        assert_eq!(child_ids(&tree, "root"), vec!["x", "y"]);
    }

    #[test]
    fn test_remove_child_searches_subtree() {
        let root = NodeDefinition::new("body").with_id("root").with_child(
            NodeDefinition::new("section")
                .with_id("s")
                .with_child(NodeDefinition::new("p").with_id("deep")),
        );
        let mut tree = DocumentTree::from_definition("test", &root).unwrap();

        assert!(tree.remove_child("root", "deep"));
        assert!(!tree.contains("deep"));
        assert!(tree.children_of("s").is_empty());
        assert!(!tree.remove_child("root", "deep"));
        tree.check_integrity().unwrap();
    }

    #[test]
    fn test_remove_drops_descendants_from_index() {
        let root = NodeDefinition::new("body").with_id("root").with_child(
            NodeDefinition::new("ul")
                .with_id("list")
                .with_child(NodeDefinition::new("li").with_id("one"))
                .with_child(NodeDefinition::new("li").with_id("two")),
        );
        let mut tree = DocumentTree::from_definition("test", &root).unwrap();

        let removed = tree.take_node("list").unwrap();
        assert_eq!(removed, vec!["list", "one", "two"]);
        assert_eq!(tree.len(), 1);
        tree.check_integrity().unwrap();
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut tree = tree_with(&["a"]);
        assert_eq!(tree.take_node("root"), Err(DocumentError::CannotRemoveRoot));
        assert!(!tree.remove_node("root"));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.root_id(), Some("root"));
        assert_eq!(tree.take_node("ghost"), Err(DocumentError::NodeNotFound("ghost".into())));
        tree.check_integrity().unwrap();
    }

    #[test]
    fn test_empty_tree_does_not_serialize() {
        let tree = DocumentTree::new("test");
        assert_eq!(tree.to_json_string(), Err(DocumentError::EmptyDocument));
    }

    #[test]
    fn test_find_by_id_is_scoped() {
        let root = NodeDefinition::new("body")
            .with_id("root")
            .with_child(
                NodeDefinition::new("section")
                    .with_id("left")
                    .with_child(NodeDefinition::new("p").with_id("p1")),
            )
            .with_child(NodeDefinition::new("section").with_id("right"));
        let tree = DocumentTree::from_definition("test", &root).unwrap();

        assert_eq!(tree.find_by_id("root", "p1").map(|n| n.id()), Some("p1"));
        assert_eq!(tree.find_by_id("left", "left").map(|n| n.id()), Some("left"));
        assert!(tree.find_by_id("right", "p1").is_none());

        let order: Vec<&str> = tree.depth_first("root").map(|n| n.id()).collect();
        assert_eq!(order, vec!["root", "left", "p1", "right"]);
    }

    #[test]
    fn test_reparent_keeps_identity() {
        let root = NodeDefinition::new("body")
            .with_id("root")
            .with_child(
                NodeDefinition::new("section")
                    .with_id("a")
                    .with_child(NodeDefinition::new("p").with_id("p").with_content("hi")),
            )
            .with_child(NodeDefinition::new("section").with_id("b"));
        let mut tree = DocumentTree::from_definition("test", &root).unwrap();

        let (old_parent, old_index) = tree.reparent("p", "b", 0).unwrap();
        assert_eq!((old_parent.as_str(), old_index), ("a", 0));
        assert_eq!(tree.parent_of("p"), Some("b"));
        assert_eq!(tree.get("p").unwrap().content(), "hi");
        assert!(tree.children_of("a").is_empty());
        tree.check_integrity().unwrap();
    }

    #[test]
    fn test_reparent_rejects_cycles_and_root() {
        let root = NodeDefinition::new("body").with_id("root").with_child(
            NodeDefinition::new("section")
                .with_id("outer")
                .with_child(NodeDefinition::new("div").with_id("inner")),
        );
        let mut tree = DocumentTree::from_definition("test", &root).unwrap();

        assert_eq!(
            tree.reparent("outer", "inner", 0),
            Err(DocumentError::CycleDetected)
        );
        assert_eq!(
            tree.reparent("outer", "outer", 0),
            Err(DocumentError::CycleDetected)
        );
        assert_eq!(
            tree.reparent("root", "outer", 0),
            Err(DocumentError::CycleDetected)
        );
        tree.check_integrity().unwrap();
    }

    #[test]
    fn test_set_attributes_mirrors_class_and_style() {
        let mut tree = tree_with(&["a"]);
        let mut attrs = AttributeMap::new();
        attrs.insert("href".into(), json!("/docs"));
        attrs.insert("class".into(), json!("btn btn-primary"));
        attrs.insert("style".into(), json!({ "color": "red" }));
        attrs.insert("id".into(), json!("renamed"));
        tree.set_attributes("a", &attrs).unwrap();

        let node = tree.get("a").unwrap();
        assert_eq!(node.id(), "a");
        assert_eq!(node.attributes().len(), 1);
        assert_eq!(node.classes(), ["btn", "btn-primary"]);
        assert_eq!(node.style().get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_class_set_semantics() {
        let mut tree = tree_with(&["a"]);
        assert!(tree.add_class("a", "card").unwrap());
        assert!(tree.add_class("a", "wide").unwrap());
        assert!(!tree.add_class("a", "card").unwrap());
        assert_eq!(tree.get("a").unwrap().classes(), ["card", "wide"]);

        assert!(tree.remove_class("a", "card").unwrap());
        assert!(!tree.remove_class("a", "card").unwrap());
        assert_eq!(
            tree.add_class("ghost", "x"),
            Err(DocumentError::NodeNotFound("ghost".into()))
        );
    }

    #[test]
    fn test_to_json_omits_ids_unless_requested() {
        let tree = tree_with(&["a"]);
        let plain = tree.to_json("root").unwrap();
        assert!(plain.embedded_ids().is_empty());

        let with_ids = tree.to_json_with_ids("root").unwrap();
        assert_eq!(with_ids.embedded_ids(), vec!["root", "a"]);
    }
}
