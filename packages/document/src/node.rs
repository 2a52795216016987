use serde_json::Value;

use crate::NodeId;
use crate::{AttributeMap, StyleMap};

/// One element of the authored document.
///
/// Nodes are stored in a [`DocumentTree`](crate::DocumentTree) arena and refer
/// to each other by id. `parent` is a non-owning back-reference used to walk
/// upward; `children` is owned by this node. All mutation goes through the
/// tree so the arena invariants hold.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentNode {
    pub(crate) id: NodeId,
    pub(crate) tag_name: String,
    pub(crate) attributes: AttributeMap,
    pub(crate) style: StyleMap,
    pub(crate) classes: Vec<String>,
    pub(crate) content: String,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl DocumentNode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn style(&self) -> &StyleMap {
        &self.style
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Leaf text. Only meaningful while the node has no children.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Insert a class, keeping insertion order. Returns false on duplicates.
    pub(crate) fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }

    pub(crate) fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }
}
