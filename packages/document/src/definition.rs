//! # Node Definitions
//!
//! The serializable shape of a document subtree. This is both what
//! `DocumentTree::to_json` produces and what `DocumentTree::create_node`
//! consumes, so a persisted document is just a root definition:
//!
//! ```json
//! {
//!   "tagName": "section",
//!   "attributes": { "data-role": "hero" },
//!   "style": { "padding": "24px" },
//!   "classes": ["hero"],
//!   "content": "",
//!   "components": [ { "tagName": "h1", "content": "Welcome" } ]
//! }
//! ```
//!
//! `attributes.id`, `attributes.class` and `attributes.style` are mirrored
//! keys: on instantiation they land in the node id, class list and style map
//! respectively and are never kept in the attribute map.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{AttributeMap, DocumentError, NodeId, StyleMap};

pub const ID_ATTRIBUTE: &str = "id";
pub const CLASS_ATTRIBUTE: &str = "class";
pub const STYLE_ATTRIBUTE: &str = "style";

/// Definition of a node and its descendants
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    pub tag_name: String,

    #[serde(default)]
    pub attributes: AttributeMap,

    #[serde(default)]
    pub style: StyleMap,

    #[serde(default)]
    pub classes: Vec<String>,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub components: Vec<NodeDefinition>,
}

impl NodeDefinition {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<Value>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_child(mut self, child: NodeDefinition) -> Self {
        self.components.push(child);
        self
    }

    /// Embed an id so instantiation keeps it instead of generating one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.attributes
            .insert(ID_ATTRIBUTE.to_string(), Value::String(id.into()));
        self
    }

    /// Id embedded in `attributes.id`, if any
    pub fn embedded_id(&self) -> Option<&str> {
        self.attributes.get(ID_ATTRIBUTE).and_then(Value::as_str)
    }

    /// Remove every embedded id in this subtree
    pub fn strip_ids(&mut self) {
        self.attributes.remove(ID_ATTRIBUTE);
        for child in &mut self.components {
            child.strip_ids();
        }
    }

    /// Embedded ids of the whole subtree, in depth-first order
    pub fn embedded_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(def) = stack.pop() {
            if let Some(id) = def.embedded_id() {
                ids.push(id.to_string());
            }
            stack.extend(def.components.iter().rev());
        }
        ids
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self
            .components
            .iter()
            .map(NodeDefinition::node_count)
            .sum::<usize>()
    }

    pub fn from_json_str(source: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Attributes split into the plain map and the mirrored keys
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MirroredAttributes {
    pub id: Option<NodeId>,
    pub attributes: AttributeMap,
    pub classes: Option<Vec<String>>,
    pub style: Option<StyleMap>,
}

pub(crate) fn split_mirrored(attributes: &AttributeMap) -> MirroredAttributes {
    let mut out = MirroredAttributes::default();

    for (name, value) in attributes {
        match name.as_str() {
            ID_ATTRIBUTE => out.id = value.as_str().map(str::to_string),
            CLASS_ATTRIBUTE => out.classes = Some(parse_classes(value)),
            STYLE_ATTRIBUTE => out.style = Some(parse_style(value)),
            _ => {
                out.attributes.insert(name.clone(), value.clone());
            }
        }
    }

    out
}

/// Class list from either `"a b c"` or `["a", "b", "c"]`, duplicates dropped
pub fn parse_classes(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(str::split_whitespace)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    let mut classes = Vec::with_capacity(raw.len());
    for class in raw {
        if !classes.contains(&class) {
            classes.push(class);
        }
    }
    classes
}

/// Style map from either an inline declaration string or an object
pub fn parse_style(value: &Value) -> StyleMap {
    match value {
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::String(s) => s
            .split(';')
            .filter_map(|decl| {
                let (prop, val) = decl.split_once(':')?;
                let prop = prop.trim();
                let val = val.trim();
                if prop.is_empty() {
                    None
                } else {
                    Some((prop.to_string(), Value::String(val.to_string())))
                }
            })
            .collect(),
        _ => StyleMap::new(),
    }
}
