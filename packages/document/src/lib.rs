//! # Pagecraft Document
//!
//! The authoritative document model behind the page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ NodeDefinition: persisted JSON shape        │
//! └─────────────────────────────────────────────┘
//!                     ↓ create_node / to_json
//! ┌─────────────────────────────────────────────┐
//! │ DocumentTree: arena of DocumentNodes        │
//! │  - id index, parent back-references         │
//! │  - structural + content mutators            │
//! │  - integrity checking                       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pagecraft_document::{DocumentTree, NodeDefinition};
//!
//! let page = NodeDefinition::new("body")
//!     .with_child(NodeDefinition::new("h1").with_content("Welcome"));
//! let tree = DocumentTree::from_definition("landing", &page).unwrap();
//!
//! let root = tree.root().unwrap();
//! assert_eq!(root.child_count(), 1);
//! ```

mod definition;
mod error;
mod id_generator;
mod node;
mod tree;

use std::collections::BTreeMap;

pub use definition::{
    parse_classes, parse_style, NodeDefinition, CLASS_ATTRIBUTE, ID_ATTRIBUTE, STYLE_ATTRIBUTE,
};
pub use error::{DocumentError, DocumentResult};
pub use id_generator::{get_document_id, IdGenerator};
pub use node::DocumentNode;
pub use tree::{DepthFirst, DocumentTree};

/// Stable node identifier
pub type NodeId = String;

/// Arbitrary attribute values keyed by name
pub type AttributeMap = BTreeMap<String, serde_json::Value>;

/// Inline style declarations keyed by property
pub type StyleMap = BTreeMap<String, serde_json::Value>;
