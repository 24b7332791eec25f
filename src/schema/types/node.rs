//! Dereferenced schema graph types
//!
//! Dereferenced documents form a graph, not a tree: a `$ref` substitutes the
//! target node itself, so the same node can be reachable from several parents
//! and cycles are legal for recursive schemas. Nodes live in an arena indexed
//! by [`NodeId`], which gives every node stable identity without reference
//! counting.

use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Arena index of a node within a [`SchemaSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Structural content of a dereferenced node.
#[derive(Debug, Clone)]
pub enum NodeValue {
    Object(HashMap<String, NodeId>),
    Array(Vec<NodeId>),
    Scalar(Value),
}

/// A single dereferenced schema node.
///
/// `origin` and `pointer` are the node's canonical identity: the document it
/// was declared in and its JSON Pointer path there. They stay the same no
/// matter which `$ref` the node was reached through, so overlay merging and
/// error localization always agree on the same address.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub origin: String,
    pub pointer: String,
    pub value: NodeValue,
}

/// A fully dereferenced set of schema documents plus the reserved metadata
/// stripped out of them.
///
/// `errors` messages and root-level `evolves` links live in side-tables
/// rather than inside the graph, so a validator engine handed this set never
/// sees either non-standard keyword.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    nodes: Vec<SchemaNode>,
    roots: HashMap<String, NodeId>,
    messages: HashMap<NodeId, BTreeMap<String, String>>,
    evolves: HashMap<String, String>,
}

impl SchemaSet {
    pub(crate) fn reserve_node(&mut self, origin: &str, pointer: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode {
            origin: origin.to_string(),
            pointer: pointer.to_string(),
            value: NodeValue::Scalar(Value::Null),
        });
        id
    }

    pub(crate) fn set_value(&mut self, id: NodeId, value: NodeValue) {
        self.nodes[id.0].value = value;
    }

    pub(crate) fn set_root(&mut self, schema_id: &str, node: NodeId) {
        self.roots.insert(schema_id.to_string(), node);
    }

    pub(crate) fn set_messages(&mut self, node: NodeId, messages: BTreeMap<String, String>) {
        if !messages.is_empty() {
            self.messages.insert(node, messages);
        }
    }

    pub(crate) fn set_evolves(&mut self, schema_id: &str, base: &str) {
        self.evolves.insert(schema_id.to_string(), base.to_string());
    }

    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    /// Root node of a loaded document, if the id is known.
    pub fn root(&self, schema_id: &str) -> Option<NodeId> {
        self.roots.get(schema_id).copied()
    }

    pub fn schema_ids(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Named child of an object node.
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match &self.node(id).value {
            NodeValue::Object(children) => children.get(key).copied(),
            _ => None,
        }
    }

    /// Positional element of an array node.
    pub fn element(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match &self.node(id).value {
            NodeValue::Array(elements) => elements.get(index).copied(),
            _ => None,
        }
    }

    /// Scalar payload of a leaf node.
    pub fn scalar(&self, id: NodeId) -> Option<&Value> {
        match &self.node(id).value {
            NodeValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// `errors` metadata captured at this node during dereferencing.
    pub fn messages(&self, id: NodeId) -> Option<&BTreeMap<String, String>> {
        self.messages.get(&id)
    }

    /// Base schema id named by this document's root-level `evolves` link.
    pub fn evolves(&self, schema_id: &str) -> Option<&str> {
        self.evolves.get(schema_id).map(String::as_str)
    }

    /// Walks from `start` by unescaped path segments, crossing object keys
    /// and array indices.
    pub fn resolve<S: AsRef<str>>(&self, start: NodeId, segments: &[S]) -> Option<NodeId> {
        let mut current = start;
        for segment in segments {
            let segment = segment.as_ref();
            current = match &self.node(current).value {
                NodeValue::Object(children) => children.get(segment).copied()?,
                NodeValue::Array(elements) => {
                    let index: usize = segment.parse().ok()?;
                    elements.get(index).copied()?
                }
                NodeValue::Scalar(_) => return None,
            };
        }
        Some(current)
    }

    /// The property names in this node's `required` array, in declaration
    /// order. `None` when the node carries no well-formed `required` list.
    pub fn required_names(&self, id: NodeId) -> Option<Vec<String>> {
        let required = self.child(id, "required")?;
        match &self.node(required).value {
            NodeValue::Array(elements) => Some(
                elements
                    .iter()
                    .filter_map(|e| self.scalar(*e))
                    .filter_map(|v| v.as_str())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }
}
