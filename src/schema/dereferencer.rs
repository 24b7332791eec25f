//! Schema dereferencing
//!
//! Walks raw schema documents depth-first and builds the arena-backed
//! [`SchemaSet`]:
//! - Every `$ref` node is replaced by the target node itself (shared
//!   identity, never a copy), so repeated references and recursive schemas
//!   come out as a graph with back-edges.
//! - Resolution is memoized per `(document id, pointer)` within one call;
//!   memo entries are reserved before descending so structural cycles
//!   terminate, and in-flight `$ref` resolutions are tracked so a cycle made
//!   of nothing but references fails instead of recursing.
//! - Reserved `errors` blocks and root-level `evolves` links are captured
//!   into the set's side-tables and omitted from the graph. Both keys are
//!   reserved at keyword positions only; a property or definition that
//!   happens to be named `errors` stays ordinary schema content.

use crate::pointer;
use crate::schema::types::{NodeId, NodeValue, SchemaError, SchemaResult, SchemaSet};
use log::{debug, warn};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Whether an object's keys are schema keywords or author-chosen names.
///
/// The children of `properties` and `definitions` are schemas named by the
/// document author, so reserved keys are not interpreted there.
#[derive(Debug, Clone, Copy, PartialEq)]
enum KeySpace {
    Keywords,
    Names,
}

/// Dereferences every document in the set against the whole set.
///
/// Cross-document references (`otherId#/ptr`) resolve against sibling
/// documents; an unknown document id or missing target path fails the entire
/// call with [`SchemaError::UnresolvedReference`].
pub fn dereference_documents(documents: &HashMap<String, Value>) -> SchemaResult<SchemaSet> {
    let mut dereferencer = Dereferencer {
        documents,
        set: SchemaSet::default(),
        memo: HashMap::new(),
        in_flight: HashSet::new(),
    };

    let mut ids: Vec<&String> = documents.keys().collect();
    ids.sort();
    for id in ids {
        let root = dereferencer.build(id, "", &documents[id.as_str()], KeySpace::Keywords)?;
        dereferencer.set.set_root(id, root);
    }

    debug!(
        "Dereferenced {} documents into {} nodes",
        documents.len(),
        dereferencer.set.node_count()
    );
    Ok(dereferencer.set)
}

struct Dereferencer<'a> {
    documents: &'a HashMap<String, Value>,
    set: SchemaSet,
    memo: HashMap<(String, String), NodeId>,
    in_flight: HashSet<(String, String)>,
}

impl Dereferencer<'_> {
    fn build(
        &mut self,
        doc_id: &str,
        ptr: &str,
        value: &Value,
        keys: KeySpace,
    ) -> SchemaResult<NodeId> {
        let key = (doc_id.to_string(), ptr.to_string());
        if let Some(&existing) = self.memo.get(&key) {
            return Ok(existing);
        }

        // A node carrying $ref is substituted by its target wholesale; the
        // memo also records the alias so other paths to it stay O(1).
        if let Some(reference) = value.get("$ref") {
            if let Some(reference) = reference.as_str() {
                // A chain of pure $ref nodes never reserves a structural
                // node, so a cycle of references must be caught here before
                // it recurses without bound.
                if !self.in_flight.insert(key.clone()) {
                    return Err(SchemaError::UnresolvedReference {
                        reference: reference.to_string(),
                        location: format!("{}#{}", doc_id, ptr),
                    });
                }
                let target = self.resolve_reference(doc_id, ptr, reference);
                self.in_flight.remove(&key);
                let target = target?;
                self.memo.insert(key, target);
                return Ok(target);
            }
            warn!("Non-string $ref at {}#{} left as plain content", doc_id, ptr);
        }

        // Reserve the node and memoize before descending so self-references
        // inside the subtree resolve to this id instead of recursing forever.
        let id = self.set.reserve_node(doc_id, ptr);
        self.memo.insert(key, id);

        let node_value = match value {
            Value::Object(map) => {
                let mut children = HashMap::with_capacity(map.len());
                for (child_key, child_value) in map {
                    if keys == KeySpace::Keywords {
                        if child_key == "errors" {
                            match collect_messages(child_value) {
                                Some(messages) => self.set.set_messages(id, messages),
                                None => warn!(
                                    "Ignoring non-object errors block at {}#{}",
                                    doc_id, ptr
                                ),
                            }
                            continue;
                        }
                        if child_key == "evolves" && ptr.is_empty() {
                            match child_value.as_str() {
                                Some(base) => self.set.set_evolves(doc_id, base),
                                None => warn!(
                                    "Ignoring non-string evolves link in '{}'",
                                    doc_id
                                ),
                            }
                            continue;
                        }
                    }
                    let child_keys = match keys {
                        KeySpace::Keywords
                            if child_key == "properties" || child_key == "definitions" =>
                        {
                            KeySpace::Names
                        }
                        _ => KeySpace::Keywords,
                    };
                    let child = self.build(
                        doc_id,
                        &pointer::append(ptr, child_key),
                        child_value,
                        child_keys,
                    )?;
                    children.insert(child_key.clone(), child);
                }
                NodeValue::Object(children)
            }
            Value::Array(items) => {
                let mut elements = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    let element = self.build(
                        doc_id,
                        &pointer::append(ptr, &index.to_string()),
                        item,
                        KeySpace::Keywords,
                    )?;
                    elements.push(element);
                }
                NodeValue::Array(elements)
            }
            scalar => NodeValue::Scalar(scalar.clone()),
        };

        self.set.set_value(id, node_value);
        Ok(id)
    }

    /// Resolves `reference` (`#/ptr` or `otherId#/ptr`) against the raw
    /// document set and dereferences the target at its canonical pointer.
    fn resolve_reference(
        &mut self,
        doc_id: &str,
        at: &str,
        reference: &str,
    ) -> SchemaResult<NodeId> {
        let (target_doc, fragment) = match reference.split_once('#') {
            Some((doc, fragment)) if doc.is_empty() => (doc_id, fragment),
            Some((doc, fragment)) => (doc, fragment),
            None => (doc_id, reference),
        };

        let unresolved = |reference: &str| SchemaError::UnresolvedReference {
            reference: reference.to_string(),
            location: format!("{}#{}", doc_id, at),
        };

        let raw = self
            .documents
            .get(target_doc)
            .ok_or_else(|| unresolved(reference))?;

        let segments = pointer::segments_from_pointer(fragment)?;
        let mut target = raw;
        let mut keys = KeySpace::Keywords;
        for segment in &segments {
            let next_keys = match keys {
                KeySpace::Keywords if segment == "properties" || segment == "definitions" => {
                    KeySpace::Names
                }
                _ => KeySpace::Keywords,
            };
            target = match target {
                Value::Object(map) => map.get(segment).ok_or_else(|| unresolved(reference))?,
                Value::Array(items) => {
                    let index: usize =
                        segment.parse().map_err(|_| unresolved(reference))?;
                    items.get(index).ok_or_else(|| unresolved(reference))?
                }
                _ => return Err(unresolved(reference)),
            };
            keys = next_keys;
        }

        let canonical = pointer::pointer_from_segments(&segments);
        self.build(target_doc, &canonical, target, keys)
    }
}

/// Pulls string messages out of an `errors` block. Non-string entries are
/// dropped with a warning; a non-object block yields `None`.
fn collect_messages(value: &Value) -> Option<BTreeMap<String, String>> {
    let map = value.as_object()?;
    let mut messages = BTreeMap::new();
    for (keyword, message) in map {
        match message.as_str() {
            Some(message) => {
                messages.insert(keyword.clone(), message.to_string());
            }
            None => warn!("Ignoring non-string error message for keyword '{}'", keyword),
        }
    }
    Some(messages)
}
