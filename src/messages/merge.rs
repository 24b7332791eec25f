//! Error-Overlay Merge Engine
//!
//! Folds the `errors` metadata of a base schema and its evolved overlays into
//! one [`ErrorMessageIndex`]. Overlays are applied in order: a later layer's
//! message at the same `(pointer, keyword)` overrides an earlier one's, and
//! the base supplies the fallback messages.
//!
//! The walk is a lock-step recursion over the per-layer nodes at each
//! structural position. Index keys use the canonical identity of the node in
//! the highest layer present, which is the graph the validator engine will
//! report paths against. Objects descend by the union of child keys across
//! layers; arrays descend positionally, so `allOf` members are matched by
//! index and reordering sub-schemas between layers breaks the mapping (a
//! documented caller contract).

use crate::messages::index::{ErrorMessageIndex, MessageKey};
use crate::pointer;
use crate::schema::types::{NodeId, NodeValue, SchemaResult, SchemaSet};
use log::warn;
use std::collections::{BTreeSet, HashSet};

/// Merges the message metadata of `layers` (base first, most-evolved overlay
/// last) into one index.
///
/// Only nodes that exist in a layer contribute from that layer; a missing
/// `errors` block, or a position absent from an overlay, simply contributes
/// nothing. Recursive schemas terminate through a per-call visited set.
pub fn merge_messages(set: &SchemaSet, layers: &[NodeId]) -> SchemaResult<ErrorMessageIndex> {
    let mut index = ErrorMessageIndex::default();
    if layers.is_empty() {
        return Ok(index);
    }

    let roots: Vec<Option<NodeId>> = layers.iter().copied().map(Some).collect();
    let mut visited = HashSet::new();
    merge_position(set, &roots, &mut index, &mut visited)?;
    Ok(index)
}

fn merge_position(
    set: &SchemaSet,
    layers: &[Option<NodeId>],
    index: &mut ErrorMessageIndex,
    visited: &mut HashSet<NodeId>,
) -> SchemaResult<()> {
    // Identity comes from the highest layer present at this position.
    let Some(top) = layers.iter().rev().flatten().next().copied() else {
        return Ok(());
    };
    if !visited.insert(top) {
        return Ok(());
    }
    let key_node = set.node(top);

    // Synthetic required/<n> keys resolve against the base's required list.
    let required = layers
        .iter()
        .flatten()
        .find_map(|&node| set.required_names(node));

    // Base first, then overlays in order, so later writes win.
    for &node in layers.iter().flatten() {
        let Some(messages) = set.messages(node) else {
            continue;
        };
        for (raw_keyword, message) in messages {
            match normalize_keyword(raw_keyword, required.as_deref())? {
                Some(keyword) => index.insert(
                    MessageKey {
                        schema_id: key_node.origin.clone(),
                        pointer: key_node.pointer.clone(),
                        keyword,
                    },
                    message.clone(),
                ),
                None => warn!(
                    "Dropping message for '{}' at {}#{}: no matching target",
                    raw_keyword, key_node.origin, key_node.pointer
                ),
            }
        }
    }

    // Objects: union of child keys across layers.
    let mut child_keys = BTreeSet::new();
    for &node in layers.iter().flatten() {
        if let NodeValue::Object(children) = &set.node(node).value {
            child_keys.extend(children.keys().cloned());
        }
    }
    for key in child_keys {
        let next: Vec<Option<NodeId>> = layers
            .iter()
            .map(|node| node.and_then(|n| set.child(n, &key)))
            .collect();
        merge_position(set, &next, index, visited)?;
    }

    // Arrays: positional lock-step up to the longest layer.
    let max_len = layers
        .iter()
        .flatten()
        .filter_map(|&node| match &set.node(node).value {
            NodeValue::Array(elements) => Some(elements.len()),
            _ => None,
        })
        .max()
        .unwrap_or(0);
    for position in 0..max_len {
        let next: Vec<Option<NodeId>> = layers
            .iter()
            .map(|node| node.and_then(|n| set.element(n, position)))
            .collect();
        merge_position(set, &next, index, visited)?;
    }

    Ok(())
}

/// Normalizes an `errors` block key to its index keyword.
///
/// Plain keywords pass through verbatim. Pointer-style keys address one
/// required property, by index (`#/required/0`) or by literal name
/// (`#/required/username`), and come out as `required/<name>`; a selector
/// that matches nothing in the base's `required` list yields `None`.
fn normalize_keyword(
    raw: &str,
    required: Option<&[String]>,
) -> SchemaResult<Option<String>> {
    if !raw.contains('/') {
        return Ok(Some(raw.to_string()));
    }

    let segments = pointer::segments_from_pointer(raw)?;
    if segments.len() != 2 || segments[0] != "required" {
        return Ok(None);
    }
    let required = required.unwrap_or(&[]);

    let selector = segments[1].as_str();
    let name = match selector.parse::<usize>() {
        Ok(position) => required.get(position).map(String::as_str),
        Err(_) => required
            .iter()
            .find(|name| name.as_str() == selector)
            .map(String::as_str),
    };
    Ok(name.map(|name| format!("required/{}", name)))
}
