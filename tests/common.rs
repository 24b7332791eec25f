//! Shared test fixtures: a minimal stand-in for the external JSON Schema
//! validator engine.
//!
//! The stub checks just enough keywords (`type`, `minLength`, `maxLength`,
//! `pattern`, `required`, `properties`, `allOf`) to drive the pipeline, and
//! reports schema paths in the canonical addressing the localizer expects:
//! `#/<pointer>/<keyword>`, prefixed with the origin document id when the
//! matched node came from another document. Pattern matching is a substring
//! convention (`.*CAT.*` matches strings containing `CAT`), which keeps the
//! fixtures honest without pulling a regex engine into the tests.

#![allow(dead_code)]

use schemafold::{
    NodeId, NodeValue, RawValidationError, SchemaHandle, SchemaResult, SchemaSet, ValidatorEngine,
};
use serde_json::{json, Value};
use std::collections::HashMap;

pub struct StubEngine;

impl ValidatorEngine for StubEngine {
    fn validate(
        &self,
        schema: &SchemaHandle,
        data: &Value,
    ) -> SchemaResult<Vec<RawValidationError>> {
        let mut errors = Vec::new();
        check_node(
            schema.set(),
            schema.schema_id(),
            schema.root(),
            data,
            "",
            &mut errors,
        );
        Ok(errors)
    }
}

pub fn documents(pairs: &[(&str, Value)]) -> HashMap<String, Value> {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

fn schema_path(set: &SchemaSet, schema_id: &str, node: NodeId, keyword: &str) -> String {
    let node = set.node(node);
    if node.origin == schema_id {
        format!("#{}/{}", node.pointer, keyword)
    } else {
        format!("{}#{}/{}", node.origin, node.pointer, keyword)
    }
}

fn scalar_str<'a>(set: &'a SchemaSet, node: NodeId, key: &str) -> Option<&'a str> {
    set.child(node, key)
        .and_then(|child| set.scalar(child))
        .and_then(Value::as_str)
}

fn scalar_u64(set: &SchemaSet, node: NodeId, key: &str) -> Option<u64> {
    set.child(node, key)
        .and_then(|child| set.scalar(child))
        .and_then(Value::as_u64)
}

fn check_node(
    set: &SchemaSet,
    schema_id: &str,
    node: NodeId,
    data: &Value,
    data_path: &str,
    errors: &mut Vec<RawValidationError>,
) {
    if let Some(expected) = scalar_str(set, node, "type") {
        let matches = match expected {
            "object" => data.is_object(),
            "array" => data.is_array(),
            "string" => data.is_string(),
            "number" => data.is_number(),
            _ => true,
        };
        if !matches {
            errors.push(RawValidationError::new(
                "type",
                data_path,
                schema_path(set, schema_id, node, "type"),
                format!("should be {}", expected),
            ));
        }
    }

    if let Some(text) = data.as_str() {
        if let Some(min) = scalar_u64(set, node, "minLength") {
            if (text.chars().count() as u64) < min {
                errors.push(RawValidationError::new(
                    "minLength",
                    data_path,
                    schema_path(set, schema_id, node, "minLength"),
                    format!("should NOT be shorter than {} characters", min),
                ));
            }
        }
        if let Some(max) = scalar_u64(set, node, "maxLength") {
            if (text.chars().count() as u64) > max {
                errors.push(RawValidationError::new(
                    "maxLength",
                    data_path,
                    schema_path(set, schema_id, node, "maxLength"),
                    format!("should NOT be longer than {} characters", max),
                ));
            }
        }
        if let Some(pattern) = scalar_str(set, node, "pattern") {
            let needle = pattern.trim_start_matches(".*").trim_end_matches(".*");
            if !text.contains(needle) {
                errors.push(RawValidationError::new(
                    "pattern",
                    data_path,
                    schema_path(set, schema_id, node, "pattern"),
                    format!("should match pattern \"{}\"", pattern),
                ));
            }
        }
    }

    if let Some(required) = set.required_names(node) {
        for name in required {
            let present = data.as_object().is_some_and(|map| map.contains_key(&name));
            if !present {
                errors.push(
                    RawValidationError::new(
                        "required",
                        data_path,
                        schema_path(set, schema_id, node, "required"),
                        format!("should have required property '{}'", name),
                    )
                    .with_param("missingProperty", json!(name)),
                );
            }
        }
    }

    if let Some(properties) = set.child(node, "properties") {
        if let NodeValue::Object(children) = &set.node(properties).value {
            // Deterministic order keeps error sequences stable across runs.
            let mut names: Vec<&String> = children.keys().collect();
            names.sort();
            for name in names {
                if let Some(value) = data.get(name) {
                    let child_path = if data_path.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", data_path, name)
                    };
                    check_node(set, schema_id, children[name], value, &child_path, errors);
                }
            }
        }
    }

    if let Some(all_of) = set.child(node, "allOf") {
        if let NodeValue::Array(members) = &set.node(all_of).value {
            for member in members {
                check_node(set, schema_id, *member, data, data_path, errors);
            }
        }
    }
}
