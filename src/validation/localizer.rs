//! Validation Error Localizer
//!
//! Maps each raw validator error through the merged message index and groups
//! the results by data field path:
//! - The keyword is the last segment of the error's schema path, the rest is
//!   the node's canonical pointer, and an optional `<originId>#` prefix names
//!   the node's origin document.
//! - Required-property failures look up the synthetic
//!   `required/<propertyName>` entry before the plain `required` one, and the
//!   missing property name becomes the final data-path segment.
//! - Errors with an empty data path land in `document_errors`; everything
//!   else is routed into the `field_errors` tree in encounter order.

use crate::messages::ErrorMessageIndex;
use crate::pointer;
use crate::schema::types::{SchemaError, SchemaResult};
use crate::validation::RawValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-field error report: free-standing document errors plus a nested
/// object tree whose leaves are arrays of message strings, mirroring the
/// shape of the validated data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldErrorTree {
    pub document_errors: Vec<String>,
    pub field_errors: Value,
}

impl FieldErrorTree {
    pub fn new() -> Self {
        Self {
            document_errors: Vec::new(),
            field_errors: Value::Object(Map::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.document_errors.is_empty()
            && self
                .field_errors
                .as_object()
                .is_some_and(|fields| fields.is_empty())
    }

    /// Messages collected at a dot-delimited field path, if any.
    pub fn messages_at(&self, path: &str) -> Option<Vec<&str>> {
        let mut current = &self.field_errors;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = current.as_object()?.get(segment)?;
        }
        Some(
            current
                .as_array()?
                .iter()
                .filter_map(Value::as_str)
                .collect(),
        )
    }
}

impl Default for FieldErrorTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one validation call. `Valid` is a real sentinel: callers can
/// tell "no constraint failed" apart from an empty error tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationReport {
    Valid,
    Invalid(FieldErrorTree),
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationReport::Valid)
    }

    pub fn errors(&self) -> Option<&FieldErrorTree> {
        match self {
            ValidationReport::Valid => None,
            ValidationReport::Invalid(tree) => Some(tree),
        }
    }
}

/// Localizes raw validator errors against the merged message index.
///
/// Zero raw errors yield [`ValidationReport::Valid`]. Multiple errors at the
/// same field path accumulate in encounter order; nothing is deduplicated or
/// sorted.
pub fn localize(
    schema_id: &str,
    errors: &[RawValidationError],
    index: &ErrorMessageIndex,
) -> SchemaResult<ValidationReport> {
    if errors.is_empty() {
        return Ok(ValidationReport::Valid);
    }

    let mut tree = FieldErrorTree::new();
    for error in errors {
        let message = resolve_message(schema_id, error, index)?
            .unwrap_or(error.message.as_str())
            .to_string();

        let mut segments: Vec<String> = error
            .data_path
            .split('.')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(property) = error.missing_property() {
            segments.push(property.to_string());
        }

        if segments.is_empty() {
            tree.document_errors.push(message);
            continue;
        }
        let slot = pointer::resolve_or_create(&mut tree.field_errors, &segments)?;
        match slot.as_array_mut() {
            Some(messages) => messages.push(Value::String(message)),
            None => {
                return Err(SchemaError::InvalidData(format!(
                    "Field error node at '{}' is not a message list",
                    error.data_path
                )))
            }
        }
    }

    Ok(ValidationReport::Invalid(tree))
}

/// Derives `(schemaId, pointer, keyword)` from the error's schema path and
/// looks up the merged index. `None` means the validator's own message
/// stands.
fn resolve_message<'a>(
    schema_id: &str,
    error: &RawValidationError,
    index: &'a ErrorMessageIndex,
) -> SchemaResult<Option<&'a str>> {
    let (origin, fragment) = match error.schema_path.split_once('#') {
        Some((prefix, fragment)) if !prefix.is_empty() => (prefix, fragment),
        Some((_, fragment)) => (schema_id, fragment),
        None => (schema_id, error.schema_path.as_str()),
    };

    let mut segments = pointer::segments_from_pointer(fragment)?;
    let Some(keyword) = segments.pop() else {
        return Ok(None);
    };
    let node_pointer = pointer::pointer_from_segments(&segments);

    if keyword == "required" {
        if let Some(property) = error.missing_property() {
            let synthetic = format!("required/{}", property);
            if let Some(message) = index.lookup(origin, &node_pointer, &synthetic) {
                return Ok(Some(message));
            }
        }
    }
    Ok(index.lookup(origin, &node_pointer, &keyword))
}
