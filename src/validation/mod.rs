//! Validation pipeline: the external-validator boundary and the facade that
//! ties store, engine, and localizer together.
//!
//! Constraint checking itself lives behind [`ValidatorEngine`]; this crate
//! consumes the engine's flat error list and produces the localized,
//! field-grouped [`FieldErrorTree`].

pub mod localizer;

pub use localizer::{localize, FieldErrorTree, ValidationReport};

use crate::messages::ErrorMessageIndex;
use crate::schema::{SchemaHandle, SchemaResult, SchemaStore};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// One raw error as reported by the external validator.
///
/// `schema_path` must follow the canonical addressing produced during
/// dereferencing: `#/<pointer>/<keyword>` when the matched node originates in
/// the schema being validated, `<originId>#/<pointer>/<keyword>` when it was
/// reached through a cross-document reference. Engines reporting a different
/// addressing scheme need an adapter translating paths before localization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawValidationError {
    pub keyword: String,
    /// Dot-delimited data location; empty for the document root.
    pub data_path: String,
    pub schema_path: String,
    /// The validator's own message, used when no merged message matches.
    pub message: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl RawValidationError {
    pub fn new(
        keyword: impl Into<String>,
        data_path: impl Into<String>,
        schema_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            data_path: data_path.into(),
            schema_path: schema_path.into(),
            message: message.into(),
            params: Map::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// The `missingProperty` parameter of a required-property failure.
    pub fn missing_property(&self) -> Option<&str> {
        self.params.get("missingProperty").and_then(Value::as_str)
    }
}

/// Boundary to the external JSON Schema validator engine.
///
/// An empty error list means the data is valid. The engine reads a shared
/// [`SchemaHandle`] and must not mutate anything.
pub trait ValidatorEngine: Send + Sync {
    fn validate(
        &self,
        schema: &SchemaHandle,
        data: &Value,
    ) -> SchemaResult<Vec<RawValidationError>>;
}

/// End-to-end validation facade: resolve the schema, run the engine,
/// localize the raw errors against the schema's merged message index.
pub struct ValidationService {
    store: Arc<SchemaStore>,
    engine: Box<dyn ValidatorEngine>,
}

impl ValidationService {
    pub fn new(store: Arc<SchemaStore>, engine: Box<dyn ValidatorEngine>) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &Arc<SchemaStore> {
        &self.store
    }

    /// Validates `content` against the loaded schema `schema_id`.
    ///
    /// Fails with [`crate::SchemaError::UnknownSchema`] for unregistered ids;
    /// constraint failures are never errors, they come back as
    /// [`ValidationReport::Invalid`].
    pub fn validate(&self, schema_id: &str, content: &Value) -> SchemaResult<ValidationReport> {
        let handle = self.store.get(schema_id)?;
        let raw_errors = self.engine.validate(&handle, content)?;
        debug!(
            "Validator reported {} raw errors for schema '{}'",
            raw_errors.len(),
            schema_id
        );

        let empty = ErrorMessageIndex::default();
        let index = handle.index().unwrap_or(&empty);
        localize(schema_id, &raw_errors, index)
    }
}
