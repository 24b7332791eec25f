//! Schemafold validates structured data against JSON Schema documents and
//! turns raw validator diagnostics into human-readable, per-field error
//! reports.
//!
//! The crate is a pipeline of three cached/per-call stages:
//!
//! - [`schema::SchemaStore`] loads named schema documents, resolves every
//!   `$ref` (same-document and cross-document) into a shared-node graph, and
//!   caches the result as an atomically swappable snapshot.
//! - [`messages`] merges the `errors` metadata of a base schema and its
//!   evolved overlays into one [`messages::ErrorMessageIndex`].
//! - [`validation`] runs an external [`validation::ValidatorEngine`] and
//!   localizes its flat error list into a [`validation::FieldErrorTree`]
//!   grouped by field path.
//!
//! Constraint evaluation itself (type/length/pattern checking) is delegated
//! to the engine behind the [`validation::ValidatorEngine`] trait; this crate
//! owns dereferencing, message merging, and localization.

pub mod events;
pub mod messages;
pub mod pointer;
pub mod schema;
pub mod validation;

pub use events::{Consumer, MessageBus, SchemasUpdated};
pub use messages::{ErrorMessageIndex, MessageKey};
pub use schema::types::{NodeId, NodeValue, SchemaError, SchemaNode, SchemaResult, SchemaSet};
pub use schema::{SchemaHandle, SchemaSnapshot, SchemaStore};
pub use validation::{
    FieldErrorTree, RawValidationError, ValidationReport, ValidationService, ValidatorEngine,
};
