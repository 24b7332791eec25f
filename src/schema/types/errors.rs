use thiserror::Error;

/// Errors raised by schema loading, merging, and localization.
///
/// Constraint failures reported by the validator engine are never represented
/// here: they are the expected output of validation and travel through
/// [`crate::validation::ValidationReport`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A JSON Pointer contained an invalid `~` escape sequence.
    #[error("Malformed pointer '{pointer}': {reason}")]
    MalformedPointer { pointer: String, reason: String },

    /// A `$ref` (or `evolves` link) target could not be resolved at load
    /// time. The whole load fails; no partial schema graph is published.
    #[error("Unresolved reference '{reference}' at {location}")]
    UnresolvedReference { reference: String, location: String },

    /// The caller asked for a schema id that was never loaded.
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// Invalid data encountered while building or routing (lock poisoning,
    /// message-tree shape conflicts, cyclic `evolves` chains).
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type SchemaResult<T> = Result<T, SchemaError>;
