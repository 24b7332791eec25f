pub mod dereferencer;
pub mod store;
pub mod types;

pub use store::{SchemaHandle, SchemaSnapshot, SchemaStore};

// Re-export the core types at the schema module level
pub use types::{NodeId, NodeValue, SchemaError, SchemaNode, SchemaResult, SchemaSet};
