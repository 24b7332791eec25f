pub mod errors;
pub mod node;

pub use errors::{SchemaError, SchemaResult};
pub use node::{NodeId, NodeValue, SchemaNode, SchemaSet};
