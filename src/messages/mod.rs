//! Error-message metadata: the merged index and the overlay merge engine.

pub mod index;
pub mod merge;

pub use index::{ErrorMessageIndex, MessageKey};
pub use merge::merge_messages;
