use std::collections::HashMap;

/// Address of one error message: the canonical identity of a schema node
/// plus the constraint keyword the message applies to.
///
/// For required-property messages the keyword is the synthetic
/// `required/<propertyName>` form produced by the merge engine; everything
/// else uses the keyword verbatim (`minLength`, `pattern`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub schema_id: String,
    pub pointer: String,
    pub keyword: String,
}

/// Merged message table for one schema and its overlay chain.
///
/// Built once per schema-set load, immutable afterwards; lookups are O(1).
/// A missing entry means the validator's own message is used verbatim.
#[derive(Debug, Clone, Default)]
pub struct ErrorMessageIndex {
    entries: HashMap<MessageKey, String>,
}

impl ErrorMessageIndex {
    pub(crate) fn insert(&mut self, key: MessageKey, message: String) {
        self.entries.insert(key, message);
    }

    pub fn lookup(&self, schema_id: &str, pointer: &str, keyword: &str) -> Option<&str> {
        let key = MessageKey {
            schema_id: schema_id.to_string(),
            pointer: pointer.to_string(),
            keyword: keyword.to_string(),
        };
        self.entries.get(&key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
