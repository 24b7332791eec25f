//! Schema Store
//!
//! Loads named schema documents, dereferences them into a shared [`SchemaSet`]
//! graph, builds one merged [`ErrorMessageIndex`] per schema id, and caches
//! the whole thing as an atomically swappable snapshot:
//! - `load`/`reload` build a complete new snapshot before publishing it, so a
//!   failed build keeps the previous snapshot serving (stale but consistent)
//!   and returns the error to the caller.
//! - `get` hands out a [`SchemaHandle`] that pins the snapshot it came from;
//!   validations in flight are immune to concurrent reloads.
//! - Every successful swap emits [`SchemasUpdated`] on the message bus.

use crate::events::{MessageBus, SchemasUpdated};
use crate::messages::{merge_messages, ErrorMessageIndex};
use crate::schema::dereferencer::dereference_documents;
use crate::schema::types::{NodeId, SchemaError, SchemaResult, SchemaSet};
use log::info;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// One consistent, fully built schema-set: the dereferenced graph plus the
/// merged message index for every loaded schema id.
#[derive(Debug, Clone, Default)]
pub struct SchemaSnapshot {
    set: SchemaSet,
    indexes: HashMap<String, ErrorMessageIndex>,
}

impl SchemaSnapshot {
    fn build(documents: &HashMap<String, Value>) -> SchemaResult<Self> {
        let set = dereference_documents(documents)?;

        let mut indexes = HashMap::new();
        let ids: Vec<String> = set.schema_ids().map(str::to_string).collect();
        for id in ids {
            let layers = evolves_chain(&set, &id)?;
            let index = merge_messages(&set, &layers)?;
            indexes.insert(id, index);
        }

        Ok(Self { set, indexes })
    }

    pub fn set(&self) -> &SchemaSet {
        &self.set
    }

    /// Merged message index for a schema id, if the id is loaded.
    pub fn index(&self, schema_id: &str) -> Option<&ErrorMessageIndex> {
        self.indexes.get(schema_id)
    }
}

/// A loaded schema pinned to the snapshot it was resolved from.
#[derive(Debug, Clone)]
pub struct SchemaHandle {
    snapshot: Arc<SchemaSnapshot>,
    schema_id: String,
    root: NodeId,
}

impl SchemaHandle {
    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn set(&self) -> &SchemaSet {
        &self.snapshot.set
    }

    pub fn index(&self) -> Option<&ErrorMessageIndex> {
        self.snapshot.index(&self.schema_id)
    }

    pub fn snapshot(&self) -> &Arc<SchemaSnapshot> {
        &self.snapshot
    }
}

/// Caching store for dereferenced schema sets.
pub struct SchemaStore {
    cache: Mutex<Arc<SchemaSnapshot>>,
    bus: Arc<MessageBus>,
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::with_bus(Arc::new(MessageBus::new()))
    }

    /// Creates a store publishing update events on an existing bus.
    pub fn with_bus(bus: Arc<MessageBus>) -> Self {
        Self {
            cache: Mutex::new(Arc::new(SchemaSnapshot::default())),
            bus,
        }
    }

    pub fn bus(&self) -> &Arc<MessageBus> {
        &self.bus
    }

    /// Dereferences and indexes `documents`, then publishes the result as the
    /// current snapshot. Nothing is published when the build fails.
    pub fn load(
        &self,
        documents: HashMap<String, Value>,
    ) -> SchemaResult<Arc<SchemaSnapshot>> {
        let snapshot = Arc::new(SchemaSnapshot::build(&documents)?);

        {
            let mut cache = self.cache.lock().map_err(|_| {
                SchemaError::InvalidData("Failed to acquire schema cache lock".to_string())
            })?;
            *cache = Arc::clone(&snapshot);
        }

        info!(
            "Loaded {} schema documents ({} graph nodes)",
            documents.len(),
            snapshot.set.node_count()
        );
        self.bus.publish(SchemasUpdated);
        Ok(snapshot)
    }

    /// Replaces the cached set atomically. On failure the previous snapshot
    /// keeps serving and the error is returned to the caller.
    pub fn reload(
        &self,
        documents: HashMap<String, Value>,
    ) -> SchemaResult<Arc<SchemaSnapshot>> {
        info!("Reloading {} schema documents", documents.len());
        self.load(documents)
    }

    /// The current snapshot as a whole.
    pub fn snapshot(&self) -> SchemaResult<Arc<SchemaSnapshot>> {
        let cache = self.cache.lock().map_err(|_| {
            SchemaError::InvalidData("Failed to acquire schema cache lock".to_string())
        })?;
        Ok(Arc::clone(&cache))
    }

    /// Resolves a loaded schema by id. O(1); fails with
    /// [`SchemaError::UnknownSchema`] for ids that were never loaded.
    pub fn get(&self, schema_id: &str) -> SchemaResult<SchemaHandle> {
        let snapshot = self.snapshot()?;
        let root = snapshot
            .set
            .root(schema_id)
            .ok_or_else(|| SchemaError::UnknownSchema(schema_id.to_string()))?;
        Ok(SchemaHandle {
            snapshot,
            schema_id: schema_id.to_string(),
            root,
        })
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves the overlay chain for a schema id by following `evolves` links,
/// returned base-first with `schema_id` itself last.
fn evolves_chain(set: &SchemaSet, schema_id: &str) -> SchemaResult<Vec<NodeId>> {
    let mut chain = vec![schema_id.to_string()];
    let mut current = schema_id.to_string();

    loop {
        let base = match set.evolves(&current) {
            Some(base) => base.to_string(),
            None => break,
        };

        if chain.contains(&base) {
            return Err(SchemaError::InvalidData(format!(
                "Cyclic evolves chain involving '{}'",
                base
            )));
        }
        if set.root(&base).is_none() {
            return Err(SchemaError::UnresolvedReference {
                reference: base,
                location: format!("{}#/evolves", current),
            });
        }
        chain.push(base.clone());
        current = base;
    }

    chain.reverse();
    Ok(chain
        .iter()
        .filter_map(|id| set.root(id))
        .collect())
}
