//! Schema store integration tests: caching, reload semantics, and the
//! schemas-updated signal.

mod common;

use common::documents;
use pretty_assertions::assert_eq;
use schemafold::{SchemaError, SchemaStore};
use serde_json::json;

#[test]
fn updated_event_fires_once_per_successful_load() {
    let store = SchemaStore::new();
    let mut consumer = store.bus().subscribe();

    store
        .load(documents(&[("a", json!({ "type": "object" }))]))
        .unwrap();
    assert!(consumer.try_recv().is_ok());
    assert!(consumer.try_recv().is_err());

    store
        .reload(documents(&[("a", json!({ "type": "string" }))]))
        .unwrap();
    assert!(consumer.try_recv().is_ok());
    assert!(consumer.try_recv().is_err());
}

#[test]
fn no_event_fires_when_the_build_fails() {
    let store = SchemaStore::new();
    store
        .load(documents(&[("a", json!({ "type": "object" }))]))
        .unwrap();

    let mut consumer = store.bus().subscribe();
    let result = store.reload(documents(&[(
        "a",
        json!({ "$ref": "nowhere#/definitions/gone" }),
    )]));

    assert!(matches!(
        result,
        Err(SchemaError::UnresolvedReference { .. })
    ));
    assert!(consumer.try_recv().is_err());
    // The failed reload left the previous snapshot serving.
    assert!(store.get("a").is_ok());
}

#[test]
fn reload_replaces_the_visible_set() {
    let store = SchemaStore::new();
    store
        .load(documents(&[("old", json!({ "type": "object" }))]))
        .unwrap();
    store
        .reload(documents(&[("new", json!({ "type": "object" }))]))
        .unwrap();

    assert!(store.get("new").is_ok());
    assert!(matches!(
        store.get("old"),
        Err(SchemaError::UnknownSchema(_))
    ));
}

#[test]
fn cross_document_reference_resolves_to_the_exact_node() {
    let store = SchemaStore::new();
    let snapshot = store
        .load(documents(&[
            (
                "a",
                json!({ "definitions": { "x": { "type": "string", "minLength": 5 } } }),
            ),
            (
                "b",
                json!({ "properties": { "field": { "$ref": "a#/definitions/x" } } }),
            ),
        ]))
        .unwrap();
    let set = snapshot.set();

    let via_b = set
        .resolve(set.root("b").unwrap(), &["properties", "field"])
        .unwrap();
    let within_a = set
        .resolve(set.root("a").unwrap(), &["definitions", "x"])
        .unwrap();
    assert_eq!(via_b, within_a);
}

#[test]
fn loading_the_same_documents_twice_yields_identical_content() {
    let docs = documents(&[
        (
            "a",
            json!({ "definitions": { "x": { "maxLength": 9, "pattern": ".*z.*" } } }),
        ),
        ("b", json!({ "items": { "$ref": "a#/definitions/x" } })),
    ]);

    let first = SchemaStore::new().load(docs.clone()).unwrap();
    let second = SchemaStore::new().load(docs).unwrap();

    for snapshot in [&first, &second] {
        let set = snapshot.set();
        let node = set
            .resolve(set.root("b").unwrap(), &["items", "maxLength"])
            .unwrap();
        assert_eq!(set.scalar(node), Some(&json!(9)));
        assert_eq!(set.node(node).origin, "a");
        assert_eq!(set.node(node).pointer, "/definitions/x/maxLength");
    }
}

#[test]
fn message_metadata_never_reaches_the_schema_graph() {
    let store = SchemaStore::new();
    let snapshot = store
        .load(documents(&[(
            "a",
            json!({
                "type": "object",
                "properties": {
                    "name": { "minLength": 1, "errors": { "minLength": "short" } }
                }
            }),
        )]))
        .unwrap();
    let set = snapshot.set();
    let name = set
        .resolve(set.root("a").unwrap(), &["properties", "name"])
        .unwrap();

    assert!(set.child(name, "errors").is_none());
    assert_eq!(set.messages(name).unwrap().get("minLength").unwrap(), "short");
}
