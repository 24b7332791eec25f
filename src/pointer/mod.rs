//! JSON Pointer utilities (RFC 6901)
//!
//! This module contains the path plumbing shared by the dereferencer, the
//! overlay merge engine, and the error localizer:
//! - Splitting a pointer string into unescaped segments
//! - Building canonical pointer strings back up from segments
//! - Resolving (and lazily creating) a path inside a JSON tree

use crate::schema::types::{SchemaError, SchemaResult};
use serde_json::{Map, Value};

/// Splits a JSON Pointer into its unescaped segments.
///
/// The leading empty segment and the document-identity marker (`#`) are
/// dropped, as are empty segments produced by adjacent slashes. `~1` unescapes
/// to `/` and `~0` to `~`.
pub fn segments_from_pointer(pointer: &str) -> SchemaResult<Vec<String>> {
    let mut segments = Vec::new();
    for (position, raw) in pointer.split('/').enumerate() {
        if raw.is_empty() {
            continue;
        }
        // A leading '#' marks document identity, not a segment; later on it
        // is an ordinary field name.
        if raw == "#" && position == 0 {
            continue;
        }
        segments.push(unescape_segment(raw, pointer)?);
    }
    Ok(segments)
}

/// Escapes a single path segment for embedding in a pointer string.
pub fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Appends a segment to a canonical pointer. The root pointer is `""`.
pub fn append(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, escape(segment))
}

/// Builds a canonical pointer from unescaped segments.
pub fn pointer_from_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let mut pointer = String::new();
    for segment in segments {
        pointer = append(&pointer, segment.as_ref());
    }
    pointer
}

fn unescape_segment(raw: &str, pointer: &str) -> SchemaResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            other => {
                return Err(SchemaError::MalformedPointer {
                    pointer: pointer.to_string(),
                    reason: match other {
                        Some(c) => format!("invalid escape sequence '~{}'", c),
                        None => "dangling '~' at end of segment".to_string(),
                    },
                })
            }
        }
    }
    Ok(out)
}

/// Walks `tree` by `segments`, creating missing nodes along the way: an
/// object for every missing interior segment and an array for a missing final
/// segment. Returns the node at the full path.
///
/// Existing nodes of the wrong shape (a non-object interior, a non-array
/// final node) fail rather than being silently replaced.
pub fn resolve_or_create<'a, S: AsRef<str>>(
    tree: &'a mut Value,
    segments: &[S],
) -> SchemaResult<&'a mut Value> {
    let mut current = tree;
    for (depth, segment) in segments.iter().enumerate() {
        let segment = segment.as_ref();
        let last = depth == segments.len() - 1;
        let map = match current {
            Value::Object(map) => map,
            _ => {
                return Err(SchemaError::InvalidData(format!(
                    "Cannot descend into non-object node at segment '{}'",
                    segment
                )))
            }
        };
        let entry = map.entry(segment.to_string()).or_insert_with(|| {
            if last {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            }
        });
        if last && !entry.is_array() {
            return Err(SchemaError::InvalidData(format!(
                "Existing node at segment '{}' is not a message list",
                segment
            )));
        }
        current = entry;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_segments_basic() {
        assert_eq!(
            segments_from_pointer("#/definitions/address/minLength").unwrap(),
            vec!["definitions", "address", "minLength"]
        );
        assert_eq!(segments_from_pointer("/a/b").unwrap(), vec!["a", "b"]);
        assert!(segments_from_pointer("").unwrap().is_empty());
        assert!(segments_from_pointer("#").unwrap().is_empty());
    }

    #[test]
    fn test_segments_drop_adjacent_slashes() {
        assert_eq!(segments_from_pointer("//a///b/").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_hash_is_only_special_as_the_leading_marker() {
        assert_eq!(
            segments_from_pointer("#/a/#/b").unwrap(),
            vec!["a", "#", "b"]
        );
        assert_eq!(segments_from_pointer("/#").unwrap(), vec!["#"]);
    }

    #[test]
    fn test_escape_round_trip() {
        let segments = segments_from_pointer("/a~1b/c~0d").unwrap();
        assert_eq!(segments, vec!["a/b", "c~d"]);
        assert_eq!(pointer_from_segments(&segments), "/a~1b/c~0d");
    }

    #[test]
    fn test_malformed_escape_fails() {
        assert!(matches!(
            segments_from_pointer("/bad~2escape"),
            Err(SchemaError::MalformedPointer { .. })
        ));
        assert!(matches!(
            segments_from_pointer("/dangling~"),
            Err(SchemaError::MalformedPointer { .. })
        ));
    }

    #[test]
    fn test_resolve_or_create_builds_path() {
        let mut tree = json!({});
        {
            let leaf = resolve_or_create(&mut tree, &["user", "address", "street"]).unwrap();
            leaf.as_array_mut().unwrap().push(json!("too short"));
        }
        assert_eq!(tree, json!({"user": {"address": {"street": ["too short"]}}}));

        // A second resolve reuses the existing nodes.
        let leaf = resolve_or_create(&mut tree, &["user", "address", "street"]).unwrap();
        leaf.as_array_mut().unwrap().push(json!("bad pattern"));
        assert_eq!(
            tree["user"]["address"]["street"],
            json!(["too short", "bad pattern"])
        );
    }

    #[test]
    fn test_resolve_or_create_shape_conflict() {
        let mut tree = json!({"user": ["already a leaf"]});
        assert!(resolve_or_create(&mut tree, &["user", "name"]).is_err());
    }
}
