//! The dynamically-typed object model.
//!
//! Resources are addressed by [`GroupVersionResource`](crate::gvr::GroupVersionResource)
//! without compile-time schema knowledge, so bodies are carried as opaque
//! JSON mappings. Only the well-known envelope fields (`apiVersion`, `kind`,
//! `metadata.name`, `items`) get typed accessors; everything else passes
//! through untouched, with key order preserved.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::metadata::{ListMeta, TypeMeta};

#[derive(Debug, Error)]
#[error("expected a JSON object, got {0}")]
/// The supplied JSON value was not an object.
pub struct NotAnObject(&'static str);

/// One API object, represented as an opaque JSON mapping.
///
/// The client never inspects or rewrites fields beyond the envelope
/// accessors below; what the server sent is what the caller gets, key for
/// key and in order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// The `apiVersion` of the object, when present
    pub fn api_version(&self) -> Option<&str> {
        self.0.get("apiVersion").and_then(Value::as_str)
    }

    /// The `kind` of the object, when present
    pub fn kind(&self) -> Option<&str> {
        self.0.get("kind").and_then(Value::as_str)
    }

    /// The `metadata.name` of the object, when present
    pub fn name(&self) -> Option<&str> {
        self.0.get("metadata")?.get("name").and_then(Value::as_str)
    }

    /// Access an arbitrary top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a top-level field, returning any value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Consume the document and return the underlying mapping
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Document {
    type Error = NotAnObject;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(NotAnObject("null")),
            Value::Bool(_) => Err(NotAnObject("bool")),
            Value::Number(_) => Err(NotAnObject("number")),
            Value::String(_) => Err(NotAnObject("string")),
            Value::Array(_) => Err(NotAnObject("array")),
        }
    }
}

/// A generic list envelope
///
/// Produced by list queries; `items` holds the member documents in exactly
/// the order the server returned them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DocumentList {
    /// The type fields of the envelope, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,

    /// ListMeta - only really used for its `resourceVersion`
    #[serde(default)]
    pub metadata: ListMeta,

    /// The member documents, in server order
    pub items: Vec<Document>,
}

impl DocumentList {
    /// Iterate over the member documents
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.items.iter()
    }
}

impl IntoIterator for DocumentList {
    type IntoIter = std::vec::IntoIter<Self::Item>;
    type Item = Document;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DocumentList {
    type IntoIter = std::slice::Iter<'a, Document>;
    type Item = &'a Document;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod test {
    use super::{Document, DocumentList};
    use assert_json_diff::assert_json_eq;
    use serde_json::{json, Value};

    fn doc(v: Value) -> Document {
        Document::try_from(v).unwrap()
    }

    #[test]
    fn decode_encode_round_trips() {
        let raw = r#"{"apiVersion":"vTest","kind":"rTest","metadata":{"name":"item1","labels":{"b":"2","a":"1"}},"spec":{"replicas":3,"extras":[1,"two",null]}}"#;
        let d: Document = serde_json::from_str(raw).unwrap();
        // structural equality and exact byte equality (key order preserved)
        assert_eq!(serde_json::to_string(&d).unwrap(), raw);
        let d2: Document = serde_json::from_str(&serde_json::to_string(&d).unwrap()).unwrap();
        assert_eq!(d, d2);
    }

    #[test]
    fn envelope_accessors() {
        let d = doc(json!({
            "apiVersion": "gtest/vTest",
            "kind": "rTest",
            "metadata": { "name": "normal_get" },
            "spec": { "opaque": true }
        }));
        assert_eq!(d.api_version(), Some("gtest/vTest"));
        assert_eq!(d.kind(), Some("rTest"));
        assert_eq!(d.name(), Some("normal_get"));
        assert_json_eq!(d.get("spec").unwrap(), json!({ "opaque": true }));
    }

    #[test]
    fn non_objects_are_rejected() {
        assert!(Document::try_from(json!([1, 2])).is_err());
        assert!(Document::try_from(json!("str")).is_err());
        assert!(Document::try_from(Value::Null).is_err());
    }

    #[test]
    fn list_decode_preserves_item_order() {
        let raw = json!({
            "apiVersion": "vTest",
            "kind": "rTestList",
            "items": [
                { "apiVersion": "vTest", "kind": "rTest", "metadata": { "name": "item1" } },
                { "apiVersion": "vTest", "kind": "rTest", "metadata": { "name": "item2" } }
            ]
        });
        let list: DocumentList = serde_json::from_value(raw).unwrap();
        let types = list.types.as_ref().unwrap();
        assert_eq!(types.api_version, "vTest");
        assert_eq!(types.kind, "rTestList");
        let names: Vec<_> = list.iter().map(|d| d.name().unwrap()).collect();
        assert_eq!(names, vec!["item1", "item2"]);
    }
}
