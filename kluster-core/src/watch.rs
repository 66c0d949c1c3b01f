//! Types for the watch api
//!
//! A watch response is a stream of self-delimited JSON frames, each decoding
//! into one of these tagged change events, in server order.

use crate::{error::ErrorResponse, metadata::TypeMeta};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A raw event returned from a watch query
///
/// Note that a watch query returns many of these as newline separated JSON.
#[derive(Deserialize, Serialize, Clone)]
#[serde(tag = "type", content = "object", rename_all = "UPPERCASE")]
pub enum WatchEvent<K> {
    /// Resource was added
    Added(K),
    /// Resource was modified
    Modified(K),
    /// Resource was deleted
    Deleted(K),
    /// Resource bookmark. `Bookmark` is a slimmed down `K`.
    ///
    /// Only carries the resource version the watch has synced to.
    Bookmark(Bookmark),
    /// There was some kind of error
    Error(ErrorResponse),
}

impl<K> Debug for WatchEvent<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self {
            WatchEvent::Added(_) => write!(f, "Added event"),
            WatchEvent::Modified(_) => write!(f, "Modified event"),
            WatchEvent::Deleted(_) => write!(f, "Deleted event"),
            WatchEvent::Bookmark(_) => write!(f, "Bookmark event"),
            WatchEvent::Error(e) => write!(f, "Error event: {e:?}"),
        }
    }
}

/// Slimmed down `K` for [`WatchEvent::Bookmark`]
///
/// Can only be relied upon to have metadata with resource version.
/// Bookmarks contain apiVersion + kind + basically empty metadata.
#[derive(Serialize, Deserialize, Clone)]
pub struct Bookmark {
    /// apiVersion + kind
    #[serde(flatten)]
    pub types: TypeMeta,

    /// Basically empty metadata
    pub metadata: BookmarkMeta,
}

/// Slimmed down metadata for [`WatchEvent::Bookmark`]
#[derive(Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkMeta {
    /// The only field we need from a Bookmark event.
    pub resource_version: String,
}

#[cfg(test)]
mod test {
    use super::WatchEvent;
    use crate::document::Document;

    #[test]
    fn frames_decode_by_tag() {
        let added = r#"{"type":"ADDED","object":{"apiVersion":"gtest/vTest","kind":"rTest","metadata":{"name":"normal_watch"}}}"#;
        match serde_json::from_str::<WatchEvent<Document>>(added).unwrap() {
            WatchEvent::Added(d) => assert_eq!(d.name(), Some("normal_watch")),
            ev => panic!("expected Added, got {ev:?}"),
        }

        let bookmark = r#"{"type":"BOOKMARK","object":{"apiVersion":"gtest/vTest","kind":"rTest","metadata":{"resourceVersion":"123"}}}"#;
        match serde_json::from_str::<WatchEvent<Document>>(bookmark).unwrap() {
            WatchEvent::Bookmark(b) => assert_eq!(b.metadata.resource_version, "123"),
            ev => panic!("expected Bookmark, got {ev:?}"),
        }

        let error = r#"{"type":"ERROR","object":{"status":"Failure","message":"too old","reason":"Expired","code":410}}"#;
        match serde_json::from_str::<WatchEvent<Document>>(error).unwrap() {
            WatchEvent::Error(e) => assert_eq!(e.code, 410),
            ev => panic!("expected Error, got {ev:?}"),
        }
    }
}
