//! Core types and client-less behavior for the multi-cluster dynamic client.
//!
//! Everything here is I/O free: request construction, call parameters, the
//! dynamic [`Document`] model and watch event types. The executing client
//! lives in `kluster-client` and re-exports this crate under `core`.
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod cluster;
pub use cluster::{Cluster, ClusterName};

pub mod document;
pub use document::{Document, DocumentList};

mod error;
pub use error::{Error, ErrorResponse};

pub mod gvr;
pub use gvr::GroupVersionResource;

pub mod metadata;

pub mod params;

pub mod request;
pub use request::Request;

pub mod response;

pub mod watch;
pub use watch::WatchEvent;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
