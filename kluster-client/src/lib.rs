//! Client for a Kubernetes-style API server hosting many logical clusters.
//!
//! The client is schema-agnostic. Resource bodies are carried as opaque
//! [`Document`](kluster_core::Document) values, so any group/version/resource
//! coordinate can be addressed without compile-time knowledge of its schema.
//!
//! The two main abstractions:
//!
//! - [`Client`] executes requests against a caller-supplied [`tower`] `Service`
//!   stack and handles protocol level errors.
//! - [`Api`] binds a [`Cluster`](core::cluster::Cluster) selector, a
//!   [`GroupVersionResource`](core::gvr::GroupVersionResource) and an optional
//!   namespace into a handle exposing List, Get, Create, Update, Patch, Delete
//!   and Watch.
//!
//! # Example
//!
//! ```ignore
//! use kluster_client::{Api, Client};
//! use kluster_client::core::{cluster::Cluster, gvr::GroupVersionResource};
//!
//! let client = Client::new(service);
//! let cluster: Cluster = "testcluster".parse()?;
//! let gvr = GroupVersionResource::gvr("gtest", "vtest", "rtest");
//! let api = Api::namespaced(client, &cluster, &gvr, "nstest")?;
//! let obj = api.get("my-object").await?;
//! ```

pub mod api;
pub mod client;
pub mod error;

pub use api::Api;
pub use client::Client;
pub use error::Error;

pub use kluster_core as core;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
