//! Cluster selectors for targeting one (or every) logical cluster.
//!
//! Many independent logical clusters are served behind one API endpoint and
//! addressed by a `/clusters/<id>` path prefix. A request either targets one
//! concrete cluster by name or uses the reserved wildcard token `*` to span
//! all of them.
use std::{fmt, str::FromStr};

use thiserror::Error;

/// The reserved path token selecting all clusters.
const WILDCARD_TOKEN: &str = "*";

#[derive(Debug, Error)]
#[error("invalid cluster name: {0}")]
/// Rejected cluster name (empty, contains `/`, or is the wildcard token).
pub struct InvalidClusterName(pub String);

/// The validated name of one concrete logical cluster.
///
/// Opaque to the client beyond validation: non-empty, no path separators,
/// and never the wildcard token (use [`Cluster::Wildcard`] for that).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClusterName(String);

impl ClusterName {
    /// Validate and wrap a concrete cluster name
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidClusterName> {
        let name = name.into();
        if name.is_empty() || name.contains('/') || name == WILDCARD_TOKEN {
            return Err(InvalidClusterName(name));
        }
        Ok(Self(name))
    }

    /// The name as supplied by the caller
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClusterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selects which logical cluster(s) a request targets.
///
/// A closed two-variant sum rather than a string that happens to contain a
/// wildcard character, so path construction cannot confuse the two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cluster {
    /// One concrete cluster, addressed by its name
    Name(ClusterName),
    /// All clusters, rendered as the reserved `*` path token
    ///
    /// Only legal for read operations (list/watch); request construction
    /// rejects wildcard mutations.
    Wildcard,
}

impl Cluster {
    /// Construct a concrete cluster selector from a name
    pub fn name(name: impl Into<String>) -> Result<Self, InvalidClusterName> {
        Ok(Self::Name(ClusterName::new(name)?))
    }

    /// Whether this selector spans all clusters
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// The path segment this selector renders to
    pub(crate) fn path_segment(&self) -> &str {
        match self {
            Self::Name(name) => name.as_str(),
            Self::Wildcard => WILDCARD_TOKEN,
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for Cluster {
    type Err = InvalidClusterName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == WILDCARD_TOKEN {
            Ok(Self::Wildcard)
        } else {
            Self::name(s)
        }
    }
}
