//! Type information for dynamically addressed resources.
use serde::{Deserialize, Serialize};

/// Identifies a type-erased resource type on the API surface.
///
/// This names a resource *type*, never an instance. The group may be empty
/// for the core API group, which changes the path prefix from `/apis` to
/// `/api`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionResource {
    /// API group
    pub group: String,
    /// Version
    pub version: String,
    /// Plural resource name
    pub resource: String,
}

impl GroupVersionResource {
    /// Set the api group, version, and the plural resource name.
    pub fn gvr(group_: &str, version_: &str, resource_: &str) -> Self {
        Self {
            group: group_.to_string(),
            version: version_.to_string(),
            resource: resource_.to_string(),
        }
    }

    /// Generate the apiVersion string used in an object's manifest
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

#[cfg(test)]
mod test {
    use super::GroupVersionResource;

    #[test]
    fn api_version_elides_core_group() {
        assert_eq!(GroupVersionResource::gvr("", "v1", "pods").api_version(), "v1");
        assert_eq!(
            GroupVersionResource::gvr("gtest", "vtest", "rtest").api_version(),
            "gtest/vtest"
        );
    }
}
