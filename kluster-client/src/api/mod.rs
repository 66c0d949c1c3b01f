//! API helpers for structured interaction with cluster-hosted resources

mod core_methods;

use std::fmt::Debug;

// Re-exports from kluster-core
pub use kluster_core::{
    cluster::{Cluster, ClusterName},
    document::{Document, DocumentList},
    gvr::GroupVersionResource,
    metadata::{ListMeta, TypeMeta},
    request::Request,
    watch::WatchEvent,
};
pub(crate) use kluster_core::params;
pub use params::{
    DeleteParams, GetParams, ListParams, Patch, PatchParams, PostParams, Preconditions,
    PropagationPolicy, WatchParams,
};

use crate::{Client, Error, Result};

/// A handle for one resource coordinate inside a logical cluster
///
/// Binds a [`Cluster`] selector, a [`GroupVersionResource`] and an optional
/// namespace into an object that exposes the supported verbs over the opaque
/// [`Document`] representation. The handle holds no mutable state, so it can
/// be cloned and shared across tasks freely.
#[derive(Clone)]
pub struct Api {
    /// The request builder object with its resource dependent url
    pub(crate) request: Request,
    /// The client to use (from this library)
    pub(crate) client: Client,
    cluster: Cluster,
    gvr: GroupVersionResource,
    namespace: Option<String>,
}

impl Api {
    /// Cluster level resources, or resources viewed across all namespaces
    ///
    /// Use [`Cluster::Wildcard`] to address every logical cluster at once;
    /// wildcard handles only support the read verbs.
    pub fn cluster(client: Client, cluster: &Cluster, gvr: &GroupVersionResource) -> Result<Self> {
        let request = Request::new(cluster, gvr, None).map_err(Error::BuildRequest)?;
        Ok(Self {
            request,
            client,
            cluster: cluster.clone(),
            gvr: gvr.clone(),
            namespace: None,
        })
    }

    /// Namespaced resource within a given namespace
    pub fn namespaced(
        client: Client,
        cluster: &Cluster,
        gvr: &GroupVersionResource,
        ns: &str,
    ) -> Result<Self> {
        Self::cluster(client, cluster, gvr)?.namespace(ns)
    }

    /// Rescope the handle to a namespace
    ///
    /// An empty namespace returns a cluster-scoped handle.
    pub fn namespace(self, ns: &str) -> Result<Self> {
        let namespace = if ns.is_empty() { None } else { Some(ns.to_string()) };
        let request =
            Request::new(&self.cluster, &self.gvr, namespace.as_deref()).map_err(Error::BuildRequest)?;
        Ok(Self {
            request,
            namespace,
            ..self
        })
    }

    /// Consume self and return the [`Client`]
    pub fn into_client(self) -> Client {
        self.into()
    }

    /// Return a reference to the current resource url path
    pub fn resource_url(&self) -> &str {
        &self.request.url_path
    }
}

impl From<Api> for Client {
    fn from(api: Api) -> Self {
        api.client
    }
}

impl Debug for Api {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Intentionally destructuring, to cause compile errors when new fields are added
        let Self {
            request,
            client: _,
            cluster,
            gvr,
            namespace,
        } = self;
        f.debug_struct("Api")
            .field("request", &request)
            .field("client", &"...")
            .field("cluster", &cluster)
            .field("gvr", &gvr)
            .field("namespace", &namespace)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::{Api, Cluster, GroupVersionResource};
    use crate::Client;

    use http::{Request, Response};
    use tower_test::mock;

    use crate::client::Body;

    #[tokio::test]
    async fn scoping_rebuilds_urls() {
        let (mock_service, _handle) = mock::pair::<Request<Body>, Response<Body>>();
        let client = Client::new(mock_service);
        let gvr = GroupVersionResource::gvr("gtest", "vtest", "rtest");

        let api = Api::cluster(client, &Cluster::Wildcard, &gvr).unwrap();
        assert_eq!(api.resource_url(), "/clusters/*/apis/gtest/vtest/rtest");

        let api = api.namespace("nstest").unwrap();
        assert_eq!(
            api.resource_url(),
            "/clusters/*/apis/gtest/vtest/namespaces/nstest/rtest"
        );

        // empty namespace re-scopes back to the cluster
        let api = api.namespace("").unwrap();
        assert_eq!(api.resource_url(), "/clusters/*/apis/gtest/vtest/rtest");
    }
}
