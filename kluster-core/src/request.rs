//! Request builder for cluster-scoped resource urls
use crate::{
    cluster::Cluster,
    gvr::GroupVersionResource,
    params::{DeleteParams, GetParams, ListParams, Patch, PatchParams, PostParams, WatchParams},
    Error, Result,
};

pub(crate) const JSON_MIME: &str = "application/json";

/// A request builder for a resource collection inside a logical cluster
///
/// Holds the collection url path for one (cluster, group, version, resource)
/// coordinate, optionally scoped to a namespace, and supplies constructors
/// for the supported verbs. The constructors return [`http::Request`] objects
/// with relative paths, for execution by the client crate.
#[derive(Debug, Clone)]
pub struct Request {
    /// The path component of the collection url
    pub url_path: String,
    wildcard: bool,
}

impl Request {
    /// New request builder for a resource within a cluster
    ///
    /// The path is assembled as
    /// `/clusters/{cluster}[/api/{v}|/apis/{g}/{v}][/namespaces/{ns}]/{resource}`
    /// with empty group and namespace segments omitted. A trailing slash on
    /// the resource plural is stripped.
    pub fn new(cluster: &Cluster, gvr: &GroupVersionResource, namespace: Option<&str>) -> Result<Self> {
        if gvr.version.is_empty() {
            return Err(Error::Validation("GroupVersionResource::version is required".into()));
        }
        let resource = gvr.resource.trim_end_matches('/');
        if resource.is_empty() {
            return Err(Error::Validation("GroupVersionResource::resource is required".into()));
        }

        let mut url_path = format!("/clusters/{}", cluster.path_segment());
        if gvr.group.is_empty() {
            url_path.push_str(&format!("/api/{}", gvr.version));
        } else {
            url_path.push_str(&format!("/apis/{}/{}", gvr.group, gvr.version));
        }
        if let Some(ns) = namespace {
            if !ns.is_empty() {
                url_path.push_str(&format!("/namespaces/{ns}"));
            }
        }
        url_path.push_str(&format!("/{resource}"));

        Ok(Self {
            url_path,
            wildcard: cluster.is_wildcard(),
        })
    }

    /// Whether this builder addresses the wildcard cluster
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    // Path for one named object, plus any subresource segments.
    fn item_path(&self, name: &str, subresources: &[&str]) -> Result<String> {
        if name.is_empty() {
            return Err(Error::Validation("name is required".into()));
        }
        let mut path = format!("{}/{}", self.url_path, name);
        for sub in subresources {
            if sub.is_empty() {
                return Err(Error::Validation("subresource segments must be non-empty".into()));
            }
            path.push('/');
            path.push_str(sub);
        }
        Ok(path)
    }

    // Wildcard requests fan out over every cluster, so only reads are
    // well-defined for them.
    fn reject_wildcard(&self, verb: &str) -> Result<()> {
        if self.wildcard {
            return Err(Error::Validation(format!(
                "cannot {verb} against the wildcard cluster"
            )));
        }
        Ok(())
    }

    fn finish(path: String, mut qp: form_urlencoded::Serializer<String>) -> String {
        let q = qp.finish();
        if q.is_empty() {
            path
        } else {
            format!("{path}?{q}")
        }
    }
}

/// Convenience methods found from API conventions
impl Request {
    /// List a collection of a resource
    pub fn list(&self, lp: &ListParams) -> Result<http::Request<Vec<u8>>> {
        let mut qp = form_urlencoded::Serializer::new(String::new());
        lp.populate_qp(&mut qp);
        let urlstr = Self::finish(self.url_path.clone(), qp);
        let req = http::Request::get(urlstr);
        req.body(vec![]).map_err(Error::BuildRequest)
    }

    /// Watch a collection of a resource
    pub fn watch(&self, wp: &WatchParams) -> Result<http::Request<Vec<u8>>> {
        wp.validate()?;
        let mut qp = form_urlencoded::Serializer::new(String::new());
        wp.populate_qp(&mut qp);
        let urlstr = Self::finish(self.url_path.clone(), qp);
        let req = http::Request::get(urlstr);
        req.body(vec![]).map_err(Error::BuildRequest)
    }

    /// Get a single instance
    pub fn get(&self, name: &str, gp: &GetParams) -> Result<http::Request<Vec<u8>>> {
        self.get_subresource(name, &[], gp)
    }

    /// Create an instance of a resource
    pub fn create(&self, pp: &PostParams, data: Vec<u8>) -> Result<http::Request<Vec<u8>>> {
        self.reject_wildcard("create")?;
        pp.validate()?;
        let mut qp = form_urlencoded::Serializer::new(String::new());
        pp.populate_qp(&mut qp);
        let urlstr = Self::finish(self.url_path.clone(), qp);
        http::Request::post(urlstr)
            .header(http::header::CONTENT_TYPE, JSON_MIME)
            .body(data)
            .map_err(Error::BuildRequest)
    }

    /// Replace an instance of a resource
    ///
    /// Requires `metadata.resourceVersion` set in data
    pub fn replace(&self, name: &str, pp: &PostParams, data: Vec<u8>) -> Result<http::Request<Vec<u8>>> {
        self.replace_subresource(name, &[], pp, data)
    }

    /// Patch an instance of a resource
    pub fn patch(&self, name: &str, pp: &PatchParams, patch: &Patch) -> Result<http::Request<Vec<u8>>> {
        self.patch_subresource(name, &[], pp, patch)
    }

    /// Delete an instance of a resource
    ///
    /// The request carries a body only when `dp` sets something, so plain
    /// deletes go out bodyless.
    pub fn delete(&self, name: &str, dp: &DeleteParams) -> Result<http::Request<Vec<u8>>> {
        self.delete_subresource(name, &[], dp)
    }
}

/// Subresource variants of the convenience methods
///
/// Subresources are extra path segments after the object name, in order,
/// such as `status` or `scale`.
impl Request {
    /// Get an instance of a subresource
    pub fn get_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        gp: &GetParams,
    ) -> Result<http::Request<Vec<u8>>> {
        let path = self.item_path(name, subresources)?;
        let mut qp = form_urlencoded::Serializer::new(String::new());
        if let Some(rv) = &gp.resource_version {
            qp.append_pair("resourceVersion", rv);
        }
        let urlstr = Self::finish(path, qp);
        let req = http::Request::get(urlstr);
        req.body(vec![]).map_err(Error::BuildRequest)
    }

    /// Create an instance of a subresource
    ///
    /// Unlike a collection create this targets a named object, since the
    /// subresource lives under it.
    pub fn create_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        pp: &PostParams,
        data: Vec<u8>,
    ) -> Result<http::Request<Vec<u8>>> {
        self.reject_wildcard("create")?;
        pp.validate()?;
        let path = self.item_path(name, subresources)?;
        let mut qp = form_urlencoded::Serializer::new(String::new());
        pp.populate_qp(&mut qp);
        let urlstr = Self::finish(path, qp);
        http::Request::post(urlstr)
            .header(http::header::CONTENT_TYPE, JSON_MIME)
            .body(data)
            .map_err(Error::BuildRequest)
    }

    /// Replace an instance of a subresource
    pub fn replace_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        pp: &PostParams,
        data: Vec<u8>,
    ) -> Result<http::Request<Vec<u8>>> {
        self.reject_wildcard("replace")?;
        pp.validate()?;
        let path = self.item_path(name, subresources)?;
        let mut qp = form_urlencoded::Serializer::new(String::new());
        pp.populate_qp(&mut qp);
        let urlstr = Self::finish(path, qp);
        http::Request::put(urlstr)
            .header(http::header::CONTENT_TYPE, JSON_MIME)
            .body(data)
            .map_err(Error::BuildRequest)
    }

    /// Patch an instance of a subresource
    pub fn patch_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        pp: &PatchParams,
        patch: &Patch,
    ) -> Result<http::Request<Vec<u8>>> {
        self.reject_wildcard("patch")?;
        pp.validate(patch)?;
        let path = self.item_path(name, subresources)?;
        let mut qp = form_urlencoded::Serializer::new(String::new());
        pp.populate_qp(&mut qp);
        let urlstr = Self::finish(path, qp);
        http::Request::patch(urlstr)
            .header(http::header::ACCEPT, JSON_MIME)
            .header(http::header::CONTENT_TYPE, patch.content_type())
            .body(patch.bytes().to_vec())
            .map_err(Error::BuildRequest)
    }

    /// Delete an instance of a subresource
    pub fn delete_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        dp: &DeleteParams,
    ) -> Result<http::Request<Vec<u8>>> {
        self.reject_wildcard("delete")?;
        let path = self.item_path(name, subresources)?;
        let qp = form_urlencoded::Serializer::new(String::new());
        let urlstr = Self::finish(path, qp);
        let body = if dp.is_default() {
            vec![]
        } else {
            serde_json::to_vec(dp).map_err(Error::SerializeBody)?
        };
        http::Request::delete(urlstr)
            .header(http::header::CONTENT_TYPE, JSON_MIME)
            .body(body)
            .map_err(Error::BuildRequest)
    }
}

#[cfg(test)]
mod test {
    use super::Request;
    use crate::{
        cluster::Cluster,
        gvr::GroupVersionResource,
        params::{
            DeleteParams, GetParams, ListParams, Patch, PatchParams, PostParams, Preconditions,
            WatchParams,
        },
    };

    fn gvr() -> GroupVersionResource {
        GroupVersionResource::gvr("gtest", "vtest", "rtest")
    }

    fn testcluster() -> Cluster {
        "testcluster".parse().unwrap()
    }

    #[test]
    fn list_wildcard_path() {
        let req = Request::new(&Cluster::Wildcard, &gvr(), None).unwrap();
        let req = req.list(&ListParams::default()).unwrap();
        assert_eq!(req.uri(), "/clusters/*/apis/gtest/vtest/rtest");
        assert_eq!(req.method(), "GET");
    }

    #[test]
    fn list_namespaced_path() {
        let req = Request::new(&testcluster(), &gvr(), Some("nstest")).unwrap();
        let req = req.list(&ListParams::default()).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest"
        );
    }

    #[test]
    fn list_selectors_and_paging() {
        let lp = ListParams::default().labels("app=x").limit(50);
        let req = Request::new(&testcluster(), &gvr(), None).unwrap();
        let req = req.list(&lp).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/rtest?labelSelector=app%3Dx&limit=50"
        );
    }

    #[test]
    fn core_group_path() {
        let core = GroupVersionResource::gvr("", "v1", "pods");
        let req = Request::new(&testcluster(), &core, Some("nstest")).unwrap();
        let req = req.list(&ListParams::default()).unwrap();
        assert_eq!(req.uri(), "/clusters/testcluster/api/v1/namespaces/nstest/pods");
    }

    #[test]
    fn resource_trailing_slash_normalized() {
        let slashed = GroupVersionResource::gvr("gtest", "vtest", "rtest/");
        let req = Request::new(&testcluster(), &slashed, None).unwrap();
        assert_eq!(req.url_path, "/clusters/testcluster/apis/gtest/vtest/rtest");
    }

    #[test]
    fn empty_resource_rejected() {
        assert!(Request::new(&testcluster(), &GroupVersionResource::gvr("g", "v", ""), None).is_err());
        assert!(Request::new(&testcluster(), &GroupVersionResource::gvr("g", "v", "/"), None).is_err());
    }

    #[test]
    fn get_namespaced_path() {
        let req = Request::new(&testcluster(), &gvr(), Some("nstest")).unwrap();
        let req = req.get("namespaced_get", &GetParams::default()).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest/namespaced_get"
        );
        assert_eq!(req.method(), "GET");
    }

    #[test]
    fn get_subresource_path() {
        let req = Request::new(&testcluster(), &gvr(), Some("nstest")).unwrap();
        let req = req
            .get_subresource("namespaced_get", &["srtest"], &GetParams::default())
            .unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest/namespaced_get/srtest"
        );
    }

    #[test]
    fn get_empty_name_rejected() {
        let req = Request::new(&testcluster(), &gvr(), None).unwrap();
        assert!(req.get("", &GetParams::default()).is_err());
    }

    #[test]
    fn empty_subresource_rejected() {
        let req = Request::new(&testcluster(), &gvr(), None).unwrap();
        assert!(req
            .get_subresource("name", &[""], &GetParams::default())
            .is_err());
    }

    #[test]
    fn watch_default_query() {
        let req = Request::new(&testcluster(), &gvr(), Some("nstest")).unwrap();
        let req = req.watch(&WatchParams::default()).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest?watch=true"
        );
        assert_eq!(req.uri().query(), Some("watch=true"));
    }

    #[test]
    fn watch_full_query() {
        let wp = WatchParams::default().at("10").timeout(290).bookmarks();
        let req = Request::new(&Cluster::Wildcard, &gvr(), None).unwrap();
        let req = req.watch(&wp).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/*/apis/gtest/vtest/rtest?watch=true&resourceVersion=10&timeoutSeconds=290&allowWatchBookmarks=true"
        );
    }

    #[test]
    fn watch_timeout_bounded() {
        let wp = WatchParams::default().timeout(295);
        let req = Request::new(&testcluster(), &gvr(), None).unwrap();
        assert!(req.watch(&wp).is_err());
    }

    #[test]
    fn create_path_and_content_type() {
        let req = Request::new(&testcluster(), &gvr(), Some("nstest")).unwrap();
        let req = req.create(&PostParams::default(), b"{}".to_vec()).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest"
        );
        assert_eq!(req.method(), "POST");
        assert_eq!(req.headers().get("Content-Type").unwrap(), "application/json");
    }

    #[test]
    fn create_subresource_path() {
        let req = Request::new(&testcluster(), &gvr(), Some("nstest")).unwrap();
        let req = req
            .create_subresource(
                "normal_subresource_create",
                &["srtest"],
                &PostParams::default(),
                b"{}".to_vec(),
            )
            .unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest/normal_subresource_create/srtest"
        );
        assert_eq!(req.method(), "POST");
    }

    #[test]
    fn replace_dry_run_query() {
        let pp = PostParams {
            dry_run: true,
            ..Default::default()
        };
        let req = Request::new(&testcluster(), &gvr(), None).unwrap();
        let req = req.replace("myobj", &pp, vec![]).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/rtest/myobj?dryRun=All"
        );
        assert_eq!(req.method(), "PUT");
    }

    #[test]
    fn patch_strategic_content_type() {
        let patch = Patch::Strategic(br#"{"spec":{"a":"b"}}"#.to_vec());
        let req = Request::new(&testcluster(), &gvr(), Some("nstest")).unwrap();
        let req = req.patch("mypatch", &PatchParams::default(), &patch).unwrap();
        assert_eq!(
            req.uri(),
            "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest/mypatch"
        );
        assert_eq!(req.method(), "PATCH");
        assert_eq!(
            req.headers().get("Content-Type").unwrap(),
            "application/strategic-merge-patch+json"
        );
        assert_eq!(req.body().as_slice(), br#"{"spec":{"a":"b"}}"#);
    }

    #[test]
    fn delete_default_has_no_body() {
        let req = Request::new(&testcluster(), &gvr(), None).unwrap();
        let req = req.delete("gone", &DeleteParams::default()).unwrap();
        assert_eq!(req.uri(), "/clusters/testcluster/apis/gtest/vtest/rtest/gone");
        assert_eq!(req.method(), "DELETE");
        assert!(req.body().is_empty());
        assert_eq!(req.headers().get("Content-Type").unwrap(), "application/json");
    }

    #[test]
    fn delete_options_serialized() {
        let dp = DeleteParams::background().preconditions(Preconditions {
            uid: Some("uid1111".into()),
            ..Preconditions::default()
        });
        let req = Request::new(&testcluster(), &gvr(), None).unwrap();
        let req = req.delete("gone", &dp).unwrap();
        let body: serde_json::Value = serde_json::from_slice(req.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "propagationPolicy": "Background",
                "preconditions": { "uid": "uid1111" }
            })
        );
    }

    #[test]
    fn wildcard_mutations_rejected() {
        let req = Request::new(&Cluster::Wildcard, &gvr(), None).unwrap();
        assert!(req.create(&PostParams::default(), vec![]).is_err());
        assert!(req.replace("x", &PostParams::default(), vec![]).is_err());
        assert!(req
            .patch("x", &PatchParams::default(), &Patch::Merge(b"{}".to_vec()))
            .is_err());
        assert!(req.delete("x", &DeleteParams::default()).is_err());
        // reads remain fine
        assert!(req.list(&ListParams::default()).is_ok());
        assert!(req.get("x", &GetParams::default()).is_ok());
        assert!(req.watch(&WatchParams::default()).is_ok());
    }
}
