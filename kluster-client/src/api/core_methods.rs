use either::Either;
use futures::Stream;

use crate::{api::Api, Error, Result};
use kluster_core::{
    document::{Document, DocumentList},
    params::*,
    response::Status,
    Error as RequestError, WatchEvent,
};

fn object_name(obj: &Document) -> Result<&str> {
    obj.name().ok_or_else(|| {
        Error::BuildRequest(RequestError::Validation(
            "object is missing metadata.name".into(),
        ))
    })
}

/// PUSH/PUT/POST/GET abstractions
impl Api {
    /// Get a named resource
    ///
    /// # Errors
    ///
    /// This function assumes that the object is expected to always exist, and
    /// returns [`Error`] if it does not.
    pub async fn get(&self, name: &str) -> Result<Document> {
        self.get_with(name, &GetParams::default()).await
    }

    /// [Get](`Api::get`) a named resource with an explicit resourceVersion
    pub async fn get_with(&self, name: &str, gp: &GetParams) -> Result<Document> {
        let mut req = self.request.get(name, gp).map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("get");
        self.client.request::<Document>(req).await
    }

    /// Get a subresource of a named resource
    ///
    /// The `subresources` segments are appended to the object path in order.
    pub async fn get_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        gp: &GetParams,
    ) -> Result<Document> {
        let mut req = self
            .request
            .get_subresource(name, subresources, gp)
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("get_subresource");
        self.client.request::<Document>(req).await
    }

    /// Get a list of resources
    ///
    /// You use this to get everything, or a subset matching fields/labels.
    /// Item order is exactly the order the server returned.
    pub async fn list(&self, lp: &ListParams) -> Result<DocumentList> {
        let mut req = self.request.list(lp).map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("list");
        self.client.request::<DocumentList>(req).await
    }

    /// Create a resource
    ///
    /// This function requires a type that is serializable to JSON via the
    /// [`Document`] representation.
    pub async fn create(&self, pp: &PostParams, obj: &Document) -> Result<Document> {
        let bytes = serde_json::to_vec(obj).map_err(Error::SerdeError)?;
        let mut req = self.request.create(pp, bytes).map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("create");
        self.client.request::<Document>(req).await
    }

    /// Create an instance of a subresource under a named object
    ///
    /// The object name is taken from `metadata.name` of `obj`.
    pub async fn create_subresource(
        &self,
        subresources: &[&str],
        pp: &PostParams,
        obj: &Document,
    ) -> Result<Document> {
        let name = object_name(obj)?;
        let bytes = serde_json::to_vec(obj).map_err(Error::SerdeError)?;
        let mut req = self
            .request
            .create_subresource(name, subresources, pp, bytes)
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("create_subresource");
        self.client.request::<Document>(req).await
    }

    /// Replace a resource entirely with a new one
    ///
    /// This is used just like [`Api::create`], but with one additional
    /// instruction: you must set `metadata.resourceVersion` in the provided
    /// data because the server will not accept an update unless you actually
    /// knew what the last version was. The object name is taken from
    /// `metadata.name` of `obj`.
    pub async fn replace(&self, pp: &PostParams, obj: &Document) -> Result<Document> {
        self.replace_subresource(&[], pp, obj).await
    }

    /// Replace a subresource under a named object
    pub async fn replace_subresource(
        &self,
        subresources: &[&str],
        pp: &PostParams,
        obj: &Document,
    ) -> Result<Document> {
        let name = object_name(obj)?;
        let bytes = serde_json::to_vec(obj).map_err(Error::SerdeError)?;
        let mut req = self
            .request
            .replace_subresource(name, subresources, pp, bytes)
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("replace");
        self.client.request::<Document>(req).await
    }

    /// Patch a resource a subset of its properties
    ///
    /// The [`Patch`] carries the raw payload and selects the patch strategy
    /// the server applies; the bytes go out unmodified.
    pub async fn patch(&self, name: &str, pp: &PatchParams, patch: &Patch) -> Result<Document> {
        self.patch_subresource(name, &[], pp, patch).await
    }

    /// Patch a subresource of a named object
    pub async fn patch_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        pp: &PatchParams,
        patch: &Patch,
    ) -> Result<Document> {
        let mut req = self
            .request
            .patch_subresource(name, subresources, pp, patch)
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("patch");
        self.client.request::<Document>(req).await
    }

    /// Delete a named resource
    ///
    /// When you get a `K` via `Left`, your delete has started.
    /// When you get a [`Status`] via `Right`, this should be a a 2XX style
    /// confirmation that the object being gone.
    ///
    /// 4XX and 5XX status types are returned as an [`Err(kluster_client::Error::Api)`](crate::Error::Api).
    pub async fn delete(&self, name: &str, dp: &DeleteParams) -> Result<Either<Document, Status>> {
        self.delete_subresource(name, &[], dp).await
    }

    /// Delete a subresource of a named object
    pub async fn delete_subresource(
        &self,
        name: &str,
        subresources: &[&str],
        dp: &DeleteParams,
    ) -> Result<Either<Document, Status>> {
        let mut req = self
            .request
            .delete_subresource(name, subresources, dp)
            .map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("delete");
        self.client.request_status::<Document>(req).await
    }

    /// Lower level watch semantics
    ///
    /// Returns a raw stream of [`WatchEvent`]s in server emission order.
    /// The stream ends when the server closes the connection; restarting it
    /// from the last seen `resourceVersion` is the caller's concern.
    pub async fn watch(
        &self,
        wp: &WatchParams,
    ) -> Result<impl Stream<Item = Result<WatchEvent<Document>>>> {
        let mut req = self.request.watch(wp).map_err(Error::BuildRequest)?;
        req.extensions_mut().insert("watch");
        self.client.request_events::<Document>(req).await
    }
}
