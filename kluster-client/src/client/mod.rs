//! A basic API client for a logical-cluster aware API server
//!
//! The [`Client`] executes [`http::Request`]s produced by the
//! [`Request`](kluster_core::Request) builder against a caller-supplied
//! [`tower`] `Service` stack, and performs standard error handling
//! on the responses.
//!
//! It can be used on its own, or through the [`Api`][crate::Api] handle
//! for structured interaction with a single resource coordinate.
use bytes::Bytes;
use either::{Either, Left, Right};
use futures::{self, future::BoxFuture, StreamExt, TryStream, TryStreamExt};
use http::{self, Request, Response, StatusCode};
use http_body_util::BodyExt;
pub use kluster_core::response::Status;
use kluster_core::WatchEvent;
use serde::de::DeserializeOwned;
use serde_json::{self, Value};
use tokio_util::{
    codec::{FramedRead, LinesCodec, LinesCodecError},
    io::StreamReader,
};
use tower::{buffer::Buffer, util::BoxService, BoxError, Layer, Service, ServiceExt};
use tower_http::map_response_body::MapResponseBodyLayer;

use crate::{error::ErrorResponse, Error, Result};

mod body;
pub use body::Body;

/// Client for connecting with an API server hosting logical clusters.
///
/// Instantiated from a `tower` `Service` stack that speaks HTTP to the
/// server; see [`Client::new`]. Cloning is cheap, all clones share one
/// buffered connection to the underlying service.
#[derive(Clone)]
pub struct Client {
    // - `Buffer` for cheap clone
    // - `BoxService` for dynamic response future type
    inner: Buffer<Request<Body>, BoxFuture<'static, Result<Response<Body>, BoxError>>>,
}

impl Client {
    /// Create a [`Client`] using a custom `Service` stack.
    ///
    /// The service is what actually carries requests to the server, so the
    /// stack must already handle base uris, authentication and transport.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use kluster_client::Client;
    /// use tower::ServiceBuilder;
    ///
    /// let service = ServiceBuilder::new()
    ///     .layer(base_uri_layer)
    ///     .layer(auth_layer)
    ///     .service(connector);
    /// let client = Client::new(service);
    /// ```
    pub fn new<S, B>(service: S) -> Self
    where
        S: Service<Request<Body>, Response = Response<B>> + Send + 'static,
        S::Future: Send + 'static,
        S::Error: Into<BoxError>,
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        // Transform response body to `Body` and use type erased error to avoid type parameters.
        let service = MapResponseBodyLayer::new(Body::wrap_body)
            .layer(service)
            .map_err(|e| e.into());
        Self {
            inner: Buffer::new(BoxService::new(service), 1024),
        }
    }

    /// Perform a raw HTTP request against the API and return the raw response back.
    /// This method can be used to get raw access to the API which may be used to, for example,
    /// create a proxy server or application-level gateway between localhost and the API server.
    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>> {
        let mut svc = self.inner.clone();
        let res = svc
            .ready()
            .await
            .map_err(Error::Service)?
            .call(request)
            .await
            .map_err(|err| {
                // Error decorating request
                err.downcast::<Error>()
                    .map(|e| *e)
                    // Error requesting
                    .or_else(|err| err.downcast::<hyper::Error>().map(|err| Error::HyperError(*err)))
                    // Error from another middleware
                    .unwrap_or_else(Error::Service)
            })?;
        Ok(res)
    }

    /// Perform a raw HTTP request against the API and deserialize the response
    /// as JSON to some known type.
    pub async fn request<T>(&self, request: Request<Vec<u8>>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let text = self.request_text(request).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("{}, {:?}", text, e);
            Error::SerdeError(e)
        })
    }

    /// Perform a raw HTTP request against the API and get back the response
    /// as a string
    pub async fn request_text(&self, request: Request<Vec<u8>>) -> Result<String> {
        let res = self.send(request.map(Body::from)).await?;
        let status = res.status();
        let body_bytes = res.into_body().collect().await?.to_bytes();
        let text = String::from_utf8(body_bytes.to_vec()).map_err(Error::FromUtf8)?;
        handle_api_errors(&text, status)?;

        Ok(text)
    }

    /// Perform a raw HTTP request against the API and get back either an object
    /// deserialized as JSON or a [`Status`] Object.
    pub async fn request_status<T>(&self, request: Request<Vec<u8>>) -> Result<Either<T, Status>>
    where
        T: DeserializeOwned,
    {
        let text = self.request_text(request).await?;
        // It needs to be JSON:
        let v: Value = serde_json::from_str(&text).map_err(Error::SerdeError)?;
        if v["kind"] == "Status" {
            tracing::trace!("Status from {}", text);
            Ok(Right(serde_json::from_str::<Status>(&text).map_err(|e| {
                tracing::warn!("{}, {:?}", text, e);
                Error::SerdeError(e)
            })?))
        } else {
            Ok(Left(serde_json::from_str::<T>(&text).map_err(|e| {
                tracing::warn!("{}, {:?}", text, e);
                Error::SerdeError(e)
            })?))
        }
    }

    /// Perform a raw request and get back a stream of [`WatchEvent`] objects
    ///
    /// A frame that fails to decode is terminal: the error is yielded as the
    /// final item and the sequence ends.
    pub async fn request_events<T>(
        &self,
        request: Request<Vec<u8>>,
    ) -> Result<impl TryStream<Item = Result<WatchEvent<T>>>>
    where
        T: Clone + DeserializeOwned,
    {
        let res = self.send(request.map(Body::from)).await?;
        tracing::trace!("headers: {:?}", res.headers());

        // Frame the chunked response into newline delimited json
        let frames = FramedRead::new(
            StreamReader::new(
                res.into_body()
                    .into_data_stream()
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
            ),
            LinesCodec::new(),
        );

        let events = frames.filter_map(|res| async {
            match res {
                Ok(line) => match serde_json::from_str::<WatchEvent<T>>(&line) {
                    Ok(event) => Some(Ok(event)),
                    Err(e) => {
                        // Ignore EOF error that can happen for incomplete line from `decode_eof`.
                        if e.is_eof() {
                            return None;
                        }

                        // Got general error response
                        if let Ok(e_resp) = serde_json::from_str::<ErrorResponse>(&line) {
                            return Some(Err(Error::Api(e_resp)));
                        }
                        // Parsing error
                        Some(Err(Error::SerdeError(e)))
                    }
                },

                Err(LinesCodecError::Io(e)) => match e.kind() {
                    // Client timeout
                    std::io::ErrorKind::TimedOut => {
                        tracing::warn!("timeout in poll: {}", e);
                        None
                    }
                    // Unexpected EOF from chunked decoder.
                    // Tends to happen after 300+s of watching.
                    std::io::ErrorKind::UnexpectedEof => {
                        tracing::warn!("eof in poll: {}", e);
                        None
                    }
                    _ => Some(Err(Error::ReadEvents(e))),
                },

                // Reached the maximum line length without finding a newline.
                // This should never happen because we're using the default `usize::MAX`.
                Err(LinesCodecError::MaxLineLengthExceeded) => {
                    Some(Err(Error::LinesCodecMaxLineLengthExceeded))
                }
            }
        });

        // Errors are terminal: emit the first one and end the sequence there.
        Ok(events.scan(false, |errored, item| {
            let emit = if *errored {
                None
            } else {
                *errored = item.is_err();
                Some(item)
            };
            futures::future::ready(emit)
        }))
    }
}

/// Server returned error handling
///
/// Either the server returned an explicit error structure,
/// or it somehow returned something we couldn't parse as one.
///
/// In either case, present an ApiError upstream.
/// The latter is probably a bug if encountered.
fn handle_api_errors(text: &str, s: StatusCode) -> Result<()> {
    if s.is_client_error() || s.is_server_error() {
        if let Ok(errdata) = serde_json::from_str::<ErrorResponse>(text) {
            tracing::debug!("Unsuccessful: {:?}", errdata);
            Err(Error::Api(errdata))
        } else {
            tracing::warn!("Unsuccessful data error parse: {}", text);
            let ae = ErrorResponse {
                status: s.to_string(),
                code: s.as_u16(),
                message: format!("{text:?}"),
                reason: "Failed to parse error data".into(),
            };
            tracing::debug!("Unsuccessful: {:?} (reconstruct)", ae);
            Err(Error::Api(ae))
        }
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Api, Client, Error};
    use kluster_core::{cluster::Cluster, gvr::GroupVersionResource, Document};

    use futures::pin_mut;
    use http::{Request, Response};

    use super::Body;
    use tower_test::mock;

    #[tokio::test]
    async fn test_mock() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            // Receive a request for one object and respond with some data
            pin_mut!(handle);
            let (request, send) = handle.next_request().await.expect("service not called");
            assert_eq!(request.method(), http::Method::GET);
            assert_eq!(
                request.uri().to_string(),
                "/clusters/testcluster/apis/gtest/vtest/namespaces/nstest/rtest/namespaced_get"
            );
            let obj = serde_json::json!({
                "apiVersion": "gtest/vtest",
                "kind": "rtest",
                "metadata": { "name": "namespaced_get", "namespace": "nstest" },
            });
            send.send_response(
                Response::builder()
                    .body(Body::from(serde_json::to_vec(&obj).unwrap()))
                    .unwrap(),
            );
        });

        let api = Api::namespaced(
            Client::new(mock_service),
            &"testcluster".parse::<Cluster>().unwrap(),
            &GroupVersionResource::gvr("gtest", "vtest", "rtest"),
            "nstest",
        )
        .unwrap();
        let obj: Document = api.get("namespaced_get").await.unwrap();
        assert_eq!(obj.name(), Some("namespaced_get"));
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn api_errors_surface_status() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (_request, send) = handle.next_request().await.expect("service not called");
            let status = serde_json::json!({
                "kind": "Status",
                "apiVersion": "v1",
                "status": "Failure",
                "message": "rtest \"missing\" not found",
                "reason": "NotFound",
                "code": 404,
            });
            send.send_response(
                Response::builder()
                    .status(404)
                    .body(Body::from(serde_json::to_vec(&status).unwrap()))
                    .unwrap(),
            );
        });

        let api = Api::cluster(
            Client::new(mock_service),
            &"testcluster".parse::<Cluster>().unwrap(),
            &GroupVersionResource::gvr("gtest", "vtest", "rtest"),
        )
        .unwrap();
        let err = api.get("missing").await.unwrap_err();
        match err {
            Error::Api(ae) => {
                assert_eq!(ae.code, 404);
                assert_eq!(ae.reason, "NotFound");
            }
            e => panic!("unexpected error: {e:?}"),
        }
        spawned.await.unwrap();
    }
}
