use std::{
    fmt,
    pin::Pin,
    task::{ready, Context, Poll},
};

use bytes::Bytes;
use http_body::{Body as HttpBody, Frame, SizeHint};
use http_body_util::{combinators::UnsyncBoxBody, BodyExt};
use tower::BoxError;

/// The request and response body type used by [`Client`](super::Client).
///
/// Requests are always buffered (built via `From<Vec<u8>>`), responses come
/// back from the mapped service as a boxed streaming body so watch calls can
/// consume frames as they arrive.
pub struct Body {
    inner: Inner,
}

enum Inner {
    // One buffered chunk, handed out on the first poll. None once taken,
    // and from the start for an empty body.
    Buffered(Option<Bytes>),
    Streamed(UnsyncBoxBody<Bytes, BoxError>),
}

impl Body {
    pub(crate) fn wrap_body<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self {
            inner: Inner::Streamed(body.map_err(Into::into).boxed_unsync()),
        }
    }
}

impl From<Bytes> for Body {
    fn from(chunk: Bytes) -> Self {
        let chunk = if chunk.is_empty() { None } else { Some(chunk) };
        Self {
            inner: Inner::Buffered(chunk),
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(buf: Vec<u8>) -> Self {
        Bytes::from(buf).into()
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = crate::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.inner {
            Inner::Buffered(chunk) => Poll::Ready(chunk.take().map(|data| Ok(Frame::data(data)))),
            Inner::Streamed(body) => Poll::Ready(
                ready!(Pin::new(body).poll_frame(cx))
                    .map(|frame| frame.map_err(crate::Error::Service)),
            ),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            Inner::Buffered(Some(chunk)) => SizeHint::with_exact(chunk.len() as u64),
            Inner::Buffered(None) => SizeHint::with_exact(0),
            Inner::Streamed(body) => body.size_hint(),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.inner {
            Inner::Buffered(chunk) => chunk.is_none(),
            Inner::Streamed(body) => body.is_end_stream(),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Buffered(chunk) => f
                .debug_tuple("Body::Buffered")
                .field(&chunk.as_ref().map_or(0, Bytes::len))
                .finish(),
            Inner::Streamed(_) => f.write_str("Body::Streamed"),
        }
    }
}
