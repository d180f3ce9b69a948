//! Message body representation.
//!
//! A [`Body`] is either a fixed byte payload whose length is known upfront, or a
//! streaming source whose length is unknown until it ends. The message core only
//! asks a body for its [`count`](Body::count); producing the bytes is left to the
//! serializer through the [`http_body::Body`] implementation.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{Stream, TryStreamExt};
use http_body::Body as HttpBody;
use http_body::{Frame, SizeHint};
use http_body_util::combinators::UnsyncBoxBody;
use http_body_util::{BodyExt, StreamBody};

use crate::protocol::BodyError;

pub struct Body {
    kind: Kind,
}

enum Kind {
    // `sent` only tracks the `http_body::Body` side; the payload itself never changes
    Fixed { bytes: Bytes, sent: bool },
    Stream(UnsyncBoxBody<Bytes, BodyError>),
}

impl Body {
    pub fn empty() -> Self {
        Self::fixed(Bytes::new())
    }

    pub fn fixed<B: Into<Bytes>>(bytes: B) -> Self {
        Self { kind: Kind::Fixed { bytes: bytes.into(), sent: false } }
    }

    /// Wraps a body of unknown length, which will be sent chunked or close-delimited.
    ///
    /// The stream is always treated as length-unknown, even if it reports an exact
    /// size hint.
    pub fn stream<B>(body: B) -> Self
    where
        B: HttpBody<Data = Bytes> + Send + 'static,
        B::Error: Into<BodyError>,
    {
        Self { kind: Kind::Stream(UnsyncBoxBody::new(body.map_err(Into::<BodyError>::into))) }
    }

    /// Wraps a stream of byte chunks as a streaming body.
    pub fn from_stream<S, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<BodyError> + 'static,
    {
        Self::stream(StreamBody::new(stream.map_ok(Frame::data)))
    }

    /// The exact length in bytes, or `None` when the body must be streamed.
    pub fn count(&self) -> Option<u64> {
        match &self.kind {
            Kind::Fixed { bytes, .. } => Some(bytes.len() as u64),
            Kind::Stream(_) => None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.kind, Kind::Stream(_))
    }

    /// The payload of a fixed body, also after it has been polled.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.kind {
            Kind::Fixed { bytes, .. } => Some(bytes),
            Kind::Stream(_) => None,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::fixed(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::fixed(value)
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::fixed(value)
    }
}

impl From<&'static str> for Body {
    fn from(value: &'static str) -> Self {
        Self::fixed(value)
    }
}

impl From<()> for Body {
    fn from((): ()) -> Self {
        Self::empty()
    }
}

impl HttpBody for Body {
    type Data = Bytes;
    type Error = BodyError;

    fn poll_frame(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.get_mut().kind {
            Kind::Fixed { bytes, sent } => {
                if *sent || bytes.is_empty() {
                    return Poll::Ready(None);
                }
                *sent = true;
                Poll::Ready(Some(Ok(Frame::data(bytes.clone()))))
            }
            Kind::Stream(box_body) => Pin::new(box_body).poll_frame(cx),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.kind {
            Kind::Fixed { bytes, sent } => *sent || bytes.is_empty(),
            Kind::Stream(box_body) => box_body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.kind {
            Kind::Fixed { sent: true, .. } => SizeHint::with_exact(0),
            Kind::Fixed { bytes, sent: false } => SizeHint::with_exact(bytes.len() as u64),
            Kind::Stream(box_body) => box_body.size_hint(),
        }
    }
}

/// Short form: the payload as text when it is UTF-8.
impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Fixed { bytes, .. } => match std::str::from_utf8(bytes) {
                Ok(text) => f.write_str(text),
                Err(_) => write!(f, "<{} bytes>", bytes.len()),
            },
            Kind::Stream(_) => f.write_str("<stream>"),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::Fixed { bytes, .. } => f.debug_tuple("Body::Fixed").field(bytes).finish(),
            Kind::Stream(box_body) => f.debug_struct("Body::Stream").field("size_hint", &box_body.size_hint()).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use futures::stream;

    use super::*;

    #[tokio::test]
    async fn fixed_body_count_and_bytes() {
        let body = Body::fixed("hello");
        assert_eq!(body.count(), Some(5));
        assert!(!body.is_streaming());
        assert_eq!(body.as_bytes(), Some(&Bytes::from_static(b"hello")));
        assert_eq!(body.size_hint().exact(), Some(5));

        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(collected, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn empty_body_has_zero_count() {
        let body = Body::empty();
        assert_eq!(body.count(), Some(0));
        assert!(body.is_end_stream());

        let collected = body.collect().await.unwrap().to_bytes();
        assert!(collected.is_empty());
    }

    #[tokio::test]
    async fn stream_body_has_no_count() {
        let chunks = vec![Ok::<_, BodyError>(Bytes::from_static(b"hel")), Ok(Bytes::from_static(b"lo"))];
        let body = Body::from_stream(stream::iter(chunks));

        assert_eq!(body.count(), None);
        assert!(body.is_streaming());
        assert_eq!(body.as_bytes(), None);

        let collected = body.collect().await.unwrap().to_bytes();
        assert_eq!(collected, Bytes::from_static(b"hello"));
    }

    #[tokio::test]
    async fn stream_body_error_is_propagated() {
        let chunks = vec![Ok(Bytes::from_static(b"hel")), Err(BodyError::stream("peer reset"))];
        let body = Body::from_stream(stream::iter(chunks));

        let result = body.collect().await;
        assert!(matches!(result, Err(BodyError::Stream { .. })));
    }

    #[tokio::test]
    async fn count_is_stable_after_polling() {
        let mut body = Body::fixed("hello");

        let frame = body.frame().await.unwrap().unwrap();
        assert_eq!(frame.into_data().unwrap(), Bytes::from_static(b"hello"));
        assert!(body.frame().await.is_none());

        assert!(body.is_end_stream());
        assert_eq!(body.size_hint().exact(), Some(0));
        assert_eq!(body.count(), Some(5));
        assert_eq!(body.as_bytes(), Some(&Bytes::from_static(b"hello")));
        assert_eq!(format!("{body:?}"), r#"Body::Fixed(b"hello")"#);
    }

    #[tokio::test]
    async fn io_error_in_stream_becomes_body_error() {
        let chunks = vec![Ok(Bytes::from_static(b"hel")), Err(io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"))];
        let body = Body::from_stream(stream::iter(chunks));

        let Err(BodyError::Io { source }) = body.collect().await else {
            panic!("expected an io error");
        };
        assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn stream_with_exact_hint_still_has_no_count() {
        let body = Body::stream(http_body_util::Full::new(Bytes::from_static(b"abc")));
        assert_eq!(body.count(), None);
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(Body::fixed("hello").to_string(), "hello");
        assert_eq!(Body::empty().to_string(), "");
        assert_eq!(Body::fixed(vec![0xff, 0xfe]).to_string(), "<2 bytes>");
        assert_eq!(Body::from_stream(stream::empty::<Result<Bytes, BodyError>>()).to_string(), "<stream>");

        assert_eq!(format!("{:?}", Body::fixed("hi")), r#"Body::Fixed(b"hi")"#);
    }
}
