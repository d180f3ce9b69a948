//! The HTTP message core shared by requests and responses
//!
//! This crate defines what a request and a response have in common: a protocol
//! version, an ordered header collection, a body that is either fixed or streaming, and
//! an optional action to run when the connection switches to another protocol. It sits
//! between application code, which builds messages freely, and the wire serializer,
//! which needs the `Content-Length` / `Transfer-Encoding` headers to describe the body
//! exactly.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use futures::stream;
//! use http::StatusCode;
//! use micro_http_message::protocol::{Body, BodyError, Framing, Message, Response};
//!
//! // a fixed body gets an exact content-length
//! let mut response = Response::with_body(StatusCode::OK, "Hello World!\r\n");
//! response.headers_mut().try_set("Content-Length", "999").unwrap();
//! assert_eq!(response.synchronize_framing(), Framing::Length(14));
//! assert_eq!(response.headers().content_length(), Some(14));
//!
//! // a streaming body is sent chunked
//! let chunks = stream::iter(vec![Ok::<_, BodyError>(Bytes::from_static(b"hello"))]);
//! response.replace_body(Body::from_stream(chunks));
//! assert_eq!(response.synchronize_framing(), Framing::Chunked);
//! assert_eq!(response.headers().transfer_encoding(), Some("chunked"));
//! assert_eq!(response.headers().content_length(), None);
//! ```
//!
//! # Architecture
//!
//! Everything lives in the [`protocol`] module:
//!
//! - [`protocol::Message`]: capability trait implemented by [`protocol::Request`] and
//!   [`protocol::Response`], with framing synchronization and descriptions as
//!   provided methods
//! - [`protocol::Headers`]: ordered, case-insensitive headers
//! - [`protocol::Body`]: fixed or streaming body, implementing `http_body::Body`
//! - [`protocol::OnUpgrade`]: the upgrade action handed the raw connection
//!
//! # Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::HeaderError`]: Invalid header names or values
//! - [`protocol::BodyError`]: Streaming body errors
//!
//! Framing synchronization never fails. Upgrade actions fail with a plain
//! [`std::io::Error`], returned to the connection layer unchanged.
//!
//! # Limitations
//!
//! - No parser or serializer; the crate only guarantees the header values that drive them
//! - Messages are single-owner and not synchronized; share them across threads only
//!   behind your own lock
//! - The upgrade action has no timeout, wrap [`protocol::OnUpgrade::invoke`] if one is needed

pub mod protocol;
