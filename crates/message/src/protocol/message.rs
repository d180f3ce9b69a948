//! The message abstraction shared by requests and responses.
//!
//! Every HTTP message has the general shape
//!
//! ```text
//! <start line>
//! Content-Length: 5
//! Foo: Bar
//!
//! hello
//! ```
//!
//! where only the start line tells a request (method and target) from a response
//! (status code). [`Message`] captures everything else: version, headers, body, and the
//! optional [`OnUpgrade`] action. Behavior common to both sides, keeping the framing
//! headers in line with the body and rendering descriptions, is provided here.

use std::any::type_name;

use http::Extensions;
use http::HeaderValue;
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use tracing::debug;

use crate::protocol::header::{CHUNKED, parse_length};
use crate::protocol::{Body, Headers, HttpVersion, OnUpgrade};

/// How the body of a synchronized message is delimited on the wire.
///
/// Returned by [`synchronize_framing`] so the serializer can pick its body encoder
/// without recomputing the headers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Framing {
    /// `Content-Length` framing with the exact length in bytes
    Length(u64),
    /// `Transfer-Encoding: chunked`
    Chunked,
    /// No framing header, the body ends when the connection closes
    CloseDelimited,
}

impl Framing {
    #[inline]
    pub fn is_chunked(&self) -> bool {
        matches!(self, Framing::Chunked)
    }

    #[inline]
    pub fn is_close_delimited(&self) -> bool {
        matches!(self, Framing::CloseDelimited)
    }
}

/// Sets `Content-Length` / `Transfer-Encoding` so they agree with `body`.
///
/// - a body of known length `N` gets exactly one `Content-Length: N` (also for `N == 0`);
///   a single existing value that parses to `N` is kept as written, anything else is
///   rewritten, duplicates included. `Transfer-Encoding` entries are dropped.
/// - a body of unknown length gets exactly one `Transfer-Encoding: chunked` and loses any
///   `Content-Length`, unless `Connection: close` is set, in which case the headers are
///   left as they are and the body is delimited by closing the connection.
///
/// Never fails, and calling it again without changing the message is a no-op.
pub fn synchronize_framing(headers: &mut Headers, body: &Body) -> Framing {
    if let Some(count) = body.count() {
        if !is_single(headers, CONTENT_LENGTH.as_str(), |value| parse_length(value) == Some(count)) {
            debug!(content_length = count, previous = ?headers.get(CONTENT_LENGTH), "rewrite content-length");
            headers.set_single(CONTENT_LENGTH, HeaderValue::from(count));
        }
        if headers.remove(TRANSFER_ENCODING).is_some() {
            debug!(content_length = count, "drop transfer-encoding for fixed length body");
        }
        return Framing::Length(count);
    }

    if headers.is_connection_close() {
        return Framing::CloseDelimited;
    }

    if !is_single(headers, TRANSFER_ENCODING.as_str(), |value| value.as_bytes() == CHUNKED.as_bytes()) {
        debug!(previous = ?headers.get(TRANSFER_ENCODING), "set transfer-encoding chunked");
        headers.set_single(TRANSFER_ENCODING, HeaderValue::from_static(CHUNKED));
    }
    if headers.remove(CONTENT_LENGTH).is_some() {
        debug!("drop content-length for streaming body");
    }
    Framing::Chunked
}

/// Whether `name` occurs exactly once and its value passes `accept`.
fn is_single<F>(headers: &Headers, name: &str, accept: F) -> bool
where
    F: FnOnce(&HeaderValue) -> bool,
{
    let mut values = headers.get_all(name);
    values.next().is_some_and(accept) && values.next().is_none()
}

/// Capabilities shared by HTTP requests and responses.
///
/// Implementors only provide field access; synchronization and descriptions come as
/// provided methods.
pub trait Message {
    fn version(&self) -> HttpVersion;

    fn set_version(&mut self, version: HttpVersion);

    fn headers(&self) -> &Headers;

    fn headers_mut(&mut self) -> &mut Headers;

    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    fn on_upgrade(&self) -> Option<&OnUpgrade>;

    fn on_upgrade_mut(&mut self) -> &mut Option<OnUpgrade>;

    /// Typed side-table for data attached to the message by surrounding layers.
    fn extensions(&self) -> &Extensions;

    fn extensions_mut(&mut self) -> &mut Extensions;

    /// Split borrow of headers and body, used by [`Message::synchronize_framing`].
    fn headers_and_body_mut(&mut self) -> (&mut Headers, &Body);

    /// Replaces the body, returning the previous one.
    ///
    /// Framing headers are stale until [`Message::synchronize_framing`] runs again.
    fn replace_body(&mut self, body: Body) -> Body {
        std::mem::replace(self.body_mut(), body)
    }

    fn set_on_upgrade(&mut self, on_upgrade: OnUpgrade) -> Option<OnUpgrade> {
        self.on_upgrade_mut().replace(on_upgrade)
    }

    /// Removes the upgrade action so the connection layer can run it.
    fn take_on_upgrade(&mut self) -> Option<OnUpgrade> {
        self.on_upgrade_mut().take()
    }

    /// See [`synchronize_framing`]. Must run before the message is serialized.
    fn synchronize_framing(&mut self) -> Framing {
        let (headers, body) = self.headers_and_body_mut();
        synchronize_framing(headers, body)
    }

    /// Short name of the implementing type, e.g. `Request`.
    fn type_name(&self) -> &'static str {
        let full = type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    /// `(TypeName)`, the headers and the body, one part per line.
    fn description(&self) -> String {
        format!("({})\n{}\n{}", self.type_name(), self.headers(), self.body())
    }

    /// Like [`Message::description`], with the verbose form of headers and body.
    fn debug_description(&self) -> String {
        format!("({})\n{:?}\n{:?}", self.type_name(), self.headers(), self.body())
    }
}
