//! HTTP request message.
//!
//! [`Request`] adds the method and target URI to the shared [`Message`] shape.

use std::fmt;

use http::header::{CONNECTION, UPGRADE};
use http::{Extensions, Method, Uri, Version};

use crate::protocol::header::has_token;
use crate::protocol::upgrade::UpgradeSlot;
use crate::protocol::{Body, Headers, HttpError, HttpVersion, Message, OnUpgrade};

pub struct Request {
    method: Method,
    uri: Uri,
    version: HttpVersion,
    headers: Headers,
    body: Body,
    on_upgrade: Option<OnUpgrade>,
    extensions: Extensions,
}

impl Request {
    /// Creates an HTTP/1.1 request with no headers and an empty body.
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            version: HttpVersion::HTTP_11,
            headers: Headers::new(),
            body: Body::empty(),
            on_upgrade: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_body<B: Into<Body>>(method: Method, uri: Uri, body: B) -> Self {
        let mut request = Self::new(method, uri);
        request.body = body.into();
        request
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn method_mut(&mut self) -> &mut Method {
        &mut self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn uri_mut(&mut self) -> &mut Uri {
        &mut self.uri
    }

    /// Whether the request asks to switch protocols: a `Connection` header with the
    /// `upgrade` token plus an `Upgrade` header.
    pub fn is_upgrade_request(&self) -> bool {
        self.headers.get_str(CONNECTION).is_some_and(|value| has_token(value, "upgrade")) && self.headers.contains(UPGRADE)
    }

    /// Converts into an [`http::Request`], moving the upgrade action into its extensions.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::UnsupportedVersion`] if the version has no
    /// [`http::Version`] counterpart.
    pub fn into_http(self) -> Result<http::Request<Body>, HttpError> {
        let version = Version::try_from(self.version)?;

        let mut request = http::Request::new(self.body);
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.version_mut() = version;
        *request.headers_mut() = self.headers.into();
        *request.extensions_mut() = self.extensions;
        if let Some(on_upgrade) = self.on_upgrade {
            request.extensions_mut().insert(UpgradeSlot::new(on_upgrade));
        }
        Ok(request)
    }
}

/// Converts from an [`http::Request`], picking up an upgrade action stored by
/// [`Request::into_http`].
impl<B: Into<Body>> From<http::Request<B>> for Request {
    fn from(request: http::Request<B>) -> Self {
        let (mut parts, body) = request.into_parts();
        let on_upgrade = parts.extensions.remove::<UpgradeSlot>().and_then(|slot| slot.take());
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version.into(),
            headers: parts.headers.into(),
            body: body.into(),
            on_upgrade,
            extensions: parts.extensions,
        }
    }
}

impl Message for Request {
    fn version(&self) -> HttpVersion {
        self.version
    }

    fn set_version(&mut self, version: HttpVersion) {
        self.version = version;
    }

    fn headers(&self) -> &Headers {
        &self.headers
    }

    fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_upgrade(&self) -> Option<&OnUpgrade> {
        self.on_upgrade.as_ref()
    }

    fn on_upgrade_mut(&mut self) -> &mut Option<OnUpgrade> {
        &mut self.on_upgrade
    }

    fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    fn headers_and_body_mut(&mut self) -> (&mut Headers, &Body) {
        (&mut self.headers, &self.body)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_description())
    }
}

#[cfg(test)]
mod tests {
    use http::header::{CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
    use http::{HeaderName, HeaderValue};

    use super::*;
    use crate::protocol::Framing;

    #[test]
    fn new_request_defaults() {
        let request = Request::new(Method::GET, Uri::from_static("/index.html"));

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.uri().path(), "/index.html");
        assert_eq!(request.version(), HttpVersion::HTTP_11);
        assert!(request.headers().is_empty());
        assert_eq!(request.body().count(), Some(0));
        assert!(request.on_upgrade().is_none());
    }

    #[test]
    fn post_request_framing() {
        let mut request = Request::with_body(Method::POST, Uri::from_static("/submit"), "a=1&b=2");
        request.headers_mut().set(HOST, HeaderValue::from_static("127.0.0.1:8080"));

        assert_eq!(request.synchronize_framing(), Framing::Length(7));
        assert_eq!(request.headers().get_str(CONTENT_LENGTH), Some("7"));
        assert!(!request.headers().contains(TRANSFER_ENCODING));
    }

    #[test]
    fn detects_upgrade_request() {
        let mut request = Request::new(Method::GET, Uri::from_static("/chat"));
        assert!(!request.is_upgrade_request());

        request.headers_mut().try_set("Connection", "keep-alive, Upgrade").unwrap();
        assert!(!request.is_upgrade_request());

        request.headers_mut().try_set("Upgrade", "websocket").unwrap();
        assert!(request.is_upgrade_request());
    }

    #[test]
    fn http_request_conversion() {
        let mut request = Request::with_body(Method::PUT, Uri::from_static("/item/1"), "body");
        request.headers_mut().append(HeaderName::from_static("x-tag"), HeaderValue::from_static("a"));
        request.headers_mut().append(HeaderName::from_static("x-tag"), HeaderValue::from_static("b"));
        request.extensions_mut().insert(42_u32);
        request.set_on_upgrade(OnUpgrade::noop());

        let http_request = request.into_http().unwrap();
        assert_eq!(http_request.method(), &Method::PUT);
        assert_eq!(http_request.version(), Version::HTTP_11);
        assert_eq!(http_request.headers().get_all("x-tag").iter().count(), 2);
        assert_eq!(http_request.extensions().get::<u32>(), Some(&42));

        let request = Request::from(http_request);
        assert_eq!(request.uri().path(), "/item/1");
        assert_eq!(request.headers().get_all("x-tag").count(), 2);
        assert_eq!(request.body().count(), Some(4));
        assert_eq!(request.extensions().get::<u32>(), Some(&42));
        assert!(request.on_upgrade().is_some());
    }

    #[test]
    fn unsupported_version_fails_conversion() {
        let mut request = Request::new(Method::GET, Uri::from_static("/"));
        request.set_version(HttpVersion::new(1, 5));

        assert!(matches!(request.into_http(), Err(HttpError::UnsupportedVersion(_))));
    }

    #[test]
    fn display_uses_description() {
        let mut request = Request::new(Method::GET, Uri::from_static("/"));
        request.headers_mut().try_set("X", "1").unwrap();

        assert_eq!(request.to_string(), "(Request)\nx: 1\n");
        assert_eq!(format!("{request:?}"), "(Request)\n{\"x\": \"1\"}\nBody::Fixed(b\"\")");
    }
}
