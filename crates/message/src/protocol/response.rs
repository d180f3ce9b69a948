//! HTTP response message.
//!
//! [`Response`] adds the status code to the shared [`Message`] shape, and knows how to
//! build a `101 Switching Protocols` handshake carrying an upgrade action.

use std::fmt;

use http::header::{CONNECTION, UPGRADE};
use http::{Extensions, HeaderValue, StatusCode, Version};

use crate::protocol::upgrade::UpgradeSlot;
use crate::protocol::{Body, HeaderError, Headers, HttpError, HttpVersion, Message, OnUpgrade};

pub struct Response {
    status: StatusCode,
    version: HttpVersion,
    headers: Headers,
    body: Body,
    on_upgrade: Option<OnUpgrade>,
    extensions: Extensions,
}

impl Response {
    /// Creates an HTTP/1.1 response with no headers and an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            version: HttpVersion::HTTP_11,
            headers: Headers::new(),
            body: Body::empty(),
            on_upgrade: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_body<B: Into<Body>>(status: StatusCode, body: B) -> Self {
        let mut response = Self::new(status);
        response.body = body.into();
        response
    }

    /// Builds a `101 Switching Protocols` response for `protocol` (e.g. `websocket`).
    ///
    /// The connection layer runs `on_upgrade` once this response has been written.
    ///
    /// # Errors
    ///
    /// Returns [`HeaderError`] if `protocol` is not a valid header value.
    pub fn switching_protocols(protocol: &str, on_upgrade: OnUpgrade) -> Result<Self, HeaderError> {
        let protocol = HeaderValue::from_str(protocol).map_err(HeaderError::invalid_value)?;

        let mut response = Self::new(StatusCode::SWITCHING_PROTOCOLS);
        response.headers.set(CONNECTION, HeaderValue::from_static("upgrade"));
        response.headers.set(UPGRADE, protocol);
        response.on_upgrade = Some(on_upgrade);
        Ok(response)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_mut(&mut self) -> &mut StatusCode {
        &mut self.status
    }

    /// Converts into an [`http::Response`], moving the upgrade action into its extensions.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::UnsupportedVersion`] if the version has no
    /// [`http::Version`] counterpart.
    pub fn into_http(self) -> Result<http::Response<Body>, HttpError> {
        let version = Version::try_from(self.version)?;

        let mut response = http::Response::new(self.body);
        *response.status_mut() = self.status;
        *response.version_mut() = version;
        *response.headers_mut() = self.headers.into();
        *response.extensions_mut() = self.extensions;
        if let Some(on_upgrade) = self.on_upgrade {
            response.extensions_mut().insert(UpgradeSlot::new(on_upgrade));
        }
        Ok(response)
    }
}

/// Converts from an [`http::Response`], picking up an upgrade action stored by
/// [`Response::into_http`].
impl<B: Into<Body>> From<http::Response<B>> for Response {
    fn from(response: http::Response<B>) -> Self {
        let (mut parts, body) = response.into_parts();
        let on_upgrade = parts.extensions.remove::<UpgradeSlot>().and_then(|slot| slot.take());
        Self {
            status: parts.status,
            version: parts.version.into(),
            headers: parts.headers.into(),
            body: body.into(),
            on_upgrade,
            extensions: parts.extensions,
        }
    }
}

impl Message for Response {
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

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_description())
    }
}
