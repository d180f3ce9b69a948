//! Core HTTP message abstractions.
//!
//! This module provides the pieces shared by requests and responses, and the one
//! algorithm that ties them together: keeping the framing headers consistent with the
//! body before a message reaches the serializer.
//!
//! # Architecture
//!
//! - **Version** ([`version`]): [`HttpVersion`] value type
//! - **Headers** ([`header`]): ordered, case-insensitive [`Headers`]
//! - **Body** ([`body`]): [`Body`], fixed bytes or a stream of unknown length
//! - **Upgrade** ([`upgrade`]): [`OnUpgrade`], the action run on the raw connection
//!   after a protocol switch
//! - **Message** ([`message`]): the [`Message`] trait, [`synchronize_framing`] and
//!   [`Framing`]
//! - **Request / Response** ([`request`], [`response`]): concrete messages
//! - **Error Handling**: [`HttpError`], [`HeaderError`], [`BodyError`]
//!
//! # Lifecycle
//!
//! 1. Build a [`Request`] or [`Response`] and fill in headers and body
//! 2. Call [`Message::synchronize_framing`] once the body is final
//! 3. Hand headers and body to the serializer, which encodes the body according to
//!    the returned [`Framing`]
//! 4. After a successful upgrade handshake, [`Message::take_on_upgrade`] and
//!    [`OnUpgrade::invoke`] it with the connection's byte source and sink

pub mod body;
pub use body::Body;

pub mod header;
pub use header::Headers;

pub mod message;
pub use message::Framing;
pub use message::Message;
pub use message::synchronize_framing;

pub mod request;
pub use request::Request;

pub mod response;
pub use response::Response;

pub mod upgrade;
pub use upgrade::ByteSink;
pub use upgrade::ByteSource;
pub use upgrade::OnUpgrade;
pub use upgrade::UpgradeFn;
pub use upgrade::UpgradeHandler;

pub mod version;
pub use version::HttpVersion;

mod error;
pub use error::BodyError;
pub use error::HeaderError;
pub use error::HttpError;
