//! Protocol upgrade action carried by a message.
//!
//! When a message negotiates a switch to another protocol (a `101 Switching Protocols`
//! response, a WebSocket handshake, a `CONNECT` tunnel), the connection layer hands the
//! raw byte stream to the [`OnUpgrade`] attached to that message once the handshake has
//! been written. From that point on the action owns the conversation; the HTTP codec
//! is no longer involved.
//!
//! # Encoding
//!
//! An upgrade action is behavior, not data. Its serde representation is the unit value,
//! and deserializing any input yields [`OnUpgrade::noop`], an action that succeeds
//! without touching the connection. This lets a message type derive
//! `Serialize`/`Deserialize` without losing the ability to carry an action.

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::runtime::Handle;
use tracing::{debug, error, info};

/// Input side of the upgraded connection.
pub type ByteSource = dyn AsyncRead + Send + Unpin;

/// Output side of the upgraded connection.
pub type ByteSink = dyn AsyncWrite + Send + Unpin;

/// Logic run on the raw connection after a successful upgrade handshake.
///
/// `executor` is the runtime the connection is driven on; handlers can use it to spawn
/// helper tasks. Any timeout or cancellation policy belongs to the caller.
#[async_trait]
pub trait UpgradeHandler: Send + Sync {
    async fn upgrade(&self, source: &mut ByteSource, sink: &mut ByteSink, executor: &Handle) -> io::Result<()>;
}

/// Adapts a closure returning a boxed future into an [`UpgradeHandler`].
///
/// Usually built through [`OnUpgrade::from_fn`].
#[derive(Debug)]
pub struct UpgradeFn<F> {
    f: F,
}

#[async_trait]
impl<F> UpgradeHandler for UpgradeFn<F>
where
    F: for<'a> Fn(&'a mut ByteSource, &'a mut ByteSink, &'a Handle) -> BoxFuture<'a, io::Result<()>> + Send + Sync,
{
    async fn upgrade(&self, source: &mut ByteSource, sink: &mut ByteSink, executor: &Handle) -> io::Result<()> {
        (self.f)(source, sink, executor).await
    }
}

struct Noop;

#[async_trait]
impl UpgradeHandler for Noop {
    async fn upgrade(&self, _source: &mut ByteSource, _sink: &mut ByteSink, _executor: &Handle) -> io::Result<()> {
        Ok(())
    }
}

/// The action to run when a message is upgraded.
///
/// Invoking consumes the action, so it runs at most once.
pub struct OnUpgrade {
    handler: Box<dyn UpgradeHandler>,
}

impl OnUpgrade {
    pub fn new<H>(handler: H) -> Self
    where
        H: UpgradeHandler + 'static,
    {
        Self { handler: Box::new(handler) }
    }

    /// Creates an action from a closure.
    ///
    /// ```
    /// use micro_http_message::protocol::OnUpgrade;
    /// use tokio::io::{AsyncReadExt, AsyncWriteExt};
    ///
    /// let echo = OnUpgrade::from_fn(|source, sink, _executor| {
    ///     Box::pin(async move {
    ///         let mut buf = [0u8; 1024];
    ///         loop {
    ///             let n = source.read(&mut buf).await?;
    ///             if n == 0 {
    ///                 return Ok(());
    ///             }
    ///             sink.write_all(&buf[..n]).await?;
    ///         }
    ///     })
    /// });
    /// # drop(echo);
    /// ```
    pub fn from_fn<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a mut ByteSource, &'a mut ByteSink, &'a Handle) -> BoxFuture<'a, io::Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(UpgradeFn { f })
    }

    /// An action that does nothing and always succeeds.
    pub fn noop() -> Self {
        Self::new(Noop)
    }

    /// Runs the action over the upgraded connection.
    ///
    /// # Errors
    ///
    /// Returns the I/O error produced by the action unchanged; the caller decides
    /// whether to close the connection.
    pub async fn invoke(self, source: &mut ByteSource, sink: &mut ByteSink, executor: &Handle) -> io::Result<()> {
        info!("start running upgrade action");
        match self.handler.upgrade(source, sink, executor).await {
            Ok(()) => {
                debug!("upgrade action finished");
                Ok(())
            }
            Err(e) => {
                error!(cause = %e, "upgrade action failed");
                Err(e)
            }
        }
    }
}

impl fmt::Debug for OnUpgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnUpgrade").finish_non_exhaustive()
    }
}

/// Carries an [`OnUpgrade`] inside [`http::Extensions`], which only hold `Clone` values.
///
/// Clones share the slot; whoever takes the action first gets it.
#[derive(Clone)]
pub(crate) struct UpgradeSlot {
    inner: Arc<Mutex<Option<OnUpgrade>>>,
}

impl UpgradeSlot {
    pub(crate) fn new(on_upgrade: OnUpgrade) -> Self {
        Self { inner: Arc::new(Mutex::new(Some(on_upgrade))) }
    }

    pub(crate) fn take(&self) -> Option<OnUpgrade> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

impl Serialize for OnUpgrade {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_unit()
    }
}

impl<'de> Deserialize<'de> for OnUpgrade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self::noop())
    }
}
