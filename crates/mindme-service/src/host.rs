//! One-way host callback.
//!
//! The host exposes a single method, `publish_update`. New methods may only be
//! appended to this contract.

use bytes::Bytes;
use tokio::sync::mpsc;

use mindme_core::error::{ExtensionError, Result};
use mindme_core::protocol::parcel::{decode_parcel, encode_parcel};
use mindme_core::ExtensionData;

/// Receiving end of extension updates. Calls are fire-and-forget.
pub trait ExtensionHost: Send + Sync {
    /// Deliver new data, or `None` to clear and hide the extension.
    ///
    /// Returns `HostUnavailable` when the channel to the host is gone.
    fn publish_update(&self, data: Option<&ExtensionData>) -> Result<()>;
}

/// Host handle backed by an in-process channel.
///
/// Payloads travel in the binary wire encoding and the receiver decodes a
/// fresh instance, the same as across a process boundary.
#[derive(Clone)]
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<Option<Bytes>>,
}

/// Host side of a [`ChannelHost`].
pub struct HostReceiver {
    rx: mpsc::UnboundedReceiver<Option<Bytes>>,
}

/// Create a connected host handle / receiver pair.
pub fn channel() -> (ChannelHost, HostReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelHost { tx }, HostReceiver { rx })
}

impl ChannelHost {
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl ExtensionHost for ChannelHost {
    fn publish_update(&self, data: Option<&ExtensionData>) -> Result<()> {
        self.tx
            .send(data.map(encode_parcel))
            .map_err(|_| ExtensionError::HostUnavailable("host receiver dropped".into()))
    }
}

impl HostReceiver {
    /// Next update. `Ok(None)` is a clear request; the outer `None` means every
    /// sender is gone.
    pub async fn recv(&mut self) -> Option<Result<Option<ExtensionData>>> {
        let msg = self.rx.recv().await?;
        Some(msg.map(decode_parcel).transpose())
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Result<Option<ExtensionData>>> {
        let msg = self.rx.try_recv().ok()?;
        Some(msg.map(decode_parcel).transpose())
    }
}
