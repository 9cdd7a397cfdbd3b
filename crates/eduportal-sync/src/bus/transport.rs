//! Delivery transports for the sync bus.
//!
//! A transport is the seam between one bus instance and its sibling
//! contexts. [`MemoryTransport`] fans frames out over a tokio broadcast
//! channel; [`NoopTransport`] is the degraded mode used when no delivery
//! capability exists, keeping the bus API fully usable with local-only
//! effect.

use std::fmt;

use tokio::sync::broadcast;

use eduportal_core::config::sync::SyncConfig;
use eduportal_core::types::id::ContextId;

use crate::keys;

/// One message frame as carried between contexts.
///
/// The body stays JSON-encoded end to end so a receiving context can drop
/// frames it cannot decode (e.g. tags from a newer portal version) without
/// affecting anything else.
#[derive(Debug, Clone)]
pub struct WireFrame {
    /// Context that posted the frame. Receivers drop their own frames.
    pub origin: ContextId,
    /// JSON-encoded [`SyncMessage`](crate::message::SyncMessage).
    pub body: String,
}

/// Transport seam between a bus instance and its sibling contexts.
pub trait Transport: fmt::Debug + Send + Sync {
    /// Name of the shared channel this transport delivers on.
    fn channel_name(&self) -> &str;

    /// Publish a frame to every sibling context. Best-effort: publishing
    /// with no listening sibling is not an error.
    fn publish(&self, frame: WireFrame);

    /// Open a receiver for frames from sibling contexts, or `None` when
    /// the transport cannot deliver.
    fn subscribe(&self) -> Option<broadcast::Receiver<WireFrame>>;
}

/// In-process transport backed by a tokio broadcast channel.
///
/// Every bus connected to a clone of the same `MemoryTransport` is a
/// sibling context. Slow receivers that fall more than `capacity` frames
/// behind lose the oldest frames (delivery is at most once).
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    name: String,
    tx: broadcast::Sender<WireFrame>,
}

impl MemoryTransport {
    /// Create a transport on the default sync channel.
    pub fn new(capacity: usize) -> Self {
        Self::named(keys::SYNC_CHANNEL, capacity)
    }

    /// Create a transport on a named channel.
    pub fn named(name: &str, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            name: name.to_string(),
            tx,
        }
    }

    /// Create a transport from configuration.
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::named(&config.channel_name, config.channel_capacity)
    }
}

impl Transport for MemoryTransport {
    fn channel_name(&self) -> &str {
        &self.name
    }

    fn publish(&self, frame: WireFrame) {
        // Err means no receiver is currently subscribed; fine.
        let _ = self.tx.send(frame);
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<WireFrame>> {
        Some(self.tx.subscribe())
    }
}

/// Transport used when no cross-context delivery is available.
///
/// Publishes vanish and there is nothing to receive; the owning bus keeps
/// its full API surface with local-only effect.
#[derive(Debug, Default)]
pub struct NoopTransport;

impl Transport for NoopTransport {
    fn channel_name(&self) -> &str {
        keys::SYNC_CHANNEL
    }

    fn publish(&self, _frame: WireFrame) {}

    fn subscribe(&self) -> Option<broadcast::Receiver<WireFrame>> {
        None
    }
}
