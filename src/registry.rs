//! Subscription registry.
//!
//! Tracks, per channel, which connected peers asked to receive it. The
//! relation is a set: registering the same peer twice is a no-op, and a
//! single deregistration removes it.
//!
//! The registry is only ever mutated on the tick thread. Register and
//! deregister commands from the transport are queued by the
//! [`InboundRouter`](crate::link::router::InboundRouter) and applied by
//! [`Bridge::tick`](crate::app::service::Bridge::tick).

use std::collections::HashMap;

use log::debug;

use crate::channel::ChannelId;

/// Opaque handle to one connected controller, owned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u8);

impl core::fmt::Display for PeerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "peer#{}", self.0)
    }
}

#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    subscribers: HashMap<ChannelId, Vec<PeerId>>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `peer` to `channel`. Returns `true` if the peer was not
    /// already subscribed.
    pub fn register(&mut self, channel: ChannelId, peer: PeerId) -> bool {
        let peers = self.subscribers.entry(channel).or_default();
        if peers.contains(&peer) {
            return false;
        }
        peers.push(peer);
        debug!("registry: {} subscribed to channel {}", peer, channel.0);
        true
    }

    /// Unsubscribe `peer` from `channel`. Returns `true` if it was subscribed.
    pub fn deregister(&mut self, channel: ChannelId, peer: PeerId) -> bool {
        let Some(peers) = self.subscribers.get_mut(&channel) else {
            return false;
        };
        let before = peers.len();
        peers.retain(|p| *p != peer);
        let removed = peers.len() != before;
        if peers.is_empty() {
            self.subscribers.remove(&channel);
        }
        if removed {
            debug!("registry: {} unsubscribed from channel {}", peer, channel.0);
        }
        removed
    }

    /// Drop `peer` from every channel (peer disconnected). Returns the number
    /// of subscriptions removed.
    pub fn deregister_peer(&mut self, peer: PeerId) -> usize {
        let mut removed = 0;
        self.subscribers.retain(|_, peers| {
            let before = peers.len();
            peers.retain(|p| *p != peer);
            removed += before - peers.len();
            !peers.is_empty()
        });
        removed
    }

    /// Does anyone want `channel`?
    pub fn has_subscribers(&self, channel: ChannelId) -> bool {
        self.subscribers
            .get(&channel)
            .is_some_and(|peers| !peers.is_empty())
    }

    /// Current subscribers of `channel`, in registration order.
    pub fn subscribers(&self, channel: ChannelId) -> &[PeerId] {
        self.subscribers
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_subscribed(&self, channel: ChannelId, peer: PeerId) -> bool {
        self.subscribers(channel).contains(&peer)
    }

    /// Total number of (channel, peer) pairs.
    pub fn len(&self) -> usize {
        self.subscribers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
