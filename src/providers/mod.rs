//! Channel providers.
//!
//! A provider ties one family of channels together: it claims its inbound
//! command kinds on [`start`](Provider::start), releases them on
//! [`shutdown`](Provider::shutdown), and has a per-tick hook that runs the
//! dispatcher for its commands and the change detector for its outbound
//! channels. The per-tick hooks have different inputs, so they are plain
//! methods on each provider and the [`Bridge`](crate::app::service::Bridge)
//! calls them in a fixed order.

pub mod action_groups;
pub mod custom_groups;
pub mod delta_v;
pub mod echo;

use log::{info, warn};

use crate::app::ports::LinkPort;
use crate::channel::{ChannelId, InboundKind};
use crate::link::channels::LinkChannels;
use crate::registry::SubscriptionRegistry;

pub use action_groups::ActionGroupProvider;
pub use custom_groups::CustomGroupProvider;
pub use delta_v::DeltaVProvider;
pub use echo::EchoProvider;

pub trait Provider {
    /// Short name for log lines.
    fn name(&self) -> &'static str;

    /// Inbound command kinds this provider handles.
    fn inbound_kinds(&self) -> &'static [InboundKind];

    /// Outbound channels this provider publishes.
    fn outbound_channels(&self) -> &'static [ChannelId];

    /// Resend `channel` on the next tick, if this provider owns it.
    fn force_resend(&mut self, _channel: ChannelId) {}

    /// Drop all cached outbound state.
    fn reset(&mut self) {}

    fn owns(&self, channel: ChannelId) -> bool {
        self.outbound_channels().contains(&channel)
    }

    fn start(&mut self, link: &LinkChannels) {
        self.reset();
        link.claim(self.inbound_kinds());
        info!("Provider {} started", self.name());
    }

    fn shutdown(&mut self, link: &LinkChannels) {
        link.release(self.inbound_kinds());
        info!("Provider {} stopped", self.name());
    }
}

/// Send `payload` on `channel` to every current subscriber.
///
/// Fire-and-forget: a peer whose send fails is logged and skipped, the
/// others still get the frame. Returns the number of peers reached.
pub fn fire(
    registry: &SubscriptionRegistry,
    out: &mut impl LinkPort,
    channel: ChannelId,
    payload: &[u8],
) -> usize {
    let mut sent = 0;
    for &peer in registry.subscribers(channel) {
        match out.send(peer, channel, payload) {
            Ok(()) => sent += 1,
            Err(e) => warn!("Fire: channel {} to {} failed: {}", channel.0, peer, e),
        }
    }
    sent
}
