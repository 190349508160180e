//! Inbound router: transport frames to command slots or the control queue.
//!
//! Runs on whatever thread the transport delivers on. It never touches the
//! subscription registry or any detector state; anything that must mutate
//! those is queued for the tick loop.

use std::sync::Arc;

use log::{debug, warn};

use crate::app::commands::InboundCommand;
use crate::channel::{ChannelId, InboundKind};
use crate::error::Result;
use crate::registry::PeerId;

use super::channels::{ControlMsg, LinkChannels};

/// Where an inbound frame ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// Stored in a last-write-wins command slot.
    Buffered,
    /// Appended to the control queue.
    Queued,
    /// Discarded: no handler claimed it, or the queue was full.
    Dropped,
}

#[derive(Clone)]
pub struct InboundRouter {
    link: Arc<LinkChannels>,
}

impl InboundRouter {
    pub fn new(link: Arc<LinkChannels>) -> Self {
        Self { link }
    }

    /// Route one frame from `peer`.
    ///
    /// Unknown channels and malformed payloads come back as errors; the
    /// caller logs and carries on.
    pub fn on_frame(&self, peer: PeerId, channel: ChannelId, payload: &[u8]) -> Result<Routed> {
        let kind = InboundKind::from_channel(channel)?;
        if !self.link.handlers().is_claimed(kind) {
            debug!("Router: no handler for {:?} from {}, dropping", kind, peer);
            return Ok(Routed::Dropped);
        }

        let routed = match InboundCommand::parse_kind(kind, payload)? {
            InboundCommand::CustomGroups { action, groups } => {
                self.link.slots().custom(action).deposit(groups);
                Routed::Buffered
            }
            InboundCommand::ActionGroups { action, mask } => {
                self.link.slots().action(action).deposit(mask);
                Routed::Buffered
            }
            command => {
                if self.link.push_control(ControlMsg::Command { peer, command }) {
                    Routed::Queued
                } else {
                    Routed::Dropped
                }
            }
        };
        Ok(routed)
    }

    /// The transport lost `peer`; the tick loop will drop its subscriptions.
    pub fn on_disconnect(&self, peer: PeerId) {
        if !self.link.push_control(ControlMsg::Disconnected(peer)) {
            warn!("Router: disconnect of {} lost, subscriptions may linger", peer);
        }
    }

    pub fn link(&self) -> &Arc<LinkChannels> {
        &self.link
    }
}
