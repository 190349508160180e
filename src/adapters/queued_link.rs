//! Outbound link adapter.
//!
//! Implements [`LinkPort`] by pushing [`OutboundFrame`]s onto the shared
//! outbound queue, where the I/O thread's write task picks them up. A full
//! queue is reported back as [`LinkError::QueueFull`] so the detector that
//! produced the frame retries on its next tick.

use std::sync::Arc;

use log::warn;

use crate::app::commands::{MAX_PAYLOAD, Payload};
use crate::app::ports::LinkPort;
use crate::channel::ChannelId;
use crate::error::LinkError;
use crate::link::channels::{LinkChannels, OutboundFrame};
use crate::registry::PeerId;

pub struct QueuedLink {
    link: Arc<LinkChannels>,
    dropped: u32,
}

impl QueuedLink {
    pub fn new(link: Arc<LinkChannels>) -> Self {
        Self { link, dropped: 0 }
    }

    /// Frames refused because the queue was full.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl LinkPort for QueuedLink {
    fn send(&mut self, peer: PeerId, channel: ChannelId, payload: &[u8]) -> Result<(), LinkError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(LinkError::PayloadTooLarge);
        }
        let payload = Payload::from_slice(payload).map_err(|_| LinkError::PayloadTooLarge)?;
        let frame = OutboundFrame {
            peer,
            channel,
            payload,
        };
        if !self.link.push_outbound(frame) {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("Link: outbound queue full, frame for {} on channel {} dropped", peer, channel.0);
            return Err(LinkError::QueueFull);
        }
        Ok(())
    }
}
