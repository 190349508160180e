//! Frame-level transport abstraction.
//!
//! Byte framing and checksums live below this trait. Implementations hand
//! the I/O thread whole frames already tagged with the sending peer, and
//! take whole frames back for writing.

use crate::app::commands::Payload;
use crate::channel::ChannelId;
use crate::error::LinkError;
use crate::registry::PeerId;

use super::channels::OutboundFrame;

/// Something the transport observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    Frame {
        peer: PeerId,
        channel: ChannelId,
        payload: Payload,
    },
    Disconnected(PeerId),
}

/// Frame-oriented, non-blocking transport.
pub trait FrameTransport {
    /// Next pending event, or `None` if nothing is waiting.
    fn poll_event(&mut self) -> Option<LinkEvent>;

    /// Write one frame to its peer.
    fn write_frame(&mut self, frame: &OutboundFrame) -> Result<(), LinkError>;
}

/// Transport that never receives and discards every write.
pub struct NullTransport;

impl FrameTransport for NullTransport {
    fn poll_event(&mut self) -> Option<LinkEvent> {
        None
    }

    fn write_frame(&mut self, _frame: &OutboundFrame) -> Result<(), LinkError> {
        Ok(())
    }
}
