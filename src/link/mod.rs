//! Link layer: everything between the transport and the tick loop.

pub mod channels;
pub mod io_task;
pub mod router;
pub mod slot;
pub mod transport;

pub use channels::{ControlMsg, LinkChannels, OutboundFrame};
pub use router::{InboundRouter, Routed};
pub use slot::{CommandSlot, HandlerTable};
pub use transport::{FrameTransport, LinkEvent, NullTransport};
