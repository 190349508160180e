//! Fuzz target: inbound frame handling
//!
//! First byte is the channel, the rest is the payload. Drives the frame
//! through the parser and a router with every kind claimed, then decodes
//! the payload with both bitmask widths. None of it may panic.
//!
//! cargo fuzz run fuzz_inbound_frame

#![no_main]

use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use simpit::app::commands::{InboundCommand, MAX_PAYLOAD};
use simpit::bitmask::{ActionGroupBits, CustomGroupBits};
use simpit::channel::{ChannelId, InboundKind};
use simpit::link::{InboundRouter, LinkChannels};
use simpit::registry::PeerId;

fuzz_target!(|data: &[u8]| {
    let Some((&channel, payload)) = data.split_first() else {
        return;
    };

    if let Ok(InboundCommand::EchoRequest(p)) = InboundCommand::parse(ChannelId(channel), payload) {
        assert!(p.len() <= MAX_PAYLOAD);
    }

    let link = Arc::new(LinkChannels::new());
    link.claim(&InboundKind::ALL);
    let router = InboundRouter::new(link.clone());
    let _ = router.on_frame(PeerId(0), ChannelId(channel), payload);

    let custom = CustomGroupBits::from_bytes(payload);
    assert_eq!(CustomGroupBits::from_indices(custom.iter()), custom);
    let _ = ActionGroupBits::from_bytes(payload).mask();
});
