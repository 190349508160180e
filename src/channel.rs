//! Channel identifiers.
//!
//! Every message kind on the link is identified by an 8-bit channel ID.
//! Inbound command IDs and outbound telemetry IDs share one numeric space;
//! a call site always knows which direction it is looking at, so the two
//! tables below never collide in practice.
//!
//! Inbound IDs are resolved into a typed [`InboundKind`] through a single
//! `match`, so adding a handler never involves looking anything up by name.

use crate::error::Error;

/// An 8-bit channel identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(pub u8);

impl From<u8> for ChannelId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// IDs valid in both directions.
pub mod common {
    use super::ChannelId;

    pub const SYNCHRONISATION: ChannelId = ChannelId(0);
    pub const ECHO_REQUEST: ChannelId = ChannelId(1);
    pub const ECHO_RESPONSE: ChannelId = ChannelId(2);
}

/// Controller → host command channels.
pub mod inbound {
    use super::ChannelId;

    pub const REGISTER_HANDLER: ChannelId = ChannelId(8);
    pub const DEREGISTER_HANDLER: ChannelId = ChannelId(9);
    pub const CUSTOM_GROUP_ENABLE: ChannelId = ChannelId(10);
    pub const CUSTOM_GROUP_DISABLE: ChannelId = ChannelId(11);
    pub const CUSTOM_GROUP_TOGGLE: ChannelId = ChannelId(12);
    pub const ACTION_GROUP_ACTIVATE: ChannelId = ChannelId(13);
    pub const ACTION_GROUP_DEACTIVATE: ChannelId = ChannelId(14);
    pub const ACTION_GROUP_TOGGLE: ChannelId = ChannelId(15);
    pub const CUSTOM_LOG: ChannelId = ChannelId(25);
}

/// Host → controller telemetry channels.
pub mod outbound {
    use super::ChannelId;

    pub const ACTION_GROUPS: ChannelId = ChannelId(40);
    pub const DELTA_V: ChannelId = ChannelId(41);
    pub const DELTA_V_ENV: ChannelId = ChannelId(42);
    pub const CUSTOM_ACTION_GROUPS: ChannelId = ChannelId(44);
    pub const SCENE_CHANGE: ChannelId = ChannelId(52);
    pub const VESSEL_CHANGE: ChannelId = ChannelId(53);
}

// ---------------------------------------------------------------------------
// Typed inbound kinds
// ---------------------------------------------------------------------------

/// Every inbound command kind this core handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum InboundKind {
    EchoRequest = 0,
    EchoReply = 1,
    RegisterHandler = 2,
    DeregisterHandler = 3,
    CustomGroupEnable = 4,
    CustomGroupDisable = 5,
    CustomGroupToggle = 6,
    ActionGroupActivate = 7,
    ActionGroupDeactivate = 8,
    ActionGroupToggle = 9,
    CustomLog = 10,
}

impl InboundKind {
    /// Total number of kinds; sizes the handler table.
    pub const COUNT: usize = 11;

    pub const ALL: [Self; Self::COUNT] = [
        Self::EchoRequest,
        Self::EchoReply,
        Self::RegisterHandler,
        Self::DeregisterHandler,
        Self::CustomGroupEnable,
        Self::CustomGroupDisable,
        Self::CustomGroupToggle,
        Self::ActionGroupActivate,
        Self::ActionGroupDeactivate,
        Self::ActionGroupToggle,
        Self::CustomLog,
    ];

    /// Resolve a raw inbound channel ID.
    pub fn from_channel(channel: ChannelId) -> Result<Self, Error> {
        match channel {
            common::ECHO_REQUEST => Ok(Self::EchoRequest),
            common::ECHO_RESPONSE => Ok(Self::EchoReply),
            inbound::REGISTER_HANDLER => Ok(Self::RegisterHandler),
            inbound::DEREGISTER_HANDLER => Ok(Self::DeregisterHandler),
            inbound::CUSTOM_GROUP_ENABLE => Ok(Self::CustomGroupEnable),
            inbound::CUSTOM_GROUP_DISABLE => Ok(Self::CustomGroupDisable),
            inbound::CUSTOM_GROUP_TOGGLE => Ok(Self::CustomGroupToggle),
            inbound::ACTION_GROUP_ACTIVATE => Ok(Self::ActionGroupActivate),
            inbound::ACTION_GROUP_DEACTIVATE => Ok(Self::ActionGroupDeactivate),
            inbound::ACTION_GROUP_TOGGLE => Ok(Self::ActionGroupToggle),
            inbound::CUSTOM_LOG => Ok(Self::CustomLog),
            ChannelId(other) => Err(Error::UnknownChannel(other)),
        }
    }

    /// The wire channel this kind arrives on.
    pub const fn channel(self) -> ChannelId {
        match self {
            Self::EchoRequest => common::ECHO_REQUEST,
            Self::EchoReply => common::ECHO_RESPONSE,
            Self::RegisterHandler => inbound::REGISTER_HANDLER,
            Self::DeregisterHandler => inbound::DEREGISTER_HANDLER,
            Self::CustomGroupEnable => inbound::CUSTOM_GROUP_ENABLE,
            Self::CustomGroupDisable => inbound::CUSTOM_GROUP_DISABLE,
            Self::CustomGroupToggle => inbound::CUSTOM_GROUP_TOGGLE,
            Self::ActionGroupActivate => inbound::ACTION_GROUP_ACTIVATE,
            Self::ActionGroupDeactivate => inbound::ACTION_GROUP_DEACTIVATE,
            Self::ActionGroupToggle => inbound::ACTION_GROUP_TOGGLE,
            Self::CustomLog => inbound::CUSTOM_LOG,
        }
    }

    /// Position in the handler table.
    pub const fn index(self) -> usize {
        self as usize
    }
}
