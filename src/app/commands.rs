//! Inbound commands.
//!
//! Raw `(channel, payload)` frames from the transport are parsed into an
//! [`InboundCommand`] by the router. Short or empty payloads are tolerated
//! wherever the command still means something without them.

use heapless::Vec;
use log::warn;

use crate::channel::{ChannelId, InboundKind};
use crate::error::{Error, Result};

/// Largest payload a frame can carry.
pub const MAX_PAYLOAD: usize = 32;

/// Raw payload bytes, bounded by the protocol maximum.
pub type Payload = Vec<u8, MAX_PAYLOAD>;

/// Custom-group indices as received, in wire order.
pub type GroupList = Vec<u8, MAX_PAYLOAD>;

/// Channel IDs carried by a register/deregister command.
pub type ChannelList = Vec<ChannelId, MAX_PAYLOAD>;

/// What to do with the addressed groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupAction {
    Activate,
    Deactivate,
    Toggle,
}

/// Status byte of a custom log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LogFlags(pub u8);

impl LogFlags {
    /// Only log when the bridge runs in verbose mode.
    pub const VERBOSE: u8 = 1;
    /// Also post the line on the host's screen.
    pub const PRINT_TO_SCREEN: u8 = 2;
    /// Do not prefix the line with the bridge header.
    pub const NO_HEADER: u8 = 4;

    pub const fn verbose(self) -> bool {
        self.0 & Self::VERBOSE != 0
    }

    pub const fn print_to_screen(self) -> bool {
        self.0 & Self::PRINT_TO_SCREEN != 0
    }

    pub const fn no_header(self) -> bool {
        self.0 & Self::NO_HEADER != 0
    }
}

/// Free-text log line sent by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub flags: LogFlags,
    pub text: String,
}

impl LogLine {
    /// Parse `[status][utf-8 text...]`. Missing bytes read as absent:
    /// an empty payload is a status of 0 with no text.
    pub fn parse(payload: &[u8]) -> Self {
        let Some((&status, text)) = payload.split_first() else {
            return Self {
                flags: LogFlags::default(),
                text: String::new(),
            };
        };
        Self {
            flags: LogFlags(status),
            text: String::from_utf8_lossy(text).into_owned(),
        }
    }
}

/// Commands the transport can deliver into the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCommand {
    /// Echo request; reply with the identical payload.
    EchoRequest(Payload),
    /// Reply to an echo request we sent.
    EchoReply(Payload),
    /// Subscribe the sender to each listed channel.
    Register(ChannelList),
    /// Unsubscribe the sender from each listed channel.
    Deregister(ChannelList),
    /// Act on custom groups, listed by index.
    CustomGroups { action: GroupAction, groups: GroupList },
    /// Act on legacy action groups, given as a bitmask.
    ActionGroups { action: GroupAction, mask: u8 },
    /// Log line from the controller.
    Log(LogLine),
}

impl InboundCommand {
    /// Parse a raw frame.
    pub fn parse(channel: ChannelId, payload: &[u8]) -> Result<Self> {
        let kind = InboundKind::from_channel(channel)?;
        Self::parse_kind(kind, payload)
    }

    /// Parse a frame whose kind is already resolved.
    pub fn parse_kind(kind: InboundKind, payload: &[u8]) -> Result<Self> {
        let cmd = match kind {
            InboundKind::EchoRequest => Self::EchoRequest(bounded(kind, payload)),
            InboundKind::EchoReply => Self::EchoReply(bounded(kind, payload)),
            InboundKind::RegisterHandler => Self::Register(channels(kind, payload)?),
            InboundKind::DeregisterHandler => Self::Deregister(channels(kind, payload)?),
            InboundKind::CustomGroupEnable => Self::custom(GroupAction::Activate, kind, payload),
            InboundKind::CustomGroupDisable => Self::custom(GroupAction::Deactivate, kind, payload),
            InboundKind::CustomGroupToggle => Self::custom(GroupAction::Toggle, kind, payload),
            InboundKind::ActionGroupActivate => Self::legacy(GroupAction::Activate, kind, payload)?,
            InboundKind::ActionGroupDeactivate => {
                Self::legacy(GroupAction::Deactivate, kind, payload)?
            }
            InboundKind::ActionGroupToggle => Self::legacy(GroupAction::Toggle, kind, payload)?,
            InboundKind::CustomLog => Self::Log(LogLine::parse(payload)),
        };
        Ok(cmd)
    }

    fn custom(action: GroupAction, kind: InboundKind, payload: &[u8]) -> Self {
        Self::CustomGroups {
            action,
            groups: bounded(kind, payload),
        }
    }

    fn legacy(action: GroupAction, kind: InboundKind, payload: &[u8]) -> Result<Self> {
        let &mask = payload.first().ok_or(Error::EmptyPayload(kind.channel()))?;
        Ok(Self::ActionGroups { action, mask })
    }
}

fn bounded(kind: InboundKind, payload: &[u8]) -> Payload {
    if payload.len() > MAX_PAYLOAD {
        warn!(
            "Inbound {:?}: payload of {} bytes truncated to {}",
            kind,
            payload.len(),
            MAX_PAYLOAD
        );
    }
    let n = payload.len().min(MAX_PAYLOAD);
    let mut out = Vec::new();
    // Cannot fail: n <= capacity.
    let _ = out.extend_from_slice(&payload[..n]);
    out
}

fn channels(kind: InboundKind, payload: &[u8]) -> Result<ChannelList> {
    if payload.is_empty() {
        return Err(Error::EmptyPayload(kind.channel()));
    }
    Ok(bounded(kind, payload).into_iter().map(ChannelId).collect())
}
