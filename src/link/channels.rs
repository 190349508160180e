//! Shared state between the I/O thread and the tick loop.
//!
//! ```text
//! ┌──────────────┐  CommandSlot ×6 (last write wins)  ┌──────────────┐
//! │              │───────────────────────────────────▶│              │
//! │  I/O thread  │  control queue (FIFO)               │  Tick loop   │
//! │  (router)    │───────────────────────────────────▶│  (Bridge)    │
//! │              │◀───────────────────────────────────│              │
//! └──────────────┘  outbound queue (FIFO)              └──────────────┘
//! ```
//!
//! Group commands go through single slots; everything that must not be
//! coalesced (registrations, echo, log lines, disconnects) is queued.
//! Unlike a `static`, one [`LinkChannels`] is created per bridge and shared
//! through an `Arc`.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use log::warn;

use crate::app::commands::{GroupAction, GroupList, InboundCommand, Payload};
use crate::channel::{ChannelId, InboundKind};
use crate::registry::PeerId;

use super::slot::{CommandSlot, HandlerTable};

/// Control queue depth.
const CONTROL_DEPTH: usize = 16;

/// Outbound queue depth.
const OUTBOUND_DEPTH: usize = 32;

/// Queued message for the tick loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMsg {
    /// A command that must be handled in arrival order.
    Command { peer: PeerId, command: InboundCommand },
    /// The transport lost this peer.
    Disconnected(PeerId),
}

/// Frame waiting to be written by the I/O thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundFrame {
    pub peer: PeerId,
    pub channel: ChannelId,
    pub payload: Payload,
}

/// One slot per buffered group command.
#[derive(Default)]
pub struct CommandSlots {
    pub custom_enable: CommandSlot<GroupList>,
    pub custom_disable: CommandSlot<GroupList>,
    pub custom_toggle: CommandSlot<GroupList>,
    pub action_activate: CommandSlot<u8>,
    pub action_deactivate: CommandSlot<u8>,
    pub action_toggle: CommandSlot<u8>,
}

impl CommandSlots {
    pub fn custom(&self, action: GroupAction) -> &CommandSlot<GroupList> {
        match action {
            GroupAction::Activate => &self.custom_enable,
            GroupAction::Deactivate => &self.custom_disable,
            GroupAction::Toggle => &self.custom_toggle,
        }
    }

    pub fn action(&self, action: GroupAction) -> &CommandSlot<u8> {
        match action {
            GroupAction::Activate => &self.action_activate,
            GroupAction::Deactivate => &self.action_deactivate,
            GroupAction::Toggle => &self.action_toggle,
        }
    }

    /// Discard whatever is buffered for `kind` (no-op for queued kinds).
    pub fn clear_kind(&self, kind: InboundKind) {
        match kind {
            InboundKind::CustomGroupEnable => self.custom_enable.clear(),
            InboundKind::CustomGroupDisable => self.custom_disable.clear(),
            InboundKind::CustomGroupToggle => self.custom_toggle.clear(),
            InboundKind::ActionGroupActivate => self.action_activate.clear(),
            InboundKind::ActionGroupDeactivate => self.action_deactivate.clear(),
            InboundKind::ActionGroupToggle => self.action_toggle.clear(),
            _ => {}
        }
    }
}

/// Everything the two threads share.
pub struct LinkChannels {
    handlers: HandlerTable,
    slots: CommandSlots,
    control: Channel<CriticalSectionRawMutex, ControlMsg, CONTROL_DEPTH>,
    outbound: Channel<CriticalSectionRawMutex, OutboundFrame, OUTBOUND_DEPTH>,
    shutdown: Signal<CriticalSectionRawMutex, ()>,
}

impl LinkChannels {
    pub fn new() -> Self {
        Self {
            handlers: HandlerTable::new(),
            slots: CommandSlots::default(),
            control: Channel::new(),
            outbound: Channel::new(),
            shutdown: Signal::new(),
        }
    }

    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    pub fn slots(&self) -> &CommandSlots {
        &self.slots
    }

    /// Claim a set of inbound kinds for a provider.
    ///
    /// Slots are emptied first: a router that saw the kind claimed just
    /// before the previous [`release`](Self::release) may still have
    /// deposited into it.
    pub fn claim(&self, kinds: &[InboundKind]) {
        for kind in kinds {
            self.slots.clear_kind(*kind);
            self.handlers.claim(*kind);
        }
    }

    /// Release a provider's kinds and drop anything still buffered for them.
    pub fn release(&self, kinds: &[InboundKind]) {
        for kind in kinds {
            self.handlers.release(*kind);
            self.slots.clear_kind(*kind);
        }
    }

    // ── Control queue ──────────────────────────────────────────

    /// Queue a message for the tick loop. Returns `false` if the queue was
    /// full and the message was dropped.
    pub fn push_control(&self, msg: ControlMsg) -> bool {
        if self.control.try_send(msg).is_err() {
            warn!("Link: control queue full, dropping message");
            return false;
        }
        true
    }

    pub fn try_recv_control(&self) -> Option<ControlMsg> {
        self.control.try_receive().ok()
    }

    // ── Outbound queue ─────────────────────────────────────────

    /// Queue a frame for the I/O thread. Returns `false` if the queue was
    /// full.
    pub fn push_outbound(&self, frame: OutboundFrame) -> bool {
        self.outbound.try_send(frame).is_ok()
    }

    pub fn try_recv_outbound(&self) -> Option<OutboundFrame> {
        self.outbound.try_receive().ok()
    }

    /// Wait for the next outbound frame (I/O thread).
    pub async fn recv_outbound(&self) -> OutboundFrame {
        self.outbound.receive().await
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    // ── Shutdown ───────────────────────────────────────────────

    /// Ask the I/O thread to stop.
    pub fn request_shutdown(&self) {
        self.shutdown.signal(());
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.signaled()
    }

    pub(crate) async fn wait_shutdown(&self) {
        self.shutdown.wait().await;
    }
}

impl Default for LinkChannels {
    fn default() -> Self {
        Self::new()
    }
}
