//! Mock simulation host, link and extended backend for integration tests.
//!
//! Every actuator call and every outbound frame is recorded so tests can
//! assert on the full history.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use simpit::LinkError;
use simpit::app::events::{StageDeltaV, TotalDeltaV};
use simpit::app::ports::{ActuatorPort, LinkPort, SimulationPort};
use simpit::bitmask::ActionGroup;
use simpit::channel::ChannelId;
use simpit::extended::ExtendedGroupOps;
use simpit::registry::PeerId;
use simpit::BackendError;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum SimCall {
    SetAction(ActionGroup, bool),
    ToggleAction(ActionGroup),
    NextStage,
    SetCustom(u8, bool),
    ToggleCustom(u8),
    Screen(String),
}

// ── MockSim ───────────────────────────────────────────────────

pub struct MockSim {
    pub vessel: bool,
    pub action_groups: BTreeSet<u8>,
    pub custom_groups: BTreeSet<u8>,
    pub delta_v: Option<(StageDeltaV, TotalDeltaV)>,
    pub calls: Vec<SimCall>,
    pub reads: Cell<u32>,
    pub delta_v_lookups: Cell<u32>,
}

#[allow(dead_code)]
impl MockSim {
    pub fn new() -> Self {
        Self {
            vessel: true,
            action_groups: BTreeSet::new(),
            custom_groups: BTreeSet::new(),
            delta_v: None,
            calls: Vec::new(),
            reads: Cell::new(0),
            delta_v_lookups: Cell::new(0),
        }
    }

    pub fn take_calls(&mut self) -> Vec<SimCall> {
        std::mem::take(&mut self.calls)
    }
}

impl Default for MockSim {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationPort for MockSim {
    fn has_active_vessel(&self) -> bool {
        self.vessel
    }

    fn action_group(&self, group: ActionGroup) -> bool {
        self.reads.set(self.reads.get() + 1);
        self.action_groups.contains(&(group as u8))
    }

    fn custom_group(&self, group: u8) -> bool {
        self.reads.set(self.reads.get() + 1);
        self.custom_groups.contains(&group)
    }

    fn stage_delta_v(&self) -> Option<(StageDeltaV, TotalDeltaV)> {
        self.delta_v_lookups.set(self.delta_v_lookups.get() + 1);
        self.delta_v
    }
}

impl ActuatorPort for MockSim {
    fn set_action_group(&mut self, group: ActionGroup, active: bool) {
        self.calls.push(SimCall::SetAction(group, active));
    }

    fn toggle_action_group(&mut self, group: ActionGroup) {
        self.calls.push(SimCall::ToggleAction(group));
    }

    fn activate_next_stage(&mut self) {
        self.calls.push(SimCall::NextStage);
    }

    fn set_custom_group(&mut self, group: u8, active: bool) {
        self.calls.push(SimCall::SetCustom(group, active));
    }

    fn toggle_custom_group(&mut self, group: u8) {
        self.calls.push(SimCall::ToggleCustom(group));
    }

    fn post_screen_message(&mut self, message: &str) {
        self.calls.push(SimCall::Screen(message.to_owned()));
    }
}

// ── MockLink ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Sent {
    pub peer: PeerId,
    pub channel: ChannelId,
    pub payload: Vec<u8>,
}

#[derive(Default)]
pub struct MockLink {
    pub sent: Vec<Sent>,
    /// Peer whose sends fail with a full queue.
    pub refuse: Option<PeerId>,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_channel(&self, channel: ChannelId) -> Vec<&Sent> {
        self.sent.iter().filter(|s| s.channel == channel).collect()
    }

    pub fn take(&mut self) -> Vec<Sent> {
        std::mem::take(&mut self.sent)
    }
}

impl LinkPort for MockLink {
    fn send(&mut self, peer: PeerId, channel: ChannelId, payload: &[u8]) -> Result<(), LinkError> {
        if self.refuse == Some(peer) {
            return Err(LinkError::QueueFull);
        }
        self.sent.push(Sent {
            peer,
            channel,
            payload: payload.to_vec(),
        });
        Ok(())
    }
}

// ── MockBackend ───────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct BackendState {
    pub active: BTreeSet<u8>,
    pub calls: Vec<(u8, Option<bool>)>,
    pub fail: bool,
}

/// Extended backend whose state is shared with the test.
pub struct MockBackend(pub Arc<Mutex<BackendState>>);

#[allow(dead_code)]
impl MockBackend {
    pub fn shared() -> (Box<dyn ExtendedGroupOps>, Arc<Mutex<BackendState>>) {
        let state = Arc::new(Mutex::new(BackendState::default()));
        (Box::new(Self(state.clone())), state)
    }
}

impl ExtendedGroupOps for MockBackend {
    fn installed(&self) -> Result<bool, BackendError> {
        Ok(true)
    }

    fn group_state(&self, group: u8) -> Result<bool, BackendError> {
        let s = self.0.lock().unwrap();
        if s.fail {
            return Err(BackendError::CallFailed);
        }
        Ok(s.active.contains(&group))
    }

    fn set_group(&mut self, group: u8, active: bool) -> Result<bool, BackendError> {
        let mut s = self.0.lock().unwrap();
        if s.fail {
            return Err(BackendError::CallFailed);
        }
        s.calls.push((group, Some(active)));
        Ok(true)
    }

    fn toggle_group(&mut self, group: u8) -> Result<bool, BackendError> {
        let mut s = self.0.lock().unwrap();
        if s.fail {
            return Err(BackendError::CallFailed);
        }
        s.calls.push((group, None));
        Ok(true)
    }
}
