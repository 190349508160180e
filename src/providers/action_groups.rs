//! Legacy action groups: three bitmask commands in, one state byte out.

use crate::app::ports::{ActuatorPort, LinkPort, SimulationPort};
use crate::bitmask::{ActionGroup, ActionGroupBits};
use crate::channel::{ChannelId, InboundKind, outbound};
use crate::detector::ChangeDetector;
use crate::dispatcher;
use crate::link::channels::CommandSlots;
use crate::registry::SubscriptionRegistry;

use super::{Provider, fire};

const KINDS: &[InboundKind] = &[
    InboundKind::ActionGroupActivate,
    InboundKind::ActionGroupDeactivate,
    InboundKind::ActionGroupToggle,
];

const CHANNELS: &[ChannelId] = &[outbound::ACTION_GROUPS];

pub struct ActionGroupProvider {
    /// `None` while no vessel is active.
    state: ChangeDetector<Option<ActionGroupBits>>,
}

impl ActionGroupProvider {
    pub fn new() -> Self {
        Self {
            state: ChangeDetector::new(outbound::ACTION_GROUPS, Some(ActionGroupBits::new())),
        }
    }

    /// Apply pending commands, then publish the state byte if it changed.
    pub fn tick<H>(
        &mut self,
        registry: &SubscriptionRegistry,
        slots: &CommandSlots,
        hw: &mut H,
        out: &mut impl LinkPort,
    ) where
        H: SimulationPort + ActuatorPort,
    {
        dispatcher::dispatch_action_groups(slots, hw);

        let sim: &H = hw;
        self.state.poll(
            registry,
            || read_action_groups(sim),
            |channel, value| {
                let byte = value.map_or(0, |bits| bits.mask());
                fire(registry, out, channel, &[byte]);
            },
        );
    }

    pub fn detector(&self) -> &ChangeDetector<Option<ActionGroupBits>> {
        &self.state
    }
}

impl Default for ActionGroupProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for ActionGroupProvider {
    fn name(&self) -> &'static str {
        "action-groups"
    }

    fn inbound_kinds(&self) -> &'static [InboundKind] {
        KINDS
    }

    fn outbound_channels(&self) -> &'static [ChannelId] {
        CHANNELS
    }

    fn force_resend(&mut self, channel: ChannelId) {
        if channel == self.state.channel() {
            self.state.force_resend();
        }
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

/// Current legacy group state, or `None` without an active vessel.
pub fn read_action_groups(sim: &impl SimulationPort) -> Option<ActionGroupBits> {
    if !sim.has_active_vessel() {
        return None;
    }
    let mut bits = ActionGroupBits::new();
    for group in ActionGroup::ALL {
        bits.set(group.bit(), sim.action_group(group));
    }
    Some(bits)
}
