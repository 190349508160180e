//! Custom action groups: index-list commands in, a 32-byte state vector out.
//!
//! Groups 1..=10 are native to the simulation. Groups 11..=250 are read
//! from and driven through the extended backend, when one is present.

use crate::app::ports::{ActuatorPort, LinkPort, SimulationPort};
use crate::bitmask::{CustomGroupBits, EXTENDED_CUSTOM_GROUPS, NATIVE_CUSTOM_GROUPS};
use crate::channel::{ChannelId, InboundKind, outbound};
use crate::detector::ChangeDetector;
use crate::dispatcher;
use crate::extended::ExtendedGroups;
use crate::link::channels::CommandSlots;
use crate::registry::SubscriptionRegistry;

use super::{Provider, fire};

const KINDS: &[InboundKind] = &[
    InboundKind::CustomGroupEnable,
    InboundKind::CustomGroupDisable,
    InboundKind::CustomGroupToggle,
];

const CHANNELS: &[ChannelId] = &[outbound::CUSTOM_ACTION_GROUPS];

pub struct CustomGroupProvider {
    state: ChangeDetector<Option<CustomGroupBits>>,
}

impl CustomGroupProvider {
    pub fn new() -> Self {
        Self {
            state: ChangeDetector::new(
                outbound::CUSTOM_ACTION_GROUPS,
                Some(CustomGroupBits::new()),
            ),
        }
    }

    pub fn tick<H>(
        &mut self,
        registry: &SubscriptionRegistry,
        slots: &CommandSlots,
        hw: &mut H,
        ext: &mut ExtendedGroups,
        out: &mut impl LinkPort,
    ) where
        H: SimulationPort + ActuatorPort,
    {
        dispatcher::dispatch_custom_groups(slots, hw, ext);

        let sim: &H = hw;
        self.state.poll(
            registry,
            || read_custom_groups(sim, ext),
            |channel, value| {
                let bits = value.unwrap_or_default();
                fire(registry, out, channel, bits.as_bytes());
            },
        );
    }

    pub fn detector(&self) -> &ChangeDetector<Option<CustomGroupBits>> {
        &self.state
    }
}

impl Default for CustomGroupProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for CustomGroupProvider {
    fn name(&self) -> &'static str {
        "custom-groups"
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

/// Current custom group state, or `None` without an active vessel.
pub fn read_custom_groups(
    sim: &impl SimulationPort,
    ext: &mut ExtendedGroups,
) -> Option<CustomGroupBits> {
    if !sim.has_active_vessel() {
        return None;
    }
    let mut bits = CustomGroupBits::new();
    for group in NATIVE_CUSTOM_GROUPS {
        bits.set(usize::from(group), sim.custom_group(group));
    }
    if !ext.is_present() {
        return Some(bits);
    }
    for group in EXTENDED_CUSTOM_GROUPS {
        bits.set(usize::from(group), ext.group_state(group));
        if !ext.is_present() {
            // Degraded mid-read: report native groups only.
            for group in EXTENDED_CUSTOM_GROUPS {
                bits.set(usize::from(group), false);
            }
            break;
        }
    }
    Some(bits)
}
