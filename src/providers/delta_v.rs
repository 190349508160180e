//! Delta-V telemetry on two channels sharing one stage lookup.
//!
//! The stage lookup is expensive, so it runs at most once per tick and
//! only when at least one of the two channels has a subscriber. Each
//! channel then goes through its own detector, and an unsubscribed one is
//! left untouched.

use log::warn;
use serde::Serialize;

use crate::app::events::{DeltaVEnvMessage, DeltaVMessage};
use crate::app::ports::{LinkPort, SimulationPort};
use crate::channel::{ChannelId, InboundKind, outbound};
use crate::detector::ChangeDetector;
use crate::registry::SubscriptionRegistry;

use super::{Provider, fire};

const CHANNELS: &[ChannelId] = &[outbound::DELTA_V, outbound::DELTA_V_ENV];

pub struct DeltaVProvider {
    delta_v: ChangeDetector<Option<DeltaVMessage>>,
    delta_v_env: ChangeDetector<Option<DeltaVEnvMessage>>,
    lookups: u64,
}

impl DeltaVProvider {
    pub fn new() -> Self {
        Self {
            delta_v: ChangeDetector::new(outbound::DELTA_V, Some(DeltaVMessage::default())),
            delta_v_env: ChangeDetector::new(
                outbound::DELTA_V_ENV,
                Some(DeltaVEnvMessage::default()),
            ),
            lookups: 0,
        }
    }

    pub fn tick(
        &mut self,
        registry: &SubscriptionRegistry,
        sim: &impl SimulationPort,
        out: &mut impl LinkPort,
    ) {
        let want_dv = registry.has_subscribers(self.delta_v.channel());
        let want_env = registry.has_subscribers(self.delta_v_env.channel());
        if !want_dv && !want_env {
            return;
        }

        self.lookups += 1;
        let lookup = if sim.has_active_vessel() {
            sim.stage_delta_v()
        } else {
            None
        };

        if want_dv {
            let current = lookup.map(|(stage, total)| DeltaVMessage::from_sim(&stage, &total));
            self.delta_v
                .offer(current, |channel, value| publish(registry, out, channel, value));
        }
        if want_env {
            let current = lookup.map(|(stage, total)| DeltaVEnvMessage::from_sim(&stage, &total));
            self.delta_v_env
                .offer(current, |channel, value| publish(registry, out, channel, value));
        }
    }

    /// How many stage lookups have been performed.
    pub fn lookups(&self) -> u64 {
        self.lookups
    }
}

impl Default for DeltaVProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl Provider for DeltaVProvider {
    fn name(&self) -> &'static str {
        "delta-v"
    }

    fn inbound_kinds(&self) -> &'static [InboundKind] {
        &[]
    }

    fn outbound_channels(&self) -> &'static [ChannelId] {
        CHANNELS
    }

    fn force_resend(&mut self, channel: ChannelId) {
        if channel == self.delta_v.channel() {
            self.delta_v.force_resend();
        } else if channel == self.delta_v_env.channel() {
            self.delta_v_env.force_resend();
        }
    }

    fn reset(&mut self) {
        self.delta_v.reset();
        self.delta_v_env.reset();
    }
}

/// Encode and fire. An undefined value goes out as the all-zero payload.
fn publish<M: Serialize + Default>(
    registry: &SubscriptionRegistry,
    out: &mut impl LinkPort,
    channel: ChannelId,
    value: &Option<M>,
) {
    let zero = M::default();
    let msg = value.as_ref().unwrap_or(&zero);
    let mut buf = [0u8; 16];
    match postcard::to_slice(msg, &mut buf) {
        Ok(bytes) => {
            fire(registry, out, channel, bytes);
        }
        Err(e) => warn!("Delta-V: encoding for channel {} failed: {}", channel.0, e),
    }
}
