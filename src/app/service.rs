//! Bridge service, the hexagonal core.
//!
//! [`Bridge`] owns the subscription registry, the extended-group capability
//! and every channel provider. It is driven from the host's update loop by
//! [`Bridge::tick`]; inbound traffic reaches it only through the shared
//! [`LinkChannels`], which the I/O thread fills via an [`InboundRouter`].
//!
//! ```text
//!  SimulationPort ──▶ ┌──────────────────────────────┐ ──▶ LinkPort
//!                     │            Bridge            │
//!  ActuatorPort   ◀── │ registry · providers · ext   │
//!                     └──────────────────────────────┘
//!                                   ▲
//!                          LinkChannels (slots + queues)
//! ```
//!
//! Tick order is fixed: control queue first (so a registration made since
//! the last tick is served a snapshot on this one), then each provider's
//! dispatcher and detectors.

use std::sync::Arc;

use log::{debug, info};

use crate::channel::{ChannelId, InboundKind};
use crate::config::BridgeConfig;
use crate::extended::ExtendedGroups;
use crate::link::channels::{ControlMsg, LinkChannels};
use crate::link::router::InboundRouter;
use crate::providers::{
    ActionGroupProvider, CustomGroupProvider, DeltaVProvider, EchoProvider, Provider,
};
use crate::registry::{PeerId, SubscriptionRegistry};

use super::commands::InboundCommand;
use super::events::{Scene, VesselChange};
use super::ports::{ActuatorPort, LinkPort, SimulationPort};

/// Kinds the bridge itself handles for as long as it runs.
const BRIDGE_KINDS: &[InboundKind] = &[
    InboundKind::RegisterHandler,
    InboundKind::DeregisterHandler,
];

// ───────────────────────────────────────────────────────────────
// Bridge
// ───────────────────────────────────────────────────────────────

pub struct Bridge {
    config: BridgeConfig,
    link: Arc<LinkChannels>,
    registry: SubscriptionRegistry,
    extended: ExtendedGroups,
    action_groups: ActionGroupProvider,
    custom_groups: CustomGroupProvider,
    delta_v: DeltaVProvider,
    echo: EchoProvider,
    started: bool,
    tick_count: u64,
}

impl Bridge {
    /// Construct the bridge with a fresh set of link channels.
    ///
    /// Does **not** claim any inbound kinds. Call [`start`](Self::start) next.
    pub fn new(config: BridgeConfig, extended: ExtendedGroups) -> Self {
        Self::with_link(config, extended, Arc::new(LinkChannels::new()))
    }

    /// Construct the bridge around existing link channels.
    pub fn with_link(
        config: BridgeConfig,
        extended: ExtendedGroups,
        link: Arc<LinkChannels>,
    ) -> Self {
        let echo = EchoProvider::new(config.verbose, config.log_header.clone());
        Self {
            config,
            link,
            registry: SubscriptionRegistry::new(),
            extended,
            action_groups: ActionGroupProvider::new(),
            custom_groups: CustomGroupProvider::new(),
            delta_v: DeltaVProvider::new(),
            echo,
            started: false,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Claim the bridge's own kinds and start every provider.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.link.claim(BRIDGE_KINDS);
        let link = self.link.clone();
        for provider in self.providers_mut() {
            provider.start(&link);
        }
        self.started = true;
        info!(
            "Bridge started (extended groups: {})",
            if self.extended.is_present() { "present" } else { "absent" }
        );
    }

    /// Stop every provider and release all inbound kinds.
    ///
    /// Commands still queued for providers are discarded; pending
    /// disconnects are still applied to the registry.
    pub fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        let link = self.link.clone();
        for provider in self.providers_mut() {
            provider.shutdown(&link);
        }
        link.release(BRIDGE_KINDS);
        self.drain_disconnects();
        self.started = false;
        info!("Bridge stopped after {} ticks", self.tick_count);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one update: control queue → dispatchers → detectors.
    ///
    /// The `hw` parameter satisfies **both** [`SimulationPort`] and
    /// [`ActuatorPort`], so reads and actuator calls share one borrow.
    /// While stopped only disconnects are applied.
    pub fn tick(
        &mut self,
        hw: &mut (impl SimulationPort + ActuatorPort),
        out: &mut impl LinkPort,
    ) {
        if !self.started {
            self.drain_disconnects();
            return;
        }
        self.tick_count += 1;

        // 1. Queued control traffic, in arrival order
        while let Some(msg) = self.link.try_recv_control() {
            self.handle_control(msg, hw, out);
        }

        // 2. Providers: dispatch buffered commands, then detect changes
        let slots = self.link.slots();
        self.action_groups.tick(&self.registry, slots, hw, out);
        self.custom_groups
            .tick(&self.registry, slots, hw, &mut self.extended, out);
        self.delta_v.tick(&self.registry, &*hw, out);
    }

    /// Report a host scene transition on the scene-change channel.
    pub fn on_scene_change(&mut self, scene: Scene, out: &mut impl LinkPort) -> bool {
        self.echo.scene_change(scene, &self.registry, out)
    }

    /// Report a docking, undocking or vessel switch on the vessel-change
    /// channel.
    pub fn on_vessel_change(&self, change: VesselChange, out: &mut impl LinkPort) {
        self.echo.vessel_change(change, &self.registry, out);
    }

    // ── Control handling ──────────────────────────────────────

    fn handle_control(
        &mut self,
        msg: ControlMsg,
        act: &mut impl ActuatorPort,
        out: &mut impl LinkPort,
    ) {
        match msg {
            ControlMsg::Command {
                peer,
                command: InboundCommand::Register(channels),
            } => {
                for channel in channels {
                    self.subscribe(channel, peer);
                }
            }
            ControlMsg::Command {
                peer,
                command: InboundCommand::Deregister(channels),
            } => {
                for channel in channels {
                    if self.registry.deregister(channel, peer) {
                        info!("{} unsubscribed from channel {}", peer, channel.0);
                    }
                }
            }
            ControlMsg::Command { peer, command } => {
                if !self.echo.handle(peer, &command, act, out) {
                    debug!("Bridge: no handler for {:?} from {}", command, peer);
                }
            }
            ControlMsg::Disconnected(peer) => {
                let dropped = self.registry.deregister_peer(peer);
                info!("{} disconnected, {} subscriptions dropped", peer, dropped);
            }
        }
    }

    /// Empty the control queue, applying disconnects and discarding the rest.
    fn drain_disconnects(&mut self) {
        while let Some(msg) = self.link.try_recv_control() {
            if let ControlMsg::Disconnected(peer) = msg {
                let dropped = self.registry.deregister_peer(peer);
                debug!("{} disconnected while stopped, {} dropped", peer, dropped);
            }
        }
    }

    /// Subscribe `peer` and make sure it gets a full snapshot next tick.
    fn subscribe(&mut self, channel: ChannelId, peer: PeerId) {
        if self.registry.register(channel, peer) {
            info!("{} subscribed to channel {}", peer, channel.0);
        }
        for provider in self.providers_mut() {
            provider.force_resend(channel);
        }
    }

    fn providers_mut(&mut self) -> [&mut dyn Provider; 4] {
        [
            &mut self.action_groups,
            &mut self.custom_groups,
            &mut self.delta_v,
            &mut self.echo,
        ]
    }

    // ── Queries ───────────────────────────────────────────────

    /// Router for the transport side. Cheap to clone.
    pub fn router(&self) -> InboundRouter {
        InboundRouter::new(self.link.clone())
    }

    pub fn link(&self) -> &Arc<LinkChannels> {
        &self.link
    }

    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    pub fn extended(&self) -> &ExtendedGroups {
        &self.extended
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn action_groups(&self) -> &ActionGroupProvider {
        &self.action_groups
    }

    pub fn custom_groups(&self) -> &CustomGroupProvider {
        &self.custom_groups
    }

    pub fn delta_v(&self) -> &DeltaVProvider {
        &self.delta_v
    }
}
