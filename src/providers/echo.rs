//! Echo, custom log, scene-change and vessel-change notifications.

use log::{debug, info};

use crate::app::commands::{InboundCommand, LogLine};
use crate::app::events::{Scene, VesselChange};
use crate::app::ports::{ActuatorPort, LinkPort};
use crate::channel::{ChannelId, InboundKind, common, outbound};
use crate::registry::{PeerId, SubscriptionRegistry};

use super::{Provider, fire};

const KINDS: &[InboundKind] = &[
    InboundKind::EchoRequest,
    InboundKind::EchoReply,
    InboundKind::CustomLog,
];

const CHANNELS: &[ChannelId] = &[outbound::SCENE_CHANGE, outbound::VESSEL_CHANGE];

pub struct EchoProvider {
    verbose: bool,
    header: String,
    in_flight: bool,
}

impl EchoProvider {
    pub fn new(verbose: bool, header: impl Into<String>) -> Self {
        Self {
            verbose,
            header: header.into(),
            in_flight: false,
        }
    }

    /// Handle a queued command addressed to this provider. Returns `false`
    /// for commands it does not own.
    pub fn handle(
        &mut self,
        peer: PeerId,
        command: &InboundCommand,
        act: &mut impl ActuatorPort,
        out: &mut impl LinkPort,
    ) -> bool {
        match command {
            InboundCommand::EchoRequest(payload) => {
                if self.verbose {
                    info!("Echo request from {}, replying", peer);
                }
                if let Err(e) = out.send(peer, common::ECHO_RESPONSE, payload) {
                    debug!("Echo reply to {} not sent: {}", peer, e);
                }
            }
            InboundCommand::EchoReply(_) => {
                info!("Echo reply received from {}", peer);
            }
            InboundCommand::Log(line) => {
                let message = self.format_log(line);
                if line.flags.print_to_screen() {
                    act.post_screen_message(&message);
                }
                if !line.flags.verbose() || self.verbose {
                    info!("{}", message);
                }
            }
            _ => return false,
        }
        true
    }

    /// The log text as it is shown to the user.
    pub fn format_log(&self, line: &LogLine) -> String {
        if line.flags.no_header() {
            line.text.clone()
        } else {
            format!("{}{}", self.header, line.text)
        }
    }

    /// Report a scene transition. Entering flight always fires `0x00`;
    /// leaving fires `0x01` only if the previous scene was flight. Returns
    /// whether a notification went out.
    pub fn scene_change(
        &mut self,
        scene: Scene,
        registry: &SubscriptionRegistry,
        out: &mut impl LinkPort,
    ) -> bool {
        match scene {
            Scene::Flight => self.in_flight = true,
            Scene::NotFlight if self.in_flight => self.in_flight = false,
            Scene::NotFlight => return false,
        }
        info!("Scene change: {:?}", scene);
        fire(registry, out, outbound::SCENE_CHANGE, &[scene.as_byte()]);
        true
    }

    /// Report a docking, undocking or vessel switch.
    pub fn vessel_change(
        &self,
        change: VesselChange,
        registry: &SubscriptionRegistry,
        out: &mut impl LinkPort,
    ) {
        info!("Vessel change: {:?}", change);
        fire(registry, out, outbound::VESSEL_CHANGE, &[change.as_byte()]);
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

impl Provider for EchoProvider {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn inbound_kinds(&self) -> &'static [InboundKind] {
        KINDS
    }

    fn outbound_channels(&self) -> &'static [ChannelId] {
        CHANNELS
    }
}
