//! Port traits: the hexagonal boundary between the bridge core and the
//! simulation host / transport.
//!
//! ```text
//!   SimulationPort ──▶ ┌────────────┐ ──▶ LinkPort
//!                      │   Bridge   │
//!   ActuatorPort   ◀── └────────────┘
//! ```
//!
//! The host implements [`SimulationPort`] and [`ActuatorPort`] over its own
//! API. [`LinkPort`] is implemented by
//! [`QueuedLink`](crate::adapters::queued_link::QueuedLink) in production
//! and by recording mocks in tests.

use crate::app::events::{StageDeltaV, TotalDeltaV};
use crate::bitmask::ActionGroup;
use crate::channel::ChannelId;
use crate::error::LinkError;
use crate::registry::PeerId;

// ───────────────────────────────────────────────────────────────
// Simulation state source (read-only)
// ───────────────────────────────────────────────────────────────

/// Polled once per tick for the values the providers publish.
pub trait SimulationPort {
    /// Whether a vessel is currently under control. When `false`, every
    /// vessel-derived channel is in its "undefined" state.
    fn has_active_vessel(&self) -> bool;

    /// Current state of a legacy action group.
    fn action_group(&self, group: ActionGroup) -> bool;

    /// Current state of a native custom group (1..=10).
    fn custom_group(&self, group: u8) -> bool;

    /// Delta-V figures for the stage currently considered active, plus the
    /// vessel totals. `None` when no delta-V model is available (EVA,
    /// freshly reverted flight). This lookup is expensive.
    fn stage_delta_v(&self) -> Option<(StageDeltaV, TotalDeltaV)>;
}

// ───────────────────────────────────────────────────────────────
// Simulation actuators (write-only)
// ───────────────────────────────────────────────────────────────

/// One-way calls into the simulation. Results are never read back.
pub trait ActuatorPort {
    /// Set a legacy action group on or off.
    fn set_action_group(&mut self, group: ActionGroup, active: bool);

    /// Flip a legacy action group.
    fn toggle_action_group(&mut self, group: ActionGroup);

    /// Advance to the next stage.
    fn activate_next_stage(&mut self);

    /// Set a native custom group (1..=10) on or off.
    fn set_custom_group(&mut self, group: u8, active: bool);

    /// Flip a native custom group (1..=10).
    fn toggle_custom_group(&mut self, group: u8);

    /// Show a message on the host's screen.
    fn post_screen_message(&mut self, message: &str);
}

// ───────────────────────────────────────────────────────────────
// Outbound link
// ───────────────────────────────────────────────────────────────

/// Per-peer outbound primitive. Fire-and-forget: `Ok` means the frame was
/// accepted for delivery, not that it arrived.
pub trait LinkPort {
    fn send(&mut self, peer: PeerId, channel: ChannelId, payload: &[u8]) -> Result<(), LinkError>;
}
