//! Outbound payload types.
//!
//! Telemetry structs are serialised with `postcard`, which writes `f32`
//! fields as fixed 4-byte little-endian values in declaration order. That
//! is byte-for-byte the packed layout the controllers expect, so field
//! order here is part of the wire format.

use serde::{Deserialize, Serialize};

/// Host scene transitions reported on the scene-change channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Scene {
    /// A flight scene became ready.
    Flight = 0x00,
    /// The host is leaving a flight scene.
    NotFlight = 0x01,
}

impl Scene {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Active-vessel changes reported on the vessel-change channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VesselChange {
    /// Control switched to another vessel.
    Switching = 1,
    Docking = 2,
    Undocking = 3,
}

impl VesselChange {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

/// Delta-V figures for one stage, as reported by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StageDeltaV {
    pub actual: f32,
    pub asl: f32,
    pub vacuum: f32,
}

/// Whole-vessel delta-V totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TotalDeltaV {
    pub actual: f32,
    pub asl: f32,
    pub vacuum: f32,
}

/// Delta-V channel payload (8 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeltaVMessage {
    pub stage_delta_v: f32,
    pub total_delta_v: f32,
}

/// Delta-V environment channel payload (16 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DeltaVEnvMessage {
    pub stage_delta_v_asl: f32,
    pub stage_delta_v_vac: f32,
    pub total_delta_v_asl: f32,
    pub total_delta_v_vac: f32,
}

impl DeltaVMessage {
    pub fn from_sim(stage: &StageDeltaV, total: &TotalDeltaV) -> Self {
        Self {
            stage_delta_v: stage.actual,
            total_delta_v: total.actual,
        }
    }
}

impl DeltaVEnvMessage {
    pub fn from_sim(stage: &StageDeltaV, total: &TotalDeltaV) -> Self {
        Self {
            stage_delta_v_asl: stage.asl,
            stage_delta_v_vac: stage.vacuum,
            total_delta_v_asl: total.asl,
            total_delta_v_vac: total.vacuum,
        }
    }
}
