//! Simpit bridge core.
//!
//! Routes commands from serial-attached hardware controllers into a
//! simulation host and pushes state back to them, sending each channel only
//! to the peers that subscribed to it and only when its value changed.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod bitmask;
pub mod channel;
pub mod config;
pub mod detector;
pub mod dispatcher;
pub mod extended;
pub mod link;
pub mod providers;
pub mod registry;

mod error;

pub use app::service::Bridge;
pub use config::BridgeConfig;
pub use error::{BackendError, Error, LinkError, Result};
