//! Application core: routing and state-sync logic, zero I/O.
//!
//! The [`service::Bridge`] ties the registry, detectors, dispatcher and
//! providers together. All interaction with the simulation host and the
//! transport happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable with recording mocks.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
