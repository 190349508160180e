//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements | Connects to                  |
//! |---------------|------------|------------------------------|
//! | `queued_link` | LinkPort   | Outbound queue → I/O thread  |
//!
//! The simulation ports are implemented by the host application.

pub mod queued_link;

pub use queued_link::QueuedLink;
