//! Bridge configuration parameters
//!
//! The host decides where these come from; the bridge only needs the
//! values at construction time.

use serde::{Deserialize, Serialize};

/// Runtime configuration for a [`Bridge`](crate::app::service::Bridge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Log echo traffic and lines flagged verbose by controllers.
    pub verbose: bool,
    /// Prefix for controller log lines that do not opt out of it.
    pub log_header: String,
    /// I/O thread poll interval (milliseconds)
    pub io_poll_interval_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_header: "Simpit : ".into(),
            io_poll_interval_ms: 1,
        }
    }
}
