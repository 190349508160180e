//! Extended custom-group backend.
//!
//! Custom groups above the natively supported range (11..=250) exist only
//! when a third-party backend is loaded. Whether it is loaded is decided
//! once, at startup, by [`ExtendedGroups::probe`]; the resulting capability
//! object is owned by the [`Bridge`](crate::app::service::Bridge) and lent to
//! the detector and dispatcher.
//!
//! Every backend call is fallible. An error is caught right here and
//! degrades the capability to [`ExtendedGroups::Absent`] for the rest of
//! the session, so the tick loop keeps running with native groups only.

use log::{info, warn};

use crate::error::BackendError;

/// Operations an extended backend provides.
pub trait ExtendedGroupOps: Send {
    /// Whether the backend reports itself as installed.
    fn installed(&self) -> Result<bool, BackendError>;

    /// Current state of `group`.
    fn group_state(&self, group: u8) -> Result<bool, BackendError>;

    /// Force `group` on or off. Returns the backend's acceptance flag.
    fn set_group(&mut self, group: u8, active: bool) -> Result<bool, BackendError>;

    /// Flip `group`. Returns the backend's acceptance flag.
    fn toggle_group(&mut self, group: u8) -> Result<bool, BackendError>;
}

/// Capability object: the backend is either there or it is not.
pub enum ExtendedGroups {
    Present(Box<dyn ExtendedGroupOps>),
    Absent,
}

impl ExtendedGroups {
    /// Probe a candidate backend. A backend that errors or reports itself
    /// as not installed is treated as absent.
    pub fn probe(candidate: Option<Box<dyn ExtendedGroupOps>>) -> Self {
        let Some(ops) = candidate else {
            info!("Extended groups: no backend supplied");
            return Self::Absent;
        };
        match ops.installed() {
            Ok(true) => {
                info!("Extended groups: backend installed");
                Self::Present(ops)
            }
            Ok(false) => {
                info!("Extended groups: backend not installed");
                Self::Absent
            }
            Err(e) => {
                warn!("Extended groups: probe failed ({e}), treating as absent");
                Self::Absent
            }
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Read `group`, degrading on error. Absent reads as `false`.
    pub fn group_state(&mut self, group: u8) -> bool {
        let result = match self {
            Self::Present(ops) => ops.group_state(group),
            Self::Absent => return false,
        };
        self.settle(result).unwrap_or(false)
    }

    /// Drive `group` on or off. Returns `false` if nothing was done.
    pub fn set_group(&mut self, group: u8, active: bool) -> bool {
        let result = match self {
            Self::Present(ops) => ops.set_group(group, active),
            Self::Absent => return false,
        };
        self.settle(result).unwrap_or(false)
    }

    /// Flip `group`. Returns `false` if nothing was done.
    pub fn toggle_group(&mut self, group: u8) -> bool {
        let result = match self {
            Self::Present(ops) => ops.toggle_group(group),
            Self::Absent => return false,
        };
        self.settle(result).unwrap_or(false)
    }

    fn settle<T>(&mut self, result: Result<T, BackendError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("Extended groups: {e}, falling back to native groups");
                *self = Self::Absent;
                None
            }
        }
    }
}

impl core::fmt::Debug for ExtendedGroups {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Present(_) => write!(f, "ExtendedGroups::Present"),
            Self::Absent => write!(f, "ExtendedGroups::Absent"),
        }
    }
}
