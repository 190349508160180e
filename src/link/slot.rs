//! Single-slot command buffer and inbound handler table.
//!
//! A [`CommandSlot`] holds at most one pending payload. Depositing
//! overwrites whatever is there; draining takes it and leaves the slot
//! empty. Both go through one `embassy-sync` [`Signal`], so a deposit on
//! the I/O thread and a drain on the tick thread never see a torn value.
//!
//! **Last write wins.** If two commands of the same kind arrive between
//! ticks, only the second is applied. That is harmless for "set to X"
//! style commands and accepted as a known limitation for group-list
//! commands, whose effects would otherwise accumulate.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::channel::InboundKind;

pub struct CommandSlot<T: Send> {
    inner: Signal<CriticalSectionRawMutex, T>,
}

impl<T: Send> CommandSlot<T> {
    pub const fn new() -> Self {
        Self {
            inner: Signal::new(),
        }
    }

    /// Store `value`, replacing any pending one. Never blocks.
    pub fn deposit(&self, value: T) {
        self.inner.signal(value);
    }

    /// Take the pending value, if any, leaving the slot empty.
    pub fn drain(&self) -> Option<T> {
        self.inner.try_take()
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.inner.signaled()
    }

    /// Discard any pending value.
    pub fn clear(&self) {
        self.inner.reset();
    }
}

impl<T: Send> Default for CommandSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which inbound kinds currently have a live handler.
///
/// Providers claim their kinds on start and release them on shutdown; the
/// router drops frames for unclaimed kinds.
pub struct HandlerTable {
    claimed: [AtomicBool; InboundKind::COUNT],
}

impl HandlerTable {
    pub const fn new() -> Self {
        Self {
            claimed: [const { AtomicBool::new(false) }; InboundKind::COUNT],
        }
    }

    pub fn claim(&self, kind: InboundKind) {
        self.claimed[kind.index()].store(true, Ordering::Release);
    }

    pub fn release(&self, kind: InboundKind) {
        self.claimed[kind.index()].store(false, Ordering::Release);
    }

    pub fn is_claimed(&self, kind: InboundKind) -> bool {
        self.claimed[kind.index()].load(Ordering::Acquire)
    }
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self::new()
    }
}
