//! State-change detector.
//!
//! One detector guards one outbound channel. Every tick it decides whether
//! the channel's current value must be sent:
//!
//! ```text
//!   subscribers? ──no──▶ skip (no read, no cache write)
//!        │yes
//!        ▼
//!   read current ──▶ differs from cache  ─┐
//!                    OR resend flag set   ├─yes─▶ emit, cache = current,
//!                                         │       resend = false
//!                                         └─no──▶ suppress
//! ```
//!
//! The subscriber check happens before the read on purpose: some reads
//! (the delta-V stage lookup) are expensive enough that skipping them for
//! unwanted channels is required, not just nice to have.
//!
//! An "undefined" simulation value (no active vessel, no delta-V model) is
//! modelled by the provider as a distinct value of `V` (typically `None`),
//! so the ordinary comparison emits it exactly once when it first appears.

use crate::channel::ChannelId;
use crate::registry::SubscriptionRegistry;

pub struct ChangeDetector<V> {
    channel: ChannelId,
    initial: V,
    last_sent: V,
    resend: bool,
}

impl<V: PartialEq + Clone> ChangeDetector<V> {
    /// Create a detector whose cache starts at `initial`.
    pub fn new(channel: ChannelId, initial: V) -> Self {
        Self {
            channel,
            last_sent: initial.clone(),
            initial,
            resend: false,
        }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Send the current value on the next tick even if it did not change.
    pub fn force_resend(&mut self) {
        self.resend = true;
    }

    pub fn resend_pending(&self) -> bool {
        self.resend
    }

    /// Value most recently handed to the link.
    pub fn last_sent(&self) -> &V {
        &self.last_sent
    }

    /// Forget everything sent so far (provider restart).
    pub fn reset(&mut self) {
        self.last_sent = self.initial.clone();
        self.resend = false;
    }

    /// Run one tick.
    ///
    /// `read` is only invoked when the channel has subscribers. `emit` hands
    /// the value to the link. Delivery is fire-and-forget: once handed off
    /// the value is cached and the resend flag cleared, whatever the link
    /// did with it. Returns `true` if a value was emitted.
    pub fn poll(
        &mut self,
        registry: &SubscriptionRegistry,
        read: impl FnOnce() -> V,
        emit: impl FnOnce(ChannelId, &V),
    ) -> bool {
        if !registry.has_subscribers(self.channel) {
            return false;
        }
        let current = read();
        self.offer(current, emit)
    }

    /// Compare an already-computed value against the cache and emit if it
    /// changed. Used when one expensive read feeds several detectors; the
    /// caller is responsible for the subscriber check.
    pub fn offer(&mut self, current: V, emit: impl FnOnce(ChannelId, &V)) -> bool {
        if current == self.last_sent && !self.resend {
            return false;
        }
        emit(self.channel, &current);
        self.last_sent = current;
        self.resend = false;
        true
    }
}
