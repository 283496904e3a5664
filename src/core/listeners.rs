//! Subscriber sets for frame, time and range notifications.
//!
//! Delivery is synchronous and FIFO (first-subscribed, first-called); a
//! slow listener stalls the playback cadence, so listener cost is a
//! correctness constraint on the subscriber, not something the engine
//! buffers away. The snapshot-on-subscribe delivery itself is performed by
//! the transport, which owns the current values.

use std::sync::Arc;

use crate::entities::TimePoint;

/// Told whenever a new frame is committed.
pub trait FrameListener {
    fn frame_changed(&self, frame: usize, is_last: bool);
}

/// Told the raw millisecond value of every committed time.
pub trait TimeListener {
    fn time_changed(&self, millis: i64);
}

/// Told when the playable range actually changes.
pub trait RangeListener {
    fn time_range_changed(&self, start: TimePoint, end: TimePoint);
}

/// Ordered subscriber set keyed by allocation identity.
///
/// Registration is idempotent: adding an `Arc` already present (same
/// allocation) is a no-op, so double-registering yields exactly one
/// notification per event.
pub struct Registry<L: ?Sized> {
    subs: Vec<Arc<L>>,
}

impl<L: ?Sized> Default for Registry<L> {
    fn default() -> Self {
        Self { subs: Vec::new() }
    }
}

impl<L: ?Sized> Registry<L> {
    /// Add a subscriber; returns false if it was already registered.
    pub fn add(&mut self, listener: &Arc<L>) -> bool {
        if self.subs.iter().any(|s| Arc::ptr_eq(s, listener)) {
            return false;
        }
        self.subs.push(Arc::clone(listener));
        true
    }

    pub fn remove(&mut self, listener: &Arc<L>) {
        self.subs.retain(|s| !Arc::ptr_eq(s, listener));
    }

    /// Subscribers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<L>> {
        self.subs.iter()
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }
}
