//! Millisecond time model shared by the whole engine.
//!
//! `TimePoint` is the single currency of program time: an opaque monotonic
//! millisecond value with total order and exact equality. Layers hand out
//! TimePoints, the transport commits them, listeners receive the raw millis.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque monotonic timestamp in milliseconds.
///
/// Comparison is exact - the boundary state machine detects range edges by
/// structural equality of TimePoints, not by auxiliary "at bound" flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimePoint(i64);

impl TimePoint {
    /// Sentinel used before any layer has provided a real range.
    pub const EPOCH: TimePoint = TimePoint(0);

    pub const fn from_millis(millis: i64) -> Self {
        TimePoint(millis)
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    /// Step forward by `delta` ms, clamped to `bound` from above.
    ///
    /// Idempotent at the bound: stepping from `bound` returns `bound`.
    pub fn forward_clamped(self, delta: i64, bound: TimePoint) -> TimePoint {
        TimePoint(self.0.saturating_add(delta).min(bound.0))
    }

    /// Step backward by `delta` ms, clamped to `bound` from below.
    pub fn backward_clamped(self, delta: i64, bound: TimePoint) -> TimePoint {
        TimePoint(self.0.saturating_sub(delta).max(bound.0))
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Inclusive playable range, derived from the active layer.
///
/// Collapses to a single instant when no layer is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: TimePoint,
    pub end: TimePoint,
}

impl TimeRange {
    /// Range collapsed to a single instant.
    pub const fn point(t: TimePoint) -> Self {
        TimeRange { start: t, end: t }
    }

    pub fn contains(&self, t: TimePoint) -> bool {
        self.start <= t && t <= self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_stepping() {
        let first = TimePoint::from_millis(0);
        let last = TimePoint::from_millis(100);

        let t = TimePoint::from_millis(90);
        assert_eq!(t.forward_clamped(33, last), last);
        assert_eq!(t.forward_clamped(5, last), TimePoint::from_millis(95));

        let t = TimePoint::from_millis(10);
        assert_eq!(t.backward_clamped(33, first), first);
        assert_eq!(t.backward_clamped(5, first), TimePoint::from_millis(5));

        // Idempotent at the bounds
        assert_eq!(last.forward_clamped(33, last), last);
        assert_eq!(first.backward_clamped(33, first), first);
    }

    #[test]
    fn test_range_contains() {
        let range = TimeRange {
            start: TimePoint::from_millis(10),
            end: TimePoint::from_millis(20),
        };
        assert!(range.contains(TimePoint::from_millis(10)));
        assert!(range.contains(TimePoint::from_millis(20)));
        assert!(!range.contains(TimePoint::from_millis(21)));

        let point = TimeRange::point(TimePoint::from_millis(5));
        assert_eq!(point.start, point.end);
        assert!(point.contains(TimePoint::from_millis(5)));
    }
}
