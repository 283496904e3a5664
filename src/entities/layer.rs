//! Layer capability consumed by the transport.
//!
//! A layer is anything with an ordered index of time-stamped frames: an
//! image sequence on disk, a remotely acquired dataset, a stub in a test.
//! The transport never sees frame content - only this time index.

use super::time::TimePoint;

/// Time-indexed frame source.
///
/// Stepping contract (preconditions, not signaled as faults):
/// - `lower_time`/`higher_time` are monotone and clamping - they return the
///   input unchanged when no further step exists in that direction. The
///   boundary state machine detects range edges through exactly this
///   idempotence, so a non-conforming implementation produces unspecified
///   (but non-crashing) playback behavior.
/// - `current_frame` reflects the most recent snap performed by the layer
///   set collaborator.
pub trait Layer {
    /// Timestamp of the first frame.
    fn first_time(&self) -> TimePoint;

    /// Timestamp of the last frame.
    fn last_time(&self) -> TimePoint;

    /// Nearest frame time strictly below `t`, clamped at the first frame.
    fn lower_time(&self, t: TimePoint) -> TimePoint;

    /// Nearest frame time strictly above `t`, clamped at the last frame.
    fn higher_time(&self, t: TimePoint) -> TimePoint;

    /// Frame time closest to `t`.
    fn nearest_time(&self, t: TimePoint) -> TimePoint;

    /// Timestamp of frame `frame`, clamped to the last frame.
    fn frame_time(&self, frame: usize) -> TimePoint;

    /// Index of the currently displayed frame.
    fn current_frame(&self) -> usize;

    /// Index of the last frame.
    fn max_frame(&self) -> usize;

    /// Whether there is more than one frame to play.
    fn is_multi_frame(&self) -> bool {
        self.max_frame() > 0
    }
}
