//! Time index for an ordered frame sequence.
//!
//! `TimeSequence` is the in-crate reference implementation of the [`Layer`]
//! capability: a strictly sorted table of frame timestamps with
//! binary-search stepping. Real acquisition backends (disk scans, remote
//! queries) build one of these per layer; tests and the demo driver build
//! synthetic ones.

use std::cell::Cell;

use anyhow::{Result, bail};
use uuid::Uuid;

use super::layer::Layer;
use super::time::TimePoint;

/// Sorted, deduplicated table of frame timestamps.
///
/// Tracks its own current frame so the layer set collaborator can snap it
/// during sync (`seek_nearest`) and the transport can read it back for
/// frame-listener fan-out.
#[derive(Debug)]
pub struct TimeSequence {
    /// Stable identifier inside the composing application
    pub uuid: Uuid,

    /// Human-readable name
    pub name: String,

    /// Frame timestamps, strictly increasing
    times: Vec<TimePoint>,

    /// Currently displayed frame index
    current: Cell<usize>,
}

impl TimeSequence {
    /// Build a sequence from arbitrary timestamps; sorts and deduplicates.
    pub fn new(name: impl Into<String>, mut times: Vec<TimePoint>) -> Result<Self> {
        times.sort_unstable();
        times.dedup();
        if times.is_empty() {
            bail!("sequence needs at least one timestamp");
        }
        Ok(Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            times,
            current: Cell::new(0),
        })
    }

    /// Build a synthetic sequence: `count` frames starting at `start`,
    /// spaced `step_millis` apart.
    pub fn with_cadence(
        name: impl Into<String>,
        start: TimePoint,
        count: usize,
        step_millis: i64,
    ) -> Result<Self> {
        if count == 0 {
            bail!("sequence needs at least one frame");
        }
        if step_millis <= 0 {
            bail!("frame spacing must be positive, got {step_millis}");
        }
        let times = (0..count)
            .map(|i| TimePoint::from_millis(start.millis() + i as i64 * step_millis))
            .collect();
        Self::new(name, times)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Move the current frame to the one nearest `t`.
    ///
    /// Called by the layer set collaborator during sync so every displayed
    /// sequence tracks the committed time.
    pub fn seek_nearest(&self, t: TimePoint) {
        self.current.set(self.nearest_idx(t));
    }

    /// Index of the frame closest to `t`. Ties resolve to the earlier frame.
    fn nearest_idx(&self, t: TimePoint) -> usize {
        match self.times.binary_search(&t) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) if i == self.times.len() => self.times.len() - 1,
            Err(i) => {
                let below = t.millis() - self.times[i - 1].millis();
                let above = self.times[i].millis() - t.millis();
                if above < below { i } else { i - 1 }
            }
        }
    }
}

impl Layer for TimeSequence {
    fn first_time(&self) -> TimePoint {
        self.times[0]
    }

    fn last_time(&self) -> TimePoint {
        self.times[self.times.len() - 1]
    }

    fn lower_time(&self, t: TimePoint) -> TimePoint {
        match self.times.binary_search(&t) {
            // Exact frame: its lower neighbor, clamped at the first frame
            Ok(i) => self.times[i.saturating_sub(1)],
            Err(0) => self.times[0],
            Err(i) => self.times[i - 1],
        }
    }

    fn higher_time(&self, t: TimePoint) -> TimePoint {
        let last = self.times.len() - 1;
        match self.times.binary_search(&t) {
            // Exact frame: its higher neighbor, clamped at the last frame
            Ok(i) => self.times[(i + 1).min(last)],
            Err(i) if i > last => self.times[last],
            Err(i) => self.times[i],
        }
    }

    fn nearest_time(&self, t: TimePoint) -> TimePoint {
        self.times[self.nearest_idx(t)]
    }

    fn frame_time(&self, frame: usize) -> TimePoint {
        self.times[frame.min(self.times.len() - 1)]
    }

    fn current_frame(&self) -> usize {
        self.current.get()
    }

    fn max_frame(&self) -> usize {
        self.times.len() - 1
    }
}
