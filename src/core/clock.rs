//! Playback clock: the single periodic tick source.
//!
//! Exactly one cadence is armed at any time - the clock holds one cadence
//! slot and one deadline anchor, so a transient double-arm is structurally
//! impossible. The host loop polls at display rate (the same model as a
//! player updated from a 60Hz UI loop); deadline arithmetic lives here.
//!
//! Relative cadence ticks at a user-adjustable rate and drives
//! frame-indexed advance. Absolute cadence ticks at a fixed 30/sec and
//! advances simulated time by a fixed per-tick delta, spreading N simulated
//! seconds evenly across one real second regardless of frame density.

use std::time::{Duration, Instant};

use log::trace;

/// Default frame rate of the relative cadence.
pub const FPS_RELATIVE_DEFAULT: u32 = 20;

/// Fixed tick rate of the absolute cadence, independent of the relative rate.
pub const FPS_ABSOLUTE: u32 = 30;

/// Which advance path a due tick drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    /// Frame-indexed stepping through the layer's discrete neighbors
    Relative,
    /// Wall-clock-scaled stepping by a fixed millisecond delta
    Absolute,
}

/// Single-slot periodic tick source.
pub struct PlaybackClock {
    cadence: Cadence,
    period: Duration,
    /// Simulated milliseconds per tick; 0 in relative cadence
    delta_t: i64,
    running: bool,
    deadline: Option<Instant>,
}

impl PlaybackClock {
    pub fn new() -> Self {
        Self {
            cadence: Cadence::Relative,
            period: Duration::from_millis(1000 / FPS_RELATIVE_DEFAULT as u64),
            delta_t: 0,
            running: false,
            deadline: None,
        }
    }

    /// Arm the relative cadence at `fps` ticks per second.
    ///
    /// Replaces whatever cadence was armed; the running flag is untouched,
    /// so changing speed mid-playback keeps playing at the new rate.
    pub fn set_relative_speed(&mut self, fps: u32) {
        let fps = fps.max(1);
        self.cadence = Cadence::Relative;
        self.period = Duration::from_millis(1000 / fps as u64);
        self.delta_t = 0;
        self.deadline = None;
        trace!("clock: relative cadence, {fps} fps");
    }

    /// Arm the absolute cadence: `secs_per_tick` simulated seconds spread
    /// over each real second at the fixed 30/sec tick rate.
    pub fn set_absolute_speed(&mut self, secs_per_tick: i64) {
        let tick_millis = (1000 / FPS_ABSOLUTE) as i64;
        self.cadence = Cadence::Absolute;
        self.period = Duration::from_millis(tick_millis as u64);
        self.delta_t = tick_millis * secs_per_tick.max(0);
        self.deadline = None;
        trace!("clock: absolute cadence, {}ms per tick", self.delta_t);
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Simulated milliseconds each absolute tick advances; 0 when relative.
    pub fn delta_t(&self) -> i64 {
        self.delta_t
    }

    /// Arm the clock; the first tick falls one period after the next poll.
    pub fn start(&mut self) {
        self.running = true;
        self.deadline = None;
    }

    /// Disarm the clock. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Report a due tick, at most one per poll.
    ///
    /// Re-anchors the deadline from `now` rather than from the missed
    /// deadline, coalescing backlogged ticks after a stall instead of
    /// bursting to catch up.
    pub fn poll(&mut self, now: Instant) -> Option<Cadence> {
        if !self.running {
            return None;
        }
        let deadline = *self.deadline.get_or_insert(now + self.period);
        if now >= deadline {
            self.deadline = Some(now + self.period);
            Some(self.cadence)
        } else {
            None
        }
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new()
    }
}
