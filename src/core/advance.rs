//! Boundary state machine for time advance.
//!
//! One pure function decides what the next program time is, given the
//! advance mode and the layer's stepping primitives. Both tick paths
//! (frame-indexed and wall-clock-scaled) share it; only the `lower`/`higher`
//! closures differ.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::TimePoint;

/// What happens when playback reaches the ends of the playable range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdvanceMode {
    /// Wrap from the last frame back to the first
    #[default]
    Loop,
    /// Pause on the last frame
    Stop,
    /// Oscillate, currently moving forward
    Swing,
    /// Oscillate, currently moving backward
    SwingDown,
}

impl fmt::Display for AdvanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdvanceMode::Loop => "loop",
            AdvanceMode::Stop => "stop",
            AdvanceMode::Swing => "swing",
            AdvanceMode::SwingDown => "swing-down",
        };
        write!(f, "{name}")
    }
}

impl FromStr for AdvanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "loop" => Ok(AdvanceMode::Loop),
            "stop" => Ok(AdvanceMode::Stop),
            "swing" => Ok(AdvanceMode::Swing),
            "swing-down" => Ok(AdvanceMode::SwingDown),
            _ => Err(format!("unknown advance mode '{s}' (loop, stop, swing, swing-down)")),
        }
    }
}

/// One accepted advance: the candidate time plus the (possibly flipped) mode.
///
/// The caller commits the mode only alongside an accepted candidate - a
/// sync dropped by the recording gate must not leave a half-applied
/// oscillation flip behind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub next: TimePoint,
    pub mode: AdvanceMode,
}

/// Compute the next program time, or `None` to signal stop.
///
/// `lower`/`higher` must be monotone and clamping: they return `t` unchanged
/// when no further step exists in that direction. Reaching a range edge is
/// detected structurally - the candidate equals the input - never via an
/// auxiliary flag, since layer implementations rely on exact clamping.
pub fn next_time<L, H>(
    mode: AdvanceMode,
    time: TimePoint,
    first: TimePoint,
    last: TimePoint,
    lower: L,
    higher: H,
) -> Option<Step>
where
    L: Fn(TimePoint) -> TimePoint,
    H: Fn(TimePoint) -> TimePoint,
{
    let next = if mode == AdvanceMode::SwingDown { lower(time) } else { higher(time) };
    if next == time {
        // Already at the edges
        match mode {
            AdvanceMode::Stop => {
                if next == last {
                    return None;
                }
            }
            AdvanceMode::Swing => {
                if next == last {
                    return Some(Step { next: lower(next), mode: AdvanceMode::SwingDown });
                }
            }
            AdvanceMode::SwingDown => {
                if next == first {
                    return Some(Step { next: higher(next), mode: AdvanceMode::Swing });
                }
            }
            AdvanceMode::Loop => {
                if next == last {
                    return Some(Step { next: first, mode });
                }
            }
        }
    }
    Some(Step { next, mode })
}
