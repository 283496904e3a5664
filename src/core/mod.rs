//! Core engine modules - advance machine, clock, transport, listeners.
//!
//! These modules form the playback engine, independent of any UI.

pub mod advance;
pub mod clock;
pub mod dispatch;
pub mod listeners;
pub mod transport;

// Re-exports for convenience
pub use advance::{AdvanceMode, Step, next_time};
pub use clock::{Cadence, FPS_ABSOLUTE, FPS_RELATIVE_DEFAULT, PlaybackClock};
pub use dispatch::{InvokeHandle, InvokeQueue};
pub use listeners::{FrameListener, RangeListener, Registry, TimeListener};
pub use transport::Transport;
