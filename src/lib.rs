//! CADENCE - playback and time-synchronization engine library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (advance machine, clock, transport, listeners)
pub mod core;

// App modules
pub mod cli;
pub mod entities;

// Re-export commonly used types from core
pub use core::advance::{AdvanceMode, Step, next_time};
pub use core::clock::{Cadence, FPS_ABSOLUTE, FPS_RELATIVE_DEFAULT, PlaybackClock};
pub use core::dispatch::{InvokeHandle, InvokeQueue};
pub use core::listeners::{FrameListener, RangeListener, TimeListener};
pub use core::transport::Transport;

// Re-export entities
pub use entities::{Layer, LayerStack, Renderer, TimePoint, TimeRange, TimeSequence, TransportPanel, Viewpoint};
