//! Abstract traits for the transport's collaborators.
//!
//! These traits define the interfaces the engine needs from the composing
//! application (layer management, camera, rendering, indicator widgets),
//! allowing `core` to drive them without knowing the concrete types.
//! Implementations live in the application; the demo binary provides
//! reference ones.

use std::sync::Arc;

use super::layer::Layer;
use super::time::TimePoint;

/// Set of currently displayed layers, one of which may be the master.
pub trait LayerStack {
    /// The master layer whose range and stepping drive playback, if any.
    fn active_layer(&self) -> Option<Arc<dyn Layer>>;

    /// Snap every displayed layer to its nearest valid frame for `t`.
    ///
    /// Secondary layers track the master's time approximately; each picks
    /// its own closest frame.
    fn set_all_layers_nearest_frame(&mut self, t: TimePoint);
}

/// Camera/viewpoint collaborator, told once per committed sync.
pub trait Viewpoint {
    fn time_changed(&mut self, t: TimePoint);
}

/// Render request sink. Fire-and-forget.
pub trait Renderer {
    fn render(&mut self, priority: f64);
}

/// Presentation-only transport indicators. No feedback path.
pub trait TransportPanel {
    fn set_play_state(&mut self, playing: bool);

    fn set_frame_slider(&mut self, frame: usize);

    /// Reconfigure the slider for a new master layer; `None` when no layer
    /// remains active.
    fn set_slider_range(&mut self, max_frame: Option<usize>);
}

// No-op impls for compositions that have no camera or indicator widgets
// (headless drivers, tests).

impl Viewpoint for () {
    fn time_changed(&mut self, _t: TimePoint) {}
}

impl Renderer for () {
    fn render(&mut self, _priority: f64) {}
}

impl TransportPanel for () {
    fn set_play_state(&mut self, _playing: bool) {}
    fn set_frame_slider(&mut self, _frame: usize) {}
    fn set_slider_range(&mut self, _max_frame: Option<usize>) {}
}
