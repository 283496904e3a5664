//! Transport: authoritative playback state and the commit/fan-out protocol.
//!
//! **Architecture**: the transport is an explicit owned context, not a
//! global - the composing application creates one, hands it the
//! collaborator trait objects, and drives `update()` from its main loop.
//! Multiple independent transports coexist; tests build throwaway ones.
//!
//! **Commit protocol**: every accepted time goes through `sync`, which
//! commits the value and fans it out in a fixed order - viewpoint, layer
//! set snap, render request, time listeners, frame listeners, slider.
//! State is committed before listener fan-out, so a panicking listener
//! cannot desynchronize subsequent ticks.
//!
//! **Recording gate**: while recording, at most one committed frame may be
//! outstanding. Until the capture collaborator acknowledges, every sync is
//! dropped whole - no mutation, no notification. A collaborator that never
//! acknowledges stalls synchronization for as long as recording stays on.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, trace};

use crate::core::advance::{AdvanceMode, next_time};
use crate::core::clock::{Cadence, PlaybackClock};
use crate::core::dispatch::{InvokeHandle, InvokeQueue};
use crate::core::listeners::{FrameListener, RangeListener, Registry, TimeListener};
use crate::entities::{LayerStack, Renderer, TimePoint, TimeRange, TransportPanel, Viewpoint};

/// Decode priority passed with every render request.
const RENDER_FULL: f64 = 1.0;

/// Playback controller and time synchronizer.
pub struct Transport {
    current: TimePoint,
    range: TimeRange,
    mode: AdvanceMode,
    recording: bool,
    /// A recorded frame is outstanding and unacknowledged
    pending_ack: bool,

    clock: PlaybackClock,
    invokes: InvokeQueue<Transport>,

    frame_listeners: Registry<dyn FrameListener>,
    time_listeners: Registry<dyn TimeListener>,
    range_listeners: Registry<dyn RangeListener>,

    layers: Box<dyn LayerStack>,
    viewpoint: Box<dyn Viewpoint>,
    renderer: Box<dyn Renderer>,
    panel: Box<dyn TransportPanel>,
}

impl Transport {
    pub fn new(
        layers: Box<dyn LayerStack>,
        viewpoint: Box<dyn Viewpoint>,
        renderer: Box<dyn Renderer>,
        panel: Box<dyn TransportPanel>,
    ) -> Self {
        Self {
            current: TimePoint::EPOCH,
            range: TimeRange::point(TimePoint::EPOCH),
            mode: AdvanceMode::default(),
            recording: false,
            pending_ack: false,
            clock: PlaybackClock::new(),
            invokes: InvokeQueue::new(),
            frame_listeners: Registry::default(),
            time_listeners: Registry::default(),
            range_listeners: Registry::default(),
            layers,
            viewpoint,
            renderer,
            panel,
        }
    }

    // === State accessors ===

    pub fn time(&self) -> TimePoint {
        self.current
    }

    pub fn range(&self) -> TimeRange {
        self.range
    }

    pub fn advance_mode(&self) -> AdvanceMode {
        self.mode
    }

    pub fn set_advance_mode(&mut self, mode: AdvanceMode) {
        self.mode = mode;
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_running()
    }

    // === Main loop driver ===

    /// Drain posted invokes, then run the tick handler if a tick is due.
    /// Call this from the host loop at display rate.
    pub fn update(&mut self) {
        self.update_at(Instant::now());
    }

    fn update_at(&mut self, now: Instant) {
        for job in self.invokes.drain() {
            job(self);
        }
        match self.clock.poll(now) {
            Some(Cadence::Relative) => self.relative_time_advance(),
            Some(Cadence::Absolute) => self.absolute_time_advance(),
            None => {}
        }
    }

    /// Handle for off-context collaborators to post work back here.
    pub fn invoke_handle(&self) -> InvokeHandle<Transport> {
        self.invokes.handle()
    }

    // === Tick handlers ===

    /// Frame-indexed advance through the layer's discrete neighbor frames.
    fn relative_time_advance(&mut self) {
        let Some(layer) = self.layers.active_layer() else { return };
        let step = next_time(
            self.mode,
            self.current,
            layer.first_time(),
            layer.last_time(),
            |t| layer.lower_time(t),
            |t| layer.higher_time(t),
        );
        match step {
            None => self.pause(),
            // Commit the mode only alongside an accepted candidate
            Some(step) => {
                if self.sync(step.next) {
                    self.mode = step.mode;
                }
            }
        }
    }

    /// Wall-clock-scaled advance by the clock's per-tick delta, clamped to
    /// the layer's current bounds each tick.
    fn absolute_time_advance(&mut self) {
        let Some(layer) = self.layers.active_layer() else { return };
        let first = layer.first_time();
        let last = layer.last_time();
        let delta = self.clock.delta_t();
        let step = next_time(
            self.mode,
            self.current,
            first,
            last,
            |t| t.backward_clamped(delta, first),
            |t| t.forward_clamped(delta, last),
        );
        match step {
            None => self.pause(),
            Some(step) => {
                if self.sync(step.next) {
                    self.mode = step.mode;
                }
            }
        }
    }

    // === Playback control ===

    /// Start playback. No-op without a multi-frame active layer.
    pub fn play(&mut self) {
        let multi = self
            .layers
            .active_layer()
            .map(|l| l.is_multi_frame())
            .unwrap_or(false);
        if multi {
            self.clock.start();
            self.panel.set_play_state(true);
            debug!("playback started ({} mode)", self.mode);
        }
    }

    /// Stop playback. Idempotent; always requests one render, since
    /// resolution selection may depend on the play/pause state alone.
    pub fn pause(&mut self) {
        self.clock.stop();
        self.panel.set_play_state(false);
        self.renderer.render(RENDER_FULL);
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Relative cadence at `fps` frames per second.
    pub fn set_desired_relative_speed(&mut self, fps: u32) {
        self.clock.set_relative_speed(fps);
    }

    /// Absolute cadence: `secs` simulated seconds spread over each real
    /// second, regardless of frame density.
    pub fn set_desired_absolute_speed(&mut self, secs: i64) {
        self.clock.set_absolute_speed(secs);
    }

    // === Explicit positioning ===

    /// Jump to the layer frame nearest `t`.
    pub fn set_time(&mut self, t: TimePoint) {
        if let Some(layer) = self.layers.active_layer() {
            let snapped = layer.nearest_time(t);
            self.sync(snapped);
        }
    }

    /// Jump to frame `frame` of the active layer.
    pub fn set_frame(&mut self, frame: usize) {
        if let Some(layer) = self.layers.active_layer() {
            let t = layer.frame_time(frame);
            self.sync(t);
        }
    }

    /// Single unconditional step to the next frame, ignoring the advance
    /// mode; clamps at the last frame.
    pub fn next_frame(&mut self) {
        if let Some(layer) = self.layers.active_layer() {
            let t = layer.higher_time(self.current);
            self.sync(t);
        }
    }

    /// Single unconditional step to the previous frame; clamps at the first.
    pub fn previous_frame(&mut self) {
        if let Some(layer) = self.layers.active_layer() {
            let t = layer.lower_time(self.current);
            self.sync(t);
        }
    }

    // === Range maintenance ===

    /// Recompute the playable range after the active layer changed.
    ///
    /// With no layer left the range collapses to the last committed instant
    /// and playback pauses. Range listeners are notified only on an actual
    /// change.
    pub fn active_layer_changed(&mut self) {
        let layer = self.layers.active_layer();
        match &layer {
            Some(layer) => self.panel.set_slider_range(Some(layer.max_frame())),
            None => {
                self.pause();
                self.panel.set_slider_range(None);
            }
        }

        let range = match layer {
            Some(layer) => TimeRange { start: layer.first_time(), end: layer.last_time() },
            None => TimeRange::point(self.current),
        };
        if range != self.range {
            self.range = range;
            debug!("playable range now {range}");
            for l in self.range_listeners.iter() {
                l.time_range_changed(range.start, range.end);
            }
        }
    }

    // === Commit protocol ===

    /// Commit `t` as the current program time and fan it out.
    ///
    /// Returns false when the recording gate dropped the sync whole.
    fn sync(&mut self, t: TimePoint) -> bool {
        if self.recording && self.pending_ack {
            trace!("sync {t} dropped: recorded frame not yet acknowledged");
            return false;
        }

        self.current = t;
        self.viewpoint.time_changed(t);

        self.layers.set_all_layers_nearest_frame(t);
        self.renderer.render(RENDER_FULL);

        for l in self.time_listeners.iter() {
            l.time_changed(t.millis());
        }

        if let Some(layer) = self.layers.active_layer() {
            let frame = layer.current_frame();
            let is_last = frame == layer.max_frame();
            for l in self.frame_listeners.iter() {
                l.frame_changed(frame, is_last);
            }
            self.panel.set_frame_slider(frame);
        }

        if self.recording {
            self.pending_ack = true;
        }
        trace!("synced {t}");
        true
    }

    // === Listener registration ===

    pub fn add_frame_listener(&mut self, listener: Arc<dyn FrameListener>) {
        self.frame_listeners.add(&listener);
    }

    pub fn remove_frame_listener(&mut self, listener: &Arc<dyn FrameListener>) {
        self.frame_listeners.remove(listener);
    }

    /// Register a time listener; delivers the current millis synchronously.
    pub fn add_time_listener(&mut self, listener: Arc<dyn TimeListener>) {
        if self.time_listeners.add(&listener) {
            listener.time_changed(self.current.millis());
        }
    }

    pub fn remove_time_listener(&mut self, listener: &Arc<dyn TimeListener>) {
        self.time_listeners.remove(listener);
    }

    /// Register a range listener; delivers the current range synchronously.
    pub fn add_range_listener(&mut self, listener: Arc<dyn RangeListener>) {
        if self.range_listeners.add(&listener) {
            listener.time_range_changed(self.range.start, self.range.end);
        }
    }

    pub fn remove_range_listener(&mut self, listener: &Arc<dyn RangeListener>) {
        self.range_listeners.remove(listener);
    }

    // === Recording gate ===

    /// Enter recording: from here on, each committed frame must be
    /// acknowledged before the next sync is accepted.
    pub fn start_recording(&mut self) {
        self.recording = true;
        info!("recording started");
    }

    pub fn stop_recording(&mut self) {
        self.recording = false;
        self.pending_ack = false;
        info!("recording stopped");
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Capture collaborator consumed the outstanding frame; the next sync
    /// may proceed.
    pub fn acknowledge_frame(&mut self) {
        self.pending_ack = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Layer, TimeSequence};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    type CallLog = Rc<RefCell<Vec<String>>>;

    struct StubStack {
        layer: Option<Arc<TimeSequence>>,
        log: CallLog,
    }

    impl LayerStack for StubStack {
        fn active_layer(&self) -> Option<Arc<dyn Layer>> {
            self.layer.clone().map(|l| l as Arc<dyn Layer>)
        }

        fn set_all_layers_nearest_frame(&mut self, t: TimePoint) {
            self.log.borrow_mut().push(format!("snap {}", t.millis()));
            if let Some(layer) = &self.layer {
                layer.seek_nearest(t);
            }
        }
    }

    struct StubViewpoint(CallLog);
    impl Viewpoint for StubViewpoint {
        fn time_changed(&mut self, t: TimePoint) {
            self.0.borrow_mut().push(format!("viewpoint {}", t.millis()));
        }
    }

    struct StubRenderer(CallLog);
    impl Renderer for StubRenderer {
        fn render(&mut self, _priority: f64) {
            self.0.borrow_mut().push("render".into());
        }
    }

    struct StubPanel(CallLog);
    impl TransportPanel for StubPanel {
        fn set_play_state(&mut self, playing: bool) {
            self.0.borrow_mut().push(format!("play_state {playing}"));
        }
        fn set_frame_slider(&mut self, frame: usize) {
            self.0.borrow_mut().push(format!("slider {frame}"));
        }
        fn set_slider_range(&mut self, max_frame: Option<usize>) {
            self.0.borrow_mut().push(format!("slider_range {max_frame:?}"));
        }
    }

    struct TimeLog(CallLog);
    impl TimeListener for TimeLog {
        fn time_changed(&self, millis: i64) {
            self.0.borrow_mut().push(format!("time {millis}"));
        }
    }

    struct FrameLog(CallLog);
    impl FrameListener for FrameLog {
        fn frame_changed(&self, frame: usize, is_last: bool) {
            self.0.borrow_mut().push(format!("frame {frame} last={is_last}"));
        }
    }

    struct RangeLog(CallLog);
    impl RangeListener for RangeLog {
        fn time_range_changed(&self, start: TimePoint, end: TimePoint) {
            self.0.borrow_mut().push(format!("range {}..{}", start.millis(), end.millis()));
        }
    }

    /// Transport over a sequence with the given frame times, plus the
    /// shared call log of every collaborator.
    fn rig(times: &[i64]) -> (Transport, CallLog) {
        let log: CallLog = Rc::new(RefCell::new(Vec::new()));
        let layer = if times.is_empty() {
            None
        } else {
            let times = times.iter().map(|&m| TimePoint::from_millis(m)).collect();
            Some(Arc::new(TimeSequence::new("rig", times).unwrap()))
        };
        let stack = StubStack { layer, log: log.clone() };
        let transport = Transport::new(
            Box::new(stack),
            Box::new(StubViewpoint(log.clone())),
            Box::new(StubRenderer(log.clone())),
            Box::new(StubPanel(log.clone())),
        );
        (transport, log)
    }

    fn taken(log: &CallLog) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    /// Drives a running clock with synthetic timestamps far enough apart
    /// that every step lands past the re-anchored deadline.
    struct Ticker {
        base: Instant,
        n: u64,
    }

    impl Ticker {
        /// Anchors the clock; call after `play()`.
        fn new(transport: &mut Transport) -> Self {
            let base = Instant::now();
            transport.update_at(base);
            Self { base, n: 0 }
        }

        /// Force exactly one due tick.
        fn tick(&mut self, transport: &mut Transport) {
            self.n += 1;
            transport.update_at(self.base + Duration::from_secs(3600 * self.n));
        }
    }

    #[test]
    fn test_sync_fanout_order() {
        let (mut t, log) = rig(&[0, 10, 20]);
        let tl: Arc<dyn TimeListener> = Arc::new(TimeLog(log.clone()));
        let fl: Arc<dyn FrameListener> = Arc::new(FrameLog(log.clone()));
        t.add_time_listener(tl);
        t.add_frame_listener(fl);
        taken(&log);

        t.set_time(TimePoint::from_millis(10));
        assert_eq!(
            taken(&log),
            vec!["viewpoint 10", "snap 10", "render", "time 10", "frame 1 last=false", "slider 1"]
        );
    }

    #[test]
    fn test_set_time_snaps_to_nearest_frame() {
        let (mut t, _log) = rig(&[0, 10, 20]);
        t.set_time(TimePoint::from_millis(13));
        assert_eq!(t.time(), TimePoint::from_millis(10));
        t.set_time(TimePoint::from_millis(999));
        assert_eq!(t.time(), TimePoint::from_millis(20));
    }

    #[test]
    fn test_set_frame_and_last_flag() {
        let (mut t, log) = rig(&[0, 10, 20]);
        let fl: Arc<dyn FrameListener> = Arc::new(FrameLog(log.clone()));
        t.add_frame_listener(fl);
        taken(&log);

        t.set_frame(2);
        assert_eq!(t.time(), TimePoint::from_millis(20));
        assert!(taken(&log).contains(&"frame 2 last=true".to_string()));
    }

    #[test]
    fn test_time_listener_snapshot_on_subscribe() {
        let (mut t, log) = rig(&[0, 42, 99]);
        t.set_time(TimePoint::from_millis(42));
        taken(&log);

        // No tick has occurred since; registration alone delivers 42
        let tl: Arc<dyn TimeListener> = Arc::new(TimeLog(log.clone()));
        t.add_time_listener(tl);
        assert_eq!(taken(&log), vec!["time 42"]);
    }

    #[test]
    fn test_duplicate_listener_notified_once() {
        let (mut t, log) = rig(&[0, 10]);
        let tl: Arc<dyn TimeListener> = Arc::new(TimeLog(log.clone()));
        t.add_time_listener(tl.clone());
        t.add_time_listener(tl.clone());
        taken(&log);

        t.set_time(TimePoint::from_millis(10));
        let events: Vec<_> = taken(&log).into_iter().filter(|e| e.starts_with("time")).collect();
        assert_eq!(events, vec!["time 10"]);

        t.remove_time_listener(&tl);
        t.set_time(TimePoint::from_millis(0));
        assert!(taken(&log).iter().all(|e| !e.starts_with("time")));
    }

    #[test]
    fn test_recording_gate_drops_whole_sync() {
        let (mut t, log) = rig(&[0, 50, 60]);
        t.start_recording();

        t.set_time(TimePoint::from_millis(50));
        assert_eq!(t.time(), TimePoint::from_millis(50));
        assert!(!taken(&log).is_empty());

        // Unacknowledged: the next sync is dropped whole
        t.set_time(TimePoint::from_millis(60));
        assert_eq!(t.time(), TimePoint::from_millis(50));
        assert!(taken(&log).is_empty());

        t.acknowledge_frame();
        t.set_time(TimePoint::from_millis(60));
        assert_eq!(t.time(), TimePoint::from_millis(60));
        assert!(!taken(&log).is_empty());
    }

    #[test]
    fn test_stop_recording_clears_outstanding_ack() {
        let (mut t, _log) = rig(&[0, 50, 60]);
        t.start_recording();
        t.set_time(TimePoint::from_millis(50));
        t.stop_recording();

        // Gate fully open again
        t.set_time(TimePoint::from_millis(60));
        assert_eq!(t.time(), TimePoint::from_millis(60));

        // Re-entering recording starts with a clean slate
        t.start_recording();
        t.set_time(TimePoint::from_millis(50));
        assert_eq!(t.time(), TimePoint::from_millis(50));
    }

    #[test]
    fn test_play_requires_multi_frame_layer() {
        let (mut t, log) = rig(&[5]);
        t.play();
        assert!(!t.is_playing());
        assert!(taken(&log).is_empty());

        let (mut t, log) = rig(&[0, 10]);
        t.play();
        assert!(t.is_playing());
        assert_eq!(taken(&log), vec!["play_state true"]);
    }

    #[test]
    fn test_pause_always_forces_render() {
        let (mut t, log) = rig(&[0, 10]);
        t.pause();
        assert_eq!(taken(&log), vec!["play_state false", "render"]);
        // Idempotent
        t.pause();
        assert_eq!(taken(&log), vec!["play_state false", "render"]);
    }

    #[test]
    fn test_toggle() {
        let (mut t, _log) = rig(&[0, 10]);
        t.toggle();
        assert!(t.is_playing());
        t.toggle();
        assert!(!t.is_playing());
    }

    #[test]
    fn test_no_layer_makes_mutating_calls_noops() {
        let (mut t, log) = rig(&[]);
        t.set_time(TimePoint::from_millis(10));
        t.set_frame(3);
        t.next_frame();
        t.previous_frame();
        t.play();
        assert_eq!(t.time(), TimePoint::EPOCH);
        assert!(!t.is_playing());
        assert!(taken(&log).is_empty());
    }

    #[test]
    fn test_next_previous_frame_ignore_mode_and_clamp() {
        let (mut t, _log) = rig(&[0, 10, 20]);
        t.set_advance_mode(AdvanceMode::Loop);
        t.set_frame(2);

        // No wrap on explicit stepping, even in loop mode
        t.next_frame();
        assert_eq!(t.time(), TimePoint::from_millis(20));

        t.previous_frame();
        assert_eq!(t.time(), TimePoint::from_millis(10));
        t.previous_frame();
        t.previous_frame();
        assert_eq!(t.time(), TimePoint::from_millis(0));
    }

    #[test]
    fn test_relative_tick_loop_wraps_at_last() {
        let (mut t, _log) = rig(&[0, 10, 20]);
        t.set_frame(2);
        t.play();
        let mut ticker = Ticker::new(&mut t);
        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(0));
        assert!(t.is_playing());
    }

    #[test]
    fn test_relative_tick_stop_pauses_at_last() {
        let (mut t, log) = rig(&[0, 10, 20]);
        t.set_advance_mode(AdvanceMode::Stop);
        t.set_frame(2);
        t.play();
        let mut ticker = Ticker::new(&mut t);
        taken(&log);

        ticker.tick(&mut t);
        // STOP: no time mutation, playback paused
        assert_eq!(t.time(), TimePoint::from_millis(20));
        assert!(!t.is_playing());
        assert_eq!(taken(&log), vec!["play_state false", "render"]);
    }

    #[test]
    fn test_relative_tick_swing_flips_and_descends() {
        let (mut t, _log) = rig(&[0, 10, 20]);
        t.set_advance_mode(AdvanceMode::Swing);
        t.set_frame(2);
        t.play();
        let mut ticker = Ticker::new(&mut t);

        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(10));
        assert_eq!(t.advance_mode(), AdvanceMode::SwingDown);

        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(0));

        // At the first frame the swing turns around again
        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(10));
        assert_eq!(t.advance_mode(), AdvanceMode::Swing);
    }

    #[test]
    fn test_gated_tick_commits_neither_time_nor_mode_flip() {
        let (mut t, _log) = rig(&[0, 10, 20]);
        t.set_advance_mode(AdvanceMode::Swing);
        t.set_frame(2);
        t.start_recording();
        t.set_time(TimePoint::from_millis(20)); // arms the gate
        t.play();
        let mut ticker = Ticker::new(&mut t);

        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(20));
        assert_eq!(t.advance_mode(), AdvanceMode::Swing);

        t.acknowledge_frame();
        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(10));
        assert_eq!(t.advance_mode(), AdvanceMode::SwingDown);
    }

    #[test]
    fn test_absolute_tick_advances_by_delta_and_clamps() {
        let (mut t, _log) = rig(&[0, 1000, 2000, 10_000]);
        t.set_desired_absolute_speed(60); // 33 * 60 = 1980ms per tick
        t.set_advance_mode(AdvanceMode::Stop);
        t.set_frame(0);
        t.play();
        let mut ticker = Ticker::new(&mut t);

        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(1980));

        // Clamped at the last frame time rather than overshooting
        for _ in 0..10 {
            ticker.tick(&mut t);
        }
        assert_eq!(t.time(), TimePoint::from_millis(10_000));
        assert!(!t.is_playing());
    }

    #[test]
    fn test_absolute_tick_swing_descends_after_flip() {
        let (mut t, _log) = rig(&[0, 5000]);
        t.set_desired_absolute_speed(60);
        t.set_advance_mode(AdvanceMode::Swing);
        t.set_frame(1);
        t.play();
        let mut ticker = Ticker::new(&mut t);

        ticker.tick(&mut t);
        assert_eq!(t.time(), TimePoint::from_millis(5000 - 1980));
        assert_eq!(t.advance_mode(), AdvanceMode::SwingDown);
    }

    #[test]
    fn test_active_layer_changed_notifies_range_once() {
        let (mut t, log) = rig(&[0, 10, 20]);
        let rl: Arc<dyn RangeListener> = Arc::new(RangeLog(log.clone()));
        t.add_range_listener(rl);
        // Snapshot of the collapsed default range
        assert_eq!(taken(&log), vec!["range 0..0"]);

        t.active_layer_changed();
        assert_eq!(taken(&log), vec!["slider_range Some(2)", "range 0..20"]);

        // Same layer, same range: slider reconfigured, listeners quiet
        t.active_layer_changed();
        assert_eq!(taken(&log), vec!["slider_range Some(2)"]);
    }

    #[test]
    fn test_layer_removal_collapses_range_and_pauses() {
        let (mut t, log) = rig(&[0, 10, 20]);
        let rl: Arc<dyn RangeListener> = Arc::new(RangeLog(log.clone()));
        t.add_range_listener(rl);
        t.active_layer_changed();
        t.set_frame(1);
        t.play();
        taken(&log);

        // Swap the stack for an empty one, as the app would on layer close
        t.layers = Box::new(StubStack { layer: None, log: log.clone() });
        t.active_layer_changed();

        assert!(!t.is_playing());
        assert_eq!(t.range(), TimeRange::point(TimePoint::from_millis(10)));
        let calls = taken(&log);
        assert!(calls.contains(&"slider_range None".to_string()));
        assert!(calls.contains(&"range 10..10".to_string()));
    }

    #[test]
    fn test_invoke_posted_off_thread_runs_on_update() {
        let (mut t, _log) = rig(&[0, 10]);
        let handle = t.invoke_handle();

        std::thread::spawn(move || {
            handle.post(|t: &mut Transport| t.set_frame(1));
        })
        .join()
        .unwrap();

        assert_eq!(t.time(), TimePoint::EPOCH);
        t.update();
        assert_eq!(t.time(), TimePoint::from_millis(10));
    }

    #[test]
    fn test_acknowledge_via_invoke_releases_gate() {
        // The shape the capture collaborator uses: consume a frame off
        // context, post the acknowledge back
        let (mut t, _log) = rig(&[0, 10, 20]);
        t.start_recording();
        t.set_frame(0);

        let handle = t.invoke_handle();
        handle.post(|t: &mut Transport| t.acknowledge_frame());

        t.next_frame();
        assert_eq!(t.time(), TimePoint::EPOCH); // still gated

        t.update(); // drains the acknowledge
        t.next_frame();
        assert_eq!(t.time(), TimePoint::from_millis(10));
    }
}
