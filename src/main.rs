//! Demo driver: plays a synthetic time-stamped sequence through the
//! transport, with reference implementations of the collaborator traits.
//!
//! With `--record` the run exercises the backpressure gate end to end: a
//! grabber listener "captures" each committed frame and posts the
//! acknowledge back through the invoke handle, exactly the shape an
//! off-context export process uses.

use cadence::cli::Args;
use cadence::core::dispatch::InvokeHandle;
use cadence::core::transport::Transport;
use cadence::entities::{Layer, LayerStack, Renderer, TimePoint, TimeSequence, TransportPanel};
use cadence::core::listeners::FrameListener;

use clap::Parser;
use log::{debug, info, trace};
use serde::Serialize;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Single master layer, no secondaries.
struct SingleLayerStack {
    layer: Arc<TimeSequence>,
}

impl LayerStack for SingleLayerStack {
    fn active_layer(&self) -> Option<Arc<dyn Layer>> {
        Some(self.layer.clone())
    }

    fn set_all_layers_nearest_frame(&mut self, t: TimePoint) {
        self.layer.seek_nearest(t);
    }
}

/// Counts render requests instead of drawing.
struct CountingRenderer {
    renders: Rc<Cell<u64>>,
}

impl Renderer for CountingRenderer {
    fn render(&mut self, priority: f64) {
        self.renders.set(self.renders.get() + 1);
        trace!("render requested (priority {priority})");
    }
}

/// Indicator "widgets" that just log.
struct LogPanel;

impl TransportPanel for LogPanel {
    fn set_play_state(&mut self, playing: bool) {
        info!("play state: {}", if playing { "playing" } else { "paused" });
    }

    fn set_frame_slider(&mut self, frame: usize) {
        trace!("slider -> frame {frame}");
    }

    fn set_slider_range(&mut self, max_frame: Option<usize>) {
        match max_frame {
            Some(max) => info!("slider range: 0..={max}"),
            None => info!("slider range cleared"),
        }
    }
}

/// Export-style frame consumer: capture, then acknowledge off the listener
/// callback via the invoke handle so the next tick can proceed.
struct Grabber {
    handle: InvokeHandle<Transport>,
    captured: Cell<u64>,
}

impl FrameListener for Grabber {
    fn frame_changed(&self, frame: usize, is_last: bool) {
        self.captured.set(self.captured.get() + 1);
        info!("captured frame {frame}{}", if is_last { " (last)" } else { "" });
        self.handle.post(|t: &mut Transport| t.acknowledge_frame());
    }
}

#[derive(Serialize)]
struct Report {
    frames_in_sequence: usize,
    final_time_millis: i64,
    final_frame: usize,
    final_mode: String,
    renders: u64,
    frames_captured: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Console logging with specified verbosity level (respects RUST_LOG if set)
    let default_level = match args.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();

    info!("cadence playback demo starting...");
    debug!("Command-line args: {:?}", args);

    let layer = Arc::new(TimeSequence::with_cadence(
        "synthetic",
        TimePoint::EPOCH,
        args.frames,
        args.interval,
    )?);
    info!(
        "sequence '{}': {} frames over {}..{}",
        layer.name,
        layer.len(),
        layer.first_time(),
        layer.last_time()
    );

    let renders = Rc::new(Cell::new(0u64));
    let mut transport = Transport::new(
        Box::new(SingleLayerStack { layer: layer.clone() }),
        Box::new(()), // no camera in the demo
        Box::new(CountingRenderer { renders: renders.clone() }),
        Box::new(LogPanel),
    );

    transport.set_advance_mode(args.mode);
    match args.absolute {
        Some(secs) => transport.set_desired_absolute_speed(secs),
        None => transport.set_desired_relative_speed(args.fps),
    }
    transport.active_layer_changed();
    transport.set_frame(0);

    let grabber = Arc::new(Grabber {
        handle: transport.invoke_handle(),
        captured: Cell::new(0),
    });
    if args.record {
        transport.start_recording();
        transport.add_frame_listener(grabber.clone());
    }

    transport.play();
    let deadline = Instant::now() + Duration::from_secs_f64(args.duration);
    while Instant::now() < deadline && transport.is_playing() {
        transport.update();
        thread::sleep(Duration::from_millis(2));
    }
    transport.pause();

    info!(
        "finished at {} (frame {}/{}), {} renders",
        transport.time(),
        layer.current_frame(),
        layer.max_frame(),
        renders.get()
    );

    if args.json {
        let report = Report {
            frames_in_sequence: layer.len(),
            final_time_millis: transport.time().millis(),
            final_frame: layer.current_frame(),
            final_mode: transport.advance_mode().to_string(),
            renders: renders.get(),
            frames_captured: grabber.captured.get(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}
