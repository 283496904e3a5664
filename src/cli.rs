use clap::Parser;

use crate::core::advance::AdvanceMode;
use crate::core::clock::FPS_RELATIVE_DEFAULT;

/// Playback engine demo - drives a synthetic time-stamped sequence
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of frames in the synthetic sequence
    #[arg(short = 'n', long = "frames", value_name = "N", default_value_t = 100)]
    pub frames: usize,

    /// Milliseconds of simulated time between successive frames
    #[arg(short = 'i', long = "interval", value_name = "MS", default_value_t = 60_000)]
    pub interval: i64,

    /// Boundary behavior at the ends of the range (loop, stop, swing, swing-down)
    #[arg(short = 'm', long = "mode", value_name = "MODE", default_value = "loop")]
    pub mode: AdvanceMode,

    /// Relative playback rate in frames per second
    #[arg(long = "fps", value_name = "FPS", default_value_t = FPS_RELATIVE_DEFAULT)]
    pub fps: u32,

    /// Use the absolute cadence instead: simulated seconds per real second
    #[arg(short = 'A', long = "absolute", value_name = "SECS")]
    pub absolute: Option<i64>,

    /// Wall-clock seconds to run before exiting
    #[arg(short = 'd', long = "duration", value_name = "SECS", default_value_t = 3.0)]
    pub duration: f64,

    /// Exercise the recording gate with a self-acknowledging frame grabber
    #[arg(short = 'r', long = "record")]
    pub record: bool,

    /// Print a JSON playback report on exit
    #[arg(long = "json")]
    pub json: bool,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}
