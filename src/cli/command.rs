use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use pcmtap::decode::DecoderConfig;
use pcmtap::diag::DiagFlags;

#[derive(Debug, ClapParser)]
#[command(
    name       = env!("CARGO_PKG_NAME"),
    version    = env!("CARGO_PKG_VERSION"),
    about      = "Tools for capturing and decoding PCM audio from polled GPIO serial lines",
    long_about = None,
)]
pub struct Cli {
    /// Set the log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub loglevel: LogLevel,

    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Choose an operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Poll the audio lines and decode PCM sample words until killed.
    Capture(CaptureArgs),

    /// Print the capture plan and GPIO chip information.
    Info(InfoArgs),
}

#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// GPIO character device carrying the audio lines.
    #[arg(value_name = "CHIP", default_value = "/dev/gpiochip0")]
    pub chip: PathBuf,

    /// Line offset of the bit clock (BCK).
    #[arg(long, value_name = "LINE", default_value_t = 18)]
    pub bck_line: u32,

    /// Line offset of the frame clock (LRCK).
    #[arg(long, value_name = "LINE", default_value_t = 19)]
    pub lrck_line: u32,

    /// Line offset of the serial data (DIN).
    #[arg(long, value_name = "LINE", default_value_t = 20)]
    pub din_line: u32,

    /// Bits per sample word (1-32).
    #[arg(long, value_name = "BITS", default_value_t = 24)]
    pub word_width: u32,

    /// Cooperative yield between polls, in microseconds (0 disables).
    #[arg(long, value_name = "MICROS", default_value_t = 1)]
    pub poll_interval_us: u64,

    /// Suppress throttled raw pin snapshots.
    #[arg(long)]
    pub no_pin_states: bool,

    /// Suppress per-edge reports.
    #[arg(long)]
    pub no_edges: bool,

    /// Suppress per-bit collection reports.
    #[arg(long)]
    pub no_bits: bool,

    /// Suppress accumulator assembly dumps.
    #[arg(long)]
    pub no_assembly: bool,

    /// Suppress completed-sample blocks.
    #[arg(long)]
    pub no_samples: bool,
}

impl CaptureArgs {
    pub fn diag_flags(&self) -> DiagFlags {
        DiagFlags {
            pin_states: !self.no_pin_states,
            edges: !self.no_edges,
            bit_collection: !self.no_bits,
            data_assembly: !self.no_assembly,
            final_value: !self.no_samples,
        }
    }

    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            word_width: self.word_width,
            poll_interval: Duration::from_micros(self.poll_interval_us),
        }
    }
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub capture: CaptureArgs,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    /// Disable logging output.
    Off,
    /// No output except errors.
    Error,
    /// Show warnings and errors.
    Warn,
    /// Show info, warnings and errors (default).
    Info,
    /// Show debug, info, warnings and errors.
    Debug,
    /// Show all log messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert LogLevel to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Colorized human-readable text.
    Plain,
    /// Structured JSON per log record.
    Json,
}
