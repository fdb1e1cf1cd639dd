//! Decoder for two-channel serial PCM audio reconstructed by polling line
//! levels.
//!
//! ## Technical Overview
//!
//! Reconstructs fixed-width PCM sample words from three digital lines of a
//! serial audio interface — bit clock (BCK), frame clock (LRCK) and serial
//! data (DIN) — using nothing but software polling. No edge interrupts, no
//! DMA: a tight loop snapshots the lines, detects BCK rising edges and
//! shifts DIN into an accumulator, MSB first. When a word completes it is
//! tagged with the channel indicated by the LRCK level on its final bit.
//!
//! Polling cannot give hard real-time guarantees. If the loop misses an
//! edge, or LRCK flips mid-word, the decoder has no way to notice; it will
//! produce a word whose bits or channel tag are wrong. That is an inherent
//! fidelity limit of the acquisition strategy, documented rather than
//! masked.
//!
//! Note on channel timing: the tag reflects LRCK at word *completion*, not
//! at word start. Serial-audio framings in the I²S family flip LRCK ahead of
//! a channel's first data bit, so bit-exact parity with such hardware should
//! be verified before relying on the tag.
//!
//! ## Quick Start
//!
//! ```rust
//! use pcmtap::decode::{Decoder, DecoderConfig};
//! use pcmtap::sampler::{LineState, ScriptSampler};
//!
//! // One low/high pair per bit: 24 rising edges carrying alternating data.
//! let mut script = Vec::new();
//! for i in 0..24 {
//!     let din = i % 2 == 0;
//!     script.push(LineState::new(false, false, din));
//!     script.push(LineState::new(true, false, din));
//! }
//!
//! let decoder = Decoder::new(DecoderConfig::default())?;
//! let mut capture = decoder.capture(ScriptSampler::new(script));
//!
//! let sample = capture.next().unwrap();
//! assert_eq!(sample.value, 0xAAAAAA);
//! # Ok::<(), pcmtap::errors::ConfigError>(())
//! ```

/// The bit-stream decoder core.
///
/// Provides the [`Decoder`](decode::Decoder) transition function
/// ([`step`](decode::Decoder::step)) and the infinite polling loop
/// ([`capture`](decode::Decoder::capture)) that turns polled
/// [`LineState`](sampler::LineState) snapshots into
/// [`DecodedSample`](decode::DecodedSample) values.
pub mod decode;

/// Diagnostics sinks for the capture path.
///
/// Provides the [`DiagSink`](diag::DiagSink) seam the decoder reports
/// through, with [`LogSink`](diag::LogSink) for operators and
/// [`RecordingSink`](diag::RecordingSink) for tests.
pub mod diag;

/// Error types.
pub mod errors;

/// The line-sampler seam.
///
/// Provides [`LineState`](sampler::LineState), the
/// [`LineSampler`](sampler::LineSampler) trait implemented by real line
/// backends, and [`ScriptSampler`](sampler::ScriptSampler) for synthetic
/// input.
pub mod sampler;

/// Run-lifetime throughput counters.
pub mod stats;

pub use decode::{Capture, Channel, DecodedSample, Decoder, DecoderConfig};
pub use diag::{DiagFlags, DiagSink, LogSink, NullSink, RecordingSink};
pub use errors::ConfigError;
pub use sampler::{LineSampler, LineState, ScriptSampler};
pub use stats::RunStats;
