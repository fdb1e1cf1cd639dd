//! Bit-stream decoding of polled serial-audio line states.

use std::fmt::Display;
use std::thread;
use std::time::Duration;

use crate::diag::{DiagSink, NullSink};
use crate::errors::ConfigError;
use crate::sampler::{LineSampler, LineState};
use crate::stats::RunStats;

/// Decoder configuration, fixed at construction and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Bits per sample word, 1 through 32.
    pub word_width: u32,
    /// Cooperative yield between polls. Bounds CPU usage only; never relied
    /// on for protocol timing.
    pub poll_interval: Duration,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            word_width: 24,
            poll_interval: Duration::from_micros(1),
        }
    }
}

/// Audio channel indicated by the frame clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Left,
    Right,
}

impl Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Left => write!(f, "Left"),
            Channel::Right => write!(f, "Right"),
        }
    }
}

/// One completed sample word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedSample {
    /// The assembled word; exactly `word_width` significant bits.
    pub value: u32,
    /// Channel indicated by the frame-clock level at the word's final bit.
    pub channel: Channel,
    /// 1-based position in the capture's output sequence.
    pub index: u64,
}

/// The edge-detection and bit-assembly state machine.
///
/// [`step`](Decoder::step) advances the machine by one polled snapshot and
/// is what unit tests drive directly; [`capture`](Decoder::capture) wraps
/// it in the infinite polling loop a real run consists of.
///
/// The accumulator invariant: the low `bit_count` bits of `word` hold data,
/// everything above is zero. Reaching `word_width` consumes the accumulator
/// into a [`DecodedSample`] and resets it within the same step.
///
/// There are no error paths in steady-state decoding. Any combination of
/// line levels is a valid input; a frame clock flipping mid-word silently
/// yields a sample whose tag reflects the level on the final bit. That is a
/// documented fidelity limit of polled acquisition, not a detectable fault.
#[derive(Debug)]
pub struct Decoder<D: DiagSink = NullSink> {
    config: DecoderConfig,
    word: u32,
    bit_count: u32,
    last_bck: bool,
    stats: RunStats,
    sink: D,
}

impl Decoder<NullSink> {
    /// Decoder without diagnostics.
    pub fn new(config: DecoderConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, NullSink)
    }
}

impl<D: DiagSink> Decoder<D> {
    /// Decoder reporting through the given diagnostics sink.
    pub fn with_sink(config: DecoderConfig, sink: D) -> Result<Self, ConfigError> {
        if !(1..=32).contains(&config.word_width) {
            return Err(ConfigError::InvalidWordWidth(config.word_width));
        }

        Ok(Self {
            config,
            word: 0,
            bit_count: 0,
            last_bck: false,
            stats: RunStats::new(),
            sink,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Bits accumulated into the word in flight.
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Recover the sink, e.g. to inspect a recording after a test run.
    pub fn into_sink(self) -> D {
        self.sink
    }

    /// Advance the state machine by one polled snapshot.
    ///
    /// Only a bit-clock rising edge (`bck` high now, low on the previous
    /// step) advances the word; falling edges and steady levels leave the
    /// accumulator untouched. The edge that completes a word emits the
    /// sample, tagged with the frame-clock level captured on that same edge,
    /// and resets the accumulator. Clock-level bookkeeping happens on every
    /// step so edge detection stays correct whether or not a sample was
    /// produced.
    pub fn step(&mut self, state: LineState) -> Option<DecodedSample> {
        self.sink.poll(state);

        let mut completed = None;

        if state.bck && !self.last_bck {
            self.sink.edge(state);

            self.word = (self.word << 1) | u32::from(state.din);
            self.bit_count += 1;
            self.sink.bit(self.bit_count, state.din);
            self.sink.assembly(self.word, self.bit_count);

            if self.bit_count == self.config.word_width {
                let sample = DecodedSample {
                    value: self.word,
                    channel: if state.lrck {
                        Channel::Right
                    } else {
                        Channel::Left
                    },
                    index: self.stats.record(),
                };

                self.word = 0;
                self.bit_count = 0;

                self.sink.complete(&sample, self.stats.samples_per_second());
                completed = Some(sample);
            }
        }

        self.last_bck = state.bck;
        completed
    }

    /// Consume the decoder into an unbounded stream of samples.
    ///
    /// The stream is non-restartable and never terminates on its own; an
    /// idle bus simply means the next sample takes longer. Cancellation is
    /// external process termination, and a word in flight at that point is
    /// discarded.
    pub fn capture<S: LineSampler>(self, sampler: S) -> Capture<S, D> {
        Capture {
            decoder: self,
            sampler,
        }
    }
}

/// Infinite sample stream driving a [`LineSampler`] at the configured
/// cadence.
///
/// Each iteration polls the sampler, steps the decoder and then yields the
/// processor for `poll_interval` (skipped when zero). `next` never returns
/// `None`.
#[derive(Debug)]
pub struct Capture<S: LineSampler, D: DiagSink> {
    decoder: Decoder<D>,
    sampler: S,
}

impl<S: LineSampler, D: DiagSink> Capture<S, D> {
    pub fn decoder(&self) -> &Decoder<D> {
        &self.decoder
    }
}

impl<S: LineSampler, D: DiagSink> Iterator for Capture<S, D> {
    type Item = DecodedSample;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let state = self.sampler.sample();
            let completed = self.decoder.step(state);

            let pause = self.decoder.config.poll_interval;
            if !pause.is_zero() {
                thread::sleep(pause);
            }

            if completed.is_some() {
                return completed;
            }
        }
    }
}

#[cfg(test)]
use crate::diag::{DiagEvent, RecordingSink};

#[cfg(test)]
fn decoder() -> Decoder {
    Decoder::new(DecoderConfig {
        word_width: 24,
        poll_interval: Duration::ZERO,
    })
    .unwrap()
}

/// Drive one bit through the decoder with a full low/high clock pair.
#[cfg(test)]
fn clock_in(decoder: &mut Decoder, din: bool, lrck: bool) -> Option<DecodedSample> {
    assert_eq!(decoder.step(LineState::new(false, lrck, din)), None);
    decoder.step(LineState::new(true, lrck, din))
}

#[test]
fn bit_ordering_is_msb_first() {
    let mut decoder = decoder();

    let mut emitted = Vec::new();
    for i in 0..24 {
        if let Some(sample) = clock_in(&mut decoder, i % 2 == 0, false) {
            emitted.push(sample);
        }
    }

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].value, 0xAAAAAA);
    assert_eq!(emitted[0].channel, Channel::Left);
    assert_eq!(emitted[0].index, 1);
}

#[test]
fn channel_tag_reflects_level_at_completion() {
    let mut decoder = decoder();

    // Frame clock low for bits 1-23, high exactly on the final edge.
    for _ in 0..23 {
        assert_eq!(clock_in(&mut decoder, true, false), None);
    }
    let sample = clock_in(&mut decoder, true, true).unwrap();

    assert_eq!(sample.channel, Channel::Right);
    assert_eq!(sample.value, 0xFFFFFF);
}

#[test]
fn steady_clock_never_advances() {
    let mut decoder = decoder();

    for _ in 0..100 {
        assert_eq!(decoder.step(LineState::new(false, false, true)), None);
    }
    assert_eq!(decoder.bit_count(), 0);

    // One rising edge, then a held-high clock: exactly one bit collected.
    decoder.step(LineState::new(true, false, true));
    assert_eq!(decoder.bit_count(), 1);

    for _ in 0..100 {
        assert_eq!(decoder.step(LineState::new(true, false, true)), None);
    }
    assert_eq!(decoder.bit_count(), 1);
}

#[test]
fn falling_edges_are_ignored() {
    let mut decoder = decoder();

    decoder.step(LineState::new(true, false, true));
    assert_eq!(decoder.bit_count(), 1);

    decoder.step(LineState::new(false, false, true));
    assert_eq!(decoder.bit_count(), 1);

    // The next rising edge is still detected after the drop.
    decoder.step(LineState::new(true, false, true));
    assert_eq!(decoder.bit_count(), 2);
}

#[test]
fn accumulator_resets_on_completion() {
    let mut decoder = decoder();

    for _ in 0..24 {
        clock_in(&mut decoder, true, false);
    }
    assert_eq!(decoder.bit_count(), 0);

    // A fresh word of zeros is uninfluenced by the all-ones word before it.
    let mut second = None;
    for _ in 0..24 {
        second = clock_in(&mut decoder, false, false);
    }
    let second = second.unwrap();
    assert_eq!(second.value, 0);
    assert_eq!(second.index, 2);
    assert_eq!(decoder.stats().samples(), 2);
}

#[test]
fn word_width_is_configurable() {
    let mut decoder = Decoder::new(DecoderConfig {
        word_width: 8,
        poll_interval: Duration::ZERO,
    })
    .unwrap();

    let mut sample = None;
    for bit in [true, false, true, true, false, false, true, false] {
        sample = clock_in(&mut decoder, bit, false);
    }
    assert_eq!(sample.unwrap().value, 0b1011_0010);
}

#[test]
fn invalid_word_width_is_rejected() {
    for width in [0, 33, 64] {
        let result = Decoder::new(DecoderConfig {
            word_width: width,
            poll_interval: Duration::ZERO,
        });
        assert!(matches!(result, Err(ConfigError::InvalidWordWidth(w)) if w == width));
    }
}

#[test]
fn capture_yields_consecutive_samples() {
    let mut bits = Vec::new();
    bits.extend(std::iter::repeat_n(true, 24));
    bits.extend(std::iter::repeat_n(false, 24));

    let sampler = crate::sampler::ScriptSampler::clocked(&bits, false);
    let decoder = Decoder::new(DecoderConfig {
        word_width: 24,
        poll_interval: Duration::ZERO,
    })
    .unwrap();

    let mut capture = decoder.capture(sampler);
    assert_eq!(capture.decoder().config().word_width, 24);

    let first = capture.next().unwrap();
    assert_eq!(first.value, 0xFFFFFF);
    assert_eq!(first.index, 1);
    assert_eq!(capture.decoder().stats().samples(), 1);

    let second = capture.next().unwrap();
    assert_eq!(second.value, 0);
    assert_eq!(second.index, 2);
    assert_eq!(capture.decoder().stats().samples(), 2);
}

#[test]
fn capture_pends_through_edge_free_stretches() {
    // A long idle stretch (clock held low, then held high) before the word:
    // the stream must keep pending through it and still deliver the sample,
    // never terminating on its own.
    let mut script = Vec::new();
    script.extend(std::iter::repeat_n(LineState::new(false, false, false), 500));
    script.push(LineState::new(true, false, false));
    script.extend(std::iter::repeat_n(LineState::new(true, false, false), 499));
    for _ in 0..23 {
        script.push(LineState::new(false, false, true));
        script.push(LineState::new(true, false, true));
    }

    let decoder = Decoder::new(DecoderConfig {
        word_width: 24,
        poll_interval: Duration::ZERO,
    })
    .unwrap();
    let mut capture = decoder.capture(crate::sampler::ScriptSampler::new(script));

    // 1000 edge-free-or-single-edge polls later, the word completes: the
    // idle stretch contributed exactly one bit (its lone rising edge) and
    // the iterator never returned None along the way.
    let sample = capture.next().unwrap();
    assert_eq!(sample.value, 0x7FFFFF);
    assert_eq!(sample.index, 1);
}

#[test]
fn decoding_is_identical_with_and_without_diagnostics() {
    let config = DecoderConfig {
        word_width: 24,
        poll_interval: Duration::ZERO,
    };
    let mut plain = Decoder::new(config).unwrap();
    let mut recorded = Decoder::with_sink(config, RecordingSink::default()).unwrap();

    let bits: Vec<bool> = (0..48).map(|i| i % 3 == 0).collect();
    let mut from_plain = Vec::new();
    let mut from_recorded = Vec::new();
    for &bit in &bits {
        if let Some(s) = clock_in_any(&mut plain, bit) {
            from_plain.push(s);
        }
        if let Some(s) = clock_in_any(&mut recorded, bit) {
            from_recorded.push(s);
        }
    }

    assert_eq!(from_plain, from_recorded);
    assert_eq!(from_plain.len(), 2);

    // The recording saw every poll, every edge and both completions.
    assert!(!recorded.sink().events.is_empty());
    let events = recorded.into_sink().events;
    let polls = events
        .iter()
        .filter(|e| matches!(e, DiagEvent::Poll(_)))
        .count();
    let edges = events
        .iter()
        .filter(|e| matches!(e, DiagEvent::Edge(_)))
        .count();
    let completions = events
        .iter()
        .filter(|e| matches!(e, DiagEvent::Complete { .. }))
        .count();
    assert_eq!(polls, 96);
    assert_eq!(edges, 48);
    assert_eq!(completions, 2);
}

#[cfg(test)]
fn clock_in_any<D: DiagSink>(decoder: &mut Decoder<D>, din: bool) -> Option<DecodedSample> {
    decoder.step(LineState::new(false, false, din));
    decoder.step(LineState::new(true, false, din))
}
