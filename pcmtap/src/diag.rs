//! Diagnostics sinks for the capture path.
//!
//! Everything here is a debugging aid for timing and correctness problems in
//! a polled acquisition path. None of it is a correctness dependency: the
//! decoder behaves identically with [`NullSink`] or with every channel
//! disabled.

use log::{debug, info, trace};

use crate::decode::DecodedSample;
use crate::sampler::LineState;

/// Raw pin snapshots are reported at most once per this many polls.
pub const PIN_STATE_INTERVAL: u64 = 1000;

/// Independently toggleable diagnostics channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagFlags {
    /// Throttled raw line snapshots.
    pub pin_states: bool,
    /// One report per detected bit-clock rising edge.
    pub edges: bool,
    /// One report per bit shifted into the accumulator.
    pub bit_collection: bool,
    /// Accumulator contents (hex and binary) after each bit.
    pub data_assembly: bool,
    /// Completed-sample blocks with throughput.
    pub final_value: bool,
}

impl Default for DiagFlags {
    fn default() -> Self {
        Self {
            pin_states: true,
            edges: true,
            bit_collection: true,
            data_assembly: true,
            final_value: true,
        }
    }
}

impl DiagFlags {
    /// All channels disabled.
    pub const fn none() -> Self {
        Self {
            pin_states: false,
            edges: false,
            bit_collection: false,
            data_assembly: false,
            final_value: false,
        }
    }
}

/// Receiver for decoder diagnostics events.
///
/// All methods default to no-ops, so a sink implements only the channels it
/// cares about. The decoder invokes every method unconditionally; filtering
/// is the sink's concern.
pub trait DiagSink {
    /// One raw line snapshot per poll iteration.
    fn poll(&mut self, _state: LineState) {}

    /// A detected bit-clock rising edge.
    fn edge(&mut self, _state: LineState) {}

    /// A bit shifted into the accumulator; `count` is 1-based.
    fn bit(&mut self, _count: u32, _din: bool) {}

    /// Accumulator contents after a bit was shifted in.
    fn assembly(&mut self, _word: u32, _count: u32) {}

    /// A completed sample, with throughput once one second has elapsed.
    fn complete(&mut self, _sample: &DecodedSample, _rate: Option<u64>) {}
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagSink for NullSink {}

/// Routes enabled channels through the `log` facade.
///
/// Pin snapshots and edges go out at `trace`, bit collection and assembly at
/// `debug`, completed samples at `info`. Snapshots are throttled to one per
/// [`PIN_STATE_INTERVAL`] polls through an explicit counter field, so the
/// throttle state is inspectable and resettable rather than hidden in a
/// static.
#[derive(Debug, Clone)]
pub struct LogSink {
    flags: DiagFlags,
    word_width: u32,
    polls: u64,
}

impl LogSink {
    pub fn new(flags: DiagFlags, word_width: u32) -> Self {
        Self {
            flags,
            word_width,
            polls: 0,
        }
    }

    /// Raw polls observed so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Restart the pin-snapshot throttle window.
    pub fn reset_polls(&mut self) {
        self.polls = 0;
    }

    /// Whether the next poll would emit a pin snapshot.
    ///
    /// True on the first poll of every [`PIN_STATE_INTERVAL`]-sized window,
    /// provided the channel is enabled at all.
    pub fn pin_report_due(&self) -> bool {
        self.flags.pin_states && self.polls.is_multiple_of(PIN_STATE_INTERVAL)
    }

    fn hex_digits(&self) -> usize {
        self.word_width.div_ceil(4) as usize
    }

    fn bin_digits(&self) -> usize {
        self.word_width as usize
    }
}

impl DiagSink for LogSink {
    fn poll(&mut self, state: LineState) {
        if self.pin_report_due() {
            trace!(
                "pins - BCK: {} LRCK: {} DIN: {}",
                u8::from(state.bck),
                u8::from(state.lrck),
                u8::from(state.din)
            );
        }
        self.polls += 1;
    }

    fn edge(&mut self, state: LineState) {
        if self.flags.edges {
            trace!(
                "BCK rising edge (LRCK: {} DIN: {})",
                u8::from(state.lrck),
                u8::from(state.din)
            );
        }
    }

    fn bit(&mut self, count: u32, din: bool) {
        if self.flags.bit_collection {
            debug!("bit {count:2}: {}", u8::from(din));
        }
    }

    fn assembly(&mut self, word: u32, count: u32) {
        if self.flags.data_assembly {
            debug!(
                "data after {count:2} bits: 0x{word:0>hex$X} (binary: {word:0>bin$b})",
                hex = self.hex_digits(),
                bin = self.bin_digits(),
            );
        }
    }

    fn complete(&mut self, sample: &DecodedSample, rate: Option<u64>) {
        if !self.flags.final_value {
            return;
        }

        info!(
            "sample #{}: channel {} value {} (0x{value:0>hex$X}, binary {value:0>bin$b})",
            sample.index,
            sample.channel,
            sample.value,
            value = sample.value,
            hex = self.hex_digits(),
            bin = self.bin_digits(),
        );
        if let Some(rate) = rate {
            info!("samples per second: {rate}");
        }
    }
}

/// One recorded diagnostics event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagEvent {
    Poll(LineState),
    Edge(LineState),
    Bit { count: u32, din: bool },
    Assembly { word: u32, count: u32 },
    Complete { sample: DecodedSample, rate: Option<u64> },
}

/// Captures every event verbatim, for inspection in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub events: Vec<DiagEvent>,
}

impl DiagSink for RecordingSink {
    fn poll(&mut self, state: LineState) {
        self.events.push(DiagEvent::Poll(state));
    }

    fn edge(&mut self, state: LineState) {
        self.events.push(DiagEvent::Edge(state));
    }

    fn bit(&mut self, count: u32, din: bool) {
        self.events.push(DiagEvent::Bit { count, din });
    }

    fn assembly(&mut self, word: u32, count: u32) {
        self.events.push(DiagEvent::Assembly { word, count });
    }

    fn complete(&mut self, sample: &DecodedSample, rate: Option<u64>) {
        self.events.push(DiagEvent::Complete {
            sample: *sample,
            rate,
        });
    }
}

#[test]
fn log_sink_counts_every_poll() {
    let mut sink = LogSink::new(DiagFlags::none(), 24);
    for _ in 0..5 {
        sink.poll(LineState::default());
    }
    assert_eq!(sink.polls(), 5);

    sink.reset_polls();
    assert_eq!(sink.polls(), 0);
}

#[test]
fn pin_snapshots_are_throttled_to_window_starts() {
    let mut sink = LogSink::new(DiagFlags::default(), 24);

    // A report is due on polls 0, 1000, 2000, ... and suppressed between.
    for poll in 0..(3 * PIN_STATE_INTERVAL) {
        assert_eq!(
            sink.pin_report_due(),
            poll.is_multiple_of(PIN_STATE_INTERVAL),
            "poll {poll}"
        );
        sink.poll(LineState::default());
    }

    // Resetting the counter reopens the window immediately.
    sink.poll(LineState::default());
    assert!(!sink.pin_report_due());
    sink.reset_polls();
    assert!(sink.pin_report_due());
}

#[test]
fn disabled_pin_channel_never_reports() {
    let mut sink = LogSink::new(DiagFlags::none(), 24);
    for _ in 0..(2 * PIN_STATE_INTERVAL) {
        assert!(!sink.pin_report_due());
        sink.poll(LineState::default());
    }
}

#[test]
fn flags_default_all_enabled() {
    let flags = DiagFlags::default();
    assert!(flags.pin_states);
    assert!(flags.edges);
    assert!(flags.bit_collection);
    assert!(flags.data_assembly);
    assert!(flags.final_value);

    let none = DiagFlags::none();
    assert!(!none.pin_states);
    assert!(!none.final_value);
}

#[test]
fn recording_sink_keeps_event_order() {
    use crate::decode::Channel;

    let mut sink = RecordingSink::default();
    let state = LineState::new(true, false, true);

    sink.poll(state);
    sink.edge(state);
    sink.bit(1, true);
    sink.assembly(0b1, 1);

    let sample = DecodedSample {
        value: 1,
        channel: Channel::Left,
        index: 1,
    };
    sink.complete(&sample, None);

    assert_eq!(sink.events.len(), 5);
    assert_eq!(sink.events[0], DiagEvent::Poll(state));
    assert_eq!(sink.events[1], DiagEvent::Edge(state));
    assert_eq!(
        sink.events[4],
        DiagEvent::Complete { sample, rate: None }
    );
}
