//! Run-lifetime throughput counters.

use std::time::{Duration, Instant};

/// Counters spanning the lifetime of one capture run.
#[derive(Debug, Clone, Copy)]
pub struct RunStats {
    started: Instant,
    samples: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            samples: 0,
        }
    }

    /// Record one completed sample; returns its 1-based sequence index.
    pub fn record(&mut self) -> u64 {
        self.samples += 1;
        self.samples
    }

    /// Samples produced since the run started.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Whole samples per second over the run so far.
    ///
    /// `None` until at least one full second has elapsed.
    pub fn samples_per_second(&self) -> Option<u64> {
        rate(self.samples, self.elapsed())
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Integer throughput derivation: `samples / whole elapsed seconds`.
///
/// `None` until a full second has elapsed, so a fresh run never reports a
/// nonsense rate.
pub fn rate(samples: u64, elapsed: Duration) -> Option<u64> {
    let secs = elapsed.as_secs();
    (secs > 0).then(|| samples / secs)
}

#[test]
fn throughput_derivation() {
    assert_eq!(rate(480_000, Duration::from_secs(10)), Some(48_000));
    assert_eq!(rate(48_000, Duration::from_secs(1)), Some(48_000));
}

#[test]
fn no_rate_before_one_second() {
    assert_eq!(rate(5_000, Duration::from_millis(999)), None);
    assert_eq!(rate(0, Duration::ZERO), None);
}

#[test]
fn record_is_monotone() {
    let mut stats = RunStats::new();
    assert_eq!(stats.samples(), 0);
    assert_eq!(stats.record(), 1);
    assert_eq!(stats.record(), 2);
    assert_eq!(stats.samples(), 2);
}
