use std::path::Path;

use anyhow::{Context, Result};
use gpiocdev::Request;
use gpiocdev::line::{Value, Values};
use pcmtap::sampler::{LineSampler, LineState};

/// Polls the three audio lines through the Linux GPIO character device.
///
/// All three lines live in a single request and are read with one kernel
/// call per poll, keeping inter-line skew as small as the platform allows.
pub struct GpioSampler {
    request: Request,
    // bck, lrck, din
    offsets: [u32; 3],
    values: Values,
    last: LineState,
    read_failed: bool,
}

impl GpioSampler {
    /// Acquire the three lines as inputs.
    ///
    /// This is the only point where line access can fail; a steady-state
    /// poll has no failure mode.
    pub fn open(chip: &Path, bck: u32, lrck: u32, din: u32) -> Result<Self> {
        let offsets = [bck, lrck, din];
        let request = Request::builder()
            .on_chip(chip)
            .with_consumer("pcmtapd")
            .with_lines(&offsets)
            .as_input()
            .request()
            .with_context(|| {
                format!(
                    "failed to acquire lines {bck}/{lrck}/{din} on {}",
                    chip.display()
                )
            })?;

        Ok(Self {
            request,
            offsets,
            values: Values::from_offsets(&offsets),
            last: LineState::default(),
            read_failed: false,
        })
    }
}

impl LineSampler for GpioSampler {
    fn sample(&mut self) -> LineState {
        match self.request.values(&mut self.values) {
            Ok(()) => {
                let [bck, lrck, din] = self.offsets;
                self.last = LineState::new(
                    self.values.get(bck) == Some(Value::Active),
                    self.values.get(lrck) == Some(Value::Active),
                    self.values.get(din) == Some(Value::Active),
                );
                self.read_failed = false;
            }
            Err(e) => {
                // The decoder contract has no steady-state failure mode:
                // hold the previous snapshot and say so once.
                if !self.read_failed {
                    log::warn!("GPIO read failed, holding last snapshot: {e}");
                    self.read_failed = true;
                }
            }
        }

        self.last
    }
}
