use anyhow::Result;
use pcmtap::decode::Decoder;
use pcmtap::diag::LogSink;

use super::command::CaptureArgs;
use crate::gpio::GpioSampler;

pub fn cmd_capture(args: &CaptureArgs) -> Result<()> {
    let config = args.decoder_config();

    log::info!(
        "capturing from {} (BCK line {}, LRCK line {}, DIN line {}, {} bits/word, {}us poll interval)",
        args.chip.display(),
        args.bck_line,
        args.lrck_line,
        args.din_line,
        config.word_width,
        args.poll_interval_us,
    );

    let sampler = GpioSampler::open(&args.chip, args.bck_line, args.lrck_line, args.din_line)?;
    log::info!("GPIO lines acquired, entering polling loop");

    let sink = LogSink::new(args.diag_flags(), config.word_width);
    let decoder = Decoder::with_sink(config, sink)?;

    // Runs until the process is killed; a word in flight at that point is
    // discarded. Samples are reported by the diagnostics sink, so the loop
    // body is where a downstream consumer of the value stream would hook in.
    for _sample in decoder.capture(sampler) {}

    Ok(())
}
