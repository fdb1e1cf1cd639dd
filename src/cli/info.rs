use anyhow::{Context, Result};
use serde::Serialize;

use super::command::InfoArgs;

pub fn cmd_info(args: &InfoArgs) -> Result<()> {
    let capture = &args.capture;
    log::info!("probing GPIO chip {}", capture.chip.display());

    let chip = gpiocdev::chip::Chip::from_path(&capture.chip)
        .with_context(|| format!("failed to open GPIO chip {}", capture.chip.display()))?;
    let info = chip
        .info()
        .with_context(|| format!("failed to query GPIO chip {}", capture.chip.display()))?;

    let flags = capture.diag_flags();
    let report = CaptureReport {
        chip: ChipReport {
            path: capture.chip.display().to_string(),
            name: info.name,
            label: info.label,
            num_lines: info.num_lines,
        },
        lines: LineReport {
            bck: capture.bck_line,
            lrck: capture.lrck_line,
            din: capture.din_line,
        },
        decoder: DecoderReport {
            word_width: capture.word_width,
            poll_interval_us: capture.poll_interval_us,
        },
        diagnostics: DiagReport {
            pin_states: flags.pin_states,
            edges: flags.edges,
            bit_collection: flags.bit_collection,
            data_assembly: flags.data_assembly,
            final_value: flags.final_value,
        },
    };

    print!("{}", serde_yaml_ng::to_string(&report)?);

    Ok(())
}

/// The effective capture plan, printed as YAML.
#[derive(Debug, Serialize)]
struct CaptureReport {
    chip: ChipReport,
    lines: LineReport,
    decoder: DecoderReport,
    diagnostics: DiagReport,
}

#[derive(Debug, Serialize)]
struct ChipReport {
    path: String,
    name: String,
    label: String,
    num_lines: u32,
}

#[derive(Debug, Serialize)]
struct LineReport {
    bck: u32,
    lrck: u32,
    din: u32,
}

#[derive(Debug, Serialize)]
struct DecoderReport {
    word_width: u32,
    poll_interval_us: u64,
}

#[derive(Debug, Serialize)]
struct DiagReport {
    pin_states: bool,
    edges: bool,
    bit_collection: bool,
    data_assembly: bool,
    final_value: bool,
}
