use anyhow::Result;
use clap::Parser as ClapParser;

use cli::capture::cmd_capture;
use cli::command::{Cli, Commands, LogFormat};
use cli::info::cmd_info;

mod cli;
mod gpio;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(cli.loglevel.to_level_filter());
    match cli.log_format {
        LogFormat::Plain => {
            env_builder.format_timestamp_secs();
        }
        LogFormat::Json => {
            env_builder.format(|buf, record| {
                use std::io::Write;
                writeln!(
                    buf,
                    "{{\"ts\":{},\"lvl\":\"{}\",\"msg\":\"{}\"}}",
                    buf.timestamp(),
                    record.level(),
                    record.args()
                )
            });
        }
    }
    env_builder.try_init()?;

    match cli.command {
        Commands::Capture(ref args) => cmd_capture(args)?,
        Commands::Info(ref args) => cmd_info(args)?,
    }

    Ok(())
}
