// CLI binary entry point for audiometa

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process;

use audiometa::CodecTable;

mod cli;

use cli::commands::{command_detect, command_info, command_read, command_scan};
use cli::{Commands, Config, OutputFormatter};

fn main() -> Result<()> {
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.log_level.to_level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .try_init()?;

    let table = CodecTable::default();
    let formatter = OutputFormatter::new(config.format, config.quiet);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let failures = match &config.command {
        Commands::Read { files, pictures } => command_read(files, *pictures, &table, &formatter, &mut out)?,
        Commands::Detect { files } => command_detect(files, &table, &formatter, &mut out)?,
        Commands::Info { files, blocks } => command_info(files, *blocks, &table, &formatter, &mut out)?,
        Commands::Scan { directory, pattern } => {
            command_scan(directory, pattern, &table, &formatter, &mut out)?
        }
    };
    out.flush()?;

    if failures > 0 {
        process::exit(1);
    }
    Ok(())
}
