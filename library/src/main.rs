//! Launchpad - runner resolver CLI
//!
//! # Commands
//!
//! - `launchpad resolve <path> --platform <p>` - print the command that would launch an item
//! - `launchpad runners` - list registered runners
//!
//! # Usage
//!
//! ```bash
//! # What would run this ROM?
//! launchpad resolve ~/roms/nes/smb.nes --platform nes
//!
//! # Try specific runners, with parsed header attributes
//! launchpad resolve game.gb --platform gb --runner sameboy --runner mgba --feature Mapper=MBC5
//!
//! # A ROM inside an archive, as JSON
//! launchpad resolve game.zip --platform snes --archive zip:game.sfc --json
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use launchpad::cli::{Cli, Commands, resolve, runners};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = launchpad::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve(args) => resolve::execute(args, &config, cli.verbose),
        Commands::Runners(args) => runners::execute(args, &config),
    }
}
