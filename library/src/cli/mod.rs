//! Command-line definitions.

pub mod resolve;
pub mod runners;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Launchpad - decide how catalogued games are launched
#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Resolve which runner launches an item, and how")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log every candidate decision
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the launch command for an item
    Resolve(resolve::ResolveArgs),

    /// List registered runners
    Runners(runners::RunnersArgs),
}
