//! `launchpad runners` - list registered runners.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use launchpad_core::config::Config;
use launchpad_core::{Engine, RunnerRegistry, registry};

/// Arguments for the runners command
#[derive(Args, Debug)]
pub struct RunnersArgs {
    /// Only list runners for this platform, in candidate order
    #[arg(short, long)]
    pub platform: Option<String>,
}

/// Execute the runners command
pub fn execute(args: RunnersArgs, config: &Config) -> Result<ExitCode> {
    let engine = Engine::new(registry::builtin(), config);
    let stdout = io::stdout();
    list(&engine, args.platform.as_deref(), &mut stdout.lock())?;
    Ok(ExitCode::SUCCESS)
}

/// Write one line per runner: name, kind, platforms and resolved executable.
///
/// With a platform, runners appear in the order they would be tried.
pub fn list(engine: &Engine<'_>, platform: Option<&str>, out: &mut impl Write) -> Result<()> {
    let registry: &RunnerRegistry = engine.registry();
    let names: Vec<String> = match platform {
        Some(platform) => engine.candidates_for(platform),
        None => registry.names().map(str::to_string).collect(),
    };

    if names.is_empty() {
        if let Some(platform) = platform {
            writeln!(out, "No runners for platform '{}'", platform)?;
        }
        return Ok(());
    }

    let width = names.iter().map(String::len).max().unwrap_or(0);
    for name in &names {
        let Some(descriptor) = registry.get(name) else {
            writeln!(out, "{:<width$}  (unknown runner)", name, width = width)?;
            continue;
        };
        let config = engine.runner_config(descriptor);
        let platforms = if descriptor.platforms.is_empty() {
            "-".to_string()
        } else {
            descriptor.platforms.join(",")
        };
        writeln!(
            out,
            "{:<width$}  {:<15}  {:<24}  {}",
            name,
            descriptor.kind.label(),
            platforms,
            config.exe,
            width = width
        )?;
    }
    Ok(())
}
