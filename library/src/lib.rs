//! Launchpad command-line front end
//!
//! Loads the configuration, builds a [`PlayableItem`](launchpad_shared::PlayableItem)
//! from command-line arguments and prints what the resolver decided. The
//! resolved command is printed, never run.

pub mod cli;

use std::path::Path;

use anyhow::{Context, Result};
use launchpad_core::config::{self, Config};

/// Load the configuration from `path`, or from the default location.
///
/// An explicitly given file must exist and parse; the default file falls back
/// to defaults when missing.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(config::load()),
    }
}
