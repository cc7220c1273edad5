//! Libretro cores and the RetroArch frontend that hosts them.
//!
//! A core is never launched by itself: the engine pairs it with the configured
//! frontend, the core's own check gates the item and the frontend builds the
//! command with the core's resolved path.

use std::path::Path;

use launchpad_shared::{LaunchCommand, PATH_PLACEHOLDER, PlayableItem, features};

use crate::config::RunnerConfig;
use crate::descriptor::{RunnerDescriptor, RunnerKind, accept_all};
use crate::error::Rejection;
use crate::options::OptionSpec;

use super::{fullscreen_flag, fullscreen_option, reject_any_of, require_one_of};

/// Name of the built-in frontend runner.
pub const FRONTEND: &str = "retroarch";

/// Mappers gambatte implements.
const GAMBATTE_MAPPERS: &[&str] = &["ROM", "MBC1", "MBC2", "MBC3", "MBC5", "HuC1", "HuC3"];

/// Coprocessors the snes9x core leaves out.
const SNES9X_CORE_UNSUPPORTED_CHIPS: &[&str] = &["ST018", "MSU-1"];

pub fn runners() -> Vec<RunnerDescriptor> {
    vec![
        retroarch(),
        fceumm(),
        snes9x_core(),
        gambatte(),
        beetle_psx(),
    ]
}

fn retroarch() -> RunnerDescriptor {
    RunnerDescriptor::new(FRONTEND, "retroarch", RunnerKind::frontend(retroarch_command))
        .option(OptionSpec::path(
            "core_dir",
            "Directory searched for cores given by file name",
        ))
        .option(fullscreen_option(true))
}

fn retroarch_command(
    _item: &PlayableItem,
    config: &RunnerConfig,
    core: &str,
) -> Result<LaunchCommand, Rejection> {
    let core_path = match config.path("core_dir") {
        Some(dir) if !core.contains(std::path::MAIN_SEPARATOR) => {
            dir.join(core).to_string_lossy().into_owned()
        }
        _ => core.to_string(),
    };

    Ok(LaunchCommand::exe_only(config.exe.clone())
        .with_args(fullscreen_flag(config, "-f"))
        .arg("-L")
        .arg(core_path)
        .arg(PATH_PLACEHOLDER))
}

fn core(name: &str, library: &str, check: fn(&PlayableItem, &RunnerConfig) -> Result<(), Rejection>) -> RunnerDescriptor {
    let file = Path::new(library).with_extension(std::env::consts::DLL_EXTENSION);
    RunnerDescriptor::new(name, file.to_string_lossy(), RunnerKind::core(check))
}

fn fceumm() -> RunnerDescriptor {
    core("fceumm_libretro", "fceumm_libretro", accept_all)
        .platforms(&["nes"])
        .extensions(&["nes", "fds", "unf", "unif"])
        .containers(&["zip", "7z"])
}

fn snes9x_core() -> RunnerDescriptor {
    core("snes9x_libretro", "snes9x_libretro", |item, _| {
        reject_any_of(item, features::EXPANSION_CHIP, SNES9X_CORE_UNSUPPORTED_CHIPS)
    })
    .platforms(&["snes"])
    .extensions(&["sfc", "smc", "swc", "fig", "bs"])
    .containers(&["zip", "7z"])
}

fn gambatte() -> RunnerDescriptor {
    core("gambatte_libretro", "gambatte_libretro", |item, _| {
        require_one_of(item, features::MAPPER, GAMBATTE_MAPPERS)
    })
    .platforms(&["gb", "gbc"])
    .extensions(&["gb", "gbc", "dmg"])
    .containers(&["zip", "7z"])
}

fn beetle_psx() -> RunnerDescriptor {
    core("beetle_psx_libretro", "mednafen_psx_hw_libretro", |item, _| {
        // No PAL-M timing in the hardware renderer
        match item.feature_text(features::TV_STANDARD) {
            Some("PAL-M") => Err(Rejection::feature(features::TV_STANDARD, "PAL-M")),
            _ => Ok(()),
        }
    })
    .platforms(&["psx"])
    .extensions(&["cue", "chd", "pbp", "m3u", "toc", "ccd"])
}
