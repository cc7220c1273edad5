//! Emulators that run directly on the host.

use launchpad_shared::{FeatureValue, LaunchCommand, PATH_PLACEHOLDER, PlayableItem, features};

use crate::config::RunnerConfig;
use crate::descriptor::{RunnerDescriptor, RunnerKind, accept_all};
use crate::error::Rejection;
use crate::options::OptionSpec;

use super::{fullscreen_flag, fullscreen_option, reject_any_of, require_one_of};

/// Largest GBA cartridge the bus can address.
pub const GBA_MAX_ROM_BYTES: i64 = 32 * 1024 * 1024;

/// Game Boy mappers SameBoy emulates.
const SAMEBOY_MAPPERS: &[&str] = &[
    "ROM", "MBC1", "MBC2", "MBC3", "MBC5", "MBC7", "MMM01", "HuC1", "HuC3", "TPP1",
    "Pocket Camera",
];

/// Coprocessors snes9x has no emulation for.
const SNES9X_UNSUPPORTED_CHIPS: &[&str] = &["ST018"];

/// Switch content type of a full title; anything else is an update or add-on.
const SWITCH_APPLICATION: &str = "Application";

pub fn runners() -> Vec<RunnerDescriptor> {
    vec![
        mesen(),
        snes9x(),
        sameboy(),
        mgba(),
        duckstation(),
        dolphin(),
        ryujinx(),
        dosbox(),
        ppsspp(),
    ]
}

fn mesen() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "mesen",
        "mesen",
        RunnerKind::standard(accept_all, |_, config| {
            Ok(LaunchCommand::exe_only(config.exe.clone())
                .with_args(fullscreen_flag(config, "--fullscreen"))
                .arg(PATH_PLACEHOLDER))
        }),
    )
    .platforms(&["nes", "snes", "gb", "gbc", "pce"])
    .extensions(&["nes", "fds", "unf", "unif", "sfc", "smc", "gb", "gbc", "pce"])
    .containers(&["zip", "7z"])
    .option(fullscreen_option(false))
}

fn snes9x() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "snes9x",
        "snes9x-gtk",
        RunnerKind::standard(
            |item, _| reject_any_of(item, features::EXPANSION_CHIP, SNES9X_UNSUPPORTED_CHIPS),
            |_, config| Ok(LaunchCommand::new(config.exe.clone(), [PATH_PLACEHOLDER])),
        ),
    )
    .platforms(&["snes"])
    .extensions(&["sfc", "smc", "swc", "fig", "bs"])
    .containers(&["zip"])
}

fn sameboy() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "sameboy",
        "sameboy",
        RunnerKind::standard(
            |item, _| require_one_of(item, features::MAPPER, SAMEBOY_MAPPERS),
            sameboy_command,
        ),
    )
    .platforms(&["gb", "gbc"])
    .extensions(&["gb", "gbc", "sgb"])
    .option(OptionSpec::choice(
        "model",
        &["auto", "dmg", "cgb", "agb", "sgb"],
        "auto",
        "Hardware model to emulate",
    ))
}

fn sameboy_command(_item: &PlayableItem, config: &RunnerConfig) -> Result<LaunchCommand, Rejection> {
    let mut command = LaunchCommand::exe_only(config.exe.clone());
    if let Some(model) = config.text("model")
        && model != "auto"
    {
        command = command.arg("--model").arg(model);
    }
    Ok(command.arg(PATH_PLACEHOLDER))
}

fn mgba() -> RunnerDescriptor {
    RunnerDescriptor::new("mgba", "mgba-qt", RunnerKind::standard(accept_all, mgba_command))
        .platforms(&["gba", "gb", "gbc"])
        .extensions(&["gba", "agb", "gb", "gbc", "sgb"])
        .containers(&["zip", "7z"])
        .option(fullscreen_option(false))
}

/// The ROM size is only known once the header has been read, so it is
/// checked here rather than in a compatibility check.
fn mgba_command(item: &PlayableItem, config: &RunnerConfig) -> Result<LaunchCommand, Rejection> {
    if let Some(size) = item.get_feature(features::ROM_SIZE).and_then(FeatureValue::as_int)
        && size > GBA_MAX_ROM_BYTES
    {
        return Err(Rejection::feature(
            features::ROM_SIZE,
            format!("{} bytes exceeds the 32 MiB cartridge limit", size),
        ));
    }

    Ok(LaunchCommand::exe_only(config.exe.clone())
        .with_args(fullscreen_flag(config, "-f"))
        .arg(PATH_PLACEHOLDER))
}

fn duckstation() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "duckstation",
        "duckstation-qt",
        RunnerKind::standard(accept_all, duckstation_command),
    )
    .platforms(&["psx"])
    .extensions(&["cue", "chd", "iso", "bin", "m3u", "pbp", "ecm", "mds"])
    .option(OptionSpec::path("bios_dir", "Directory holding PlayStation BIOS images"))
    .option(fullscreen_option(true))
}

/// DuckStation refuses to boot without a BIOS, and some discs need a
/// region-specific one.
fn duckstation_command(
    item: &PlayableItem,
    config: &RunnerConfig,
) -> Result<LaunchCommand, Rejection> {
    let bios_dir = config
        .path("bios_dir")
        .ok_or_else(|| Rejection::missing("bios_dir"))?;

    if let Some(bios) = item.feature_path(features::REQUIRED_BIOS)
        && !bios_dir.join(bios).is_file()
    {
        return Err(Rejection::feature(
            features::REQUIRED_BIOS,
            format!("{} not found in {}", bios.display(), bios_dir.display()),
        ));
    }

    Ok(LaunchCommand::new(config.exe.clone(), ["-batch"])
        .with_args(fullscreen_flag(config, "-fullscreen"))
        .arg("--")
        .arg(PATH_PLACEHOLDER))
}

fn dolphin() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "dolphin",
        "dolphin-emu",
        RunnerKind::standard(
            |item, _| {
                // NKit images rebuild on the fly and fail to boot in Dolphin
                match item.feature_text(features::DISC_FORMAT) {
                    Some(format) if format.eq_ignore_ascii_case("nkit") => {
                        Err(Rejection::feature(features::DISC_FORMAT, format))
                    }
                    _ => Ok(()),
                }
            },
            |_, config| {
                Ok(LaunchCommand::new(
                    config.exe.clone(),
                    ["-b", "-e", PATH_PLACEHOLDER],
                ))
            },
        ),
    )
    .platforms(&["gamecube", "wii"])
    .extensions(&["iso", "gcm", "gcz", "rvz", "wbfs", "ciso", "wia", "dol", "elf"])
}

fn ryujinx() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "ryujinx",
        "ryujinx",
        RunnerKind::standard(
            |item, _| match item.feature_text(features::CONTENT_TYPE) {
                Some(kind) if kind != SWITCH_APPLICATION => Err(Rejection::not_launchable(
                    format!("{} content is not a playable title", kind),
                )),
                _ => Ok(()),
            },
            |_, config| {
                Ok(LaunchCommand::exe_only(config.exe.clone())
                    .with_args(fullscreen_flag(config, "--fullscreen"))
                    .arg(PATH_PLACEHOLDER))
            },
        ),
    )
    .platforms(&["switch"])
    .extensions(&["nsp", "xci", "nca", "nro", "nso"])
    .option(fullscreen_option(false))
}

fn dosbox() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "dosbox",
        "dosbox",
        RunnerKind::standard(accept_all, |item, config| {
            let command = if item.is_folder {
                let mount = format!("mount c \"{}\"", PATH_PLACEHOLDER);
                LaunchCommand::new(config.exe.clone(), ["-c", mount.as_str(), "-c", "c:"])
            } else {
                LaunchCommand::new(config.exe.clone(), [PATH_PLACEHOLDER, "-exit"])
            };
            Ok(match item.path.parent() {
                Some(dir) if !item.is_folder && !dir.as_os_str().is_empty() => {
                    command.in_dir(dir)
                }
                _ => command,
            })
        }),
    )
    .platforms(&["dos"])
    .extensions(&["exe", "com", "bat", "conf"])
    .folders()
}

fn ppsspp() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "ppsspp",
        "PPSSPPSDL",
        RunnerKind::standard(accept_all, |_, config| {
            Ok(LaunchCommand::exe_only(config.exe.clone())
                .with_args(fullscreen_flag(config, "--fullscreen"))
                .arg(PATH_PLACEHOLDER))
        }),
    )
    .platforms(&["psp"])
    .extensions(&["iso", "cso", "pbp", "chd", "elf"])
    .option(fullscreen_option(true))
}
