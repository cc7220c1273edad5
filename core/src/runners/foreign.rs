//! Windows programs run through the compatibility layer.

use launchpad_shared::{LaunchCommand, PATH_PLACEHOLDER};

use crate::descriptor::{HostRequirement, RunnerDescriptor, RunnerKind, accept_all};

pub fn runners() -> Vec<RunnerDescriptor> {
    vec![project64(), windows_exe()]
}

fn project64() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "project64",
        "Project64.exe",
        RunnerKind::standard(accept_all, |_, config| {
            Ok(LaunchCommand::new(config.exe.clone(), [PATH_PLACEHOLDER]))
        }),
    )
    .platforms(&["n64"])
    .extensions(&["z64", "n64", "v64"])
    .containers(&["zip", "7z"])
    .host(HostRequirement::Foreign)
}

/// A Windows executable that is the game itself. `start /unix` lets the
/// compatibility layer take a host path.
fn windows_exe() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "windows_exe",
        "start",
        RunnerKind::standard(accept_all, |item, config| {
            let command = LaunchCommand::new(config.exe.clone(), ["/unix", PATH_PLACEHOLDER]);
            Ok(match item.path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => command.in_dir(dir),
                _ => command,
            })
        }),
    )
    .platforms(&["windows"])
    .extensions(&["exe", "lnk", "bat", "msi"])
    .host(HostRequirement::Foreign)
}
