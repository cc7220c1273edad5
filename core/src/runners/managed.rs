//! Applications started through a managed runtime.
//!
//! The generated command names the application itself as the executable;
//! host adaptation moves it behind the runtime.

use launchpad_shared::{LaunchCommand, PATH_PLACEHOLDER, PlayableItem};

use crate::config::RunnerConfig;
use crate::descriptor::{HostRequirement, ManagedRuntime, RunnerDescriptor, RunnerKind, accept_all};
use crate::error::Rejection;
use crate::options::OptionSpec;

pub fn runners() -> Vec<RunnerDescriptor> {
    vec![mono_app(), freej2me()]
}

/// A .NET Framework game run by Mono from its own directory.
fn mono_app() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "mono_app",
        "mono",
        RunnerKind::standard(accept_all, |item, _| {
            let command = LaunchCommand::exe_only(PATH_PLACEHOLDER);
            Ok(match item.path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => command.in_dir(dir),
                _ => command,
            })
        }),
    )
    .platforms(&["mono"])
    .extensions(&["exe"])
    .host(HostRequirement::Managed(ManagedRuntime::Mono))
}

/// J2ME midlets through the FreeJ2ME jar.
fn freej2me() -> RunnerDescriptor {
    RunnerDescriptor::new(
        "freej2me",
        "freej2me.jar",
        RunnerKind::standard(accept_all, freej2me_command),
    )
    .platforms(&["j2me"])
    .extensions(&["jar", "jad"])
    .host(HostRequirement::Managed(ManagedRuntime::Java))
    .option(OptionSpec::int("width", 240, 128, 1024, "Screen width"))
    .option(OptionSpec::int("height", 320, 128, 1024, "Screen height"))
    .option(OptionSpec::int("scale", 2, 1, 8, "Window scale"))
}

fn freej2me_command(_item: &PlayableItem, config: &RunnerConfig) -> Result<LaunchCommand, Rejection> {
    let mut command =
        LaunchCommand::exe_only(config.exe.clone()).arg(format!("file://{}", PATH_PLACEHOLDER));
    for name in ["width", "height", "scale"] {
        if let Some(value) = config.int(name) {
            command = command.arg(value.to_string());
        }
    }
    Ok(command)
}
