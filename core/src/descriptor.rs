//! Runner capability descriptors.
//!
//! A [`RunnerDescriptor`] is everything the resolver knows about one execution
//! backend: what it can open (checked without touching the item), what host it
//! needs, which options it takes, and how its compatibility check and command
//! generation are built ([`RunnerKind`]).
//!
//! Descriptors are immutable once registered.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashSet;

use launchpad_shared::{LaunchCommand, PlayableItem};

use crate::config::RunnerConfig;
use crate::error::Rejection;
use crate::mame::MameDriver;
use crate::options::OptionSpec;

/// Cheap static compatibility test. Must not inspect file contents.
pub type CheckFn = Arc<dyn Fn(&PlayableItem, &RunnerConfig) -> Result<(), Rejection> + Send + Sync>;

/// Command generation. May reject with conditions only discovered here.
pub type GenerateFn =
    Arc<dyn Fn(&PlayableItem, &RunnerConfig) -> Result<LaunchCommand, Rejection> + Send + Sync>;

/// Frontend command generation, given the core's resolved executable.
pub type FrontendFn = Arc<
    dyn Fn(&PlayableItem, &RunnerConfig, &str) -> Result<LaunchCommand, Rejection> + Send + Sync,
>;

/// Runtime a managed application is started through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagedRuntime {
    Mono,
    Dotnet,
    Java,
}

impl ManagedRuntime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagedRuntime::Mono => "mono",
            ManagedRuntime::Dotnet => "dotnet",
            ManagedRuntime::Java => "java",
        }
    }
}

/// What the host must provide for the runner's executable to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HostRequirement {
    /// Runs directly on this host
    #[default]
    Native,
    /// Needs the configured compatibility layer (e.g. Wine)
    Foreign,
    /// Needs a managed runtime
    Managed(ManagedRuntime),
}

/// What a runner can open, checked before anything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    extensions: HashSet<String>,
    folders: bool,
    containers: HashSet<String>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn supports_extension(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }

    pub fn supports_folders(&self) -> bool {
        self.folders
    }

    /// Whether the runner reads this archive format directly.
    pub fn reads_container(&self, kind: &str) -> bool {
        self.containers.contains(kind)
    }

    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Folder / extension filter. Archive handling is decided by the engine.
    pub fn admits(&self, item: &PlayableItem) -> Result<(), Rejection> {
        if item.is_folder {
            if self.folders {
                return Ok(());
            }
            return Err(Rejection::extension("folders"));
        }

        if self.extensions.contains(item.extension.as_str()) {
            Ok(())
        } else {
            Err(Rejection::extension(format!(".{} files", item.extension)))
        }
    }
}

/// How a runner's check/generate pair is built.
#[derive(Clone)]
pub enum RunnerKind {
    /// Ordinary emulator or application with its own callbacks.
    Standard { check: CheckFn, generate: GenerateFn },
    /// Driver inside one shared multi-machine emulator binary.
    SharedHardware(MameDriver),
    /// Core that only runs inside the system-wide frontend.
    Core { check: CheckFn },
    /// Frontend hosting cores; never a candidate by itself.
    Frontend { generate: FrontendFn },
}

impl RunnerKind {
    pub fn standard<C, G>(check: C, generate: G) -> Self
    where
        C: Fn(&PlayableItem, &RunnerConfig) -> Result<(), Rejection> + Send + Sync + 'static,
        G: Fn(&PlayableItem, &RunnerConfig) -> Result<LaunchCommand, Rejection>
            + Send
            + Sync
            + 'static,
    {
        RunnerKind::Standard {
            check: Arc::new(check),
            generate: Arc::new(generate),
        }
    }

    pub fn core<C>(check: C) -> Self
    where
        C: Fn(&PlayableItem, &RunnerConfig) -> Result<(), Rejection> + Send + Sync + 'static,
    {
        RunnerKind::Core {
            check: Arc::new(check),
        }
    }

    pub fn frontend<G>(generate: G) -> Self
    where
        G: Fn(&PlayableItem, &RunnerConfig, &str) -> Result<LaunchCommand, Rejection>
            + Send
            + Sync
            + 'static,
    {
        RunnerKind::Frontend {
            generate: Arc::new(generate),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunnerKind::Standard { .. } => "standard",
            RunnerKind::SharedHardware(_) => "shared-hardware",
            RunnerKind::Core { .. } => "core",
            RunnerKind::Frontend { .. } => "frontend",
        }
    }
}

impl fmt::Debug for RunnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerKind::SharedHardware(driver) => {
                f.debug_tuple("SharedHardware").field(driver).finish()
            }
            other => f.write_str(other.label()),
        }
    }
}

/// Accepts every item. For runners with no feature restrictions.
pub fn accept_all(_item: &PlayableItem, _config: &RunnerConfig) -> Result<(), Rejection> {
    Ok(())
}

/// Static description of one runner.
#[derive(Debug, Clone)]
pub struct RunnerDescriptor {
    pub name: String,
    /// Executable used when no path override is configured
    pub default_exe: String,
    pub platforms: Vec<String>,
    pub capabilities: Capabilities,
    pub host: HostRequirement,
    pub options: Vec<OptionSpec>,
    pub kind: RunnerKind,
}

impl RunnerDescriptor {
    pub fn new(name: impl Into<String>, default_exe: impl Into<String>, kind: RunnerKind) -> Self {
        Self {
            name: name.into(),
            default_exe: default_exe.into(),
            platforms: Vec::new(),
            capabilities: Capabilities::default(),
            host: HostRequirement::Native,
            options: Vec::new(),
            kind,
        }
    }

    /// Platforms this runner is a valid candidate for.
    pub fn platforms(mut self, platforms: &[&str]) -> Self {
        self.platforms.extend(platforms.iter().map(|p| p.to_string()));
        self
    }

    /// Extensions this runner opens (without the dot, case-insensitive).
    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.capabilities
            .extensions
            .extend(extensions.iter().map(|e| e.to_ascii_lowercase()));
        self
    }

    /// Accept folder items.
    pub fn folders(mut self) -> Self {
        self.capabilities.folders = true;
        self
    }

    /// Archive formats the runner reads without extraction.
    pub fn containers(mut self, kinds: &[&str]) -> Self {
        self.capabilities
            .containers
            .extend(kinds.iter().map(|k| k.to_ascii_lowercase()));
        self
    }

    pub fn host(mut self, host: HostRequirement) -> Self {
        self.host = host;
        self
    }

    pub fn option(mut self, spec: OptionSpec) -> Self {
        self.options.push(spec);
        self
    }

    pub fn with_options(mut self, specs: impl IntoIterator<Item = OptionSpec>) -> Self {
        self.options.extend(specs);
        self
    }

    pub fn supports_platform(&self, platform: &str) -> bool {
        self.platforms.iter().any(|p| p == platform)
    }

    pub fn option_spec(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_shared::PATH_PLACEHOLDER;

    fn nes_runner() -> RunnerDescriptor {
        RunnerDescriptor::new(
            "x",
            "x",
            RunnerKind::standard(accept_all, |_, cfg| {
                Ok(LaunchCommand::new(cfg.exe.clone(), [PATH_PLACEHOLDER]))
            }),
        )
        .platforms(&["nes"])
        .extensions(&["NES", "fds"])
    }

    #[test]
    fn test_extensions_stored_lowercase() {
        let runner = nes_runner();
        assert!(runner.capabilities.supports_extension("nes"));
        assert!(!runner.capabilities.supports_extension("NES"));
    }

    #[test]
    fn test_admits_by_extension() {
        let caps = nes_runner().capabilities;
        assert!(caps.admits(&PlayableItem::new("a.fds", "nes")).is_ok());
        assert_eq!(
            caps.admits(&PlayableItem::new("a.sfc", "nes")),
            Err(Rejection::extension(".sfc files"))
        );
    }

    #[test]
    fn test_admits_folders_only_when_declared() {
        let folder = PlayableItem::folder("/games/doom", "dos");
        assert_eq!(
            nes_runner().capabilities.admits(&folder),
            Err(Rejection::extension("folders"))
        );

        let dos = RunnerDescriptor::new("d", "d", RunnerKind::core(accept_all)).folders();
        assert!(dos.capabilities.admits(&folder).is_ok());
    }

    #[test]
    fn test_supports_platform() {
        let runner = nes_runner();
        assert!(runner.supports_platform("nes"));
        assert!(!runner.supports_platform("snes"));
    }

    #[test]
    fn test_kind_debug_does_not_need_callbacks() {
        assert_eq!(format!("{:?}", nes_runner().kind), "standard");
    }
}
