//! Launch settings context threaded through the resolver.

use std::path::PathBuf;

use hashbrown::HashMap;

use crate::descriptor::ManagedRuntime;

use super::Config;

/// User-enabled instrumentation wrappers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instrumentation {
    pub governor: bool,
    pub overlay: bool,
    pub force_gl_version: Option<String>,
}

/// System-wide settings the resolver needs, resolved once from [`Config`].
///
/// # Examples
///
/// ```
/// use launchpad_core::config::LaunchSettings;
///
/// let settings = LaunchSettings::default()
///     .frontend("retroarch")
///     .governor(true)
///     .overlay(true);
/// assert_eq!(settings.frontend.as_deref(), Some("retroarch"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSettings {
    pub frontend: Option<String>,
    pub compat_layer: String,
    pub compat_prefix: Option<PathBuf>,
    pub mono: String,
    pub dotnet: String,
    pub java: String,
    pub extractor: String,
    pub scratch_dir: Option<PathBuf>,
    pub instrumentation: Instrumentation,
    platforms: HashMap<String, Vec<String>>,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl LaunchSettings {
    pub fn from_config(config: &Config) -> Self {
        let launch = &config.launch;
        Self {
            frontend: launch.frontend.clone(),
            compat_layer: launch.compat_layer.clone(),
            compat_prefix: launch.compat_prefix.clone(),
            mono: launch.mono.clone(),
            dotnet: launch.dotnet.clone(),
            java: launch.java.clone(),
            extractor: launch.extractor.clone(),
            scratch_dir: launch.scratch_dir.clone(),
            instrumentation: Instrumentation {
                governor: config.wrappers.governor,
                overlay: config.wrappers.overlay,
                force_gl_version: config.wrappers.force_gl_version.clone(),
            },
            platforms: config
                .platforms
                .iter()
                .map(|(name, section)| (name.clone(), section.runners.clone()))
                .collect(),
        }
    }

    /// Configured candidate order for a platform, if any.
    pub fn platform_runners(&self, platform: &str) -> Option<&[String]> {
        self.platforms.get(platform).map(Vec::as_slice)
    }

    pub fn runtime_exe(&self, runtime: ManagedRuntime) -> &str {
        match runtime {
            ManagedRuntime::Mono => &self.mono,
            ManagedRuntime::Dotnet => &self.dotnet,
            ManagedRuntime::Java => &self.java,
        }
    }

    /// Set the frontend that hosts core runners.
    pub fn frontend(mut self, name: impl Into<String>) -> Self {
        self.frontend = Some(name.into());
        self
    }

    pub fn compat_layer(mut self, exe: impl Into<String>) -> Self {
        self.compat_layer = exe.into();
        self
    }

    pub fn compat_prefix(mut self, prefix: impl Into<PathBuf>) -> Self {
        self.compat_prefix = Some(prefix.into());
        self
    }

    pub fn scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    pub fn governor(mut self, enabled: bool) -> Self {
        self.instrumentation.governor = enabled;
        self
    }

    pub fn overlay(mut self, enabled: bool) -> Self {
        self.instrumentation.overlay = enabled;
        self
    }

    pub fn force_gl_version(mut self, version: impl Into<String>) -> Self {
        self.instrumentation.force_gl_version = Some(version.into());
        self
    }

    /// Set the candidate order for a platform.
    pub fn platform(mut self, platform: impl Into<String>, runners: &[&str]) -> Self {
        self.platforms.insert(
            platform.into(),
            runners.iter().map(|r| r.to_string()).collect(),
        );
        self
    }
}
