//! Configuration management (`config.toml`)
//!
//! Handles loading, saving, and providing defaults for launcher settings.
//! The file is read once at startup; the engine receives the result as an
//! explicit [`LaunchSettings`] context plus a [`ConfigResolver`] for per-runner
//! sections. Nothing here is global.

mod resolver;
mod settings;

pub use resolver::{ConfigResolver, RunnerConfig};
pub use settings::{Instrumentation, LaunchSettings};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Persisted launcher configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// System-wide launch settings
    #[serde(default)]
    pub launch: LaunchSection,
    /// Instrumentation wrappers
    #[serde(default)]
    pub wrappers: WrapperSection,
    /// Ordered candidate runners per platform
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformSection>,
    /// Per-runner overrides
    #[serde(default)]
    pub runners: BTreeMap<String, RunnerSection>,
}

/// `[launch]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchSection {
    /// Frontend runner that hosts core runners
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frontend: Option<String>,
    /// Compatibility layer for foreign executables (default: wine)
    #[serde(default = "default_compat_layer")]
    pub compat_layer: String,
    /// Prefix exported to the compatibility layer, if set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compat_prefix: Option<PathBuf>,
    #[serde(default = "default_mono")]
    pub mono: String,
    #[serde(default = "default_dotnet")]
    pub dotnet: String,
    #[serde(default = "default_java")]
    pub java: String,
    /// Archive extraction tool (default: 7z)
    #[serde(default = "default_extractor")]
    pub extractor: String,
    /// Where archive members are extracted for runners that cannot read archives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,
}

/// `[wrappers]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct WrapperSection {
    /// Run under the performance governor (gamemoderun)
    #[serde(default)]
    pub governor: bool,
    /// Run under the diagnostics overlay (mangohud)
    #[serde(default)]
    pub overlay: bool,
    /// Force the reported OpenGL version (e.g. "4.3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_gl_version: Option<String>,
}

/// `[platforms.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PlatformSection {
    #[serde(default)]
    pub runners: Vec<String>,
}

/// `[runners.<name>]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RunnerSection {
    /// Executable override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Option overrides, checked against the runner's schema
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, toml::Value>,
}

fn default_compat_layer() -> String {
    "wine".to_string()
}
fn default_mono() -> String {
    "mono".to_string()
}
fn default_dotnet() -> String {
    "dotnet".to_string()
}
fn default_java() -> String {
    "java".to_string()
}
fn default_extractor() -> String {
    "7z".to_string()
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            frontend: None,
            compat_layer: default_compat_layer(),
            compat_prefix: None,
            mono: default_mono(),
            dotnet: default_dotnet(),
            java: default_java(),
            extractor: default_extractor(),
            scratch_dir: None,
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Launchpad\config`
/// On macOS: `~/Library/Application Support/io.launchpad.Launchpad`
/// On Linux: `~/.config/launchpad`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.launchpad", "", "Launchpad")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of `config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the configuration from the default location.
///
/// Returns defaults if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring unreadable config: {}", e);
            Config::default()
        }
    }
}

/// Loads the configuration from a specific file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Saves the configuration to the default location.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_to(config, &path)
}

/// Saves the configuration to a specific file, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Write {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.launch.compat_layer, "wine");
        assert_eq!(config.launch.extractor, "7z");
        assert!(config.launch.frontend.is_none());
        assert!(!config.wrappers.governor);
        assert!(config.platforms.is_empty());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_full() {
        let toml_str = r#"
[launch]
frontend = "retroarch"
compat_prefix = "/home/me/.wine"
scratch_dir = "/tmp/launchpad"

[wrappers]
governor = true
overlay = true
force_gl_version = "4.3"

[platforms.nes]
runners = ["mesen", "fceumm_libretro"]

[runners.duckstation]
path = "/opt/duckstation/duckstation-qt"

[runners.duckstation.options]
bios_dir = "/bios/psx"
fullscreen = true
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.launch.frontend.as_deref(), Some("retroarch"));
        assert_eq!(config.launch.compat_layer, "wine"); // default
        assert!(config.wrappers.governor && config.wrappers.overlay);
        assert_eq!(config.wrappers.force_gl_version.as_deref(), Some("4.3"));
        assert_eq!(
            config.platforms["nes"].runners,
            vec!["mesen".to_string(), "fceumm_libretro".to_string()]
        );

        let duck = &config.runners["duckstation"];
        assert_eq!(duck.path.as_deref(), Some("/opt/duckstation/duckstation-qt"));
        assert_eq!(
            duck.options.get("bios_dir"),
            Some(&toml::Value::String("/bios/psx".into()))
        );
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.launch.frontend = Some("retroarch".into());
        config.wrappers.overlay = true;
        config.platforms.insert(
            "gb".into(),
            PlatformSection {
                runners: vec!["sameboy".into()],
            },
        );

        save_to(&config, &path).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[launch\nfrontend = ").unwrap();
        assert!(matches!(load_from(&path), Err(ConfigError::Parse { .. })));
    }
}
