//! Shared-hardware runners backed by MAME
//!
//! Many platforms are served by one MAME binary with a different machine
//! driver each. A [`MameDriver`] picks the machine, the media slot the item is
//! mounted in, fixed slot options and an optional boot script; its
//! compatibility check gates items by MAME's own software catalogue and the
//! driver's emulation status.

use std::path::{Path, PathBuf};

use launchpad_shared::{LaunchCommand, PATH_PLACEHOLDER, PlayableItem, features};

use crate::config::RunnerConfig;
use crate::descriptor::{RunnerDescriptor, RunnerKind};
use crate::error::Rejection;
use crate::options::{OptionSpec, OptionValue};

/// Default MAME executable.
pub const MAME_EXE: &str = "mame";

/// Option names shared by every MAME-backed runner.
pub mod option {
    pub const COMPATIBILITY_THRESHOLD: &str = "compatibility_threshold";
    pub const REJECT_UNMATCHED: &str = "reject_unmatched";
    pub const ROMPATH: &str = "rompath";
    pub const SCRIPT_DIR: &str = "script_dir";
}

/// Emulation status of a MAME driver, worst first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compatibility {
    Broken = 0,
    Preliminary = 1,
    Imperfect = 2,
    Good = 3,
}

impl Compatibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compatibility::Broken => "broken",
            Compatibility::Preliminary => "preliminary",
            Compatibility::Imperfect => "imperfect",
            Compatibility::Good => "good",
        }
    }

    pub fn level(&self) -> i64 {
        *self as i64
    }
}

/// Where the machine name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Machine {
    /// A fixed driver, e.g. `nes`
    Named(&'static str),
    /// The item's confirmed software-list match (arcade sets), falling back
    /// to the file stem
    FromSoftwareMatch,
}

/// One machine driver inside the shared MAME binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MameDriver {
    pub machine: Machine,
    /// Media slot the item is mounted in (`cart`, `flop1`, ...); `None` for
    /// fixed hardware
    pub slot: Option<&'static str>,
    /// Fixed slot sub-options, passed as `-<key> <value>`
    pub slot_options: Vec<(&'static str, &'static str)>,
    /// User-configurable slot options, passed as `-<name> <value>` when set
    pub configurable_slots: Vec<OptionSpec>,
    /// Boot automation script, looked up as `<script_dir>/<id>.lua`
    pub autoboot_script: Option<&'static str>,
    pub compatibility: Compatibility,
    reject_unmatched: bool,
}

impl MameDriver {
    /// Driver with a media slot.
    pub fn new(machine: &'static str, slot: &'static str) -> Self {
        Self {
            machine: Machine::Named(machine),
            slot: Some(slot),
            slot_options: Vec::new(),
            configurable_slots: Vec::new(),
            autoboot_script: None,
            compatibility: Compatibility::Good,
            reject_unmatched: false,
        }
    }

    /// Fixed hardware (arcade boards). Items must be recognised sets by default.
    pub fn fixed() -> Self {
        Self {
            machine: Machine::FromSoftwareMatch,
            slot: None,
            slot_options: Vec::new(),
            configurable_slots: Vec::new(),
            autoboot_script: None,
            compatibility: Compatibility::Good,
            reject_unmatched: true,
        }
    }

    pub fn slot_option(mut self, key: &'static str, value: &'static str) -> Self {
        self.slot_options.push((key, value));
        self
    }

    /// Slot option chosen by the user from a fixed list.
    pub fn configurable_slot(
        mut self,
        name: &'static str,
        choices: &'static [&'static str],
        default: &'static str,
        description: &'static str,
    ) -> Self {
        self.configurable_slots
            .push(OptionSpec::choice(name, choices, default, description));
        self
    }

    pub fn autoboot(mut self, script: &'static str) -> Self {
        self.autoboot_script = Some(script);
        self
    }

    pub fn compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Option schema: the shared MAME options plus this driver's slots.
    pub fn option_schema(&self) -> Vec<OptionSpec> {
        let mut schema = vec![
            OptionSpec::int(
                option::COMPATIBILITY_THRESHOLD,
                Compatibility::Imperfect.level(),
                Compatibility::Broken.level(),
                Compatibility::Good.level(),
                "Lowest driver status accepted for items without a software list match \
                 (0 broken, 1 preliminary, 2 imperfect, 3 good)",
            ),
            OptionSpec::bool(
                option::REJECT_UNMATCHED,
                self.reject_unmatched,
                "Reject items that have no software list match",
            ),
            OptionSpec::path(option::ROMPATH, "Directory MAME searches for system ROMs"),
            OptionSpec::path(option::SCRIPT_DIR, "Directory containing autoboot Lua scripts"),
        ];
        schema.extend(self.configurable_slots.iter().cloned());
        schema
    }

    /// Gate by software catalogue match and driver status.
    pub fn check(&self, item: &PlayableItem, config: &RunnerConfig) -> Result<(), Rejection> {
        if let Some(matched) = item.feature_text(features::SOFTWARE_MATCH) {
            if item.feature_text(features::SOFTWARE_SUPPORT) == Some("no") {
                return Err(Rejection::feature(
                    features::SOFTWARE_SUPPORT,
                    format!("{} is marked unsupported by MAME", matched),
                ));
            }
            return Ok(());
        }

        if config.bool(option::REJECT_UNMATCHED) {
            return Err(Rejection::feature(
                features::SOFTWARE_MATCH,
                "no software list match",
            ));
        }

        let threshold = config
            .int(option::COMPATIBILITY_THRESHOLD)
            .unwrap_or(Compatibility::Imperfect.level());
        if self.compatibility.level() < threshold {
            return Err(Rejection::feature(
                "Compatibility",
                format!(
                    "driver is {} ({}), below threshold {}",
                    self.compatibility.as_str(),
                    self.compatibility.level(),
                    threshold
                ),
            ));
        }
        Ok(())
    }

    /// Build the MAME command line.
    pub fn generate(
        &self,
        item: &PlayableItem,
        config: &RunnerConfig,
    ) -> Result<LaunchCommand, Rejection> {
        let machine = match &self.machine {
            Machine::Named(name) => (*name).to_string(),
            Machine::FromSoftwareMatch => item
                .feature_text(features::SOFTWARE_MATCH)
                .map(str::to_string)
                .or_else(|| {
                    item.path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                })
                .ok_or_else(|| Rejection::feature(features::SOFTWARE_MATCH, "no machine name"))?,
        };

        let mut command = LaunchCommand::exe_only(config.exe.clone()).arg(machine);

        for (key, value) in &self.slot_options {
            command = command.arg(format!("-{}", key)).arg(*value);
        }
        for spec in &self.configurable_slots {
            if let Some(OptionValue::Text(value)) = config.get(spec.name)
                && !value.is_empty()
            {
                command = command.arg(format!("-{}", spec.name)).arg(value.clone());
            }
        }

        if let Some(slot) = self.slot {
            command = command.arg(format!("-{}", slot)).arg(PATH_PLACEHOLDER);
        }

        if let Some(rompath) = self.rompath(item, config) {
            command = command.arg("-rompath").arg(rompath);
        }

        if let Some(script) = self.autoboot_script {
            let dir = config
                .path(option::SCRIPT_DIR)
                .ok_or_else(|| Rejection::missing(option::SCRIPT_DIR))?;
            let script_path = dir.join(format!("{}.lua", script));
            command = command
                .arg("-autoboot_script")
                .arg(script_path.to_string_lossy().into_owned());
        }

        Ok(command.arg("-skip_gameinfo"))
    }

    /// `-rompath` value. Fixed hardware loads the set from the item's own
    /// directory, so that directory goes first.
    fn rompath(&self, item: &PlayableItem, config: &RunnerConfig) -> Option<String> {
        let configured = config.path(option::ROMPATH).map(Path::to_path_buf);
        let own_dir: Option<PathBuf> = match self.slot {
            Some(_) => None,
            None => item.path.parent().map(Path::to_path_buf),
        };

        let dirs: Vec<String> = own_dir
            .into_iter()
            .chain(configured)
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        if dirs.is_empty() {
            None
        } else {
            Some(dirs.join(";"))
        }
    }
}

/// Descriptor for a MAME-backed runner.
pub fn descriptor(
    name: &str,
    platforms: &[&str],
    extensions: &[&str],
    driver: MameDriver,
) -> RunnerDescriptor {
    let schema = driver.option_schema();
    RunnerDescriptor::new(name, MAME_EXE, RunnerKind::SharedHardware(driver))
        .platforms(platforms)
        .extensions(extensions)
        .containers(&["zip", "7z"])
        .with_options(schema)
}
