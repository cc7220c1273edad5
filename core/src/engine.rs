//! Resolution engine
//!
//! Walks an ordered list of candidate runner names for one item and returns the
//! first plan any of them can produce. Each candidate goes through:
//!
//! 1. name / platform lookup (unknown names are skipped, not rejected)
//! 2. frontend lookup for core runners
//! 3. capability filter (extension, folder, archive format)
//! 4. configuration resolution
//! 5. compatibility check, then command generation
//! 6. scratch extraction for archives the runner can't read
//! 7. platform adaptation and path substitution
//!
//! A rejection moves on to the next candidate, except
//! [`Rejection::NotActuallyLaunchable`], which ends resolution for the item.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use hashbrown::HashSet;
use rayon::prelude::*;

use launchpad_shared::{LaunchCommand, LaunchPlan, PlayableItem};

use crate::adapt;
use crate::config::{Config, ConfigResolver, LaunchSettings, RunnerConfig};
use crate::descriptor::{FrontendFn, RunnerDescriptor, RunnerKind};
use crate::error::{Rejection, RejectionRecord, ResolveError};
use crate::registry::RunnerRegistry;

/// Outcome of trying one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateState {
    /// Not a runner for this item's platform; a configuration problem, not a
    /// runner failure, so nothing is recorded.
    Skipped,
    Rejected(Rejection),
    Succeeded(LaunchPlan),
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Runner that produced the plan
    pub runner: String,
    pub plan: LaunchPlan,
    /// Candidates rejected before this one
    pub rejections: Vec<RejectionRecord>,
}

/// How the runner gets at the item's bytes.
enum MediaAccess {
    /// Path handed to the runner as is
    Direct(PathBuf),
    /// Archive member extracted to a scratch file first
    Scratch {
        archive: PathBuf,
        entry: String,
        scratch_dir: PathBuf,
    },
}

impl MediaAccess {
    fn launch_path(&self) -> PathBuf {
        match self {
            MediaAccess::Direct(path) => path.clone(),
            MediaAccess::Scratch {
                entry, scratch_dir, ..
            } => scratch_dir.join(entry),
        }
    }
}

/// Resolution engine over one registry and one configuration context.
///
/// Holds no per-item state; share it across threads to resolve a batch.
pub struct Engine<'r> {
    registry: &'r RunnerRegistry,
    settings: LaunchSettings,
    configs: ConfigResolver,
    /// (runner, setting) pairs already warned about
    warned: Mutex<HashSet<(String, String)>>,
}

impl<'r> Engine<'r> {
    /// Engine for a loaded configuration file.
    pub fn new(registry: &'r RunnerRegistry, config: &Config) -> Self {
        Self::with_settings(
            registry,
            LaunchSettings::from_config(config),
            ConfigResolver::new(registry, config.runners.clone()),
        )
    }

    /// Engine with an explicit context, bypassing the config file.
    pub fn with_settings(
        registry: &'r RunnerRegistry,
        settings: LaunchSettings,
        configs: ConfigResolver,
    ) -> Self {
        Self {
            registry,
            settings,
            configs,
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// Engine with default runner configuration.
    pub fn with_defaults(registry: &'r RunnerRegistry, settings: LaunchSettings) -> Self {
        Self::with_settings(registry, settings, ConfigResolver::defaults_only(registry))
    }

    pub fn registry(&self) -> &RunnerRegistry {
        self.registry
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }

    /// Resolved configuration of one runner.
    pub fn runner_config(&self, descriptor: &RunnerDescriptor) -> Arc<RunnerConfig> {
        self.configs.resolve(descriptor)
    }

    /// Candidate order for a platform: the configured list, or every
    /// registered runner for the platform in registration order.
    pub fn candidates_for(&self, platform: &str) -> Vec<String> {
        match self.settings.platform_runners(platform) {
            Some(runners) => runners.to_vec(),
            None => self
                .registry
                .for_platform(platform)
                .map(|r| r.name.clone())
                .collect(),
        }
    }

    /// Resolve an item against its platform's candidates.
    pub fn resolve_item(&self, item: &PlayableItem) -> Result<Resolved, ResolveError> {
        let candidates = self.candidates_for(&item.platform);
        self.resolve(item, &candidates)
    }

    /// Resolve many items in parallel. One outcome per item, in input order.
    pub fn resolve_batch(&self, items: &[PlayableItem]) -> Vec<Result<Resolved, ResolveError>> {
        items.par_iter().map(|item| self.resolve_item(item)).collect()
    }

    /// Resolve an item against an explicit candidate order. First success wins.
    pub fn resolve<S: AsRef<str>>(
        &self,
        item: &PlayableItem,
        candidates: &[S],
    ) -> Result<Resolved, ResolveError> {
        let mut rejections = Vec::new();

        for name in candidates {
            let name = name.as_ref();
            match self.attempt(item, name) {
                CandidateState::Skipped => {}
                CandidateState::Rejected(Rejection::NotActuallyLaunchable(reason)) => {
                    tracing::debug!(
                        "{} is not launchable ({}): {}",
                        item.path.display(),
                        name,
                        reason
                    );
                    return Err(ResolveError::NotLaunchable {
                        runner: name.to_string(),
                        reason,
                    });
                }
                CandidateState::Rejected(reason) => {
                    self.log_rejection(item, name, &reason);
                    rejections.push(RejectionRecord {
                        runner: name.to_string(),
                        reason,
                    });
                }
                CandidateState::Succeeded(plan) => {
                    tracing::debug!(
                        "{} resolved to {} after {} rejection(s)",
                        item.path.display(),
                        name,
                        rejections.len()
                    );
                    return Ok(Resolved {
                        runner: name.to_string(),
                        plan,
                        rejections,
                    });
                }
            }
        }

        if rejections.is_empty() {
            tracing::debug!("{}: no usable candidates", item.path.display());
        } else {
            for record in &rejections {
                tracing::debug!("{}: {}", item.path.display(), record);
            }
        }
        Err(ResolveError::Exhausted(rejections))
    }

    /// Try a single candidate.
    pub fn attempt(&self, item: &PlayableItem, name: &str) -> CandidateState {
        let Some(descriptor) = self.registry.get(name) else {
            if self.first_warning(name, "unknown") {
                let suggestions = self.registry.suggest(name);
                if suggestions.is_empty() {
                    tracing::warn!("Unknown runner '{}', skipping", name);
                } else {
                    tracing::warn!(
                        "Unknown runner '{}', skipping. Did you mean: {}?",
                        name,
                        suggestions.join(", ")
                    );
                }
            } else {
                tracing::debug!("Unknown runner '{}', skipping", name);
            }
            return CandidateState::Skipped;
        };

        if !descriptor.supports_platform(&item.platform) {
            let key = format!("platform {}", item.platform);
            if self.first_warning(name, &key) {
                tracing::warn!(
                    "Runner '{}' does not run {} items, skipping",
                    name,
                    item.platform
                );
            } else {
                tracing::debug!("Runner '{}' does not run {} items, skipping", name, item.platform);
            }
            return CandidateState::Skipped;
        }

        match self.run_candidate(item, descriptor) {
            Ok(plan) => CandidateState::Succeeded(plan),
            Err(reason) => CandidateState::Rejected(reason),
        }
    }

    fn run_candidate(
        &self,
        item: &PlayableItem,
        descriptor: &RunnerDescriptor,
    ) -> Result<LaunchPlan, Rejection> {
        let frontend = match &descriptor.kind {
            RunnerKind::Core { .. } => Some(self.frontend_for(descriptor)?),
            _ => None,
        };

        descriptor.capabilities.admits(item)?;
        let access = self.media_access(item, descriptor)?;

        let resolved = self.configs.resolve(descriptor);
        let config = resolved.as_ref();

        let command = match &descriptor.kind {
            RunnerKind::Standard { check, generate } => {
                check(item, config)?;
                generate(item, config)?
            }
            RunnerKind::SharedHardware(driver) => {
                driver.check(item, config)?;
                driver.generate(item, config)?
            }
            RunnerKind::Core { check } => {
                check(item, config)?;
                match &frontend {
                    Some((host, generate)) => {
                        let host_config = self.configs.resolve(host);
                        generate(item, host_config.as_ref(), config.exe.as_str())?
                    }
                    None => return Err(Rejection::FrontendNotConfigured {
                        core: descriptor.name.clone(),
                    }),
                }
            }
            RunnerKind::Frontend { .. } => {
                return Err(Rejection::feature(
                    "Runner",
                    "frontends only run through a core",
                ));
            }
        };

        // A composed runner runs as the frontend process
        let host = frontend
            .as_ref()
            .map_or(descriptor.host, |(host, _)| host.host);

        let plan = self.with_media(command, &access);
        let plan = adapt::adapt(plan, host, &self.settings);
        let path = access.launch_path();
        Ok(plan.substitute_path(&path.to_string_lossy()))
    }

    /// The configured frontend and its generator.
    fn frontend_for(
        &self,
        core: &RunnerDescriptor,
    ) -> Result<(&'r RunnerDescriptor, FrontendFn), Rejection> {
        let not_configured = || Rejection::FrontendNotConfigured {
            core: core.name.clone(),
        };

        let name = self.settings.frontend.as_deref().ok_or_else(not_configured)?;
        let Some(descriptor) = self.registry.get(name) else {
            tracing::warn!("Configured frontend '{}' is not a known runner", name);
            return Err(not_configured());
        };
        match &descriptor.kind {
            RunnerKind::Frontend { generate } => Ok((descriptor, generate.clone())),
            other => {
                tracing::warn!(
                    "Configured frontend '{}' is a {} runner, not a frontend",
                    name,
                    other.label()
                );
                Err(not_configured())
            }
        }
    }

    fn media_access(
        &self,
        item: &PlayableItem,
        descriptor: &RunnerDescriptor,
    ) -> Result<MediaAccess, Rejection> {
        let Some(container) = &item.container else {
            return Ok(MediaAccess::Direct(item.path.clone()));
        };

        if descriptor.capabilities.reads_container(&container.kind) {
            return Ok(MediaAccess::Direct(item.path.clone()));
        }

        match &self.settings.scratch_dir {
            Some(dir) => Ok(MediaAccess::Scratch {
                archive: item.path.clone(),
                entry: container.entry.clone(),
                scratch_dir: dir.clone(),
            }),
            None => Err(Rejection::extension(format!("{} archives", container.kind))),
        }
    }

    /// Extract before and clean up after, for scratch access.
    fn with_media(&self, command: LaunchCommand, access: &MediaAccess) -> LaunchPlan {
        match access {
            MediaAccess::Direct(_) => command.into(),
            MediaAccess::Scratch {
                archive,
                entry,
                scratch_dir,
            } => {
                let extracted = scratch_dir.join(entry);
                command
                    .prepend_command(self.extract_command(archive, entry, scratch_dir))
                    .append_command(LaunchCommand::new(
                        "rm",
                        ["-f".to_string(), extracted.to_string_lossy().into_owned()],
                    ))
                    .into()
            }
        }
    }

    fn extract_command(&self, archive: &Path, entry: &str, scratch_dir: &Path) -> LaunchCommand {
        LaunchCommand::new(
            self.settings.extractor.clone(),
            [
                "x".to_string(),
                "-y".to_string(),
                format!("-o{}", scratch_dir.display()),
                archive.to_string_lossy().into_owned(),
                entry.to_string(),
            ],
        )
    }

    fn log_rejection(&self, item: &PlayableItem, runner: &str, reason: &Rejection) {
        match reason {
            Rejection::ExtensionNotSupported(_) => {
                tracing::trace!("{} rejected {}: {}", runner, item.path.display(), reason);
            }
            Rejection::ConfigurationMissing { setting } => {
                if self.first_warning(runner, setting) {
                    tracing::warn!(
                        "{}: {}; set it under [runners.{}.options]",
                        runner,
                        reason,
                        runner
                    );
                }
            }
            _ => {
                tracing::debug!("{} rejected {}: {}", runner, item.path.display(), reason);
            }
        }
    }

    fn first_warning(&self, runner: &str, setting: &str) -> bool {
        let mut warned = match self.warned.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        warned.insert((runner.to_string(), setting.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::accept_all;
    use launchpad_shared::PATH_PLACEHOLDER;

    fn emu(name: &str, extensions: &[&str]) -> RunnerDescriptor {
        RunnerDescriptor::new(
            name,
            name,
            RunnerKind::standard(accept_all, |_, cfg| {
                Ok(LaunchCommand::new(cfg.exe.clone(), [PATH_PLACEHOLDER]))
            }),
        )
        .platforms(&["nes"])
        .extensions(extensions)
    }

    fn registry() -> RunnerRegistry {
        RunnerRegistry::new()
            .with(emu("mesen", &["nes"]))
            .with(emu("fceux", &["nes", "fds"]).containers(&["zip"]))
    }

    #[test]
    fn test_unknown_and_foreign_platform_names_are_skipped() {
        let registry = registry().with(
            RunnerDescriptor::new("snes9x", "snes9x", RunnerKind::core(accept_all))
                .platforms(&["snes"])
                .extensions(&["sfc"]),
        );
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        let item = PlayableItem::new("/roms/smb.nes", "nes");

        assert_eq!(engine.attempt(&item, "mesne"), CandidateState::Skipped);
        assert_eq!(engine.attempt(&item, "snes9x"), CandidateState::Skipped);

        let resolved = engine.resolve(&item, &["mesne", "snes9x", "mesen"]).unwrap();
        assert_eq!(resolved.runner, "mesen");
        assert!(resolved.rejections.is_empty());
    }

    #[test]
    fn test_skipped_names_warn_once_per_batch() {
        let registry = registry().with(
            RunnerDescriptor::new("snes9x", "snes9x", RunnerKind::core(accept_all))
                .platforms(&["snes"])
                .extensions(&["sfc"]),
        );
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        let items: Vec<_> = (0..3)
            .map(|i| PlayableItem::new(format!("/roms/{}.nes", i), "nes"))
            .collect();

        for item in &items {
            assert_eq!(engine.attempt(item, "mesne"), CandidateState::Skipped);
            assert_eq!(engine.attempt(item, "snes9x"), CandidateState::Skipped);
        }

        assert!(!engine.first_warning("mesne", "unknown"));
        assert!(!engine.first_warning("snes9x", "platform nes"));
        assert!(engine.first_warning("snes9x", "platform gb"));
    }

    #[test]
    fn test_item_path_containing_placeholder_text() {
        let registry = registry();
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        let item = PlayableItem::new("/roms/$PATH/smb.nes", "nes");

        let resolved = engine.resolve_item(&item).unwrap();
        assert_eq!(resolved.plan.args(), ["/roms/$PATH/smb.nes"]);
        assert!(!resolved.plan.has_placeholder());
    }

    #[test]
    fn test_placeholder_substituted_with_item_path() {
        let registry = registry();
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        let item = PlayableItem::new("/roms/smb.nes", "nes");

        let resolved = engine.resolve_item(&item).unwrap();
        assert_eq!(resolved.plan.exe(), "mesen");
        assert_eq!(resolved.plan.args(), ["/roms/smb.nes"]);
        assert!(!resolved.plan.has_placeholder());
    }

    #[test]
    fn test_candidates_prefer_configured_order() {
        let registry = registry();
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        assert_eq!(engine.candidates_for("nes"), vec!["mesen", "fceux"]);
        assert!(engine.candidates_for("gba").is_empty());

        let configured = Engine::with_defaults(
            &registry,
            LaunchSettings::default().platform("nes", &["fceux"]),
        );
        assert_eq!(configured.candidates_for("nes"), vec!["fceux"]);
    }

    #[test]
    fn test_archive_read_directly_when_supported() {
        let registry = registry();
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        let item = PlayableItem::new("/roms/smb.zip", "nes").in_container("zip", "smb.nes");

        let resolved = engine.resolve(&item, &["mesen", "fceux"]).unwrap();
        assert_eq!(resolved.runner, "fceux");
        assert_eq!(resolved.plan.args(), ["/roms/smb.zip"]);
        assert_eq!(
            resolved.rejections,
            vec![RejectionRecord {
                runner: "mesen".into(),
                reason: Rejection::extension("zip archives"),
            }]
        );
    }

    #[test]
    fn test_archive_extracted_to_scratch() {
        let registry = registry();
        let engine = Engine::with_defaults(
            &registry,
            LaunchSettings::default().scratch_dir("/tmp/lp"),
        );
        let item = PlayableItem::new("/roms/smb.7z", "nes").in_container("7z", "smb.nes");

        let resolved = engine.resolve(&item, &["mesen"]).unwrap();
        let LaunchPlan::Multi(multi) = &resolved.plan else {
            panic!("expected a multi-step plan");
        };
        assert_eq!(
            multi.pre_commands()[0].args(),
            ["x", "-y", "-o/tmp/lp", "/roms/smb.7z", "smb.nes"]
        );
        assert_eq!(multi.main().args(), ["/tmp/lp/smb.nes"]);
        assert_eq!(multi.post_commands()[0].exe(), "rm");
        assert_eq!(multi.post_commands()[0].args(), ["-f", "/tmp/lp/smb.nes"]);
    }

    #[test]
    fn test_not_launchable_stops_resolution() {
        let registry = registry().with(
            RunnerDescriptor::new(
                "picky",
                "picky",
                RunnerKind::standard(
                    |_, _| Err(Rejection::not_launchable("update package")),
                    |_, _| Ok(LaunchCommand::exe_only("picky")),
                ),
            )
            .platforms(&["nes"])
            .extensions(&["nes"]),
        );
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        let item = PlayableItem::new("/roms/upd.nes", "nes");

        let err = engine.resolve(&item, &["picky", "mesen"]).unwrap_err();
        assert_eq!(
            err,
            ResolveError::NotLaunchable {
                runner: "picky".into(),
                reason: "update package".into(),
            }
        );
    }

    #[test]
    fn test_configuration_missing_warns_once() {
        let registry = registry();
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        assert!(engine.first_warning("duckstation", "bios_dir"));
        assert!(!engine.first_warning("duckstation", "bios_dir"));
        assert!(engine.first_warning("duckstation", "other"));
    }

    #[test]
    fn test_batch_keeps_input_order() {
        let registry = registry();
        let engine = Engine::with_defaults(&registry, LaunchSettings::default());
        let items = vec![
            PlayableItem::new("/a.nes", "nes"),
            PlayableItem::new("/b.sfc", "nes"),
            PlayableItem::new("/c.fds", "nes"),
        ];

        let results = engine.resolve_batch(&items);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().map(|r| r.runner.as_str()), Ok("mesen"));
        assert!(matches!(results[1], Err(ResolveError::Exhausted(ref r)) if r.len() == 2));
        assert_eq!(results[2].as_ref().map(|r| r.runner.as_str()), Ok("fceux"));
    }
}
