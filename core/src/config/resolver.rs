//! Per-runner configuration resolution.
//!
//! A runner's [`RunnerConfig`] is its schema defaults overlaid with whatever the
//! persisted `[runners.<name>]` section overrides. It is computed at most once
//! per runner per resolver and shared read-only afterwards.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use hashbrown::HashMap;

use crate::descriptor::RunnerDescriptor;
use crate::options::OptionValue;
use crate::registry::RunnerRegistry;

use super::RunnerSection;

/// Resolved executable and option values for one runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub runner: String,
    pub exe: String,
    options: HashMap<String, OptionValue>,
}

impl RunnerConfig {
    /// Defaults only, as if nothing was persisted.
    pub fn defaults(descriptor: &RunnerDescriptor) -> Self {
        let options = descriptor
            .options
            .iter()
            .filter_map(|spec| {
                spec.default
                    .clone()
                    .map(|value| (spec.name.to_string(), value))
            })
            .collect();

        Self {
            runner: descriptor.name.clone(),
            exe: descriptor.default_exe.clone(),
            options,
        }
    }

    /// Defaults overlaid with a persisted section.
    ///
    /// Override values that don't fit the declared type, and keys the runner
    /// doesn't declare, are logged and ignored.
    pub fn from_section(descriptor: &RunnerDescriptor, section: &RunnerSection) -> Self {
        let mut config = Self::defaults(descriptor);

        if let Some(path) = &section.path {
            config.exe = path.clone();
        }

        for (key, raw) in &section.options {
            let Some(spec) = descriptor.option_spec(key) else {
                tracing::warn!("{}: ignoring unknown option '{}'", descriptor.name, key);
                continue;
            };
            match spec.kind.coerce(raw) {
                Some(value) => {
                    config.options.insert(key.clone(), value);
                }
                None => tracing::warn!(
                    "{}: option '{}' has invalid value {}, keeping default",
                    descriptor.name,
                    key,
                    raw
                ),
            }
        }

        config
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn bool(&self, name: &str) -> bool {
        matches!(self.options.get(name), Some(OptionValue::Bool(true)))
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.options.get(name) {
            Some(OptionValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.options.get(name) {
            Some(OptionValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn path(&self, name: &str) -> Option<&Path> {
        match self.options.get(name) {
            Some(OptionValue::Path(p)) => Some(p),
            _ => None,
        }
    }

    /// Set an option directly. Test and tooling convenience.
    pub fn with_option(mut self, name: impl Into<String>, value: OptionValue) -> Self {
        self.options.insert(name.into(), value);
        self
    }
}

/// Memoizing resolver for runner configurations.
///
/// Holds one once-cell per registered runner, so resolving items in parallel
/// initializes each runner's config exactly once.
pub struct ConfigResolver {
    sections: BTreeMap<String, RunnerSection>,
    cache: HashMap<String, OnceLock<Arc<RunnerConfig>>>,
}

impl ConfigResolver {
    pub fn new(registry: &RunnerRegistry, sections: BTreeMap<String, RunnerSection>) -> Self {
        for name in sections.keys() {
            if registry.get(name).is_none() {
                tracing::warn!("Config has a section for unknown runner '{}'", name);
            }
        }

        let cache = registry
            .iter()
            .map(|d| (d.name.clone(), OnceLock::new()))
            .collect();

        Self { sections, cache }
    }

    /// Resolver with no persisted overrides.
    pub fn defaults_only(registry: &RunnerRegistry) -> Self {
        Self::new(registry, BTreeMap::new())
    }

    /// Resolve a runner's configuration.
    ///
    /// Returns the same instance on every call for a registered runner.
    pub fn resolve(&self, descriptor: &RunnerDescriptor) -> Arc<RunnerConfig> {
        match self.cache.get(&descriptor.name) {
            Some(cell) => cell.get_or_init(|| Arc::new(self.compute(descriptor))).clone(),
            None => Arc::new(self.compute(descriptor)),
        }
    }

    fn compute(&self, descriptor: &RunnerDescriptor) -> RunnerConfig {
        match self.sections.get(&descriptor.name) {
            Some(section) => RunnerConfig::from_section(descriptor, section),
            None => RunnerConfig::defaults(descriptor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{RunnerKind, accept_all};
    use crate::options::OptionSpec;
    use std::path::PathBuf;

    fn descriptor() -> RunnerDescriptor {
        RunnerDescriptor::new("duckstation", "duckstation-qt", RunnerKind::core(accept_all))
            .option(OptionSpec::bool("fullscreen", true, "Start fullscreen"))
            .option(OptionSpec::path("bios_dir", "BIOS directory"))
            .option(OptionSpec::int("scale", 2, 1, 8, "Render scale"))
    }

    fn registry() -> RunnerRegistry {
        let mut registry = RunnerRegistry::new();
        registry.register(descriptor());
        registry
    }

    #[test]
    fn test_defaults_without_section() {
        let config = RunnerConfig::defaults(&descriptor());
        assert_eq!(config.exe, "duckstation-qt");
        assert!(config.bool("fullscreen"));
        assert_eq!(config.int("scale"), Some(2));
        assert_eq!(config.path("bios_dir"), None);
    }

    #[test]
    fn test_section_overrides() {
        let mut section = RunnerSection {
            path: Some("/opt/ds".into()),
            ..Default::default()
        };
        section
            .options
            .insert("bios_dir".into(), toml::Value::String("/bios".into()));
        section
            .options
            .insert("fullscreen".into(), toml::Value::Boolean(false));

        let config = RunnerConfig::from_section(&descriptor(), &section);
        assert_eq!(config.exe, "/opt/ds");
        assert!(!config.bool("fullscreen"));
        assert_eq!(config.path("bios_dir"), Some(Path::new("/bios")));
    }

    #[test]
    fn test_invalid_override_keeps_default() {
        let mut section = RunnerSection::default();
        section
            .options
            .insert("scale".into(), toml::Value::Integer(99));
        section
            .options
            .insert("unknown".into(), toml::Value::Boolean(true));

        let config = RunnerConfig::from_section(&descriptor(), &section);
        assert_eq!(config.int("scale"), Some(2));
        assert!(config.get("unknown").is_none());
    }

    #[test]
    fn test_resolver_memoizes() {
        let registry = registry();
        let resolver = ConfigResolver::defaults_only(&registry);
        let desc = registry.get("duckstation").unwrap();

        let first = resolver.resolve(desc);
        let second = resolver.resolve(desc);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_resolver_uses_sections() {
        let registry = registry();
        let mut sections = BTreeMap::new();
        sections.insert(
            "duckstation".to_string(),
            RunnerSection {
                path: Some("/usr/local/bin/duckstation".into()),
                ..Default::default()
            },
        );
        let resolver = ConfigResolver::new(&registry, sections);
        let config = resolver.resolve(registry.get("duckstation").unwrap());
        assert_eq!(config.exe, "/usr/local/bin/duckstation");
    }

    #[test]
    fn test_unregistered_descriptor_resolves_uncached() {
        let resolver = ConfigResolver::defaults_only(&RunnerRegistry::new());
        let desc = descriptor();
        let first = resolver.resolve(&desc);
        let second = resolver.resolve(&desc);
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_with_option() {
        let config = RunnerConfig::defaults(&descriptor())
            .with_option("bios_dir", OptionValue::Path(PathBuf::from("/b")));
        assert_eq!(config.path("bios_dir"), Some(Path::new("/b")));
    }
}
