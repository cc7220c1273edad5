//! Runner registry
//!
//! Name → descriptor lookup for every runner the resolver knows about.
//! The built-in table is built once, on first use, and lives for the whole
//! process. Callers with their own runners (tests, plugins) build a
//! [`RunnerRegistry`] by hand.

mod suggest;

pub use suggest::{find_similar, levenshtein_distance};

use std::sync::OnceLock;

use hashbrown::HashMap;

use crate::descriptor::{RunnerDescriptor, RunnerKind};
use crate::runners;

/// Registry of runner descriptors, in registration order.
pub struct RunnerRegistry {
    runners: Vec<RunnerDescriptor>,
    index: HashMap<String, usize>,
}

impl RunnerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            runners: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a runner. A runner with the same name is replaced in place.
    pub fn register(&mut self, descriptor: RunnerDescriptor) {
        if let Some(&slot) = self.index.get(&descriptor.name) {
            tracing::warn!("Replacing already registered runner '{}'", descriptor.name);
            self.runners[slot] = descriptor;
            return;
        }
        self.index
            .insert(descriptor.name.clone(), self.runners.len());
        self.runners.push(descriptor);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: RunnerDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RunnerDescriptor> {
        self.index.get(name).map(|&i| &self.runners[i])
    }

    /// All runners in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RunnerDescriptor> {
        self.runners.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.runners.iter().map(|r| r.name.as_str())
    }

    /// Runners that are direct candidates for a platform, in registration order.
    pub fn for_platform<'a>(
        &'a self,
        platform: &'a str,
    ) -> impl Iterator<Item = &'a RunnerDescriptor> + 'a {
        self.runners
            .iter()
            .filter(move |r| r.supports_platform(platform))
    }

    /// Whether `name` is registered and a valid candidate for `platform`.
    pub fn supports_platform(&self, name: &str, platform: &str) -> bool {
        self.get(name).is_some_and(|r| r.supports_platform(platform))
    }

    /// Registered names close to a mistyped one.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        find_similar(name, self.names())
    }

    /// Frontend runners (hosts for core runners).
    pub fn frontends(&self) -> impl Iterator<Item = &RunnerDescriptor> {
        self.runners
            .iter()
            .filter(|r| matches!(r.kind, RunnerKind::Frontend { .. }))
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }
}

impl Default for RunnerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The built-in runner table.
pub fn builtin() -> &'static RunnerRegistry {
    static BUILTIN: OnceLock<RunnerRegistry> = OnceLock::new();
    BUILTIN.get_or_init(|| {
        let mut registry = RunnerRegistry::new();
        for descriptor in runners::all() {
            registry.register(descriptor);
        }
        tracing::debug!("Registered {} built-in runners", registry.len());
        registry
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::accept_all;
    use launchpad_shared::LaunchCommand;

    fn runner(name: &str, exe: &str, platforms: &[&str]) -> RunnerDescriptor {
        RunnerDescriptor::new(
            name,
            exe,
            RunnerKind::standard(accept_all, |_, cfg| Ok(LaunchCommand::exe_only(cfg.exe.clone()))),
        )
        .platforms(platforms)
    }

    #[test]
    fn test_register_and_get() {
        let registry = RunnerRegistry::new()
            .with(runner("mesen", "mesen", &["nes"]))
            .with(runner("snes9x", "snes9x", &["snes"]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("mesen").map(|r| r.default_exe.as_str()), Some("mesen"));
        assert!(registry.get("nestopia").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["mesen", "snes9x"]);
    }

    #[test]
    fn test_register_replaces_duplicate_in_place() {
        let registry = RunnerRegistry::new()
            .with(runner("a", "old", &["nes"]))
            .with(runner("b", "b", &["nes"]))
            .with(runner("a", "new", &["nes"]));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("a").map(|r| r.default_exe.as_str()), Some("new"));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_platform_lookups() {
        let registry = RunnerRegistry::new()
            .with(runner("mesen", "mesen", &["nes"]))
            .with(runner("mgba", "mgba", &["gb", "gba"]))
            .with(runner("sameboy", "sameboy", &["gb"]));

        let gb: Vec<_> = registry.for_platform("gb").map(|r| r.name.as_str()).collect();
        assert_eq!(gb, vec!["mgba", "sameboy"]);
        assert!(registry.supports_platform("mesen", "nes"));
        assert!(!registry.supports_platform("mesen", "gb"));
        assert!(!registry.supports_platform("missing", "gb"));
    }

    #[test]
    fn test_suggest() {
        let registry = RunnerRegistry::new()
            .with(runner("mesen", "mesen", &["nes"]))
            .with(runner("mgba", "mgba", &["gba"]));
        assert_eq!(registry.suggest("mesne"), vec!["mesen".to_string()]);
    }

    #[test]
    fn test_builtin_is_shared() {
        let first = builtin();
        let second = builtin();
        assert!(std::ptr::eq(first, second));
        assert!(!first.is_empty());
        assert_eq!(first.frontends().count(), 1);
    }
}
