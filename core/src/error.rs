//! Rejection taxonomy and resolver errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why one candidate runner cannot launch an item.
///
/// Every variant except [`Rejection::NotActuallyLaunchable`] is recoverable:
/// the resolver records it and moves on to the next candidate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Capability mismatch: extension, folder-ness or archive format.
    #[error("{0} not supported")]
    ExtensionNotSupported(String),

    /// A parsed attribute of the item is incompatible with this runner.
    #[error("{feature} not supported: {detail}")]
    FeatureNotSupported { feature: String, detail: String },

    /// The item is a catalog entry but not something that can be run at all.
    #[error("not launchable: {0}")]
    NotActuallyLaunchable(String),

    /// A required external resource was never configured.
    #[error("{setting} is not configured")]
    ConfigurationMissing { setting: String },

    /// A core runner was listed but no frontend is configured to host it.
    #[error("no frontend configured to run core {core}")]
    FrontendNotConfigured { core: String },
}

impl Rejection {
    pub fn extension(what: impl Into<String>) -> Self {
        Rejection::ExtensionNotSupported(what.into())
    }

    pub fn feature(feature: impl Into<String>, detail: impl fmt::Display) -> Self {
        Rejection::FeatureNotSupported {
            feature: feature.into(),
            detail: detail.to_string(),
        }
    }

    pub fn not_launchable(why: impl Into<String>) -> Self {
        Rejection::NotActuallyLaunchable(why.into())
    }

    pub fn missing(setting: impl Into<String>) -> Self {
        Rejection::ConfigurationMissing {
            setting: setting.into(),
        }
    }

    /// Whether the resolver should try further candidates after this.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Rejection::NotActuallyLaunchable(_))
    }
}

/// A rejected candidate, kept for diagnostics for one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionRecord {
    pub runner: String,
    pub reason: Rejection,
}

impl fmt::Display for RejectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.runner, self.reason)
    }
}

/// Terminal failure of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The item should be left out of the catalog entirely.
    #[error("{runner} reports the item is not launchable: {reason}")]
    NotLaunchable { runner: String, reason: String },

    /// Every candidate was skipped or rejected.
    #[error("no runner could launch the item ({} rejected)", .0.len())]
    Exhausted(Vec<RejectionRecord>),
}

impl ResolveError {
    /// Rejections collected before giving up (empty for `NotLaunchable`).
    pub fn rejections(&self) -> &[RejectionRecord] {
        match self {
            ResolveError::Exhausted(records) => records,
            ResolveError::NotLaunchable { .. } => &[],
        }
    }
}

/// Error loading or saving the persisted configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("no config directory available on this platform")]
    NoConfigDir,
}
