//! Launchpad Core - runner resolution engine
//!
//! Decides whether and how a catalogued item can be launched, given an ordered
//! list of candidate runners (emulators, compatibility layers, shared-hardware
//! drivers). The result is a [`LaunchPlan`](launchpad_shared::LaunchPlan):
//! a description of the process to start. Nothing here starts it.
//!
//! # Architecture
//!
//! - [`RunnerDescriptor`] - static capabilities, option schema and callbacks of one runner
//! - [`RunnerRegistry`] - name lookup over descriptors; [`registry::builtin`] is the stock table
//! - [`ConfigResolver`] - per-runner configuration, memoized once per runner
//! - [`Engine`] - ordered fallback over candidates, with typed [`Rejection`]s
//! - [`adapt`] - compatibility-layer, runtime and instrumentation wrapping
//! - [`mame`] - shared-hardware sub-resolver for MAME drivers

pub mod adapt;
pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod mame;
pub mod options;
pub mod registry;
pub mod runners;

pub use config::{Config, ConfigResolver, Instrumentation, LaunchSettings, RunnerConfig};
pub use descriptor::{
    Capabilities, HostRequirement, ManagedRuntime, RunnerDescriptor, RunnerKind, accept_all,
};
pub use engine::{CandidateState, Engine, Resolved};
pub use error::{ConfigError, Rejection, RejectionRecord, ResolveError};
pub use mame::{Compatibility, MameDriver};
pub use options::{OptionKind, OptionSpec, OptionValue};
pub use registry::RunnerRegistry;
