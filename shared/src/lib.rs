//! Shared types for the launchpad runner resolver.
//!
//! This crate holds the data that crosses the boundary between the catalog
//! scanner, the resolution engine and whatever finally serializes a launch
//! (desktop shortcut writer, CLI, frontend):
//!
//! - [`PlayableItem`] and its feature attributes, produced by metadata extraction
//! - [`LaunchCommand`] / [`MultiLaunchCommand`] / [`LaunchPlan`], produced by the engine
//!
//! Nothing in here runs a process. Commands are descriptions only.

pub mod command;
pub mod constants;
pub mod env;
pub mod item;
pub mod shell;

pub use command::{LaunchCommand, LaunchPlan, MultiLaunchCommand};
pub use constants::PATH_PLACEHOLDER;
pub use env::EnvOverlay;
pub use item::{Container, FeatureValue, MediaType, PlayableItem, UnknownMediaType, features};
