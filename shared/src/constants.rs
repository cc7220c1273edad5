//! Centralized constants shared by the engine and command consumers.

/// Placeholder standing for the item's final on-disk path.
///
/// Runners put this in their generated arguments instead of the catalog path,
/// because the path a runner finally sees may differ (e.g. after an archive
/// member is extracted to a scratch file). It is replaced by
/// [`LaunchCommand::substitute_path`](crate::LaunchCommand::substitute_path).
pub const PATH_PLACEHOLDER: &str = "$PATH";

/// Shell used to chain the steps of a multi-command launch.
pub const CHAIN_SHELL: &str = "sh";
