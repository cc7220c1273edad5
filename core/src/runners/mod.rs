//! Built-in runner table
//!
//! Data only: each submodule describes a family of runners and the small
//! check/generate functions they need. The registry builds itself from
//! [`all`] on first use.

mod arcade;
mod foreign;
mod libretro;
mod managed;
mod native;

use launchpad_shared::{FeatureValue, PlayableItem};

use crate::config::RunnerConfig;
use crate::descriptor::RunnerDescriptor;
use crate::error::Rejection;
use crate::options::OptionSpec;

pub use libretro::FRONTEND as LIBRETRO_FRONTEND;

/// Every built-in runner, in default candidate order.
pub fn all() -> Vec<RunnerDescriptor> {
    let mut runners = native::runners();
    runners.extend(foreign::runners());
    runners.extend(managed::runners());
    runners.extend(libretro::runners());
    runners.extend(arcade::runners());
    runners
}

/// Common `fullscreen` option.
fn fullscreen_option(default: bool) -> OptionSpec {
    OptionSpec::bool("fullscreen", default, "Start in fullscreen")
}

/// Reject when a text feature is present and outside `allowed`.
fn require_one_of(
    item: &PlayableItem,
    feature: &str,
    allowed: &[&str],
) -> Result<(), Rejection> {
    match item.get_feature(feature) {
        Some(FeatureValue::Text(value)) if !allowed.contains(&value.as_str()) => {
            Err(Rejection::feature(feature, value))
        }
        _ => Ok(()),
    }
}

/// Reject when a text or list feature names anything in `unsupported`.
fn reject_any_of(
    item: &PlayableItem,
    feature: &str,
    unsupported: &[&str],
) -> Result<(), Rejection> {
    let values: Vec<&str> = match item.get_feature(feature) {
        Some(FeatureValue::Text(value)) => vec![value.as_str()],
        Some(FeatureValue::List(values)) => values.iter().map(String::as_str).collect(),
        _ => return Ok(()),
    };
    match values.into_iter().find(|v| unsupported.contains(v)) {
        Some(found) => Err(Rejection::feature(feature, found)),
        None => Ok(()),
    }
}

/// Pass `flag` when the config's `fullscreen` option is on.
fn fullscreen_flag(config: &RunnerConfig, flag: &'static str) -> Option<&'static str> {
    config.bool("fullscreen").then_some(flag)
}
