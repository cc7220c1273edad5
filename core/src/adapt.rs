//! Platform adaptation
//!
//! Nests a generated plan inside whatever the host needs to run it (a
//! compatibility layer, a managed runtime), then inside the instrumentation
//! wrappers the user enabled. Only the main command of a multi-step plan is
//! ever rewritten.

use launchpad_shared::LaunchPlan;

use crate::config::{Instrumentation, LaunchSettings};
use crate::descriptor::{HostRequirement, ManagedRuntime};

/// Performance governor wrapper.
pub const GOVERNOR_EXE: &str = "gamemoderun";
/// Diagnostics overlay wrapper.
pub const OVERLAY_EXE: &str = "mangohud";
/// Variable the overlay needs to attach to the process.
pub const OVERLAY_ENV: (&str, &str) = ("MANGOHUD", "1");
/// Variable that forces the reported OpenGL version.
pub const GL_VERSION_ENV: &str = "MESA_GL_VERSION_OVERRIDE";
/// Prefix variable passed to the compatibility layer.
pub const COMPAT_PREFIX_ENV: &str = "WINEPREFIX";

/// Host wrapping followed by instrumentation.
pub fn adapt(plan: LaunchPlan, host: HostRequirement, settings: &LaunchSettings) -> LaunchPlan {
    let plan = adapt_host(plan, host, settings);
    instrument(plan, &settings.instrumentation)
}

/// Wrap the plan in the compatibility layer or runtime the host requires.
pub fn adapt_host(plan: LaunchPlan, host: HostRequirement, settings: &LaunchSettings) -> LaunchPlan {
    match host {
        HostRequirement::Native => plan,
        HostRequirement::Foreign => {
            let plan = plan.wrap(settings.compat_layer.clone());
            match &settings.compat_prefix {
                Some(prefix) => {
                    plan.set_env_var(COMPAT_PREFIX_ENV, prefix.to_string_lossy().into_owned())
                }
                None => plan,
            }
        }
        HostRequirement::Managed(ManagedRuntime::Java) => {
            plan.wrap_with(settings.runtime_exe(ManagedRuntime::Java), ["-jar"])
        }
        HostRequirement::Managed(runtime) => plan.wrap(settings.runtime_exe(runtime)),
    }
}

/// Apply enabled instrumentation wrappers: governor, then overlay, then the
/// forced GL version.
///
/// Each wrap nests the previous command, so with both wrappers enabled the
/// result is `mangohud gamemoderun <command>`.
pub fn instrument(plan: LaunchPlan, instrumentation: &Instrumentation) -> LaunchPlan {
    let mut plan = plan;

    if instrumentation.governor {
        plan = plan.wrap(GOVERNOR_EXE);
    }

    if instrumentation.overlay {
        plan = plan.wrap(OVERLAY_EXE).set_env_var(OVERLAY_ENV.0, OVERLAY_ENV.1);
    }

    if let Some(version) = &instrumentation.force_gl_version {
        plan = plan.set_env_var(GL_VERSION_ENV, version.clone());
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchpad_shared::{LaunchCommand, PATH_PLACEHOLDER};

    fn base() -> LaunchPlan {
        LaunchCommand::new("emu", ["--fullscreen", PATH_PLACEHOLDER]).into()
    }

    #[test]
    fn test_native_untouched() {
        let plan = adapt(base(), HostRequirement::Native, &LaunchSettings::default());
        assert_eq!(plan, base());
    }

    #[test]
    fn test_foreign_wraps_compat_layer() {
        let settings = LaunchSettings::default().compat_prefix("/home/me/.wine");
        let plan = adapt_host(base(), HostRequirement::Foreign, &settings);
        assert_eq!(plan.exe(), "wine");
        assert_eq!(plan.args(), ["emu", "--fullscreen", "$PATH"]);
        assert_eq!(plan.env().get("WINEPREFIX"), Some("/home/me/.wine"));
    }

    #[test]
    fn test_foreign_without_prefix_sets_no_env() {
        let plan = adapt_host(base(), HostRequirement::Foreign, &LaunchSettings::default());
        assert!(plan.env().is_empty());
    }

    #[test]
    fn test_managed_runtimes() {
        let settings = LaunchSettings::default();
        let mono = adapt_host(
            base(),
            HostRequirement::Managed(ManagedRuntime::Mono),
            &settings,
        );
        assert_eq!(mono.exe(), "mono");
        assert_eq!(mono.args()[0], "emu");

        let java = adapt_host(
            base(),
            HostRequirement::Managed(ManagedRuntime::Java),
            &settings,
        );
        assert_eq!(java.exe(), "java");
        assert_eq!(java.args(), ["-jar", "emu", "--fullscreen", "$PATH"]);
    }

    #[test]
    fn test_governor_then_overlay() {
        let instrumentation = Instrumentation {
            governor: true,
            overlay: true,
            force_gl_version: None,
        };
        let plan = instrument(base(), &instrumentation);

        assert_eq!(plan.exe(), "mangohud");
        assert_eq!(
            plan.args(),
            ["gamemoderun", "emu", "--fullscreen", "$PATH"]
        );
        assert_eq!(plan.env().get("MANGOHUD"), Some("1"));
    }

    #[test]
    fn test_gl_override_is_env_only() {
        let instrumentation = Instrumentation {
            force_gl_version: Some("4.5".into()),
            ..Default::default()
        };
        let plan = instrument(base(), &instrumentation);
        assert_eq!(plan.exe(), "emu");
        assert_eq!(plan.env().get("MESA_GL_VERSION_OVERRIDE"), Some("4.5"));
    }

    #[test]
    fn test_host_wrap_sits_inside_instrumentation() {
        let settings = LaunchSettings::default().governor(true);
        let plan = adapt(base(), HostRequirement::Foreign, &settings);
        assert_eq!(plan.exe(), "gamemoderun");
        assert_eq!(plan.args()[..2], ["wine", "emu"]);
    }

    #[test]
    fn test_multi_plan_pre_post_untouched() {
        let pre = LaunchCommand::new("7z", ["x", "a.zip"]);
        let post = LaunchCommand::new("rm", ["-f", "a.nes"]);
        let plan: LaunchPlan = LaunchCommand::new("emu", [PATH_PLACEHOLDER])
            .prepend_command(pre.clone())
            .append_command(post.clone())
            .into();

        let settings = LaunchSettings::default().overlay(true);
        let adapted = adapt(plan, HostRequirement::Foreign, &settings);

        let LaunchPlan::Multi(multi) = adapted else {
            panic!("expected a multi-step plan");
        };
        assert_eq!(multi.pre_commands(), [pre]);
        assert_eq!(multi.post_commands(), [post]);
        assert_eq!(multi.exe(), "mangohud");
        assert_eq!(multi.args()[..2], ["wine", "emu"]);
    }
}
