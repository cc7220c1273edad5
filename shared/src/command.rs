//! Launch command model.
//!
//! A [`LaunchCommand`] describes one process invocation: executable, ordered
//! arguments, environment overlay and optional working directory. Commands are
//! values: every operation consumes the command and returns a new one, so a
//! command built for one resolution attempt is never shared with another.
//!
//! A [`MultiLaunchCommand`] chains pre-commands, a main command and
//! post-commands. Reads and wrapping go to the main command only.
//!
//! [`LaunchPlan`] is either of the two and is what the resolver hands out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{CHAIN_SHELL, PATH_PLACEHOLDER};
use crate::env::EnvOverlay;
use crate::shell;

/// A single process invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCommand {
    exe: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default, skip_serializing_if = "EnvOverlay::is_empty")]
    env: EnvOverlay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    working_dir: Option<PathBuf>,
    /// Set once the item path has been substituted; later substitutions are no-ops.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    path_resolved: bool,
}

impl LaunchCommand {
    /// Create a command with the given executable and arguments.
    pub fn new<I, S>(exe: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exe: exe.into(),
            args: args.into_iter().map(Into::into).collect(),
            env: EnvOverlay::new(),
            working_dir: None,
            path_resolved: false,
        }
    }

    /// Create a command with no arguments.
    pub fn exe_only(exe: impl Into<String>) -> Self {
        Self::new(exe, std::iter::empty::<String>())
    }

    pub fn exe(&self) -> &str {
        &self.exe
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn env(&self) -> &EnvOverlay {
        &self.env
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory the process starts in.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Nest this command inside `outer_exe`.
    ///
    /// The result runs `outer_exe` with this command's executable as its first
    /// argument, followed by this command's arguments in their original order.
    /// Environment and working directory carry over to the outer command.
    pub fn wrap(self, outer_exe: impl Into<String>) -> Self {
        self.wrap_with(outer_exe, std::iter::empty::<String>())
    }

    /// Like [`wrap`](Self::wrap), with extra outer arguments placed before the
    /// original executable (e.g. `java -jar app.jar ...`).
    pub fn wrap_with<I, S>(self, outer_exe: impl Into<String>, outer_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args: Vec<String> = outer_args.into_iter().map(Into::into).collect();
        args.reserve(self.args.len() + 1);
        args.push(self.exe);
        args.extend(self.args);

        Self {
            exe: outer_exe.into(),
            args,
            env: self.env,
            working_dir: self.working_dir,
            path_resolved: self.path_resolved,
        }
    }

    /// Add an environment override. A later call for the same key wins.
    pub fn set_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.set(key, value);
        self
    }

    /// Replace every occurrence of [`PATH_PLACEHOLDER`] in the executable and
    /// every argument with `path`.
    ///
    /// Substitution happens once: inserted text is never rescanned, and a
    /// resolved command is returned unchanged, so a path that itself contains
    /// the placeholder text survives verbatim.
    pub fn substitute_path(mut self, path: &str) -> Self {
        if self.path_resolved {
            return self;
        }
        if self.exe.contains(PATH_PLACEHOLDER) {
            self.exe = self.exe.replace(PATH_PLACEHOLDER, path);
        }
        for arg in &mut self.args {
            if arg.contains(PATH_PLACEHOLDER) {
                *arg = arg.replace(PATH_PLACEHOLDER, path);
            }
        }
        self.path_resolved = true;
        self
    }

    /// Whether the executable or any argument still awaits the item path.
    pub fn has_placeholder(&self) -> bool {
        !self.path_resolved
            && (self.exe.contains(PATH_PLACEHOLDER)
                || self.args.iter().any(|a| a.contains(PATH_PLACEHOLDER)))
    }

    /// Whether the item path has been substituted.
    pub fn is_resolved(&self) -> bool {
        self.path_resolved
    }

    /// Run `pre` before this command.
    pub fn prepend_command(self, pre: LaunchCommand) -> MultiLaunchCommand {
        MultiLaunchCommand::new(self).prepend_command(pre)
    }

    /// Run `post` after this command.
    pub fn append_command(self, post: LaunchCommand) -> MultiLaunchCommand {
        MultiLaunchCommand::new(self).append_command(post)
    }

    /// Serialize for `sh`: working directory change, `K=V` overrides, quoted words.
    pub fn to_shell_line(&self) -> String {
        let mut line = String::new();
        if let Some(dir) = &self.working_dir {
            line.push_str("cd ");
            line.push_str(&shell::quote(&dir.to_string_lossy()));
            line.push_str(" && ");
        }
        for (key, value) in self.env.iter() {
            line.push_str(key);
            line.push('=');
            line.push_str(&shell::quote(value));
            line.push(' ');
        }
        line.push_str(&shell::quote(&self.exe));
        for arg in &self.args {
            line.push(' ');
            line.push_str(&shell::quote(arg));
        }
        line
    }

    /// Shell form usable as one step of a chain; a directory change is kept
    /// inside a subshell so it cannot leak into later steps.
    fn to_chain_step(&self) -> String {
        if self.working_dir.is_some() {
            format!("({})", self.to_shell_line())
        } else {
            self.to_shell_line()
        }
    }
}

/// Pre-commands, one main command, post-commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiLaunchCommand {
    #[serde(default)]
    pre: Vec<LaunchCommand>,
    main: LaunchCommand,
    #[serde(default)]
    post: Vec<LaunchCommand>,
}

impl MultiLaunchCommand {
    pub fn new(main: LaunchCommand) -> Self {
        Self {
            pre: Vec::new(),
            main,
            post: Vec::new(),
        }
    }

    pub fn main(&self) -> &LaunchCommand {
        &self.main
    }

    pub fn pre_commands(&self) -> &[LaunchCommand] {
        &self.pre
    }

    pub fn post_commands(&self) -> &[LaunchCommand] {
        &self.post
    }

    pub fn exe(&self) -> &str {
        self.main.exe()
    }

    pub fn args(&self) -> &[String] {
        self.main.args()
    }

    pub fn env(&self) -> &EnvOverlay {
        self.main.env()
    }

    /// Add a command that runs before the existing pre-commands.
    pub fn prepend_command(mut self, pre: LaunchCommand) -> Self {
        self.pre.insert(0, pre);
        self
    }

    /// Add a command that runs after the existing post-commands.
    pub fn append_command(mut self, post: LaunchCommand) -> Self {
        self.post.push(post);
        self
    }

    /// Wrap the main command; pre- and post-commands are untouched.
    pub fn wrap(self, outer_exe: impl Into<String>) -> Self {
        self.map_main(|main| main.wrap(outer_exe))
    }

    pub fn wrap_with<I, S>(self, outer_exe: impl Into<String>, outer_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.map_main(|main| main.wrap_with(outer_exe, outer_args))
    }

    /// Set an environment override on the main command.
    pub fn set_env_var(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map_main(|main| main.set_env_var(key, value))
    }

    /// Substitute the placeholder in every step, not just the main command.
    pub fn substitute_path(self, path: &str) -> Self {
        Self {
            pre: self
                .pre
                .into_iter()
                .map(|c| c.substitute_path(path))
                .collect(),
            main: self.main.substitute_path(path),
            post: self
                .post
                .into_iter()
                .map(|c| c.substitute_path(path))
                .collect(),
        }
    }

    pub fn has_placeholder(&self) -> bool {
        self.steps().any(LaunchCommand::has_placeholder)
    }

    /// Every step in execution order.
    pub fn steps(&self) -> impl Iterator<Item = &LaunchCommand> {
        self.pre
            .iter()
            .chain(std::iter::once(&self.main))
            .chain(self.post.iter())
    }

    /// Serialize as `sh -c '<step> && <step> && ...'`.
    ///
    /// A failing step aborts the rest of the chain.
    pub fn to_shell_line(&self) -> String {
        let chain = self
            .steps()
            .map(LaunchCommand::to_chain_step)
            .collect::<Vec<_>>()
            .join(" && ");
        format!("{} -c {}", CHAIN_SHELL, shell::quote(&chain))
    }

    fn map_main(self, f: impl FnOnce(LaunchCommand) -> LaunchCommand) -> Self {
        Self {
            pre: self.pre,
            main: f(self.main),
            post: self.post,
        }
    }
}

/// What the resolver returns: one command, or a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LaunchPlan {
    Single(LaunchCommand),
    Multi(MultiLaunchCommand),
}

impl LaunchPlan {
    /// The command that actually runs the item.
    pub fn main(&self) -> &LaunchCommand {
        match self {
            LaunchPlan::Single(cmd) => cmd,
            LaunchPlan::Multi(multi) => multi.main(),
        }
    }

    pub fn exe(&self) -> &str {
        self.main().exe()
    }

    pub fn args(&self) -> &[String] {
        self.main().args()
    }

    pub fn env(&self) -> &EnvOverlay {
        self.main().env()
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, LaunchPlan::Multi(_))
    }

    pub fn wrap(self, outer_exe: impl Into<String>) -> Self {
        match self {
            LaunchPlan::Single(cmd) => LaunchPlan::Single(cmd.wrap(outer_exe)),
            LaunchPlan::Multi(multi) => LaunchPlan::Multi(multi.wrap(outer_exe)),
        }
    }

    pub fn wrap_with<I, S>(self, outer_exe: impl Into<String>, outer_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            LaunchPlan::Single(cmd) => LaunchPlan::Single(cmd.wrap_with(outer_exe, outer_args)),
            LaunchPlan::Multi(multi) => LaunchPlan::Multi(multi.wrap_with(outer_exe, outer_args)),
        }
    }

    pub fn set_env_var(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            LaunchPlan::Single(cmd) => LaunchPlan::Single(cmd.set_env_var(key, value)),
            LaunchPlan::Multi(multi) => LaunchPlan::Multi(multi.set_env_var(key, value)),
        }
    }

    pub fn substitute_path(self, path: &str) -> Self {
        match self {
            LaunchPlan::Single(cmd) => LaunchPlan::Single(cmd.substitute_path(path)),
            LaunchPlan::Multi(multi) => LaunchPlan::Multi(multi.substitute_path(path)),
        }
    }

    pub fn has_placeholder(&self) -> bool {
        match self {
            LaunchPlan::Single(cmd) => cmd.has_placeholder(),
            LaunchPlan::Multi(multi) => multi.has_placeholder(),
        }
    }

    pub fn prepend_command(self, pre: LaunchCommand) -> Self {
        match self {
            LaunchPlan::Single(cmd) => LaunchPlan::Multi(cmd.prepend_command(pre)),
            LaunchPlan::Multi(multi) => LaunchPlan::Multi(multi.prepend_command(pre)),
        }
    }

    pub fn append_command(self, post: LaunchCommand) -> Self {
        match self {
            LaunchPlan::Single(cmd) => LaunchPlan::Multi(cmd.append_command(post)),
            LaunchPlan::Multi(multi) => LaunchPlan::Multi(multi.append_command(post)),
        }
    }

    pub fn to_shell_line(&self) -> String {
        match self {
            LaunchPlan::Single(cmd) => cmd.to_shell_line(),
            LaunchPlan::Multi(multi) => multi.to_shell_line(),
        }
    }
}

impl From<LaunchCommand> for LaunchPlan {
    fn from(cmd: LaunchCommand) -> Self {
        LaunchPlan::Single(cmd)
    }
}

impl From<MultiLaunchCommand> for LaunchPlan {
    fn from(multi: MultiLaunchCommand) -> Self {
        LaunchPlan::Multi(multi)
    }
}
