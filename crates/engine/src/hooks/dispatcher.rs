//! Hook dispatch
//!
//! The dispatcher owns the validated options and the captured build
//! configuration. Each firing re-walks the search roots, then resolves and
//! runs the hook's commands one after another. A failing command is reported
//! and never stops the commands after it.

use super::args::HookArg;
use super::executor::CommandLine;
use super::loader::{DiscoveredScripts, ScriptLoader};
use hookscript_config::{CONFIG_RESOLVED, CommandSpec, HookName, PluginOptions};
use hookscript_core::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::OnceLock;

/// Environment variable naming the hook being fired
pub const HOOK_ENV: &str = "HOOKSCRIPT_HOOK";

/// Environment variable listing the search roots, joined with the platform
/// path separator
pub const ROOTS_ENV: &str = "HOOKSCRIPT_ROOTS";

/// Runs the commands registered for lifecycle hooks
#[derive(Debug)]
pub struct HookDispatcher {
    options: PluginOptions,
    loader: ScriptLoader,
    resolved_config: OnceLock<Value>,
}

impl HookDispatcher {
    /// Create a dispatcher from validated options
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the options do not validate.
    pub fn new(options: PluginOptions) -> Result<Self> {
        options.validate()?;

        for name in options.unknown_hooks() {
            tracing::warn!(
                hook = %name,
                "Hook is not a well-known lifecycle hook (typo?); it only runs if the host fires it"
            );
        }

        tracing::debug!(
            hooks = options.hooks.len(),
            commands = options.total_commands(),
            "Hook dispatcher configured"
        );

        Ok(Self {
            loader: ScriptLoader::from_options(&options),
            options,
            resolved_config: OnceLock::new(),
        })
    }

    /// Create a dispatcher from options supplied by the host as a value
    pub fn from_value(value: Value) -> Result<Self> {
        Self::new(PluginOptions::from_value(value)?)
    }

    #[must_use]
    pub fn options(&self) -> &PluginOptions {
        &self.options
    }

    /// Registered hook names, in declaration order
    pub fn hooks(&self) -> impl Iterator<Item = &HookName> {
        self.options.hooks.keys()
    }

    #[must_use]
    pub fn is_registered(&self, hook: &str) -> bool {
        self.options.hooks.contains_key(hook)
    }

    /// The captured build configuration, once `config_resolved` has run
    #[must_use]
    pub fn resolved_config(&self) -> Option<&Value> {
        self.resolved_config.get()
    }

    /// Walk the search roots now
    pub fn discover(&self) -> Result<DiscoveredScripts> {
        self.loader.walk()
    }

    /// Capture the resolved build configuration
    ///
    /// Only the first call is honoured; later calls log a warning and return
    /// an empty report. On the first call, commands registered under
    /// `configResolved` run with the configuration as their hook argument.
    ///
    /// # Errors
    ///
    /// Returns a walk error if `configResolved` commands are registered and the
    /// search roots cannot be read.
    pub fn config_resolved(&self, config: Value) -> Result<HookReport> {
        if self.resolved_config.set(config).is_err() {
            tracing::warn!("Build configuration already captured; ignoring the new one");
            return Ok(HookReport::empty(CONFIG_RESOLVED));
        }

        tracing::debug!("Build configuration captured");

        // The captured config is appended to every invocation, so no hook
        // arguments are needed here.
        self.fire(CONFIG_RESOLVED, &[])
    }

    /// Fire a hook
    ///
    /// Extra arguments passed to each command are `args` followed by the
    /// captured build configuration, when there is one.
    ///
    /// # Errors
    ///
    /// Returns a walk error if a search root cannot be read. Command failures
    /// are not errors; they are recorded in the report.
    #[tracing::instrument(skip(self, args), fields(args = args.len()))]
    pub fn fire(&self, hook: &str, args: &[HookArg]) -> Result<HookReport> {
        let Some(commands) = self.options.commands(hook) else {
            tracing::debug!("No commands registered");
            return Ok(HookReport::empty(hook));
        };

        let scripts = self.loader.walk()?;

        let mut extra = args.to_vec();
        if let Some(config) = self.resolved_config.get() {
            extra.push(HookArg::Structured(config.clone()));
        }

        let env = self.command_env(hook);

        let outcomes = commands
            .iter()
            .map(|spec| invoke(spec, &scripts, &extra, &env))
            .collect();

        let report = HookReport {
            hook: hook.to_string(),
            outcomes,
            aborted: None,
        };

        tracing::debug!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Hook finished"
        );

        Ok(report)
    }

    /// Fire a hook without ever failing
    ///
    /// A walk error is logged and recorded in [`HookReport::aborted`], so the
    /// host pipeline can always continue.
    pub fn handle(&self, hook: &str, args: &[HookArg]) -> HookReport {
        match self.fire(hook, args) {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(hook, error = %e, "Hook aborted");
                HookReport {
                    hook: hook.to_string(),
                    outcomes: Vec::new(),
                    aborted: Some(e),
                }
            }
        }
    }

    fn command_env(&self, hook: &str) -> IndexMap<String, String> {
        let mut env = IndexMap::new();
        env.insert(HOOK_ENV.to_string(), hook.to_string());

        match std::env::join_paths(&self.options.paths) {
            Ok(roots) => {
                env.insert(ROOTS_ENV.to_string(), roots.to_string_lossy().into_owned());
            }
            Err(e) => tracing::warn!("Cannot export {ROOTS_ENV}: {e}"),
        }

        env
    }
}

fn invoke(
    spec: &CommandSpec,
    scripts: &DiscoveredScripts,
    extra: &[HookArg],
    env: &IndexMap<String, String>,
) -> CommandOutcome {
    let resolved = scripts.resolve(&spec.command);
    match resolved {
        Some(path) => tracing::debug!("Resolved '{}' to {}", spec.command, path.display()),
        None => tracing::debug!("'{}' matches no discovered script", spec.command),
    }

    let line = match CommandLine::build(spec, resolved, extra) {
        Ok(line) => line,
        Err(Error::Resolution { command }) => {
            tracing::warn!("Skipping '{command}': no discovered script matches it");
            return CommandOutcome::Unresolved { command };
        }
        Err(error) => {
            tracing::error!(error = %error, "Invalid command '{}'", spec.command);
            return CommandOutcome::Failed {
                command: spec.command.clone(),
                line: None,
                error,
            };
        }
    };

    match line.run(env) {
        Ok(output) => {
            tracing::info!("Command succeeded: {line}");
            let stdout = output.stdout.trim_end();
            if !stdout.is_empty() {
                tracing::info!("{stdout}");
            }
            CommandOutcome::Succeeded {
                command: spec.command.clone(),
                line: line.to_string(),
                stdout: output.stdout,
            }
        }
        Err(error) => {
            tracing::error!("{error}");
            if let Some(stderr) = error.stderr() {
                tracing::error!("{}", stderr.trim_end());
            }
            CommandOutcome::Failed {
                command: spec.command.clone(),
                line: Some(line.to_string()),
                error,
            }
        }
    }
}

/// What happened to one command of a firing
#[derive(Debug)]
pub enum CommandOutcome {
    /// The command ran and exited successfully
    Succeeded {
        command: String,
        line: String,
        stdout: String,
    },
    /// The command could not be built, started, or exited unsuccessfully
    Failed {
        command: String,
        /// Absent when the command line could not be built
        line: Option<String>,
        error: Error,
    },
    /// Executor mode, and no discovered script matched; nothing was spawned
    Unresolved { command: String },
}

impl CommandOutcome {
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Self::Succeeded { command, .. }
            | Self::Failed { command, .. }
            | Self::Unresolved { command } => command,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

/// Result of firing one hook
#[derive(Debug)]
pub struct HookReport {
    pub hook: String,
    /// One entry per registered command, in declaration order
    pub outcomes: Vec<CommandOutcome>,
    /// Set when the walk failed and no command ran
    pub aborted: Option<Error>,
}

impl HookReport {
    fn empty(hook: &str) -> Self {
        Self {
            hook: hook.to_string(),
            outcomes: Vec::new(),
            aborted: None,
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Failed and unresolved commands
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.aborted.is_none() && self.failed() == 0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
