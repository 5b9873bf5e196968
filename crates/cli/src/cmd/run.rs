//! Run command implementation
//!
//! Fire one hook and print a status line per command.

use clap::Args;
use hookscript_config::CONFIG_RESOLVED;
use hookscript_engine::{CommandOutcome, HookArg, HookReport};
use owo_colors::OwoColorize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};

/// Fire a hook and run its commands
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Hook to fire (e.g. buildStart, renderChunk)
    #[arg(value_name = "HOOK")]
    pub hook: String,

    /// Hook arguments; JSON objects and arrays are forwarded as structured values
    ///
    /// Put arguments starting with '-' after '--'.
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// JSON file with the resolved build configuration, captured before firing
    #[arg(long, value_name = "FILE")]
    pub build_config: Option<PathBuf>,

    /// Exit with an error if the hook is aborted or any command fails
    #[arg(long)]
    pub strict: bool,
}

impl Command for RunCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let dispatcher = &context.dispatcher;
        let args: Vec<HookArg> = self.args.iter().map(|a| HookArg::parse(a)).collect();

        if self.hook == CONFIG_RESOLVED {
            let config = match (&self.build_config, args.first()) {
                (Some(path), _) => read_build_config(path)?,
                (None, Some(HookArg::Structured(value))) => value.clone(),
                (None, _) => return Err(CommandError::MissingBuildConfig),
            };
            return finish(capture(context, config), self.strict);
        }

        if let Some(path) = &self.build_config {
            let report = capture(context, read_build_config(path)?);
            if !report.is_empty() || report.aborted.is_some() {
                finish(report, self.strict)?;
            }
        }

        if !dispatcher.is_registered(&self.hook) {
            tracing::warn!("No commands registered for hook '{}'", self.hook);
        }

        finish(dispatcher.handle(&self.hook, &args), self.strict)
    }
}

/// Capture the build configuration, never failing
fn capture(context: &RuntimeContext, config: Value) -> HookReport {
    match context.dispatcher.config_resolved(config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Hook aborted");
            HookReport {
                hook: CONFIG_RESOLVED.to_string(),
                outcomes: Vec::new(),
                aborted: Some(e),
            }
        }
    }
}

fn read_build_config(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| CommandError::build_config(path, e))?;
    serde_json::from_str(&content).map_err(|e| CommandError::build_config(path, e))
}

/// Print the report, then apply the --strict policy
fn finish(report: HookReport, strict: bool) -> Result<()> {
    print_report(&report);

    if !strict {
        return Ok(());
    }

    if let Some(source) = report.aborted {
        return Err(CommandError::HookAborted {
            hook: report.hook,
            source,
        });
    }

    let failed = report.failed();
    if failed > 0 {
        return Err(CommandError::HookFailed {
            hook: report.hook,
            failed,
            total: report.outcomes.len(),
        });
    }

    Ok(())
}

fn print_report(report: &HookReport) {
    println!("{} {}", "Hook".bold(), report.hook.cyan());

    if let Some(e) = &report.aborted {
        println!("  {} {}", "✗".red(), format!("aborted: {e}").red());
        return;
    }

    if report.is_empty() {
        println!("  {}", "No commands registered".dimmed());
        return;
    }

    for outcome in &report.outcomes {
        match outcome {
            CommandOutcome::Succeeded { command, line, .. } => {
                println!("  {} {} {}", "✓".green(), command.green(), line.dimmed());
            }
            CommandOutcome::Failed { command, error, .. } => {
                println!("  {} {} {}", "✗".red(), command.red(), error);
            }
            CommandOutcome::Unresolved { command } => {
                println!(
                    "  {} {} {}",
                    "?".yellow(),
                    command.yellow(),
                    "no discovered script matches".dimmed()
                );
            }
        }
    }

    println!(
        "  {} succeeded, {} failed",
        report.succeeded().green(),
        report.failed().red()
    );
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use tempfile::TempDir;

    fn context(dir: &Path, toml: &str) -> RuntimeContext {
        let config = dir.join("hookscript.toml");
        fs::write(&config, toml).unwrap();
        RuntimeContext::load(&config).unwrap()
    }

    fn run(hook: &str, strict: bool) -> RunCommand {
        RunCommand {
            hook: hook.to_string(),
            args: Vec::new(),
            build_config: None,
            strict,
        }
    }

    const FAILING: &str = r#"
paths = ["."]

[[buildEnd]]
command = "false"

[[buildEnd]]
command = "true"
"#;

    #[test]
    #[cfg(unix)]
    fn test_failures_are_not_errors_by_default() {
        let temp = TempDir::new().unwrap();
        let context = context(temp.path(), FAILING);

        assert!(run("buildEnd", false).execute(&context).is_ok());
    }

    #[test]
    #[cfg(unix)]
    fn test_strict_reports_failures() {
        let temp = TempDir::new().unwrap();
        let context = context(temp.path(), FAILING);

        let err = run("buildEnd", true).execute(&context).unwrap_err();
        match err {
            CommandError::HookFailed { failed, total, .. } => {
                assert_eq!(failed, 1);
                assert_eq!(total, 2);
            }
            other => panic!("expected HookFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_strict_reports_aborted_walk() {
        let temp = TempDir::new().unwrap();
        let context = context(
            temp.path(),
            "paths = [\"missing\"]\n\n[[buildStart]]\ncommand = \"true\"\n",
        );

        let err = run("buildStart", true).execute(&context).unwrap_err();
        assert!(matches!(err, CommandError::HookAborted { .. }));
    }

    #[test]
    fn test_unregistered_hook_is_ok_even_when_strict() {
        let temp = TempDir::new().unwrap();
        let context = context(temp.path(), FAILING);

        assert!(run("closeBundle", true).execute(&context).is_ok());
    }

    #[test]
    fn test_config_resolved_needs_a_config() {
        let temp = TempDir::new().unwrap();
        let context = context(temp.path(), FAILING);

        let err = run(CONFIG_RESOLVED, false).execute(&context).unwrap_err();
        assert!(matches!(err, CommandError::MissingBuildConfig));
    }

    #[test]
    fn test_config_resolved_from_json_argument() {
        let temp = TempDir::new().unwrap();
        let context = context(temp.path(), FAILING);

        let mut cmd = run(CONFIG_RESOLVED, true);
        cmd.args = vec![r#"{"mode":"test"}"#.to_string()];
        cmd.execute(&context).unwrap();

        assert_eq!(
            context.dispatcher.resolved_config(),
            Some(&serde_json::json!({ "mode": "test" }))
        );
    }

    #[test]
    fn test_build_config_is_captured_before_firing() {
        let temp = TempDir::new().unwrap();
        let context = context(temp.path(), "paths = [\".\"]\n");
        let build_config = temp.path().join("resolved.json");
        fs::write(&build_config, r#"{"root": "/app"}"#).unwrap();

        let mut cmd = run("buildStart", true);
        cmd.build_config = Some(build_config);
        cmd.execute(&context).unwrap();

        assert_eq!(
            context.dispatcher.resolved_config(),
            Some(&serde_json::json!({ "root": "/app" }))
        );
    }

    #[test]
    fn test_invalid_build_config() {
        let temp = TempDir::new().unwrap();
        let context = context(temp.path(), "paths = [\".\"]\n");
        let build_config = temp.path().join("resolved.json");
        fs::write(&build_config, "{ not json").unwrap();

        let mut cmd = run("buildStart", false);
        cmd.build_config = Some(build_config);

        let err = cmd.execute(&context).unwrap_err();
        assert!(matches!(err, CommandError::BuildConfig { .. }));
    }
}
