//! Command construction and execution
//!
//! A [`CommandLine`] is built from a [`CommandSpec`], the script resolved for
//! it (if any) and the serialized hook arguments. It runs in one of two ways:
//!
//! - **argv** (default): the program is spawned directly with each token as a
//!   separate argument. Nothing is interpreted by a shell, so arguments with
//!   spaces, quotes or metacharacters arrive intact.
//! - **shell** (`shell = true`): the tokens are joined with single spaces,
//!   without escaping, and handed to `sh -c` (`cmd /C` on Windows). Pipes,
//!   globbing and builtins work, and so does injection through arguments.

use super::args::HookArg;
use hookscript_config::CommandSpec;
use hookscript_core::platform::CURRENT_PLATFORM;
use hookscript_core::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;

/// A fully built command, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
    shell: bool,
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandLine {
    /// Build the command line for a configured command
    ///
    /// - Direct mode (no executor): `<command> <args...> <extra...>`. The raw
    ///   command is used even when a discovered script matches it.
    /// - Executor mode: `<executor> <resolved> <args...> <extra...>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolution`] in executor mode when `resolved` is
    /// `None`, and [`Error::CommandParse`] when the command or executor has
    /// unbalanced quotes or is empty.
    pub fn build(spec: &CommandSpec, resolved: Option<&Path>, extra: &[HookArg]) -> Result<Self> {
        let mut tokens = Vec::with_capacity(spec.args.len() + extra.len() + 2);

        match &spec.executor {
            Some(executor) => {
                let script = resolved.ok_or_else(|| Error::Resolution {
                    command: spec.command.clone(),
                })?;
                tokens.extend(split_words(executor, spec.shell)?);
                tokens.push(script.to_string_lossy().into_owned());
            }
            None => tokens.extend(split_words(&spec.command, spec.shell)?),
        }

        tokens.extend(spec.args.iter().cloned());
        tokens.extend(extra.iter().map(HookArg::encode));

        Ok(Self {
            tokens,
            shell: spec.shell,
        })
    }

    /// Program to spawn in argv mode
    #[must_use]
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    #[must_use]
    pub fn is_shell(&self) -> bool {
        self.shell
    }

    /// Run the command and wait for it to exit
    ///
    /// `env` is added on top of the inherited environment. Standard output
    /// and standard error are captured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Subprocess`] if the command cannot be spawned or
    /// exits unsuccessfully; the error carries the captured standard error.
    #[tracing::instrument(skip(self, env), fields(line = %self, shell = self.shell))]
    pub fn run(&self, env: &IndexMap<String, String>) -> Result<CommandOutput> {
        let line = self.to_string();

        let mut cmd_builder = if self.shell {
            let (shell, flag) = CURRENT_PLATFORM.shell();
            duct::cmd(shell, [flag, line.as_str()])
        } else {
            duct::cmd(self.program(), &self.tokens[1..])
        }
        .stdout_capture()
        .stderr_capture()
        .unchecked();

        for (key, value) in env {
            cmd_builder = cmd_builder.env(key, value);
        }

        tracing::debug!("Executing: {line}");

        let output = cmd_builder.run().map_err(|e| Error::Subprocess {
            line: line.clone(),
            reason: format!("failed to start: {e}"),
            stderr: String::new(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(CommandOutput { stdout, stderr })
        } else {
            let reason = match output.status.code() {
                Some(code) => format!("exited with status {code}"),
                None => "terminated by signal".to_string(),
            };
            Err(Error::Subprocess {
                line,
                reason,
                stderr,
            })
        }
    }
}

impl fmt::Display for CommandLine {
    /// Tokens joined by single spaces, exactly what shell mode executes
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// Split a command or executor string into tokens
///
/// In shell mode the string is kept whole; the shell does the splitting.
fn split_words(input: &str, shell: bool) -> Result<Vec<String>> {
    if shell {
        return Ok(vec![input.to_string()]);
    }

    // Handles: python3 -u → ["python3", "-u"], "my tool" → ["my tool"]
    let words = shell_words::split(input).map_err(|e| Error::CommandParse {
        input: input.to_string(),
        message: e.to_string(),
    })?;

    if words.first().is_none_or(String::is_empty) {
        return Err(Error::CommandParse {
            input: input.to_string(),
            message: "empty command".to_string(),
        });
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn no_env() -> IndexMap<String, String> {
        IndexMap::new()
    }

    #[test]
    fn test_build_direct_mode() {
        let spec = CommandSpec::new("echo").with_args(["hi"]);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        assert_eq!(line.to_string(), "echo hi");
        assert_eq!(line.program(), "echo");
        assert!(!line.is_shell());
    }

    #[test]
    fn test_build_direct_mode_ignores_resolved_path() {
        let spec = CommandSpec::new("build.py").with_args(["--fast"]);
        let resolved = PathBuf::from("/scripts/build.py");
        let line = CommandLine::build(&spec, Some(&resolved), &[]).unwrap();

        assert_eq!(line.to_string(), "build.py --fast");
    }

    #[test]
    fn test_build_direct_mode_splits_command() {
        let spec = CommandSpec::new("npm run build").with_args(["--", "--watch"]);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        assert_eq!(line.tokens(), &["npm", "run", "build", "--", "--watch"]);
    }

    #[test]
    fn test_build_executor_mode() {
        let spec = CommandSpec::new("gen.py")
            .with_executor("python3 -u")
            .with_args(["--out", "dist"]);
        let resolved = PathBuf::from("/repo/scripts/gen.py");
        let line = CommandLine::build(&spec, Some(&resolved), &[]).unwrap();

        assert_eq!(
            line.tokens(),
            &["python3", "-u", "/repo/scripts/gen.py", "--out", "dist"]
        );
        assert_eq!(line.to_string(), "python3 -u /repo/scripts/gen.py --out dist");
    }

    #[test]
    fn test_build_executor_mode_unresolved() {
        let spec = CommandSpec::new("missing.py").with_executor("python3");
        let err = CommandLine::build(&spec, None, &[]).unwrap_err();

        match err {
            Error::Resolution { command } => assert_eq!(command, "missing.py"),
            other => panic!("expected resolution error, got {other:?}"),
        }
    }

    #[test]
    fn test_build_appends_extra_args_last() {
        let spec = CommandSpec::new("echo").with_args(["a"]);
        let extra = [
            HookArg::from("chunk.js"),
            HookArg::from(json!({ "mode": "production" })),
        ];
        let line = CommandLine::build(&spec, None, &extra).unwrap();

        assert_eq!(
            line.tokens(),
            &["echo", "a", "chunk.js", r#"{"mode":"production"}"#]
        );
    }

    #[test]
    fn test_build_shell_mode_keeps_command_whole() {
        let spec = CommandSpec::new("ls *.py | wc -l").with_shell(true);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        assert!(line.is_shell());
        assert_eq!(line.tokens(), &["ls *.py | wc -l"]);
    }

    #[test]
    fn test_build_unbalanced_quotes() {
        let spec = CommandSpec::new("echo \"oops");
        let err = CommandLine::build(&spec, None, &[]).unwrap_err();

        assert!(matches!(err, Error::CommandParse { .. }));
    }

    #[test]
    fn test_build_empty_after_split() {
        let spec = CommandSpec::new("''");
        assert!(matches!(
            CommandLine::build(&spec, None, &[]).unwrap_err(),
            Error::CommandParse { .. }
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_run_echo_captures_stdout() {
        let spec = CommandSpec::new("echo").with_args(["hi"]);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        let output = line.run(&no_env()).unwrap();
        assert_eq!(output.stdout, "hi\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_run_argv_preserves_spaces_and_metacharacters() {
        let spec = CommandSpec::new("printf").with_args(["%s|", "a b; echo injected"]);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        let output = line.run(&no_env()).unwrap();
        assert_eq!(output.stdout, "a b; echo injected|");
    }

    #[test]
    #[cfg(unix)]
    fn test_run_shell_mode_uses_shell_features() {
        let spec = CommandSpec::new("echo hi | tr a-z A-Z").with_shell(true);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        let output = line.run(&no_env()).unwrap();
        assert_eq!(output.stdout, "HI\n");
    }

    #[test]
    #[cfg(unix)]
    fn test_run_nonzero_exit_captures_stderr() {
        let spec = CommandSpec::new("echo broken >&2; exit 3").with_shell(true);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        let err = line.run(&no_env()).unwrap_err();
        match &err {
            Error::Subprocess { reason, stderr, .. } => {
                assert_eq!(reason, "exited with status 3");
                assert_eq!(stderr, "broken\n");
            }
            other => panic!("expected subprocess error, got {other:?}"),
        }
        assert_eq!(err.stderr(), Some("broken\n"));
    }

    #[test]
    fn test_run_spawn_failure() {
        let spec = CommandSpec::new("hookscript-definitely-not-a-real-program");
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        let err = line.run(&no_env()).unwrap_err();
        match err {
            Error::Subprocess { reason, line, .. } => {
                assert!(reason.starts_with("failed to start"));
                assert_eq!(line, "hookscript-definitely-not-a-real-program");
            }
            other => panic!("expected subprocess error, got {other:?}"),
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_run_passes_env() {
        let spec = CommandSpec::new("printf %s \"$HOOKSCRIPT_TEST_VAR\"").with_shell(true);
        let line = CommandLine::build(&spec, None, &[]).unwrap();

        let mut env = IndexMap::new();
        env.insert("HOOKSCRIPT_TEST_VAR".to_string(), "value".to_string());

        let output = line.run(&env).unwrap();
        assert_eq!(output.stdout, "value");
    }
}
