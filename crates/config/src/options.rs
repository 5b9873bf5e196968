//! Plugin options
//!
//! Options arrive as a single object: the reserved `paths` and `extension`
//! keys configure script discovery, every other key names a lifecycle hook and
//! maps to the ordered list of commands to run when it fires.
//!
//! ```toml
//! paths = ["./scripts", "~/shared/scripts"]
//! extension = "py"
//!
//! [[buildStart]]
//! command = "codegen.py"
//! executor = "python3 -u"
//! args = ["--out", "src/generated"]
//!
//! [[closeBundle]]
//! command = "echo"
//! args = ["bundle written"]
//! ```

use crate::hooks::HookName;
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Reserved key holding the search roots
pub const PATHS_KEY: &str = "paths";

/// Reserved key holding the target script extension
pub const EXTENSION_KEY: &str = "extension";

/// Search root used when `paths` is not given
pub const DEFAULT_SEARCH_ROOT: &str = "./";

/// Script extension used when `extension` is not given
pub const DEFAULT_EXTENSION: &str = "py";

/// A configured unit of work for one hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    /// Logical command name, matched as a suffix of discovered script paths
    pub command: String,

    /// Arguments placed after the command, in order
    #[serde(default)]
    pub args: Vec<String>,

    /// Interpreter prefix used to run the resolved script (e.g. `python3 -u`)
    ///
    /// When set, the command must resolve to a discovered script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,

    /// Run the joined command line through the platform shell
    ///
    /// Arguments are not escaped in this mode. Only needed for commands that
    /// rely on shell features such as pipes, globbing or builtins.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shell: bool,
}

impl CommandSpec {
    /// Create a direct-mode command with no arguments
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            executor: None,
            shell: false,
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = Some(executor.into());
        self
    }

    #[must_use]
    pub fn with_shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    /// Check that the command and executor are usable
    pub fn validate(&self, hook: &HookName) -> Result<()> {
        if self.command.trim().is_empty() {
            return Err(Error::config(format!(
                "Hook '{hook}' has a command with an empty 'command' field"
            )));
        }

        if let Some(executor) = &self.executor
            && executor.trim().is_empty()
        {
            return Err(Error::config(format!(
                "Hook '{hook}' command '{}' has an empty 'executor' field",
                self.command
            )));
        }

        Ok(())
    }
}

/// Validated plugin options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginOptions {
    /// Search roots, walked in this order
    pub paths: Vec<PathBuf>,

    /// Target script extension, without the leading dot
    pub extension: String,

    /// Hook name → commands, in declaration order
    pub hooks: IndexMap<HookName, Vec<CommandSpec>>,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            paths: vec![PathBuf::from(DEFAULT_SEARCH_ROOT)],
            extension: DEFAULT_EXTENSION.to_string(),
            hooks: IndexMap::new(),
        }
    }
}

impl PluginOptions {
    /// Options searching the given roots, with no hooks yet
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Register commands for a hook, replacing any previous registration
    pub fn with_hook(mut self, name: &str, commands: Vec<CommandSpec>) -> Result<Self> {
        self.hooks.insert(HookName::new(name)?, commands);
        Ok(self)
    }

    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = normalize_extension(extension);
        self
    }

    /// Parse options from an untyped value supplied by the host
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the value is not an object, if `paths`
    /// is empty or malformed, or if a hook entry is not a list of commands.
    pub fn from_value(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::config(format!(
                    "Plugin options must be an object, got {}",
                    value_kind(&other)
                )));
            }
        };

        let mut options = Self::default();

        for (key, value) in map {
            match key.as_str() {
                PATHS_KEY => {
                    if let Some(paths) = parse_paths(value)? {
                        options.paths = paths;
                    }
                }
                EXTENSION_KEY => options.extension = parse_extension(value)?,
                _ => {
                    let name = HookName::new(key)?;
                    let commands: Vec<CommandSpec> = serde_json::from_value(value)
                        .map_err(|e| {
                            Error::config(format!(
                                "Hook '{name}' must be a list of commands: {e}"
                            ))
                        })?;
                    options.hooks.insert(name, commands);
                }
            }
        }

        options.validate()?;
        Ok(options)
    }

    /// Parse options from TOML
    ///
    /// Relative search roots are kept relative; they are resolved against the
    /// working directory when walked.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse options TOML: {e}")))?;
        let value = serde_json::to_value(table)
            .map_err(|e| Error::config(format!("Unsupported value in options TOML: {e}")))?;
        Self::from_value(value)
    }

    /// Parse options from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse options JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Load options from a `.toml` or `.json` file
    ///
    /// Relative search roots are resolved against the file's directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read options file {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let mut options = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;

        if let Some(parent) = path.parent() {
            options.resolve_relative_paths(parent);
        }

        Ok(options)
    }

    /// Validate the options as a whole
    pub fn validate(&self) -> Result<()> {
        if self.paths.is_empty() {
            return Err(Error::config(format!(
                "At least one search path must be specified in '{PATHS_KEY}'"
            )));
        }

        if self.extension.is_empty() {
            return Err(Error::config(format!(
                "'{EXTENSION_KEY}' cannot be empty"
            )));
        }

        for (name, commands) in &self.hooks {
            for command in commands {
                command.validate(name)?;
            }
        }

        Ok(())
    }

    /// Registered hooks outside the well-known lifecycle, in declaration order
    pub fn unknown_hooks(&self) -> impl Iterator<Item = &HookName> {
        self.hooks.keys().filter(|name| !name.is_well_known())
    }

    /// Commands registered for a hook, if any
    #[must_use]
    pub fn commands(&self, hook: &str) -> Option<&[CommandSpec]> {
        self.hooks.get(hook).map(Vec::as_slice)
    }

    /// Total number of configured commands across all hooks
    #[must_use]
    pub fn total_commands(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }

    fn resolve_relative_paths(&mut self, base_dir: &Path) {
        for path in &mut self.paths {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }
}

/// Strip a leading dot so `.py` and `py` mean the same thing
fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_string()
}

fn parse_extension(value: Value) -> Result<String> {
    match value {
        Value::String(ext) => {
            let ext = normalize_extension(&ext);
            if ext.is_empty() {
                return Err(Error::config(format!("'{EXTENSION_KEY}' cannot be empty")));
            }
            Ok(ext)
        }
        other => Err(Error::config(format!(
            "'{EXTENSION_KEY}' must be a string, got {}",
            value_kind(&other)
        ))),
    }
}

/// `null` means "not given"; an empty list is rejected by validation
fn parse_paths(value: Value) -> Result<Option<Vec<PathBuf>>> {
    let items = match value {
        Value::Null => return Ok(None),
        Value::Array(items) => items,
        other => {
            return Err(Error::config(format!(
                "'{PATHS_KEY}' must be a list of directories, got {}",
                value_kind(&other)
            )));
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::String(path) if !path.trim().is_empty() => Ok(expand_tilde(&path)),
            other => Err(Error::config(format!(
                "'{PATHS_KEY}' entries must be non-empty strings, got {}",
                value_kind(&other)
            ))),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// Expand a leading `~` to the home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = ::dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path == "~"
        && let Some(home) = ::dirs::home_dir()
    {
        return home;
    }

    PathBuf::from(path)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
