//! Common utilities and types shared across CLI commands

use anyhow::{Context, Result};
use hookscript_config::PluginOptions;
use hookscript_engine::HookDispatcher;
use std::path::{Path, PathBuf};

/// Output formats accepted by `--format`
pub const OUTPUT_FORMATS: [&str; 2] = ["simple", "json"];

/// State shared by every command of one CLI invocation
#[derive(Debug)]
pub struct RuntimeContext {
    /// Options file the dispatcher was loaded from
    pub config_path: PathBuf,
    /// Dispatcher built from the options file
    pub dispatcher: HookDispatcher,
}

impl RuntimeContext {
    /// Load the options file and build the dispatcher
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// options do not validate.
    pub fn load(config_path: &Path) -> Result<Self> {
        let options = PluginOptions::load(config_path).with_context(|| {
            format!("Failed to load options from {}", config_path.display())
        })?;

        tracing::debug!(
            config = %config_path.display(),
            paths = ?options.paths,
            extension = %options.extension,
            "Options loaded"
        );

        let dispatcher =
            HookDispatcher::new(options).context("Failed to configure hook dispatcher")?;

        Ok(Self {
            config_path: config_path.to_path_buf(),
            dispatcher,
        })
    }

    #[must_use]
    pub fn options(&self) -> &PluginOptions {
        self.dispatcher.options()
    }
}
