//! Hookscript CLI library
//!
//! This library contains the CLI logic for hookscript, making it reusable
//! for testing and integration with other tools.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hookscript_core::platform::CURRENT_PLATFORM;
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;

/// Default options file, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "hookscript.toml";

/// Hookscript - run scripts at build lifecycle hooks
#[derive(Parser)]
#[command(name = "hookscript")]
#[command(about = "Run scripts at build lifecycle hooks")]
#[command(version)]
#[command(long_about = "Run scripts at build lifecycle hooks

Scripts are discovered by walking the configured search paths for files with
the target extension. Each hook lists the commands to run when it fires, in
order. A failing command is reported and the next one still runs.

Example hookscript.toml:
  paths = [\"./scripts\"]
  extension = \"py\"

  [[buildStart]]
  command = \"prepare.py\"
  executor = \"python3\"
  args = [\"--clean\"]")]
pub struct Cli {
    /// Path to the options file (TOML, or JSON with a .json extension)
    #[arg(
        long,
        env = "HOOKSCRIPT_CONFIG",
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "HOOKSCRIPT_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for hookscript CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Fire a hook and run its commands
    Run(cmd::run::RunCommand),

    /// List configured hooks and their commands
    List(cmd::list::ListCommand),

    /// Show the scripts discovered in the search paths
    Scripts(cmd::scripts::ScriptsCommand),
}

/// Main entry point for the CLI application
pub fn run(cli: Cli) -> Result<()> {
    hookscript_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    let platform = &*CURRENT_PLATFORM;
    tracing::debug!(os = platform.os, arch = platform.arch, "Starting hookscript");

    let context = RuntimeContext::load(&cli.config)?;

    execute_command(cli.command, &context)
}

fn execute_command(command: Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Run(cmd) => cmd.execute(context)?,
        Commands::List(cmd) => cmd.execute(context)?,
        Commands::Scripts(cmd) => {
            cmd.execute(context)?;
        }
    }
    Ok(())
}
