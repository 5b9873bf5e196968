//! Scripts command implementation
//!
//! Shows the discovered-file set exactly as the next hook firing would see it.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::{OUTPUT_FORMATS, RuntimeContext};
use crate::error::Result;

/// Show the scripts discovered in the search paths
#[derive(Debug, Args)]
pub struct ScriptsCommand {
    /// Output format (simple, json)
    #[arg(short, long, default_value = "simple", value_parser = OUTPUT_FORMATS)]
    pub format: String,
}

impl Command for ScriptsCommand {
    type Output = usize;

    fn execute(&self, context: &RuntimeContext) -> Result<usize> {
        let options = context.options();
        let scripts = context
            .dispatcher
            .discover()
            .context("Failed to walk search paths")?;

        match self.format.as_str() {
            "json" => {
                let json = serde_json::json!({
                    "paths": options.paths,
                    "extension": options.extension,
                    "scripts": scripts.as_slice(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            _ => {
                if scripts.is_empty() {
                    println!(
                        "{}",
                        format!("No .{} scripts found.", options.extension).yellow()
                    );
                } else {
                    for script in &scripts {
                        println!("{}", script.display());
                    }
                    println!(
                        "\n{} scripts found",
                        scripts.len().to_string().green()
                    );
                }
            }
        }

        Ok(scripts.len())
    }
}
