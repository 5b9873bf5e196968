//! List command implementation

use clap::Args;
use hookscript_config::CommandSpec;
use owo_colors::OwoColorize;
use serde_json::json;

use crate::command::Command;
use crate::common::{OUTPUT_FORMATS, RuntimeContext};
use crate::error::Result;

/// List configured hooks and their commands
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format (simple, json)
    #[arg(short, long, default_value = "simple", value_parser = OUTPUT_FORMATS)]
    pub format: String,
}

impl Command for ListCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let options = context.options();

        match self.format.as_str() {
            "json" => {
                let hooks: Vec<_> = options
                    .hooks
                    .iter()
                    .map(|(name, commands)| {
                        json!({
                            "name": name,
                            "well_known": name.is_well_known(),
                            "commands": commands.iter().map(command_json).collect::<Vec<_>>(),
                        })
                    })
                    .collect();

                let json = json!({
                    "config": context.config_path,
                    "paths": options.paths,
                    "extension": options.extension,
                    "hooks": hooks,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            _ => {
                println!("Options file: {}", context.config_path.display().cyan());
                let paths: Vec<String> = options
                    .paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                println!("Search paths: {}", paths.join(", ").cyan());
                println!("Extension: .{}", options.extension.cyan());
                println!();

                if options.hooks.is_empty() {
                    println!("{}", "No hooks configured.".yellow());
                    return Ok(());
                }

                for (name, commands) in &options.hooks {
                    if name.is_well_known() {
                        println!("{} ({} commands)", name.bold(), commands.len());
                    } else {
                        println!(
                            "{} ({} commands) {}",
                            name.bold(),
                            commands.len(),
                            "[not a well-known hook]".yellow()
                        );
                    }

                    for spec in commands {
                        print_command(spec);
                    }
                }
            }
        }

        Ok(())
    }
}

fn print_command(spec: &CommandSpec) {
    let mut line = format!("  • {}", spec.command.green());
    if !spec.args.is_empty() {
        line.push_str(&format!(" {}", spec.args.join(" ").dimmed()));
    }
    if let Some(executor) = &spec.executor {
        line.push_str(&format!(" via {}", executor.cyan()));
    }
    if spec.shell {
        line.push_str(&format!(" {}", "[shell]".dimmed()));
    }
    if let Some(program) = program(spec)
        && !is_available(&program)
    {
        line.push_str(&format!(" {}", format!("[{program} not found on PATH]").red()));
    }
    println!("{line}");
}

fn command_json(spec: &CommandSpec) -> serde_json::Value {
    let program = program(spec);
    json!({
        "command": spec.command,
        "args": spec.args,
        "executor": spec.executor,
        "shell": spec.shell,
        "program": program,
        "available": program.as_deref().map(is_available),
    })
}

/// Program that will be looked up on PATH: the executor's first word, or the
/// command's in direct mode
fn program(spec: &CommandSpec) -> Option<String> {
    let source = spec.executor.as_deref().unwrap_or(&spec.command);
    shell_words::split(source).ok()?.into_iter().next()
}

fn is_available(program: &str) -> bool {
    which::which(program).is_ok()
}
