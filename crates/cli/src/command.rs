//! Command trait for hookscript CLI
//!
//! This module defines the `Command` trait that all hookscript commands
//! implement, giving them a uniform way to receive the loaded dispatcher.

use crate::common::RuntimeContext;
use crate::error::Result;

/// Trait for all hookscript commands
///
/// # Example
///
/// ```rust,ignore
/// use crate::command::Command;
/// use crate::common::RuntimeContext;
/// use crate::error::Result;
/// use clap::Args;
///
/// #[derive(Debug, Args)]
/// pub struct MyCommand {
///     #[arg(short, long)]
///     pub some_flag: bool,
/// }
///
/// impl Command for MyCommand {
///     type Output = ();
///
///     fn execute(&self, context: &RuntimeContext) -> Result<()> {
///         // Access options: context.options()
///         // Fire hooks: context.dispatcher.handle(...)
///         Ok(())
///     }
/// }
/// ```
pub trait Command {
    /// The type returned by this command
    type Output;

    /// Execute the command with the given runtime context
    ///
    /// # Errors
    ///
    /// Returns a `CommandError` if the command fails to execute.
    fn execute(&self, context: &RuntimeContext) -> Result<Self::Output>;
}
