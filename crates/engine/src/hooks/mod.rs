//! Hook system for build-pipeline scripts
//!
//! ## Execution Model
//!
//! - Every firing walks the search roots again; nothing is cached
//! - Commands of one hook run sequentially, in declaration order
//! - A failing command is reported and the next one still runs
//! - The resolved build configuration is captured once and appended to every
//!   invocation after it
//!
//! ## Module Organization
//!
//! - `args`: hook arguments and their command-line encoding
//! - `loader`: script discovery and command resolution
//! - `executor`: command-line construction and subprocess execution
//! - `dispatcher`: hook registration, firing and reporting

pub mod args;
pub mod dispatcher;
pub mod executor;
pub mod loader;

// Re-export main types for convenience
pub use args::HookArg;
pub use dispatcher::{CommandOutcome, HOOK_ENV, HookDispatcher, HookReport, ROOTS_ENV};
pub use executor::{CommandLine, CommandOutput};
pub use loader::{DiscoveredScripts, ScriptLoader, resolve};
