//! # Hookscript Engine
//!
//! Runs external scripts at the lifecycle hooks of a build pipeline.
//!
//! - **Discovery**: recursive walk of the search roots for the target extension
//! - **Resolution**: suffix match of a logical command name against what was found
//! - **Invocation**: argv execution by default, shell-string execution on request
//! - **Dispatch**: per-hook command lists with a once-captured build configuration

pub mod hooks;

// Re-export error types from core
pub use hookscript_core::{Error, Result};

// Re-export commonly used types
pub use hooks::{CommandOutcome, HookArg, HookDispatcher, HookReport, ScriptLoader};
