//! Configuration management for hookscript
//!
//! This crate handles:
//! - Plugin options loading and validation (TOML, JSON, or a host-supplied value)
//! - Lifecycle hook names
//! - Logging initialization

pub mod hooks;
pub mod logging;
pub mod options;

// Re-export error types from core
pub use hookscript_core::{Error, Result};

// Re-export main types
pub use hooks::{CONFIG_RESOLVED, HookName, WELL_KNOWN_HOOKS};
pub use options::{CommandSpec, DEFAULT_EXTENSION, DEFAULT_SEARCH_ROOT, PluginOptions};
