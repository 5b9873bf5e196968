//! CLI command implementations
//!
//! This module contains all command implementations for the hookscript CLI.

pub mod list;
pub mod run;
pub mod scripts;
