//! Core types and utilities for hookscript
//!
//! This is the foundation crate (Layer 0) that all other hookscript crates depend on.
//! It provides:
//! - The shared error taxonomy (configuration, walk I/O, resolution, subprocess)
//! - Platform detection, including the shell used for legacy shell-string commands
//!
//! This crate has no dependencies on other hookscript crates.

pub mod error;
pub mod platform;

pub use error::{Error, Result};
