//! Base error types for hookscript
//!
//! This module provides the error taxonomy shared by every crate:
//! configuration errors are fatal at setup, walk errors abort a single hook
//! firing, and resolution/subprocess errors are reported per command.

use std::path::PathBuf;
use thiserror::Error;

/// Base error type for shared functionality
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or missing plugin options
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A search root or nested directory could not be read during a walk
    #[error("Failed to read directory {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Executor-mode command with no matching discovered script
    #[error("No discovered script matches command '{command}'")]
    Resolution { command: String },

    /// Subprocess exited non-zero or could not be spawned
    #[error("Command `{line}` failed: {reason}")]
    Subprocess {
        line: String,
        reason: String,
        stderr: String,
    },

    /// Malformed shell words in a command or executor string
    #[error("Failed to parse '{input}': {message}")]
    CommandParse { input: String, message: String },

    /// Generic error message
    #[error("{0}")]
    Message(String),
}

impl Error {
    /// Create a `Configuration` error from any displayable message
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Captured standard error of a failed subprocess, if any
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Subprocess { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::io;

    #[test]
    fn test_configuration_error_message() {
        let error = Error::config("at least one search path is required");

        let msg = error.to_string();
        assert!(msg.starts_with("Configuration error"));
        assert!(msg.contains("search path"));
    }

    #[test]
    fn test_walk_error_names_path() {
        let error = Error::Walk {
            path: PathBuf::from("/missing/scripts"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };

        let msg = error.to_string();
        assert!(msg.contains("/missing/scripts"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_resolution_error_names_command() {
        let error = Error::Resolution {
            command: "deploy.py".to_string(),
        };

        assert!(error.to_string().contains("deploy.py"));
    }

    #[test]
    fn test_subprocess_stderr() {
        let error = Error::Subprocess {
            line: "python3 /tmp/a.py".to_string(),
            reason: "exited with status 2".to_string(),
            stderr: "Traceback".to_string(),
        };

        assert_eq!(error.stderr(), Some("Traceback"));
        assert!(error.to_string().contains("exited with status 2"));
    }

    #[test]
    fn test_stderr_absent_for_other_variants() {
        let error = Error::Message("boom".to_string());
        assert!(error.stderr().is_none());

        let empty = Error::Subprocess {
            line: "false".to_string(),
            reason: "exited with status 1".to_string(),
            stderr: String::new(),
        };
        assert!(empty.stderr().is_none());
    }

    #[test]
    fn test_io_error_conversion() {
        let error: Error = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert!(error.to_string().contains("IO error"));
    }
}
