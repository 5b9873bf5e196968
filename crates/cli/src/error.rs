//! Error types for CLI commands

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during command execution
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CommandError {
    /// The build configuration file could not be read or parsed
    #[error("Failed to read build configuration {}: {source}", path.display())]
    BuildConfig {
        /// The build configuration file
        path: PathBuf,
        /// The underlying read or parse error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `configResolved` was fired without a configuration to capture
    #[error("Firing configResolved requires --build-config or a JSON argument")]
    MissingBuildConfig,

    /// The walk of the search paths failed, so no command ran
    #[error("Hook '{hook}' aborted: {source}")]
    HookAborted {
        /// The hook that was fired
        hook: String,
        /// The walk error
        #[source]
        source: hookscript_core::Error,
    },

    /// Some commands of a hook failed (only raised with --strict)
    #[error("Hook '{hook}' failed: {failed} out of {total} commands")]
    HookFailed {
        /// The hook that was fired
        hook: String,
        /// Number of failed or unresolved commands
        failed: usize,
        /// Total number of commands
        total: usize,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// hookscript_engine re-exports hookscript_core::Error, so one impl covers both
impl From<hookscript_core::Error> for CommandError {
    fn from(err: hookscript_core::Error) -> Self {
        Self::Other(err.into())
    }
}

/// Result type alias for command operations
pub type Result<T> = std::result::Result<T, CommandError>;

impl CommandError {
    /// Create a `BuildConfig` error from any error type
    pub fn build_config<E: std::error::Error + Send + Sync + 'static>(
        path: impl Into<PathBuf>,
        err: E,
    ) -> Self {
        Self::BuildConfig {
            path: path.into(),
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use std::io;

    #[test]
    fn test_build_config_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let error = CommandError::build_config("resolved.json", io_error);

        let error_msg = error.to_string();
        assert!(error_msg.contains("resolved.json"));
        assert!(error_msg.contains("no such file"));
    }

    #[test]
    fn test_hook_failed_error() {
        let error = CommandError::HookFailed {
            hook: "buildEnd".to_string(),
            failed: 1,
            total: 3,
        };

        assert_eq!(error.to_string(), "Hook 'buildEnd' failed: 1 out of 3 commands");
    }

    #[test]
    fn test_hook_aborted_keeps_source() {
        let error = CommandError::HookAborted {
            hook: "buildStart".to_string(),
            source: hookscript_core::Error::Walk {
                path: PathBuf::from("/missing"),
                source: io::Error::new(io::ErrorKind::NotFound, "gone"),
            },
        };

        assert!(error.to_string().contains("buildStart"));
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_from_core_error() {
        let error: CommandError = hookscript_core::Error::config("bad").into();
        assert!(matches!(error, CommandError::Other(_)));
        assert!(error.to_string().contains("bad"));
    }
}
