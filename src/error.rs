//! Error types for command execution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop an execution before the command is run.
///
/// A command that runs and exits nonzero is not an error; neither is a shell
/// that cannot be spawned. Both are reported inside
/// [`ExecutionResult`](crate::request::ExecutionResult).
#[derive(Debug, Error)]
pub enum ExecError {
    /// The capture configuration has an unrecognized shape.
    #[error("invalid capture spec: {reason}")]
    InvalidCaptureSpec {
        /// What was wrong with the value.
        reason: String,
    },

    /// A unique temporary file could not be created.
    #[error("failed to create temp file in {}: {source}", dir.display())]
    TempFileCreation {
        /// Directory the file was to be created in.
        dir: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// Every candidate name was already taken.
    #[error("no free temp file name in {} after {attempts} attempts", dir.display())]
    TempNamesExhausted {
        /// Directory the file was to be created in.
        dir: PathBuf,
        /// Number of names tried.
        attempts: u32,
    },

    /// Executor configuration could not be loaded or is inconsistent.
    #[error("invalid configuration: {reason}")]
    Config {
        /// What was wrong with the configuration.
        reason: String,
    },
}

impl ExecError {
    pub(crate) fn invalid_capture(reason: impl Into<String>) -> Self {
        Self::InvalidCaptureSpec { reason: reason.into() }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::Config { reason: reason.into() }
    }

    /// Returns `true` for either flavour of temp-file creation failure.
    #[must_use]
    pub fn is_temp_file_error(&self) -> bool {
        matches!(self, Self::TempFileCreation { .. } | Self::TempNamesExhausted { .. })
    }
}

/// Result type for execution operations.
pub type Result<T> = std::result::Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_errors_are_grouped() {
        let exhausted = ExecError::TempNamesExhausted { dir: PathBuf::from("/tmp"), attempts: 3 };
        let io = ExecError::TempFileCreation {
            dir: PathBuf::from("/tmp"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(exhausted.is_temp_file_error());
        assert!(io.is_temp_file_error());
        assert!(!ExecError::invalid_capture("x").is_temp_file_error());
    }

    #[test]
    fn messages_name_the_directory() {
        let err = ExecError::TempNamesExhausted { dir: PathBuf::from("/scratch"), attempts: 7 };
        let msg = err.to_string();
        assert!(msg.contains("/scratch"));
        assert!(msg.contains('7'));
    }
}
