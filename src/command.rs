//! Command synthesis: splicing stdio redirections onto a shell command line.
//!
//! Redirection clauses are appended to the end of the caller's command, so
//! in a compound line (`a; b`) they bind to the last simple command only.
//! A line ending in a shell comment (`make # all`) swallows them entirely:
//! the output stays on the inherited streams and the capture files stay
//! empty. Callers that need comments should use [`RedirectMode::Native`].
//!
//! [`RedirectMode::Native`]: crate::config::RedirectMode::Native
//!
//! All quoting lives here. Under a POSIX shell any UTF-8 path is safe: it is
//! single-quoted and embedded `'` characters are escaped. Under `cmd.exe`
//! paths are double-quoted and may not contain `"`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExecError, Result};

/// The redirection syntax understood by an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellDialect {
    /// `sh -c`.
    Posix,
    /// `cmd /C`.
    Cmd,
}

impl ShellDialect {
    /// The dialect of the platform's default interpreter.
    #[must_use]
    pub fn native() -> Self {
        if cfg!(windows) {
            Self::Cmd
        } else {
            Self::Posix
        }
    }

    /// Quotes a path for use as a redirection target.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::InvalidCaptureSpec`] if the path is not UTF-8, or
    /// contains `"` under [`ShellDialect::Cmd`].
    pub fn quote(self, path: &Path) -> Result<String> {
        let text = path.to_str().ok_or_else(|| {
            ExecError::invalid_capture(format!("path is not valid UTF-8: {}", path.display()))
        })?;
        match self {
            Self::Posix => Ok(format!("'{}'", text.replace('\'', r"'\''"))),
            Self::Cmd if text.contains('"') => Err(ExecError::invalid_capture(format!(
                "path may not contain '\"' under cmd.exe: {text}"
            ))),
            Self::Cmd => Ok(format!("\"{text}\"")),
        }
    }
}

/// Builds the command line that performs the requested redirections.
///
/// `stdout` and `stderr` are the capture targets of streams that are not
/// ignored. With neither present, `original` is returned unchanged. When both
/// name the same file, stderr is merged into stdout with `2>&1` so that the
/// two streams do not truncate each other.
///
/// # Errors
///
/// Returns [`ExecError::InvalidCaptureSpec`] if a path cannot be quoted for
/// the dialect.
pub fn build_command(
    dialect: ShellDialect,
    original: &str,
    stdout: Option<&Path>,
    stderr: Option<&Path>,
) -> Result<String> {
    let mut cmd = String::from(original);
    if let Some(path) = stdout {
        cmd.push_str(" >");
        cmd.push_str(&dialect.quote(path)?);
    }
    if let Some(path) = stderr {
        if crate::capture::same_target(stdout, Some(path)) {
            cmd.push_str(" 2>&1");
        } else {
            cmd.push_str(" 2>");
            cmd.push_str(&dialect.quote(path)?);
        }
    }
    Ok(cmd)
}
