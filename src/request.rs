//! Execution requests and their results.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::CaptureConfig;
use crate::ports::ExitOutcome;

/// A command to run, or a shell-availability probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Command line for the interpreter; absent or empty means probe.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Capture configuration; absent means no capture.
    #[serde(default, alias = "stdio", skip_serializing_if = "Option::is_none")]
    pub capture: Option<CaptureConfig>,
}

impl ExecutionRequest {
    /// A request that only checks for a command interpreter.
    #[must_use]
    pub fn probe() -> Self {
        Self::default()
    }

    /// A request to run `command` without capture.
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: Some(command.into()), capture: None }
    }

    /// Sets the capture configuration.
    #[must_use]
    pub fn with_capture(mut self, capture: CaptureConfig) -> Self {
        self.capture = Some(capture);
        self
    }

    /// Returns the command if this request runs one.
    #[must_use]
    pub fn command_line(&self) -> Option<&str> {
        self.command.as_deref().filter(|c| !c.is_empty())
    }
}

/// A command that ran to completion, whatever its exit status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutcome {
    /// `true` iff the exit code is zero and no signal was involved.
    pub success: bool,
    /// Decoded exit code; `128 + signal` for signal deaths.
    pub exit_code: i32,
    /// Terminating signal, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    /// File holding captured stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_path: Option<PathBuf>,
    /// File holding captured stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_path: Option<PathBuf>,
}

impl CommandOutcome {
    pub(crate) fn new(
        exit: ExitOutcome,
        stdout_path: Option<PathBuf>,
        stderr_path: Option<PathBuf>,
    ) -> Self {
        Self {
            success: exit.success(),
            exit_code: exit.exit_code,
            signal: exit.signal,
            stdout_path,
            stderr_path,
        }
    }
}

/// The interpreter itself could not be started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnFailure {
    /// Raw OS error number, when the platform supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_code: Option<i32>,
    /// Human-readable description of the failure.
    pub message: String,
    /// Capture file created for stdout before the failure; not removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_path: Option<PathBuf>,
    /// Capture file created for stderr before the failure; not removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_path: Option<PathBuf>,
}

impl SpawnFailure {
    pub(crate) fn from_io(
        err: &io::Error,
        stdout_path: Option<PathBuf>,
        stderr_path: Option<PathBuf>,
    ) -> Self {
        Self { os_code: err.raw_os_error(), message: err.to_string(), stdout_path, stderr_path }
    }
}

/// Result of [`ProcessExecutor::execute`](crate::executor::ProcessExecutor::execute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExecutionResult {
    /// Answer to a probe request.
    Probe {
        /// Whether a command interpreter is usable.
        shell_available: bool,
    },
    /// The command ran.
    Completed(CommandOutcome),
    /// The interpreter could not be spawned.
    SpawnFailed(SpawnFailure),
}

impl ExecutionResult {
    /// `true` only for a completed command that exited with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, Self::Completed(outcome) if outcome.success)
    }

    /// Exit code of a completed command.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Completed(outcome) => Some(outcome.exit_code),
            _ => None,
        }
    }

    /// Probe answer, for probe results.
    #[must_use]
    pub fn shell_available(&self) -> Option<bool> {
        match self {
            Self::Probe { shell_available } => Some(*shell_available),
            _ => None,
        }
    }

    /// Path holding captured stdout.
    #[must_use]
    pub fn stdout_path(&self) -> Option<&Path> {
        match self {
            Self::Completed(o) => o.stdout_path.as_deref(),
            Self::SpawnFailed(f) => f.stdout_path.as_deref(),
            Self::Probe { .. } => None,
        }
    }

    /// Path holding captured stderr.
    #[must_use]
    pub fn stderr_path(&self) -> Option<&Path> {
        match self {
            Self::Completed(o) => o.stderr_path.as_deref(),
            Self::SpawnFailed(f) => f.stderr_path.as_deref(),
            Self::Probe { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::StreamSpec;
    use serde_json::json;

    #[test]
    fn empty_command_is_a_probe() {
        assert_eq!(ExecutionRequest::probe().command_line(), None);
        assert_eq!(ExecutionRequest::new("").command_line(), None);
        assert_eq!(ExecutionRequest::new("ls").command_line(), Some("ls"));
    }

    #[test]
    fn request_accepts_stdio_alias() {
        let req: ExecutionRequest =
            serde_json::from_value(json!({"command": "ls", "stdio": {"stdout": true}})).unwrap();
        assert_eq!(
            req.capture,
            Some(CaptureConfig::Streams { stdout: Some(StreamSpec::Toggle(true)), stderr: None })
        );
    }

    #[test]
    fn request_rejects_bad_capture() {
        let err = serde_json::from_value::<ExecutionRequest>(json!({"command": "ls", "capture": 1}))
            .unwrap_err();
        assert!(err.to_string().contains("invalid capture spec"));
    }

    #[test]
    fn completed_result_serializes_with_mode_tag() {
        let result = ExecutionResult::Completed(CommandOutcome::new(
            ExitOutcome::exited(3),
            Some(PathBuf::from("/tmp/o")),
            None,
        ));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"mode": "completed", "success": false, "exit_code": 3, "stdout_path": "/tmp/o"})
        );
    }

    #[test]
    fn probe_and_spawn_failure_serialize() {
        let probe = ExecutionResult::Probe { shell_available: true };
        assert_eq!(
            serde_json::to_value(&probe).unwrap(),
            json!({"mode": "probe", "shell_available": true})
        );

        let err = io::Error::from_raw_os_error(2);
        let failed = ExecutionResult::SpawnFailed(SpawnFailure::from_io(&err, None, None));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["mode"], "spawn_failed");
        assert_eq!(value["os_code"], 2);
    }

    #[test]
    fn accessors_follow_variant() {
        let signaled =
            ExecutionResult::Completed(CommandOutcome::new(ExitOutcome::signaled(9), None, None));
        assert!(!signaled.success());
        assert_eq!(signaled.exit_code(), Some(137));
        assert_eq!(signaled.shell_available(), None);

        let probe = ExecutionResult::Probe { shell_available: false };
        assert_eq!(probe.shell_available(), Some(false));
        assert_eq!(probe.exit_code(), None);
        assert!(!probe.success());
    }
}
