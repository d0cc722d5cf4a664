//! The process executor: resolve capture, claim temp files, build the
//! command line, run it, decode the status.
//!
//! Every call is synchronous and single-shot. Capture files are created
//! before the command runs and handed to the caller afterwards; nothing here
//! deletes them, including on spawn failure.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapters::live::shell::LiveShell;
use crate::adapters::live::temp_path::temp_generator;
use crate::capture::{self, CaptureConfig, StreamCaptureKind};
use crate::command::build_command;
use crate::config::{ExecutorConfig, RedirectMode};
use crate::error::Result;
use crate::ports::{ShellInvocation, ShellRunner, StatusTranslator, TempPathGenerator};
use crate::request::{CommandOutcome, ExecutionRequest, ExecutionResult, SpawnFailure};
use crate::status::platform_translator;

/// Runs [`ExecutionRequest`]s through a set of ports.
pub struct ProcessExecutor {
    shell: Box<dyn ShellRunner>,
    temp: Box<dyn TempPathGenerator>,
    status: Box<dyn StatusTranslator>,
    redirect: RedirectMode,
}

impl ProcessExecutor {
    /// Creates an executor from explicit ports.
    #[must_use]
    pub fn new(
        shell: Box<dyn ShellRunner>,
        temp: Box<dyn TempPathGenerator>,
        status: Box<dyn StatusTranslator>,
    ) -> Self {
        Self { shell, temp, status, redirect: RedirectMode::Shell }
    }

    /// Creates an executor wired to the system shell and temp directory.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Config`](crate::ExecError::Config) if `config`
    /// fails [`ExecutorConfig::validate`].
    pub fn live(config: ExecutorConfig) -> Result<Self> {
        config.validate()?;
        let shell = Box::new(LiveShell::new());
        Ok(Self::new(shell, temp_generator(config.temp), platform_translator())
            .with_redirect(config.redirect))
    }

    /// Sets how capture targets are attached to the child.
    #[must_use]
    pub fn with_redirect(mut self, redirect: RedirectMode) -> Self {
        self.redirect = redirect;
        self
    }

    /// Runs a request to completion.
    ///
    /// A request without a command probes for the interpreter. Nonzero exits,
    /// signal deaths and spawn failures are returned as data.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::InvalidCaptureSpec`](crate::ExecError::InvalidCaptureSpec)
    /// for an unusable capture configuration and a temp-file error when a
    /// capture file cannot be created. In both cases nothing is run.
    pub fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult> {
        let Some(command) = request.command_line() else {
            let shell_available = self.shell.probe();
            debug!(shell_available, "probed for command interpreter");
            return Ok(ExecutionResult::Probe { shell_available });
        };

        let resolved = capture::resolve(request.capture.as_ref())?;
        debug!(stdout = ?resolved.stdout, stderr = ?resolved.stderr, "resolved capture");

        let dialect = self.shell.dialect();
        if self.redirect == RedirectMode::Shell {
            for kind in [&resolved.stdout, &resolved.stderr] {
                if let StreamCaptureKind::CaptureFile(path) = kind {
                    dialect.quote(path)?;
                }
            }
        }

        let stdout_path = self.destination(&resolved.stdout)?;
        let stderr_path = self.destination(&resolved.stderr)?;

        let line = match self.redirect {
            RedirectMode::Shell if resolved.any_captured() => {
                build_command(dialect, command, stdout_path.as_deref(), stderr_path.as_deref())?
            }
            RedirectMode::Shell | RedirectMode::Native => command.to_string(),
        };
        let invocation = match self.redirect {
            RedirectMode::Shell => ShellInvocation::plain(&line),
            RedirectMode::Native => ShellInvocation {
                command: &line,
                stdout: stdout_path.as_deref(),
                stderr: stderr_path.as_deref(),
            },
        };

        info!(command = %line, redirect = ?self.redirect, "running command");
        let raw = match self.shell.run(&invocation) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, command = %line, "failed to spawn command interpreter");
                return Ok(ExecutionResult::SpawnFailed(SpawnFailure::from_io(
                    &err,
                    stdout_path,
                    stderr_path,
                )));
            }
        };

        let exit = self.status.translate(raw);
        debug!(
            raw = raw.raw(),
            exit_code = exit.exit_code,
            signal = ?exit.signal,
            "translated status"
        );
        Ok(ExecutionResult::Completed(CommandOutcome::new(exit, stdout_path, stderr_path)))
    }

    /// Runs a request on tokio's blocking pool.
    ///
    /// # Errors
    ///
    /// Same as [`ProcessExecutor::execute`].
    pub async fn execute_async(
        self: Arc<Self>,
        request: ExecutionRequest,
    ) -> Result<ExecutionResult> {
        match tokio::task::spawn_blocking(move || self.execute(&request)).await {
            Ok(result) => result,
            Err(join) => {
                warn!(error = %join, "blocking execution task failed");
                Ok(ExecutionResult::SpawnFailed(SpawnFailure {
                    os_code: None,
                    message: format!("execution task failed: {join}"),
                    stdout_path: None,
                    stderr_path: None,
                }))
            }
        }
    }

    fn destination(&self, kind: &StreamCaptureKind) -> Result<Option<PathBuf>> {
        match kind {
            StreamCaptureKind::Ignore => Ok(None),
            StreamCaptureKind::CaptureTemp => self.temp.generate().map(Some),
            StreamCaptureKind::CaptureFile(path) => Ok(Some(path.clone())),
        }
    }
}

/// Runs `command` with a loosely typed capture value on the live system.
///
/// Uses the default configuration with `SHELLCAP_*` environment overrides.
/// Without a command the capture value is not looked at.
///
/// # Errors
///
/// Returns configuration, capture and temp-file errors; see
/// [`ProcessExecutor::execute`].
pub fn execute(command: Option<&str>, capture: &Value) -> Result<ExecutionResult> {
    let config = ExecutorConfig::default().with_env_overrides()?;
    let executor = ProcessExecutor::live(config)?;
    let request = match command.filter(|c| !c.is_empty()) {
        Some(command) => ExecutionRequest {
            command: Some(command.to_string()),
            capture: CaptureConfig::from_value(capture)?,
        },
        None => ExecutionRequest::probe(),
    };
    executor.execute(&request)
}
