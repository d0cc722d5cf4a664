//! Scripted adapter for the `ShellRunner` port.

use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::command::ShellDialect;
use crate::ports::shell::{RawStatus, ShellInvocation, ShellRunner};

/// One queued reply of a [`ScriptedShell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedStep {
    /// The interpreter ran and returned this raw status.
    Status(i32),
    /// Spawning failed with this OS error code.
    SpawnError(i32),
}

/// An invocation received by a [`ScriptedShell`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedInvocation {
    /// The command line as it would have reached the interpreter.
    pub command: String,
    /// Native stdout target, if any.
    pub stdout: Option<PathBuf>,
    /// Native stderr target, if any.
    pub stderr: Option<PathBuf>,
}

/// Replays queued statuses and records what it was asked to run.
///
/// When the queue is empty every run reports raw status `0`.
pub struct ScriptedShell {
    steps: Mutex<VecDeque<ScriptedStep>>,
    calls: Mutex<Vec<RecordedInvocation>>,
    available: bool,
    dialect: ShellDialect,
}

impl ScriptedShell {
    /// Creates a POSIX-dialect shell replying with `steps` in order.
    #[must_use]
    pub fn new(steps: impl IntoIterator<Item = ScriptedStep>) -> Self {
        Self {
            steps: Mutex::new(steps.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
            available: true,
            dialect: ShellDialect::Posix,
        }
    }

    /// Sets what [`ShellRunner::probe`] reports.
    #[must_use]
    pub fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Sets the dialect reported to the executor.
    #[must_use]
    pub fn with_dialect(mut self, dialect: ShellDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Returns every invocation received so far.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedInvocation> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl ShellRunner for ScriptedShell {
    fn run(&self, invocation: &ShellInvocation<'_>) -> io::Result<RawStatus> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(RecordedInvocation {
            command: invocation.command.to_string(),
            stdout: invocation.stdout.map(PathBuf::from),
            stderr: invocation.stderr.map(PathBuf::from),
        });
        let step = self.steps.lock().unwrap_or_else(PoisonError::into_inner).pop_front();
        match step.unwrap_or(ScriptedStep::Status(0)) {
            ScriptedStep::Status(raw) => Ok(RawStatus::from_raw(raw)),
            ScriptedStep::SpawnError(code) => Err(io::Error::from_raw_os_error(code)),
        }
    }

    fn probe(&self) -> bool {
        self.available
    }

    fn dialect(&self) -> ShellDialect {
        self.dialect
    }
}
