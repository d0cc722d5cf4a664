//! Shell runner port for executing command lines under the platform interpreter.

use std::io;
use std::path::Path;
use std::sync::Arc;

use crate::command::ShellDialect;

/// The undecoded status returned by the shell-invocation primitive.
///
/// On unix this is a wait status; elsewhere it is the interpreter's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStatus(i32);

impl RawStatus {
    /// Wraps a raw platform status value.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the wrapped value.
    #[must_use]
    pub fn raw(self) -> i32 {
        self.0
    }
}

/// One invocation of the interpreter.
#[derive(Debug, Clone, Copy)]
pub struct ShellInvocation<'a> {
    /// The command line handed to the interpreter.
    pub command: &'a str,
    /// File to attach as the child's stdout, bypassing the shell.
    pub stdout: Option<&'a Path>,
    /// File to attach as the child's stderr, bypassing the shell.
    pub stderr: Option<&'a Path>,
}

impl<'a> ShellInvocation<'a> {
    /// An invocation with inherited stdio.
    #[must_use]
    pub fn plain(command: &'a str) -> Self {
        Self { command, stdout: None, stderr: None }
    }
}

/// Runs command lines through the system command interpreter.
///
/// Abstracting the interpreter lets the executor be driven by scripted
/// statuses in tests.
pub trait ShellRunner: Send + Sync {
    /// Runs the invocation to completion and returns its raw status.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the interpreter could not be spawned or a
    /// stdio target could not be opened.
    fn run(&self, invocation: &ShellInvocation<'_>) -> io::Result<RawStatus>;

    /// Returns `true` if a usable command interpreter is present.
    fn probe(&self) -> bool;

    /// The redirection and quoting syntax the interpreter understands.
    fn dialect(&self) -> ShellDialect;
}

impl<T: ShellRunner + ?Sized> ShellRunner for Arc<T> {
    fn run(&self, invocation: &ShellInvocation<'_>) -> io::Result<RawStatus> {
        (**self).run(invocation)
    }

    fn probe(&self) -> bool {
        (**self).probe()
    }

    fn dialect(&self) -> ShellDialect {
        (**self).dialect()
    }
}
