//! Live shell runner using `std::process::Command`.

use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use tracing::debug;

use crate::command::ShellDialect;
use crate::ports::shell::{RawStatus, ShellInvocation, ShellRunner};

/// Runs command lines through `/bin/sh -c` or `%COMSPEC% /C`.
pub struct LiveShell {
    dialect: ShellDialect,
}

impl LiveShell {
    /// Creates a runner for the platform's default interpreter.
    #[must_use]
    pub fn new() -> Self {
        Self { dialect: ShellDialect::native() }
    }

    fn command(&self, line: &str) -> Command {
        match self.dialect {
            ShellDialect::Posix => {
                let mut cmd = Command::new("/bin/sh");
                cmd.arg("-c").arg(line);
                cmd
            }
            ShellDialect::Cmd => {
                let comspec =
                    std::env::var_os("COMSPEC").unwrap_or_else(|| OsString::from("cmd.exe"));
                let mut cmd = Command::new(comspec);
                cmd.arg("/C").arg(line);
                cmd
            }
        }
    }
}

impl Default for LiveShell {
    fn default() -> Self {
        Self::new()
    }
}

fn open_target(path: &Path) -> io::Result<File> {
    File::create(path)
}

/// Attaches native redirect targets, sharing one handle when both streams
/// point at the same file.
fn attach_targets(cmd: &mut Command, invocation: &ShellInvocation<'_>) -> io::Result<()> {
    match (invocation.stdout, invocation.stderr) {
        (Some(out), Some(err)) if out == err => {
            let file = open_target(out)?;
            cmd.stderr(Stdio::from(file.try_clone()?));
            cmd.stdout(Stdio::from(file));
        }
        (out, err) => {
            if let Some(path) = out {
                cmd.stdout(Stdio::from(open_target(path)?));
            }
            if let Some(path) = err {
                cmd.stderr(Stdio::from(open_target(path)?));
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
fn raw_status(status: ExitStatus) -> RawStatus {
    use std::os::unix::process::ExitStatusExt;
    RawStatus::from_raw(status.into_raw())
}

#[cfg(not(unix))]
fn raw_status(status: ExitStatus) -> RawStatus {
    RawStatus::from_raw(status.code().unwrap_or(1))
}

impl ShellRunner for LiveShell {
    fn run(&self, invocation: &ShellInvocation<'_>) -> io::Result<RawStatus> {
        let mut cmd = self.command(invocation.command);
        attach_targets(&mut cmd, invocation)?;
        let status = cmd.status()?;
        debug!(%status, "interpreter finished");
        Ok(raw_status(status))
    }

    fn probe(&self) -> bool {
        self.command("exit 0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn dialect(&self) -> ShellDialect {
        self.dialect
    }
}
