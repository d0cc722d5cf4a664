//! Status translator port for decoding raw interpreter statuses.

use super::shell::RawStatus;

/// A decoded, platform-independent termination outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code; `128 + signal` when the child was killed by a signal.
    pub exit_code: i32,
    /// Terminating signal, if any.
    pub signal: Option<i32>,
}

impl ExitOutcome {
    /// A normal exit with the given code.
    #[must_use]
    pub fn exited(code: i32) -> Self {
        Self { exit_code: code, signal: None }
    }

    /// Termination by a signal.
    #[must_use]
    pub fn signaled(signal: i32) -> Self {
        Self { exit_code: 128 + signal, signal: Some(signal) }
    }

    /// Returns `true` for a normal exit with code zero.
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == 0 && self.signal.is_none()
    }
}

/// Decodes the raw status of a [`ShellRunner`](super::ShellRunner).
pub trait StatusTranslator: Send + Sync {
    /// Translates a raw status into an exit outcome.
    fn translate(&self, raw: RawStatus) -> ExitOutcome;
}
