//! Status translators for the two raw-status encodings.
//!
//! Unix interpreters report a wait status that packs the exit code and the
//! terminating signal into one integer. Other platforms report the exit code
//! itself. [`platform_translator`] picks the one matching the build target.

use crate::ports::{ExitOutcome, RawStatus, StatusTranslator};

const SIGNAL_MASK: i32 = 0x7f;
const STOPPED: i32 = 0x7f;

/// Decodes POSIX wait statuses.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitStatusTranslator;

impl StatusTranslator for WaitStatusTranslator {
    fn translate(&self, raw: RawStatus) -> ExitOutcome {
        let status = raw.raw();
        let low = status & SIGNAL_MASK;
        if low == 0 {
            ExitOutcome::exited((status >> 8) & 0xff)
        } else if low == STOPPED {
            ExitOutcome::signaled((status >> 8) & 0xff)
        } else {
            ExitOutcome::signaled(low)
        }
    }
}

/// Treats the raw status as the exit code.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExitCodeTranslator;

impl StatusTranslator for ExitCodeTranslator {
    fn translate(&self, raw: RawStatus) -> ExitOutcome {
        ExitOutcome::exited(raw.raw())
    }
}

/// Returns the translator for the encoding used by the live shell runner.
#[must_use]
pub fn platform_translator() -> Box<dyn StatusTranslator> {
    if cfg!(unix) {
        Box::new(WaitStatusTranslator)
    } else {
        Box::new(ExitCodeTranslator)
    }
}
