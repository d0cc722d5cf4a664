//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the executor and the operating
//! system (interpreter, randomness, temp directory, status encoding).
//! Implementations live in `src/adapters/` and `src/status.rs`.

pub mod id_gen;
pub mod shell;
pub mod status;
pub mod temp_path;

pub use id_gen::IdGenerator;
pub use shell::{RawStatus, ShellInvocation, ShellRunner};
pub use status::{ExitOutcome, StatusTranslator};
pub use temp_path::TempPathGenerator;
