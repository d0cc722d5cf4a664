//! Core library entry for the `shellcap` CLI.
//!
//! Runs a command line through the platform shell, optionally capturing its
//! stdout and stderr into temp or caller-named files, and reports the decoded
//! exit status with the paths of the captured streams.

pub mod adapters;
pub mod capture;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod ports;
pub mod request;
pub mod status;

pub use capture::{CaptureConfig, StreamCaptureKind, StreamSpec};
pub use config::{ExecutorConfig, RedirectMode, TempConfig, TempStrategy};
pub use error::{ExecError, Result};
pub use executor::{execute, ProcessExecutor};
pub use request::{CommandOutcome, ExecutionRequest, ExecutionResult, SpawnFailure};

use clap::error::ErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments and return the process exit code.
///
/// # Errors
///
/// Returns an error string when argument parsing fails, the configuration is
/// invalid, or the capture setup fails before the command could run.
pub fn run<I, T>(args: I) -> std::result::Result<i32, String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return Ok(0);
        }
        Err(err) => return Err(err.to_string()),
    };
    cli::dispatch(&cli)
}
