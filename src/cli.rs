//! CLI argument definitions and dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use crate::capture::{CaptureConfig, StreamSpec};
use crate::config::{ExecutorConfig, RedirectMode};
use crate::executor::ProcessExecutor;
use crate::request::{ExecutionRequest, ExecutionResult};

/// Top-level CLI parser for `shellcap`.
#[derive(Debug, Parser)]
#[command(name = "shellcap", version, about = "Run shell commands with stdout/stderr capture")]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a command line and print the result as JSON. Without a command,
    /// probe for a usable shell.
    Run(RunArgs),
    /// Print the effective configuration as YAML.
    Config,
}

/// Arguments of `shellcap run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Command line handed to the platform shell.
    pub command: Option<String>,
    /// Capture configuration as JSON: `true`, `"path"` or
    /// `{"stdout": .., "stderr": ..}`.
    #[arg(long, value_name = "JSON", conflicts_with_all = ["stdout", "stderr"])]
    pub capture: Option<String>,
    /// Capture stdout: `true`, `false` or a file path.
    #[arg(long, value_name = "BOOL|PATH")]
    pub stdout: Option<String>,
    /// Capture stderr: `true`, `false` or a file path.
    #[arg(long, value_name = "BOOL|PATH")]
    pub stderr: Option<String>,
    /// Attach capture files through the spawn API instead of shell operators.
    #[arg(long)]
    pub native: bool,
}

fn stream_flag(value: &str) -> StreamSpec {
    match value {
        "true" => StreamSpec::Toggle(true),
        "false" => StreamSpec::Toggle(false),
        path => StreamSpec::Path(PathBuf::from(path)),
    }
}

impl RunArgs {
    /// Builds the execution request described by the flags.
    ///
    /// Without a command the capture flags are ignored and a probe request
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns an error string if `--capture` is not valid JSON or not a
    /// valid capture value.
    pub fn request(&self) -> Result<ExecutionRequest, String> {
        let Some(command) = self.command.as_deref().filter(|c| !c.is_empty()) else {
            return Ok(ExecutionRequest::probe());
        };
        let capture = if let Some(json) = &self.capture {
            let value: Value = serde_json::from_str(json)
                .map_err(|e| format!("--capture is not valid JSON: {e}"))?;
            CaptureConfig::from_value(&value).map_err(|e| e.to_string())?
        } else if self.stdout.is_some() || self.stderr.is_some() {
            Some(CaptureConfig::Streams {
                stdout: self.stdout.as_deref().map(stream_flag),
                stderr: self.stderr.as_deref().map(stream_flag),
            })
        } else {
            None
        };
        Ok(ExecutionRequest { command: Some(command.to_string()), capture })
    }
}

/// Maps a result onto the process exit code of the CLI.
#[must_use]
pub fn exit_code(result: &ExecutionResult) -> i32 {
    match result {
        ExecutionResult::Probe { shell_available: true } => 0,
        ExecutionResult::Probe { shell_available: false } | ExecutionResult::SpawnFailed(_) => 1,
        ExecutionResult::Completed(outcome) if outcome.success => 0,
        ExecutionResult::Completed(outcome) => match outcome.exit_code {
            code @ 1..=255 => code,
            _ => 1,
        },
    }
}

/// Dispatch a parsed command line and return the process exit code.
///
/// # Errors
///
/// Returns an error string if the configuration is invalid or the command
/// could not be set up.
pub fn dispatch(cli: &Cli) -> Result<i32, String> {
    let mut config = ExecutorConfig::load(cli.config.as_deref()).map_err(|e| e.to_string())?;
    match &cli.command {
        Command::Config => {
            let yaml = serde_yaml::to_string(&config).map_err(|e| e.to_string())?;
            print!("{yaml}");
            Ok(0)
        }
        Command::Run(args) => {
            let request = args.request()?;
            if args.native {
                config.redirect = RedirectMode::Native;
            }
            let executor = ProcessExecutor::live(config).map_err(|e| e.to_string())?;
            let result = executor.execute(&request).map_err(|e| e.to_string())?;
            let json = serde_json::to_string_pretty(&result).map_err(|e| e.to_string())?;
            println!("{json}");
            Ok(exit_code(&result))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::CommandOutcome;

    fn run_args(args: &[&str]) -> RunArgs {
        let cli = Cli::parse_from([&["shellcap", "run"][..], args].concat());
        match cli.command {
            Command::Run(args) => args,
            Command::Config => panic!("expected run"),
        }
    }

    #[test]
    fn parses_run_with_command() {
        let args = run_args(&["echo hi"]);
        assert_eq!(args.command.as_deref(), Some("echo hi"));
        assert!(!args.native);
        assert_eq!(args.request().unwrap(), ExecutionRequest::new("echo hi"));
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::parse_from(["shellcap", "--config", "x.yaml", "config"]);
        assert!(matches!(cli.command, Command::Config));
        assert_eq!(cli.config, Some(PathBuf::from("x.yaml")));
    }

    #[test]
    fn stream_flags_build_streams_capture() {
        let args = run_args(&["ls", "--stdout", "true", "--stderr", "/tmp/e"]);
        let request = args.request().unwrap();
        assert_eq!(
            request.capture,
            Some(CaptureConfig::Streams {
                stdout: Some(StreamSpec::Toggle(true)),
                stderr: Some(StreamSpec::Path(PathBuf::from("/tmp/e"))),
            })
        );
    }

    #[test]
    fn capture_json_is_validated() {
        let request = run_args(&["ls", "--capture", "true"]).request().unwrap();
        assert_eq!(request.capture, Some(CaptureConfig::all()));
        assert!(run_args(&["ls", "--capture", "7"]).request().is_err());
        assert!(run_args(&["ls", "--capture", "{nope"]).request().is_err());
    }

    #[test]
    fn capture_is_not_parsed_without_command() {
        let request = run_args(&["--capture", "5"]).request().unwrap();
        assert_eq!(request, ExecutionRequest::probe());
        let request = run_args(&["", "--stdout", "true"]).request().unwrap();
        assert_eq!(request.command_line(), None);
        assert_eq!(request.capture, None);
    }

    #[test]
    fn capture_conflicts_with_stream_flags() {
        let parsed =
            Cli::try_parse_from(["shellcap", "run", "ls", "--capture", "true", "--stdout", "x"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn exit_code_mapping() {
        let completed = |code, signal| {
            ExecutionResult::Completed(CommandOutcome {
                success: code == 0,
                exit_code: code,
                signal,
                stdout_path: None,
                stderr_path: None,
            })
        };
        assert_eq!(exit_code(&completed(0, None)), 0);
        assert_eq!(exit_code(&completed(3, None)), 3);
        assert_eq!(exit_code(&completed(143, Some(15))), 143);
        assert_eq!(exit_code(&completed(256, None)), 1);
        assert_eq!(exit_code(&ExecutionResult::Probe { shell_available: true }), 0);
        assert_eq!(exit_code(&ExecutionResult::Probe { shell_available: false }), 1);
    }
}
