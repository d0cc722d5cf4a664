//! Executor configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `SHELLCAP_*` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::ShellDialect;
use crate::error::{ExecError, Result};

/// Environment variable overriding the temp directory.
pub const ENV_TMPDIR: &str = "SHELLCAP_TMPDIR";
/// Environment variable overriding the temp file name prefix.
pub const ENV_TEMP_PREFIX: &str = "SHELLCAP_TEMP_PREFIX";
/// Environment variable selecting the redirect mode (`shell` or `native`).
pub const ENV_REDIRECT: &str = "SHELLCAP_REDIRECT";

/// How fresh temp files are claimed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TempStrategy {
    /// Atomically create a new file, failing if the name exists.
    #[default]
    Exclusive,
    /// Pick a name that is currently free, then create it. Racy: another
    /// process may claim the same name between the check and the create.
    NameOnly,
}

/// Where and how temp capture files are created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempConfig {
    /// Directory temp files are created in.
    pub dir: PathBuf,
    /// File name prefix.
    pub prefix: String,
    /// Number of random characters following the prefix.
    pub random_len: usize,
    /// Names tried before giving up.
    pub max_attempts: u32,
    /// Creation discipline.
    pub strategy: TempStrategy,
}

impl Default for TempConfig {
    fn default() -> Self {
        Self {
            dir: default_temp_dir(),
            prefix: "shellcap_".to_string(),
            random_len: 6,
            max_attempts: 100,
            strategy: TempStrategy::default(),
        }
    }
}

fn default_temp_dir() -> PathBuf {
    if cfg!(unix) {
        PathBuf::from("/tmp")
    } else {
        env::temp_dir()
    }
}

impl TempConfig {
    /// Temp files go into `dir`, everything else default.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), ..Self::default() }
    }
}

/// How capture targets are attached to the child.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectMode {
    /// Append redirection operators to the command line.
    #[default]
    Shell,
    /// Open the files here and hand them to the child as its stdio.
    Native,
}

impl std::str::FromStr for RedirectMode {
    type Err = ExecError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shell" => Ok(Self::Shell),
            "native" => Ok(Self::Native),
            other => Err(ExecError::config(format!(
                "unknown redirect mode '{other}', expected 'shell' or 'native'"
            ))),
        }
    }
}

/// Full executor configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Temp file settings.
    pub temp: TempConfig,
    /// Redirect mode.
    pub redirect: RedirectMode,
}

impl ExecutorConfig {
    /// Parses a YAML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Config`] if the YAML is malformed or invalid.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| ExecError::config(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Config`] if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExecError::config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Applies `SHELLCAP_*` overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Config`] if an override has an invalid value.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Applies overrides read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Config`] if an override has an invalid value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_TMPDIR).filter(|v| !v.is_empty()) {
            self.temp.dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup(ENV_TEMP_PREFIX) {
            self.temp.prefix = prefix;
        }
        if let Some(mode) = lookup(ENV_REDIRECT) {
            self.redirect = mode.parse()?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Defaults, then `file` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Config`] if any layer is invalid.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let base = match file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides()
    }

    /// Checks the configuration for values that cannot work.
    ///
    /// In [`RedirectMode::Shell`] the temp directory must also be quotable
    /// for the platform shell, since temp paths end up on the command line.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::Config`] naming the first bad value.
    pub fn validate(&self) -> Result<()> {
        let temp = &self.temp;
        if temp.dir.as_os_str().is_empty() {
            return Err(ExecError::config("temp.dir must not be empty"));
        }
        if temp.prefix.is_empty() {
            return Err(ExecError::config("temp.prefix must not be empty"));
        }
        if temp.prefix.contains(std::path::is_separator) {
            return Err(ExecError::config("temp.prefix must not contain a path separator"));
        }
        if temp.random_len == 0 {
            return Err(ExecError::config("temp.random_len must be at least 1"));
        }
        if temp.random_len > 32 {
            return Err(ExecError::config("temp.random_len must be at most 32"));
        }
        if temp.max_attempts == 0 {
            return Err(ExecError::config("temp.max_attempts must be at least 1"));
        }
        if self.redirect == RedirectMode::Shell {
            self.check_quotable(ShellDialect::native())?;
        }
        Ok(())
    }

    fn check_quotable(&self, dialect: ShellDialect) -> Result<()> {
        dialect.quote(&self.temp.dir).map(drop).map_err(|e| {
            ExecError::config(format!("temp.dir {} is unusable: {e}", self.temp.dir.display()))
        })
    }
}
