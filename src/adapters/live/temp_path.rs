//! Live temp path generators.
//!
//! Names are `<dir>/<prefix><random>`, the random part cut from an
//! [`IdGenerator`] id to `random_len` characters.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::id_gen::LiveIdGenerator;
use crate::config::{TempConfig, TempStrategy};
use crate::error::{ExecError, Result};
use crate::ports::{IdGenerator, TempPathGenerator};

fn candidate(config: &TempConfig, ids: &dyn IdGenerator) -> PathBuf {
    let id = ids.generate_id();
    let random: String = id.chars().take(config.random_len).collect();
    config.dir.join(format!("{}{random}", config.prefix))
}

/// Claims names with an atomic create-new open, like `mkstemp`.
///
/// Two concurrent callers can never receive the same path: the open fails
/// with `AlreadyExists` for everyone but the first.
pub struct ExclusiveTempFiles {
    config: TempConfig,
    ids: Box<dyn IdGenerator>,
}

impl ExclusiveTempFiles {
    /// Creates a generator using random UUIDs for names.
    #[must_use]
    pub fn new(config: TempConfig) -> Self {
        Self::with_ids(config, Box::new(LiveIdGenerator::new()))
    }

    /// Creates a generator drawing names from `ids`.
    #[must_use]
    pub fn with_ids(config: TempConfig, ids: Box<dyn IdGenerator>) -> Self {
        Self { config, ids }
    }

    fn create_new(path: &Path) -> std::io::Result<File> {
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        options.open(path)
    }
}

impl TempPathGenerator for ExclusiveTempFiles {
    fn generate(&self) -> Result<PathBuf> {
        for _ in 0..self.config.max_attempts {
            let path = candidate(&self.config, self.ids.as_ref());
            match Self::create_new(&path) {
                Ok(_file) => {
                    debug!(path = %path.display(), "created temp capture file");
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "temp name taken, retrying");
                }
                Err(source) => {
                    return Err(ExecError::TempFileCreation { dir: self.config.dir.clone(), source })
                }
            }
        }
        Err(ExecError::TempNamesExhausted {
            dir: self.config.dir.clone(),
            attempts: self.config.max_attempts,
        })
    }
}

/// Picks a currently unused name, then creates the file.
///
/// Weaker than [`ExclusiveTempFiles`]: the existence check and the create are
/// separate steps, so a concurrent process can claim the same name in
/// between and both will write to one file. Only for filesystems without
/// exclusive create.
pub struct NameOnlyTempPaths {
    config: TempConfig,
    ids: Box<dyn IdGenerator>,
}

impl NameOnlyTempPaths {
    /// Creates a generator using random UUIDs for names.
    #[must_use]
    pub fn new(config: TempConfig) -> Self {
        Self::with_ids(config, Box::new(LiveIdGenerator::new()))
    }

    /// Creates a generator drawing names from `ids`.
    #[must_use]
    pub fn with_ids(config: TempConfig, ids: Box<dyn IdGenerator>) -> Self {
        Self { config, ids }
    }
}

impl TempPathGenerator for NameOnlyTempPaths {
    fn generate(&self) -> Result<PathBuf> {
        warn!(dir = %self.config.dir.display(), "using non-atomic temp file naming");
        for _ in 0..self.config.max_attempts {
            let path = candidate(&self.config, self.ids.as_ref());
            if path.exists() {
                continue;
            }
            return match File::create(&path) {
                Ok(_file) => {
                    debug!(path = %path.display(), "created temp capture file (name-only)");
                    Ok(path)
                }
                Err(source) => {
                    Err(ExecError::TempFileCreation { dir: self.config.dir.clone(), source })
                }
            };
        }
        Err(ExecError::TempNamesExhausted {
            dir: self.config.dir.clone(),
            attempts: self.config.max_attempts,
        })
    }
}

/// Returns the generator selected by `config.strategy`.
#[must_use]
pub fn temp_generator(config: TempConfig) -> Box<dyn TempPathGenerator> {
    match config.strategy {
        TempStrategy::Exclusive => Box::new(ExclusiveTempFiles::new(config)),
        TempStrategy::NameOnly => Box::new(NameOnlyTempPaths::new(config)),
    }
}
