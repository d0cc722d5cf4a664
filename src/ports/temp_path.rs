//! Temp path port for producing fresh capture files.

use std::path::PathBuf;

use crate::error::Result;

/// Produces unique temporary file paths.
pub trait TempPathGenerator: Send + Sync {
    /// Returns a path at which an empty, writable file now exists.
    ///
    /// # Errors
    ///
    /// Returns a temp-file creation error when no file could be created.
    fn generate(&self) -> Result<PathBuf>;
}
