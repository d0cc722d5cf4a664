//! ID generator port for the random part of temp file names.

/// Generates name suffixes.
///
/// Abstracting the random source lets tests force name collisions.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier of ASCII alphanumerics, at least 32 long.
    fn generate_id(&self) -> String;
}
