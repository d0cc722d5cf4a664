//! Random name source for temp capture files.

use uuid::Uuid;

use crate::ports::IdGenerator;

/// Draws temp-name suffixes from v4 UUIDs in 32-digit hex form.
///
/// Hex keeps the suffix free of characters that need shell quoting and
/// long enough for any configured `random_len`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveIdGenerator;

impl LiveIdGenerator {
    /// Creates the generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for LiveIdGenerator {
    fn generate_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixes_cover_max_random_len_in_hex() {
        let ids = LiveIdGenerator::new();
        let suffix = ids.generate_id();
        assert_eq!(suffix.len(), 32);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_prefixes_still_differ() {
        let ids = LiveIdGenerator::new();
        let seen: std::collections::HashSet<String> =
            (0..64).map(|_| ids.generate_id()[..6].to_string()).collect();
        assert!(seen.len() > 60);
    }
}
