use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Stable SHA-256 digest of a normalized object definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn of(definition: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalize_definition(definition).as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unifies line endings and strips surrounding whitespace. Interior
/// whitespace is significant.
pub fn normalize_definition(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}
