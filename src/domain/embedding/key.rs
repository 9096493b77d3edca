//! Content-addressed keys for cached embeddings

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowercase hex MD5 digest of the embedded text.
///
/// Identical text always maps to the same key; the key never depends on
/// subject or request parameters, so one vector serves every subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingKey(String);

impl EmbeddingKey {
    /// Derive the key for a piece of text
    pub fn from_text(text: &str) -> Self {
        Self(format!("{:x}", md5::compute(text.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmbeddingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_md5_hex() {
        let key = EmbeddingKey::from_text("what is tcp");

        assert_eq!(key.as_str().len(), 32);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key.as_str(), key.as_str().to_lowercase());
    }

    #[test]
    fn test_known_digest() {
        let key = EmbeddingKey::from_text("");
        assert_eq!(key.as_str(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_key_is_deterministic() {
        assert_eq!(
            EmbeddingKey::from_text("explain deadlock"),
            EmbeddingKey::from_text("explain deadlock")
        );
        assert_ne!(
            EmbeddingKey::from_text("explain deadlock"),
            EmbeddingKey::from_text("Explain deadlock")
        );
    }
}
