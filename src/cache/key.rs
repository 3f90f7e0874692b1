//! Cache key generation.

use crate::types::Language;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Credential-agnostic key for a `(count, language)` pair.
    pub fn for_request(count: u8, language: Language) -> Self {
        Self::new(format!("quotes:{}:{}", count, language))
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}

impl From<&str> for CacheKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CacheKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Derives cache keys from request parameters.
///
/// By default the key is `(count, language)` only, so every caller asking for
/// the same pair shares one entry regardless of credential. With
/// `per_credential` a SHA-256 fingerprint of the credential is appended.
#[derive(Debug, Clone, Default)]
pub struct CacheKeyGenerator {
    per_credential: bool,
}

impl CacheKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn per_credential(mut self, enabled: bool) -> Self {
        self.per_credential = enabled;
        self
    }

    pub fn generate(&self, count: u8, language: Language, credential: &str) -> CacheKey {
        let base = CacheKey::for_request(count, language);
        if !self.per_credential {
            return base;
        }
        CacheKey::new(format!("{}:{}", base.hash, fingerprint(credential)))
    }
}

/// First 16 hex chars of the SHA-256 of `secret`.
fn fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    digest.iter().take(8).map(|b| format!("{:02x}", b)).collect()
}
