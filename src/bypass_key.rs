//! Bypass-key lifecycle
//!
//! A symmetric shared secret lets a generated proxy call back into the origin
//! server without the normal session/CSRF machinery; proxy and origin are
//! presumed to share a trusted host. Every full generation run rotates the key
//! exactly once, so files from the same run share a secret and files from
//! different runs never do.

use std::fs;
use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::error::GenResult;

/// Number of random bytes in a key (hex-encoded to twice this length)
pub const KEY_BYTES: usize = 32;

/// HTTP header the generated proxy presents the secret in
pub const BYPASS_HEADER: &str = "X-Bypass-CSRF";

/// Manages generation, persistence, and rotation of the bypass secret
#[derive(Debug, Clone)]
pub struct BypassKeyManager {
    key_path: PathBuf,
}

impl BypassKeyManager {
    /// Create a manager bound to the configured key path
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }

    /// The path the secret is persisted at
    #[must_use]
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    /// Produce a fresh cryptographically random key, hex-encoded
    #[must_use]
    pub fn generate() -> String {
        let mut bytes = [0u8; KEY_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let mut key = String::with_capacity(KEY_BYTES * 2);
        for byte in bytes {
            key.push_str(&format!("{byte:02x}"));
        }
        key
    }

    /// Persist a key, creating parent directories as needed
    ///
    /// # Errors
    ///
    /// Returns an IO error if the directory or file cannot be written.
    pub fn save(&self, key: &str) -> GenResult<()> {
        if let Some(parent) = self.key_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.key_path, key)?;
        Ok(())
    }

    /// Load the persisted key, if one exists
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file exists but cannot be read.
    pub fn load(&self) -> GenResult<Option<String>> {
        if !self.key_path.exists() {
            return Ok(None);
        }
        let key = fs::read_to_string(&self.key_path)?;
        Ok(Some(key.trim().to_string()))
    }

    /// The persisted key, generating and persisting one if absent
    ///
    /// # Errors
    ///
    /// Returns an IO error if loading or saving fails.
    pub fn current_or_new(&self) -> GenResult<String> {
        if let Some(key) = self.load()? {
            return Ok(key);
        }
        let key = Self::generate();
        self.save(&key)?;
        Ok(key)
    }

    /// Generate and persist a new key, invalidating the previous one
    ///
    /// # Errors
    ///
    /// Returns an IO error if the new key cannot be persisted.
    pub fn rotate(&self) -> GenResult<String> {
        let key = Self::generate();
        self.save(&key)?;
        Ok(key)
    }

    /// Check a presented header value against the stored key
    ///
    /// Used by the origin server when deciding whether to honor a bypass
    /// request. Comparison inspects every byte regardless of where the first
    /// mismatch occurs.
    #[must_use]
    pub fn verify(&self, presented: &str) -> bool {
        let Ok(Some(stored)) = self.load() else {
            return false;
        };
        if presented.len() != stored.len() {
            return false;
        }
        presented
            .bytes()
            .zip(stored.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
