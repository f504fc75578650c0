//! Shared fixtures for the keycrypt integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use keycrypt_crypto::keychain::GenericKeychain;
use keycrypt_crypto::{CryptoOptions, Platform};
use tempfile::TempDir;

/// A generic keychain rooted in a fresh temporary directory.
pub struct KeyFileFixture {
    pub dir: TempDir,
}

impl KeyFileFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn key_path(&self) -> PathBuf {
        self.dir.path().join("key.json")
    }

    pub fn keychain(&self) -> Arc<GenericKeychain> {
        Arc::new(GenericKeychain::new(self.key_path()))
    }

    /// Options for a Linux context reading from this fixture's key file.
    pub fn options(&self) -> CryptoOptions {
        CryptoOptions::default()
            .with_platform(Platform::Linux)
            .with_keychain(self.keychain())
    }
}

impl Default for KeyFileFixture {
    fn default() -> Self {
        Self::new()
    }
}
