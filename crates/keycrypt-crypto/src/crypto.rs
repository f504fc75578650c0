//! The encryption context: one key, loaded once, cleared on close.

use tracing::{debug, info};

use crate::cell::KeyCell;
use crate::cipher;
use crate::error::{CryptoError, Result};
use crate::keychain::{self, KeychainKind};
use crate::options::{CryptoOptions, Platform};
use crate::provision::KeyProvisioner;

/// Guidance attached to decryption failures when the key came from the
/// macOS login keychain, which can fall out of sync with values encrypted
/// under an older key.
const MAC_KEYCHAIN_HINT: &str = "The macOS keychain may be out of sync with the stored value. \
     Remove the 'keycrypt' keychain item and re-authenticate, or set \
     KEYCRYPT_USE_GENERIC_KEYCHAIN=true to use the generic key file";

/// Encrypts and decrypts secret strings with a keychain-held key.
///
/// Created by [`Crypto::create`], which loads (or provisions) the key. After
/// [`Crypto::close`] the key is gone and every operation fails with
/// [`CryptoError::KeyUnavailable`]. Dropping the context zeroes the key
/// regardless of `no_reset_on_close`.
#[derive(Debug)]
pub struct Crypto {
    key: KeyCell,
    platform: Platform,
    keychain: KeychainKind,
    no_reset_on_close: bool,
}

impl Crypto {
    /// Build a context and load its key.
    pub async fn create(options: CryptoOptions) -> Result<Self> {
        let kind = options.resolved_kind();
        let store = match options.keychain {
            Some(store) => store,
            None => keychain::open(kind)?,
        };

        let mut key = KeyCell::new();
        key.consume(KeyProvisioner::new(store).acquire().await?);
        info!(platform = %options.platform, keychain = %kind, "encryption key loaded");

        Ok(Self {
            key,
            platform: options.platform,
            keychain: kind,
            no_reset_on_close: options.no_reset_on_close,
        })
    }

    /// Create a context, run `f` with it, and close it again, whether `f`
    /// succeeds or not.
    pub async fn scoped<T, F>(options: CryptoOptions, f: F) -> Result<T>
    where
        F: FnOnce(&Crypto) -> Result<T>,
    {
        let mut crypto = Self::create(options).await?;
        let result = f(&crypto);
        crypto.close();
        result
    }

    /// Encrypt `text`. `None` passes through as `Ok(None)`.
    pub fn encrypt(&self, text: Option<&str>) -> Result<Option<String>> {
        let Some(text) = text else {
            return Ok(None);
        };
        self.key.with_value(|key| cipher::encrypt(key, text))?.map(Some)
    }

    /// Decrypt an envelope. `None` passes through as `Ok(None)`.
    pub fn decrypt(&self, envelope: Option<&str>) -> Result<Option<String>> {
        let Some(envelope) = envelope else {
            return Ok(None);
        };
        self.key
            .with_value(|key| cipher::decrypt(key, envelope))?
            .map(Some)
            .map_err(|e| self.diagnose(e))
    }

    /// Whether `text` is shaped like an envelope. Does not use the key.
    pub fn is_encrypted(&self, text: &str) -> bool {
        cipher::is_encrypted(text)
    }

    /// Whether a key is loaded.
    pub fn is_ready(&self) -> bool {
        self.key.is_loaded()
    }

    /// The backend the key was loaded from.
    pub fn keychain_kind(&self) -> KeychainKind {
        self.keychain
    }

    /// Clear the key. A no-op when `no_reset_on_close` is set, and safe to
    /// call more than once.
    pub fn close(&mut self) {
        if self.no_reset_on_close {
            debug!("close requested; key lifetime is managed elsewhere");
            return;
        }
        self.key.clear();
        debug!("encryption key cleared");
    }

    fn diagnose(&self, err: CryptoError) -> CryptoError {
        if self.platform == Platform::Darwin && self.keychain == KeychainKind::MacOs {
            err.with_hint(MAC_KEYCHAIN_HINT)
        } else {
            err
        }
    }
}
