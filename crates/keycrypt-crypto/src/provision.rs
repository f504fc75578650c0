//! Key acquisition with first-use provisioning.
//!
//! The key is read from the credential store. When the store has no entry
//! yet, a fresh key is generated, written, and read back, at most once per
//! acquisition: a store that drops the write cannot send us into a loop.

use std::sync::Arc;

use rand::RngCore;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::error::{CryptoError, Result};
use crate::keychain::{CredentialStore, ACCOUNT_NAME, SERVICE_NAME};

/// Random bytes behind a generated key. Hex encoding doubles this into the
/// 32 characters AES-256 takes as its key.
const KEY_ENTROPY_BYTES: usize = 16;

/// Key length the cipher suite expects.
const EXPECTED_KEY_LEN: usize = 32;

/// Progress of a single acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProvisionState {
    Initial,
    KeySetRetried,
}

/// Fetches the key from a [`CredentialStore`], creating it on first use.
pub struct KeyProvisioner {
    store: Arc<dyn CredentialStore>,
    service: String,
    account: String,
}

impl KeyProvisioner {
    /// Provision the default keycrypt slot of `store`.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self::with_slot(store, SERVICE_NAME, ACCOUNT_NAME)
    }

    /// Provision an explicit `service`/`account` slot of `store`.
    pub fn with_slot(
        store: Arc<dyn CredentialStore>,
        service: impl Into<String>,
        account: impl Into<String>,
    ) -> Self {
        Self {
            store,
            service: service.into(),
            account: account.into(),
        }
    }

    /// Return the stored key, generating and storing one if none exists.
    ///
    /// A missing entry triggers exactly one write and one re-read. If the
    /// entry is still missing afterwards this fails with
    /// [`CryptoError::KeyAcquisitionFailed`]. Any other store error is
    /// returned as is.
    pub async fn acquire(&self) -> Result<Zeroizing<Vec<u8>>> {
        let mut state = ProvisionState::Initial;

        loop {
            match self.store.get_password(&self.service, &self.account).await {
                Ok(credential) => {
                    debug!(
                        service = %self.service,
                        account = %self.account,
                        keychain = %self.store.kind(),
                        "loaded key from credential store"
                    );
                    let key = credential.password.into_bytes();
                    if key.len() != EXPECTED_KEY_LEN {
                        warn!(
                            len = key.len(),
                            expected = EXPECTED_KEY_LEN,
                            "stored key has an unexpected length"
                        );
                    }
                    return Ok(key);
                }
                Err(e) if e.is_not_found() && state == ProvisionState::KeySetRetried => {
                    warn!(
                        service = %self.service,
                        account = %self.account,
                        keychain = %self.store.kind(),
                        "credential store did not keep the provisioned key"
                    );
                    return Err(CryptoError::KeyAcquisitionFailed {
                        service: self.service.clone(),
                        account: self.account.clone(),
                        source: Box::new(e),
                    });
                }
                Err(e) if e.is_not_found() => {
                    info!(
                        service = %self.service,
                        account = %self.account,
                        keychain = %self.store.kind(),
                        "no key found; provisioning a new one"
                    );
                    let key = generate_key();
                    self.store
                        .set_password(&self.service, &self.account, &key)
                        .await?;
                    state = ProvisionState::KeySetRetried;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Generate fresh key material: 16 random bytes, hex-encoded.
pub fn generate_key() -> Zeroizing<String> {
    let mut bytes = Zeroizing::new([0u8; KEY_ENTROPY_BYTES]);
    rand::thread_rng().fill_bytes(&mut *bytes);
    Zeroizing::new(hex::encode(&*bytes))
}
