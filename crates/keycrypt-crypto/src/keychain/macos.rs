//! macOS Keychain integration via Security.framework.
//!
//! The key is stored as a generic password item. Security.framework calls
//! block on the keychain daemon, so each one runs on the blocking pool.

use async_trait::async_trait;
use keycrypt_core::SecretString;
use security_framework::passwords::{get_generic_password, set_generic_password};
use tracing::debug;

use super::{join_error, Credential, CredentialStore, KeychainKind};
use crate::error::{CryptoError, Result};

/// `errSecItemNotFound`: the expected "not stored yet" status.
const ERR_SEC_ITEM_NOT_FOUND: i32 = -25300;

/// The login keychain of the current user.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MacosKeychain;

#[async_trait]
impl CredentialStore for MacosKeychain {
    fn kind(&self) -> KeychainKind {
        KeychainKind::MacOs
    }

    async fn get_password(&self, service: &str, account: &str) -> Result<Credential> {
        let (svc, acct) = (service.to_string(), account.to_string());
        let result = tokio::task::spawn_blocking(move || get_generic_password(&svc, &acct))
            .await
            .map_err(join_error)?;

        match result {
            Ok(data) => {
                let password = String::from_utf8(data).map_err(|_| {
                    CryptoError::KeychainError("keychain item is not valid UTF-8".to_string())
                })?;
                debug!(service, account, "read keychain item");
                Ok(Credential {
                    account: account.to_string(),
                    password: SecretString::new(password),
                })
            }
            Err(e) if e.code() == ERR_SEC_ITEM_NOT_FOUND => {
                Err(CryptoError::not_found(service, account))
            }
            Err(e) => Err(CryptoError::KeychainError(format!(
                "keychain read failed: {e}"
            ))),
        }
    }

    async fn set_password(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<Credential> {
        let secret = SecretString::new(password);
        let (svc, acct, value) = (service.to_string(), account.to_string(), secret.clone());
        tokio::task::spawn_blocking(move || {
            set_generic_password(&svc, &acct, value.expose_secret().as_bytes())
        })
        .await
        .map_err(join_error)?
        .map_err(|e| CryptoError::KeychainError(format!("keychain write failed: {e}")))?;

        debug!(service, account, "wrote keychain item");
        Ok(Credential {
            account: account.to_string(),
            password: secret,
        })
    }
}
