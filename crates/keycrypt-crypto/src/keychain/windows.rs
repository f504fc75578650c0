//! Windows Credential Manager integration via the `keyring` crate.

use async_trait::async_trait;
use keycrypt_core::SecretString;
use tracing::debug;

use super::{join_error, Credential, CredentialStore, KeychainKind};
use crate::error::{CryptoError, Result};

/// The credential manager of the current user.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WindowsKeychain;

fn entry(service: &str, account: &str) -> Result<keyring::Entry> {
    keyring::Entry::new(service, account)
        .map_err(|e| CryptoError::KeychainError(format!("failed to open credential: {e}")))
}

#[async_trait]
impl CredentialStore for WindowsKeychain {
    fn kind(&self) -> KeychainKind {
        KeychainKind::Windows
    }

    async fn get_password(&self, service: &str, account: &str) -> Result<Credential> {
        let (svc, acct) = (service.to_string(), account.to_string());
        let result = tokio::task::spawn_blocking(move || {
            entry(&svc, &acct).map(|e| e.get_password())
        })
        .await
        .map_err(join_error)??;

        match result {
            Ok(password) => {
                debug!(service, account, "read credential");
                Ok(Credential {
                    account: account.to_string(),
                    password: SecretString::new(password),
                })
            }
            Err(keyring::Error::NoEntry) => Err(CryptoError::not_found(service, account)),
            Err(e) => Err(CryptoError::KeychainError(format!(
                "credential read failed: {e}"
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
            entry(&svc, &acct)?
                .set_password(value.expose_secret())
                .map_err(|e| CryptoError::KeychainError(format!("credential write failed: {e}")))
        })
        .await
        .map_err(join_error)??;

        debug!(service, account, "wrote credential");
        Ok(Credential {
            account: account.to_string(),
            password: secret,
        })
    }
}
