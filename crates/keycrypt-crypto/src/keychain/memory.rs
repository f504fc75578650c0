//! In-process credential store.
//!
//! Nothing is persisted. Call counters and failure switches make it the
//! store of choice for exercising provisioning in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use keycrypt_core::SecretString;
use tokio::sync::Mutex;
use tracing::debug;

use super::{Credential, CredentialStore, KeychainKind};
use crate::error::{CryptoError, Result};

/// A [`CredentialStore`] backed by a map in memory.
#[derive(Debug, Default)]
pub struct MemoryKeychain {
    entries: Mutex<HashMap<(String, String), SecretString>>,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    discard_writes: bool,
    read_failure: Option<String>,
}

impl MemoryKeychain {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `password` for `service`/`account`.
    pub fn with_password(service: &str, account: &str, password: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            (service.to_string(), account.to_string()),
            SecretString::new(password),
        );
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Create a store that accepts writes but never keeps them.
    pub fn discarding() -> Self {
        Self {
            discard_writes: true,
            ..Self::default()
        }
    }

    /// Create a store whose reads always fail with a keychain error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            read_failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of `get_password` calls served so far.
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    /// Number of `set_password` calls served so far.
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MemoryKeychain {
    fn kind(&self) -> KeychainKind {
        KeychainKind::Memory
    }

    async fn get_password(&self, service: &str, account: &str) -> Result<Credential> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(message) = &self.read_failure {
            return Err(CryptoError::KeychainError(message.clone()));
        }

        let entries = self.entries.lock().await;
        let password = entries
            .get(&(service.to_string(), account.to_string()))
            .cloned()
            .ok_or_else(|| CryptoError::not_found(service, account))?;

        Ok(Credential {
            account: account.to_string(),
            password,
        })
    }

    async fn set_password(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<Credential> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);

        if self.discard_writes {
            debug!(service, account, "discarding credential write");
        } else {
            self.entries.lock().await.insert(
                (service.to_string(), account.to_string()),
                SecretString::new(password),
            );
        }

        Ok(Credential {
            account: account.to_string(),
            password: SecretString::new(password),
        })
    }
}
