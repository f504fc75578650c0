//! Error types for key acquisition and token encryption.

use thiserror::Error;

/// Errors that can occur while acquiring the key or encrypting values.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("No encryption key is loaded")]
    KeyUnavailable,

    #[error("Failed to acquire encryption key for {service}/{account}")]
    KeyAcquisitionFailed {
        service: String,
        account: String,
        #[source]
        source: Box<CryptoError>,
    },

    #[error("Invalid encrypted value: expected <nonce><ciphertext>:<tag>")]
    InvalidEncryptedFormat,

    #[error("Decryption failed: {cause}{}", hint_suffix(.hint))]
    DecryptionError { cause: String, hint: Option<String> },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("No password stored for {service}/{account}")]
    PasswordNotFound { service: String, account: String },

    #[error("Keychain error: {0}")]
    KeychainError(String),

    #[error("Keychain unavailable: {0}")]
    KeychainUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(#[from] keycrypt_core::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CryptoError {
    pub(crate) fn decryption(cause: impl Into<String>) -> Self {
        Self::DecryptionError {
            cause: cause.into(),
            hint: None,
        }
    }

    pub(crate) fn not_found(service: &str, account: &str) -> Self {
        Self::PasswordNotFound {
            service: service.to_string(),
            account: account.to_string(),
        }
    }

    /// Attach remediation guidance to a [`CryptoError::DecryptionError`].
    ///
    /// Other variants are returned unchanged.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        match self {
            Self::DecryptionError { cause, .. } => Self::DecryptionError {
                cause,
                hint: Some(hint.into()),
            },
            other => other,
        }
    }

    /// Remediation guidance attached to a decryption failure, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::DecryptionError { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }

    /// Whether this is the credential store's "no such entry" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PasswordNotFound { .. })
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_deref()
        .map(|h| format!(". {h}"))
        .unwrap_or_default()
}

/// Convenience result alias for crypto operations.
pub type Result<T> = std::result::Result<T, CryptoError>;
