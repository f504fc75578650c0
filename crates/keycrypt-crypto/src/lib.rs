//! Keychain-backed encryption of small secrets for keycrypt.
//!
//! A single AES-256-GCM key lives in the platform credential store. It is
//! provisioned on first use, held in a zeroing [`KeyCell`] while a
//! [`Crypto`] context is open, and cleared when the context closes.
//!
//! ```no_run
//! # async fn demo() -> keycrypt_crypto::Result<()> {
//! use keycrypt_crypto::{Crypto, CryptoOptions};
//!
//! let mut crypto = Crypto::create(CryptoOptions::from_env()?).await?;
//! let envelope = crypto.encrypt(Some("refresh-token"))?;
//! let token = crypto.decrypt(envelope.as_deref())?;
//! crypto.close();
//! # Ok(())
//! # }
//! ```

pub mod cell;
pub mod cipher;
pub mod crypto;
pub mod error;
pub mod keychain;
pub mod options;
pub mod provision;

pub use cell::KeyCell;
pub use cipher::is_encrypted;
pub use crypto::Crypto;
pub use error::{CryptoError, Result};
pub use keychain::{Credential, CredentialStore, KeychainKind, ACCOUNT_NAME, SERVICE_NAME};
pub use options::{CryptoOptions, Platform};
pub use provision::KeyProvisioner;
