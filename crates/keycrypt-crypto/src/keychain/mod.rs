//! Credential store capability and its backends.
//!
//! The key lives in a single slot (`SERVICE_NAME` / `ACCOUNT_NAME`) of
//! whichever backend the configuration selects:
//!
//! - [`KeychainKind::MacOs`]: Security.framework generic password (macOS only)
//! - [`KeychainKind::Windows`]: Windows Credential Manager (Windows only)
//! - [`KeychainKind::Generic`]: a JSON key file under the keycrypt home
//! - [`KeychainKind::Memory`]: an in-process map, for tests and dry runs

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use keycrypt_core::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CryptoError, Result};
use crate::options::Platform;

pub mod generic;
pub mod memory;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

pub use generic::GenericKeychain;
pub use memory::MemoryKeychain;

/// Service name of the keycrypt key slot.
pub const SERVICE_NAME: &str = "keycrypt";

/// Account name of the keycrypt key slot.
pub const ACCOUNT_NAME: &str = "local";

/// A password returned by a credential store.
#[derive(Debug, Clone)]
pub struct Credential {
    pub account: String,
    pub password: SecretString,
}

/// Async access to a platform credential store.
///
/// Implementations report a missing entry as
/// [`CryptoError::PasswordNotFound`]; every other failure is passed
/// through for the caller to surface.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// The backend this store talks to.
    fn kind(&self) -> KeychainKind;

    /// Look up the password stored for `service`/`account`.
    async fn get_password(&self, service: &str, account: &str) -> Result<Credential>;

    /// Store `password` for `service`/`account`, replacing any existing one.
    async fn set_password(&self, service: &str, account: &str, password: &str)
        -> Result<Credential>;
}

/// Selects a [`CredentialStore`] backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeychainKind {
    MacOs,
    Windows,
    Generic,
    Memory,
}

impl KeychainKind {
    /// The backend used on `platform` when none is configured explicitly.
    ///
    /// Native stores are used on macOS and Windows unless `use_generic` is
    /// set; every other platform uses the generic key file.
    pub fn for_platform(platform: &Platform, use_generic: bool) -> Self {
        match platform {
            _ if use_generic => Self::Generic,
            Platform::Darwin => Self::MacOs,
            Platform::Win32 => Self::Windows,
            _ => Self::Generic,
        }
    }

    /// Whether this backend is the operating system's own credential vault.
    pub fn is_native(self) -> bool {
        matches!(self, Self::MacOs | Self::Windows)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MacOs => "macos",
            Self::Windows => "windows",
            Self::Generic => "generic",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for KeychainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeychainKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "macos" | "darwin" => Ok(Self::MacOs),
            "windows" | "win32" => Ok(Self::Windows),
            "generic" => Ok(Self::Generic),
            "memory" => Ok(Self::Memory),
            other => Err(format!(
                "unknown keychain '{other}' (expected macos, windows, generic or memory)"
            )),
        }
    }
}

/// Open the credential store for `kind`.
///
/// Native kinds fail with [`CryptoError::KeychainUnavailable`] on targets
/// they are not compiled for.
pub fn open(kind: KeychainKind) -> Result<Arc<dyn CredentialStore>> {
    debug!(keychain = %kind, "opening credential store");
    match kind {
        KeychainKind::Memory => Ok(Arc::new(MemoryKeychain::new())),
        KeychainKind::Generic => Ok(Arc::new(GenericKeychain::from_default_dir()?)),
        KeychainKind::MacOs => open_macos(),
        KeychainKind::Windows => open_windows(),
    }
}

#[cfg(target_os = "macos")]
fn open_macos() -> Result<Arc<dyn CredentialStore>> {
    Ok(Arc::new(macos::MacosKeychain))
}

#[cfg(not(target_os = "macos"))]
fn open_macos() -> Result<Arc<dyn CredentialStore>> {
    Err(CryptoError::KeychainUnavailable(
        "the macOS keychain is only available on macOS".to_string(),
    ))
}

#[cfg(target_os = "windows")]
fn open_windows() -> Result<Arc<dyn CredentialStore>> {
    Ok(Arc::new(windows::WindowsKeychain))
}

#[cfg(not(target_os = "windows"))]
fn open_windows() -> Result<Arc<dyn CredentialStore>> {
    Err(CryptoError::KeychainUnavailable(
        "the Windows credential manager is only available on Windows".to_string(),
    ))
}

/// Map a blocking-task join failure onto a keychain error.
#[cfg(any(target_os = "macos", target_os = "windows"))]
fn join_error(e: tokio::task::JoinError) -> CryptoError {
    CryptoError::KeychainError(format!("keychain task failed: {e}"))
}
