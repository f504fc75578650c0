//! Context configuration.

use std::fmt;
use std::sync::Arc;

use keycrypt_core::env::{self, vars};

use crate::error::Result;
use crate::keychain::{CredentialStore, KeychainKind};

/// Operating system family, as far as keychain selection is concerned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    Darwin,
    Win32,
    Linux,
    Other(String),
}

impl Platform {
    /// The platform this binary runs on.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (`std::env::consts::OS` or its Node-style
    /// spelling) to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "darwin" => Self::Darwin,
            "windows" | "win32" => Self::Win32,
            "linux" => Self::Linux,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Darwin => "darwin",
            Self::Win32 => "win32",
            Self::Linux => "linux",
            Self::Other(os) => os,
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`crate::Crypto::create`].
#[derive(Clone)]
pub struct CryptoOptions {
    /// Platform used for keychain selection and failure diagnostics.
    pub platform: Platform,

    /// Credential store to read the key from. Resolved from the other
    /// options when `None`.
    pub keychain: Option<Arc<dyn CredentialStore>>,

    /// Backend to open when `keychain` is `None`. Derived from `platform`
    /// when unset.
    pub keychain_kind: Option<KeychainKind>,

    /// Prefer the generic key file over native keychains.
    pub use_generic_keychain: bool,

    /// Leave the key loaded when the context is closed. For contexts whose
    /// key lifetime is managed by someone else.
    pub no_reset_on_close: bool,
}

impl Default for CryptoOptions {
    fn default() -> Self {
        Self {
            platform: Platform::current(),
            keychain: None,
            keychain_kind: None,
            use_generic_keychain: env::get_bool(vars::KEYCRYPT_USE_GENERIC_KEYCHAIN),
            no_reset_on_close: false,
        }
    }
}

impl CryptoOptions {
    /// Defaults plus `KEYCRYPT_KEYCHAIN`, which must name a known backend.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            keychain_kind: env::parse_var(vars::KEYCRYPT_KEYCHAIN)?,
            ..Self::default()
        })
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_keychain(mut self, keychain: Arc<dyn CredentialStore>) -> Self {
        self.keychain = Some(keychain);
        self
    }

    pub fn with_keychain_kind(mut self, kind: KeychainKind) -> Self {
        self.keychain_kind = Some(kind);
        self
    }

    pub fn with_generic_keychain(mut self, use_generic: bool) -> Self {
        self.use_generic_keychain = use_generic;
        self
    }

    pub fn with_no_reset_on_close(mut self, no_reset: bool) -> Self {
        self.no_reset_on_close = no_reset;
        self
    }

    /// The backend these options select.
    pub fn resolved_kind(&self) -> KeychainKind {
        if let Some(store) = &self.keychain {
            return store.kind();
        }
        self.keychain_kind.unwrap_or_else(|| {
            KeychainKind::for_platform(&self.platform, self.use_generic_keychain)
        })
    }
}

impl fmt::Debug for CryptoOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoOptions")
            .field("platform", &self.platform)
            .field("keychain", &self.keychain.as_ref().map(|k| k.kind()))
            .field("keychain_kind", &self.keychain_kind)
            .field("use_generic_keychain", &self.use_generic_keychain)
            .field("no_reset_on_close", &self.no_reset_on_close)
            .finish()
    }
}
