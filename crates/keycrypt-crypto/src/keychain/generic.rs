//! File-backed credential store.
//!
//! Used where no native credential vault is available (or when
//! `KEYCRYPT_USE_GENERIC_KEYCHAIN` is set). The single key slot is kept as a
//! JSON document at `{base_dir}/key.json`:
//!
//! ```json
//! { "service": "keycrypt", "account": "local", "key": "..." }
//! ```
//!
//! A directory created here gets mode `0700` on Unix. The file is written to
//! a `0600` temporary sibling and renamed into place, so readers see either
//! the old key or the new one.

use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use keycrypt_core::SecretString;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::{Credential, CredentialStore, KeychainKind};
use crate::error::{CryptoError, Result};

/// On-disk representation of the key slot.
#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    service: String,
    account: String,
    key: SecretString,
}

/// A [`CredentialStore`] that keeps one entry in a JSON file.
#[derive(Debug, Clone)]
pub struct GenericKeychain {
    path: PathBuf,
}

impl GenericKeychain {
    /// Create a store backed by the file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Create a store at the default location (`~/.keycrypt/key.json`, or
    /// under `KEYCRYPT_HOME`).
    pub fn from_default_dir() -> Result<Self> {
        Ok(Self::new(keycrypt_core::paths::key_file()?))
    }

    /// Path of the key file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists. Only a directory created here is
    /// restricted to the owner; an existing one keeps its permissions.
    async fn ensure_dir(&self) -> Result<()> {
        let dir = key_dir(&self.path);
        match tokio::fs::metadata(dir).await {
            Ok(_) => return Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(dir).await?;
        debug!(dir = %dir.display(), "created key directory");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            tokio::fs::set_permissions(dir, perms).await?;
        }

        Ok(())
    }
}

fn key_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

/// Replace the key file with `data`: write a 0600 temporary file next to it,
/// flush it, then rename it over `path`. The temporary file is removed if any
/// step fails.
async fn write_key_file(path: &Path, data: Zeroizing<Vec<u8>>) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut file = NamedTempFile::new_in(key_dir(&path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(&data)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;
        Ok(())
    })
    .await
    .map_err(|e| CryptoError::Io(std::io::Error::other(e)))?
}

#[async_trait]
impl CredentialStore for GenericKeychain {
    fn kind(&self) -> KeychainKind {
        KeychainKind::Generic
    }

    async fn get_password(&self, service: &str, account: &str) -> Result<Credential> {
        let data = match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Zeroizing::new(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no key file");
                return Err(CryptoError::not_found(service, account));
            }
            Err(e) => return Err(e.into()),
        };

        let stored: KeyFile = serde_json::from_str(&data)?;
        if stored.service != service || stored.account != account {
            warn!(
                path = %self.path.display(),
                stored_service = %stored.service,
                stored_account = %stored.account,
                "key file belongs to a different slot"
            );
            return Err(CryptoError::not_found(service, account));
        }

        debug!(path = %self.path.display(), "read key file");
        Ok(Credential {
            account: stored.account.clone(),
            password: stored.key,
        })
    }

    async fn set_password(
        &self,
        service: &str,
        account: &str,
        password: &str,
    ) -> Result<Credential> {
        self.ensure_dir().await?;

        let stored = KeyFile {
            service: service.to_string(),
            account: account.to_string(),
            key: SecretString::new(password),
        };
        let json = Zeroizing::new(serde_json::to_vec_pretty(&stored)?);

        debug!(path = %self.path.display(), "writing key file");
        write_key_file(&self.path, json).await?;

        Ok(Credential {
            account: stored.account.clone(),
            password: stored.key.clone(),
        })
    }
}
