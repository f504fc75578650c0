//! Path resolution utilities.

use std::path::PathBuf;

use crate::env::{self, vars};
use crate::error::ConfigError;

/// Name of the file holding the generic keychain entry.
pub const KEY_FILE_NAME: &str = "key.json";

/// Get the keycrypt base directory.
///
/// `KEYCRYPT_HOME` wins when set and must be absolute; otherwise
/// `~/.keycrypt` is used.
pub fn base_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = env::get_var(vars::KEYCRYPT_HOME) {
        let path = PathBuf::from(home);
        if !path.is_absolute() {
            return Err(ConfigError::InvalidPath(path));
        }
        return Ok(path);
    }

    let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(home.join(".keycrypt"))
}

/// Get the generic keychain key file path (`<base_dir>/key.json`).
pub fn key_file() -> Result<PathBuf, ConfigError> {
    Ok(base_dir()?.join(KEY_FILE_NAME))
}
