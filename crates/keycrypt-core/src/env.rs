//! Environment variable handling.

use std::env;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable as a boolean.
///
/// `1`, `true`, `yes` and `on` (any case) are true; everything else,
/// including an unset variable, is false.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| parse_bool(&v))
        .unwrap_or(false)
}

/// Parse an environment variable with [`FromStr`].
///
/// Returns `Ok(None)` when the variable is unset and an
/// [`ConfigError::InvalidValue`] when it is set but does not parse.
pub fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_var(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name: name.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Environment variable names read by keycrypt.
pub mod vars {
    /// Keycrypt home directory override (default `~/.keycrypt`).
    pub const KEYCRYPT_HOME: &str = "KEYCRYPT_HOME";

    /// Force the file-backed generic keychain on every platform.
    pub const KEYCRYPT_USE_GENERIC_KEYCHAIN: &str = "KEYCRYPT_USE_GENERIC_KEYCHAIN";

    /// Explicit keychain backend (`macos`, `windows`, `generic`, `memory`).
    pub const KEYCRYPT_KEYCHAIN: &str = "KEYCRYPT_KEYCHAIN";

    /// CLI log filter.
    pub const KEYCRYPT_LOG: &str = "KEYCRYPT_LOG";
}
