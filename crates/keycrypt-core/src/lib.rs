//! # keycrypt-core
//!
//! Shared plumbing for the keycrypt crates:
//!
//! - **Environment**: typed access to `KEYCRYPT_*` variables
//! - **Paths**: resolution of the keycrypt home directory and key file
//! - **Secrets**: [`SecretString`], a zeroed-on-drop string for credentials

pub mod env;
pub mod error;
pub mod paths;
pub mod secret;

// Re-exports for convenience
pub use error::{ConfigError, Result};
pub use secret::SecretString;
