//! AES-256-GCM token encryption and its envelope format.
//!
//! An envelope is a single ASCII string:
//!
//! ```text
//! <nonce_hex><ciphertext_hex>:<tag_hex>
//! ```
//!
//! The nonce is 6 random bytes written as 12 hex characters; those 12
//! characters are themselves the 96-bit GCM nonce. The tag is the 16-byte
//! GCM authentication tag (32 hex characters). `:` never occurs in hex, so
//! splitting on it is unambiguous.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::{CryptoError, Result};

/// Random bytes per nonce.
pub const NONCE_BYTES: usize = 6;

/// Hex characters occupied by the nonce at the start of an envelope.
pub const NONCE_HEX_LEN: usize = NONCE_BYTES * 2;

const TAG_BYTES: usize = 16;

/// Hex characters occupied by the authentication tag.
pub const TAG_HEX_LEN: usize = TAG_BYTES * 2;

/// Separates the tag from the nonce and ciphertext.
pub const DELIMITER: char = ':';

/// Encrypt `plaintext` under `key`, returning an envelope.
///
/// Every call draws a fresh nonce, so equal plaintexts yield different
/// envelopes.
pub fn encrypt(key: &[u8], plaintext: &str) -> Result<String> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::EncryptionFailed(format!("invalid key: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_BYTES];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce_hex = hex::encode(nonce_bytes);

    let mut sealed = cipher
        .encrypt(Nonce::from_slice(nonce_hex.as_bytes()), plaintext.as_bytes())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    // aes-gcm appends the tag to the ciphertext.
    let tag = sealed.split_off(sealed.len() - TAG_BYTES);

    Ok(format!(
        "{nonce_hex}{}{DELIMITER}{}",
        hex::encode(&sealed),
        hex::encode(tag)
    ))
}

/// Decrypt an envelope produced by [`encrypt`].
///
/// Fails with [`CryptoError::InvalidEncryptedFormat`] unless the envelope
/// has exactly one delimiter, and with [`CryptoError::DecryptionError`] for
/// anything that keeps the tag from verifying. No plaintext is returned
/// unless authentication succeeds.
pub fn decrypt(key: &[u8], envelope: &str) -> Result<String> {
    let (body, tag_hex) = split_envelope(envelope).ok_or(CryptoError::InvalidEncryptedFormat)?;

    let (nonce, ciphertext_hex) = match (body.get(..NONCE_HEX_LEN), body.get(NONCE_HEX_LEN..)) {
        (Some(nonce), Some(rest)) => (nonce, rest),
        _ => return Err(CryptoError::decryption("envelope is shorter than its nonce")),
    };

    let mut sealed = hex::decode(ciphertext_hex)
        .map_err(|e| CryptoError::decryption(format!("ciphertext is not valid hex: {e}")))?;
    let tag = hex::decode(tag_hex)
        .map_err(|e| CryptoError::decryption(format!("tag is not valid hex: {e}")))?;
    if tag.len() != TAG_BYTES {
        return Err(CryptoError::decryption(format!(
            "tag must be {TAG_BYTES} bytes, got {}",
            tag.len()
        )));
    }
    sealed.extend_from_slice(&tag);

    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| CryptoError::decryption(format!("invalid key: {e}")))?;
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce.as_bytes()), sealed.as_slice())
        .map_err(|_| CryptoError::decryption("authentication failed"))?;

    String::from_utf8(plaintext).map_err(|e| {
        e.into_bytes().zeroize();
        CryptoError::decryption("plaintext is not valid UTF-8")
    })
}

/// Whether `text` is shaped like an envelope.
///
/// Only the structure is checked: one delimiter, a hex body long enough
/// for the nonce and holding whole ciphertext bytes, and a full-length hex
/// tag. Whether it decrypts depends on the key.
pub fn is_encrypted(text: &str) -> bool {
    let Some((body, tag)) = split_envelope(text) else {
        return false;
    };

    body.len() >= NONCE_HEX_LEN
        && (body.len() - NONCE_HEX_LEN) % 2 == 0
        && is_hex(body)
        && tag.len() == TAG_HEX_LEN
        && is_hex(tag)
}

/// Split into `(nonce + ciphertext, tag)`; `None` unless exactly two parts.
fn split_envelope(envelope: &str) -> Option<(&str, &str)> {
    let mut parts = envelope.split(DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(body), Some(tag), None) => Some((body, tag)),
        _ => None,
    }
}

fn is_hex(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_hexdigit())
}
