//! Property-based tests for the envelope cipher
//!
//! 1. **Round-trip**: decrypt(encrypt(s)) == s for every UTF-8 string
//! 2. **Fresh nonces**: encrypting the same input twice never repeats
//! 3. **Tamper detection**: any flipped bit in ciphertext or tag is rejected
//! 4. **Structure**: strings without exactly one delimiter never decrypt

use keycrypt_crypto::cipher::{self, DELIMITER, NONCE_HEX_LEN};
use keycrypt_crypto::CryptoError;
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    // Keys are 32 hex characters, as provisioned.
    proptest::collection::vec(any::<u8>(), 16).prop_map(|b| hex::encode(b).into_bytes())
}

/// Flip one bit of the byte at `byte` in a hex string.
fn flip_hex_bit(hex_str: &str, byte: usize, bit: u8) -> String {
    let mut bytes = hex::decode(hex_str).unwrap();
    bytes[byte] ^= 1 << bit;
    hex::encode(bytes)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(key in key_strategy(), text in any::<String>()) {
        let envelope = cipher::encrypt(&key, &text).unwrap();
        prop_assert!(cipher::is_encrypted(&envelope));
        prop_assert_eq!(cipher::decrypt(&key, &envelope).unwrap(), text);
    }

    #[test]
    fn prop_nonces_are_fresh(key in key_strategy(), text in ".{0,64}") {
        let a = cipher::encrypt(&key, &text).unwrap();
        let b = cipher::encrypt(&key, &text).unwrap();
        prop_assert_ne!(a, b);
    }

    #[test]
    fn prop_tampered_ciphertext_is_rejected(
        key in key_strategy(),
        text in ".{1,64}",
        index in any::<prop::sample::Index>(),
        bit in 0u8..8,
    ) {
        let envelope = cipher::encrypt(&key, &text).unwrap();
        let (body, tag) = envelope.split_once(DELIMITER).unwrap();
        let (nonce, ciphertext) = body.split_at(NONCE_HEX_LEN);

        let byte = index.index(ciphertext.len() / 2);
        let tampered = format!("{nonce}{}:{tag}", flip_hex_bit(ciphertext, byte, bit));

        let result = cipher::decrypt(&key, &tampered);
        prop_assert!(
            matches!(result, Err(CryptoError::DecryptionError { .. })),
            "expected DecryptionError, got {:?}",
            result
        );
    }

    #[test]
    fn prop_tampered_tag_is_rejected(
        key in key_strategy(),
        text in ".{0,64}",
        byte in 0usize..16,
        bit in 0u8..8,
    ) {
        let envelope = cipher::encrypt(&key, &text).unwrap();
        let (body, tag) = envelope.split_once(DELIMITER).unwrap();
        let tampered = format!("{body}:{}", flip_hex_bit(tag, byte, bit));

        let result = cipher::decrypt(&key, &tampered);
        prop_assert!(
            matches!(result, Err(CryptoError::DecryptionError { .. })),
            "expected DecryptionError, got {:?}",
            result
        );
    }

    #[test]
    fn prop_wrong_delimiter_count_is_malformed(
        key in key_strategy(),
        parts in proptest::collection::vec("[0-9a-f]{0,16}", 0..6),
    ) {
        prop_assume!(parts.len() != 2);
        let text = parts.join(":");
        prop_assume!(text.matches(DELIMITER).count() != 1);

        let result = cipher::decrypt(&key, &text);
        prop_assert!(matches!(result, Err(CryptoError::InvalidEncryptedFormat)));
    }
}
