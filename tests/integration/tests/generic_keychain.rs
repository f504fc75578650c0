//! Key provisioning against the file-backed keychain.
//!
//! These tests run the full create -> encrypt -> close -> create -> decrypt
//! cycle to verify a provisioned key survives across contexts.

use keycrypt_crypto::{Crypto, CryptoError, ACCOUNT_NAME, SERVICE_NAME};
use keycrypt_integration_tests::KeyFileFixture;

#[tokio::test]
async fn test_first_use_writes_key_file() {
    let fixture = KeyFileFixture::new();
    assert!(!fixture.key_path().exists());

    let crypto = Crypto::create(fixture.options()).await.unwrap();
    assert!(crypto.is_ready());

    let data = std::fs::read_to_string(fixture.key_path()).unwrap();
    let stored: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(stored["service"], SERVICE_NAME);
    assert_eq!(stored["account"], ACCOUNT_NAME);

    let key = stored["key"].as_str().unwrap();
    assert_eq!(key.len(), 32);
    assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_key_survives_across_contexts() {
    let fixture = KeyFileFixture::new();

    let mut first = Crypto::create(fixture.options()).await.unwrap();
    let envelope = first.encrypt(Some("refresh-token")).unwrap().unwrap();
    first.close();

    let before = std::fs::read_to_string(fixture.key_path()).unwrap();

    let second = Crypto::create(fixture.options()).await.unwrap();
    assert_eq!(
        second.decrypt(Some(&envelope)).unwrap().as_deref(),
        Some("refresh-token")
    );

    // The second context reused the key instead of provisioning another.
    let after = std::fs::read_to_string(fixture.key_path()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_replaced_key_fails_to_decrypt() {
    let fixture = KeyFileFixture::new();

    let first = Crypto::create(fixture.options()).await.unwrap();
    let envelope = first.encrypt(Some("refresh-token")).unwrap().unwrap();
    drop(first);

    // Simulate the key being rotated out from under stored values.
    std::fs::remove_file(fixture.key_path()).unwrap();

    let second = Crypto::create(fixture.options()).await.unwrap();
    let err = second.decrypt(Some(&envelope)).unwrap_err();
    assert!(matches!(err, CryptoError::DecryptionError { .. }));
    assert_eq!(err.hint(), None);
}

#[tokio::test]
async fn test_corrupt_key_file_is_not_overwritten() {
    let fixture = KeyFileFixture::new();
    std::fs::write(fixture.key_path(), "not json").unwrap();

    let err = Crypto::create(fixture.options()).await.unwrap_err();
    assert!(matches!(err, CryptoError::Json(_)));

    let data = std::fs::read_to_string(fixture.key_path()).unwrap();
    assert_eq!(data, "not json");
}
