//! Context lifecycle tests over the in-memory keychain.
//!
//! These tests cover provisioning counts, close semantics, and the
//! null-input shortcut through the public API only.

use std::sync::Arc;

use keycrypt_crypto::keychain::MemoryKeychain;
use keycrypt_crypto::{
    Crypto, CryptoError, CryptoOptions, KeychainKind, Platform, ACCOUNT_NAME, SERVICE_NAME,
};

fn options_with(store: Arc<MemoryKeychain>) -> CryptoOptions {
    CryptoOptions::default()
        .with_platform(Platform::Linux)
        .with_keychain(store)
}

#[tokio::test]
async fn test_provisions_exactly_once() {
    let store = Arc::new(MemoryKeychain::new());

    let crypto = Crypto::create(options_with(store.clone())).await.unwrap();

    assert!(crypto.is_ready());
    assert_eq!(store.set_calls(), 1);
    assert_eq!(store.get_calls(), 2);
}

#[tokio::test]
async fn test_existing_key_is_not_replaced() {
    let store = Arc::new(MemoryKeychain::with_password(
        SERVICE_NAME,
        ACCOUNT_NAME,
        "0123456789abcdef0123456789abcdef",
    ));

    Crypto::create(options_with(store.clone())).await.unwrap();

    assert_eq!(store.set_calls(), 0);
    assert_eq!(store.get_calls(), 1);
}

#[tokio::test]
async fn test_forgetful_store_gives_up_after_one_retry() {
    let store = Arc::new(MemoryKeychain::discarding());

    let err = Crypto::create(options_with(store.clone())).await.unwrap_err();

    assert!(matches!(err, CryptoError::KeyAcquisitionFailed { .. }));
    assert_eq!(store.set_calls(), 1);
    assert_eq!(store.get_calls(), 2);
}

#[tokio::test]
async fn test_two_contexts_share_one_slot() {
    let store = Arc::new(MemoryKeychain::new());

    let writer = Crypto::create(options_with(store.clone())).await.unwrap();
    let reader = Crypto::create(options_with(store.clone())).await.unwrap();

    let envelope = writer.encrypt(Some("shared")).unwrap().unwrap();
    assert_eq!(reader.decrypt(Some(&envelope)).unwrap().as_deref(), Some("shared"));
    assert_eq!(store.set_calls(), 1);
}

#[tokio::test]
async fn test_full_lifecycle() {
    let store = Arc::new(MemoryKeychain::new());
    let mut crypto = Crypto::create(options_with(store)).await.unwrap();
    assert_eq!(crypto.keychain_kind(), KeychainKind::Memory);

    assert_eq!(crypto.encrypt(None).unwrap(), None);
    assert_eq!(crypto.decrypt(None).unwrap(), None);

    let a = crypto.encrypt(Some("token")).unwrap().unwrap();
    let b = crypto.encrypt(Some("token")).unwrap().unwrap();
    assert_ne!(a, b);
    assert_eq!(crypto.decrypt(Some(&a)).unwrap().as_deref(), Some("token"));
    assert_eq!(crypto.decrypt(Some(&b)).unwrap().as_deref(), Some("token"));

    assert!(matches!(
        crypto.decrypt(Some("no-delimiter-here")),
        Err(CryptoError::InvalidEncryptedFormat)
    ));

    crypto.close();
    crypto.close();
    assert!(matches!(
        crypto.decrypt(Some(&a)),
        Err(CryptoError::KeyUnavailable)
    ));
}

#[tokio::test]
async fn test_memory_kind_from_options() {
    let options = CryptoOptions::default().with_keychain_kind(KeychainKind::Memory);

    let crypto = Crypto::create(options).await.unwrap();
    assert_eq!(crypto.keychain_kind(), KeychainKind::Memory);
    assert!(crypto.is_ready());
}
