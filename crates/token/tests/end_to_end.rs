#![allow(clippy::unwrap_used, clippy::expect_used)]
use {
    xid_crypto::{CryptoService, KeySet},
    xid_token::{decode, encode, issue_token, redeem_token},
};

#[test]
fn zero_key_example() {
    let service = CryptoService::new();
    service
        .rotate_keys(&KeySet::new(1, "00".repeat(32)))
        .unwrap();

    let enc = service.encrypt(b"AAAZU2WSZICQIAZX").unwrap();
    let plain = service.decrypt(enc.key_id, &enc.ciphertext).unwrap();
    assert_eq!(plain, b"AAAZU2WSZICQIAZX");

    let token = encode(1, &enc.ciphertext).unwrap();
    let (key_id, ciphertext) = decode(token.as_str()).unwrap();
    assert_eq!(key_id, 1);
    assert_eq!(ciphertext, enc.ciphertext);
}

#[test]
fn tokens_outlive_one_rotation() {
    let service = CryptoService::new();
    let first = "0f".repeat(32);
    let second = "f0".repeat(32);

    service.rotate_keys(&KeySet::new(0, first.clone())).unwrap();
    let old_token = issue_token(&service, b"user-0001").unwrap();

    service
        .rotate_keys(&KeySet::new(1, second.clone()).with_decryption_key(0, first))
        .unwrap();
    let new_token = issue_token(&service, b"user-0002").unwrap();
    assert_eq!(new_token.key_id().unwrap(), 1);

    assert_eq!(
        redeem_token(&service, old_token.as_str()).unwrap(),
        b"user-0001"
    );
    assert_eq!(
        redeem_token(&service, new_token.as_str()).unwrap(),
        b"user-0002"
    );
}
