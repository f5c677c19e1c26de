#![allow(clippy::unwrap_used, clippy::expect_used)]
fn main() {
    divan::main();
}

use xid_crypto::{CryptoService, KeySet};

const KEY_A: &str = "0000000000000000000000000000000000000000000000000000000000000000";
const KEY_B: &str = "abababababababababababababababababababababababababababababababab";

const SIZES: &[usize] = &[16, 256, 4096];

fn service() -> CryptoService {
    let service = CryptoService::new();
    service
        .rotate_keys(&KeySet::new(2, KEY_B).with_decryption_key(1, KEY_A))
        .unwrap();
    service
}

// ── Crypto ──────────────────────────────────────────────────────────────────

#[divan::bench(args = SIZES)]
fn encrypt(bencher: divan::Bencher, size: usize) {
    let service = service();
    let plaintext = vec![0x5a; size];

    bencher.bench_local(|| divan::black_box(service.encrypt(&plaintext).unwrap()));
}

#[divan::bench(args = SIZES)]
fn decrypt(bencher: divan::Bencher, size: usize) {
    let service = service();
    let sealed = service.encrypt(&vec![0x5a; size]).unwrap();

    bencher.bench_local(|| {
        divan::black_box(service.decrypt(sealed.key_id, &sealed.ciphertext).unwrap())
    });
}

/// Rotation parses and validates every key before publishing.
#[divan::bench]
fn rotate_keys(bencher: divan::Bencher) {
    let service = service();
    let keys = KeySet::new(3, KEY_A)
        .with_decryption_key(1, KEY_A)
        .with_decryption_key(2, KEY_B);

    bencher.bench_local(|| service.rotate_keys(divan::black_box(&keys)).unwrap());
}

// ── Tokens ──────────────────────────────────────────────────────────────────

#[divan::bench]
fn issue_token(bencher: divan::Bencher) {
    let service = service();
    bencher.bench_local(|| {
        divan::black_box(xid_token::issue_token(&service, b"AAAZU2WSZICQIAZX").unwrap())
    });
}

#[divan::bench]
fn redeem_token(bencher: divan::Bencher) {
    let service = service();
    let token = xid_token::issue_token(&service, b"AAAZU2WSZICQIAZX").unwrap();

    bencher.bench_local(|| divan::black_box(xid_token::redeem_token(&service, token.as_str()).unwrap()));
}

#[divan::bench]
fn decode_token(bencher: divan::Bencher) {
    let token = xid_token::encode(1, &[7u8; 44]).unwrap();
    bencher.bench_local(|| divan::black_box(xid_token::decode(token.as_str()).unwrap()));
}

// ── Key-set files ───────────────────────────────────────────────────────────

#[divan::bench]
fn load_key_set(bencher: divan::Bencher) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys.json");
    std::fs::write(
        &path,
        format!(
            r#"{{"encryption":{{"id":2,"value":"{KEY_B}"}},"decryption":{{"1":"{KEY_A}"}}}}"#
        ),
    )
    .unwrap();

    bencher.bench_local(|| divan::black_box(xid_config::load_key_set(&path).unwrap()));
}
