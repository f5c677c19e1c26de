//! Rotating multi-key authenticated encryption for xid tokens.
//!
//! One key encrypts new payloads while a larger set of historical keys stays
//! valid for decryption. Key material is replaced wholesale: every rotation
//! builds a complete [`KeySnapshot`] and publishes it with a single atomic
//! pointer swap, so readers never see encryption and decryption keys from two
//! different generations.
//!
//! The AEAD backend sits behind the [`Cipher`] trait; the shipped
//! implementation is AES-256-GCM with a random 12-byte nonce per message.

pub mod error;
pub mod gcm;
pub mod key;
pub mod refresh;
pub mod service;
pub mod store;
pub mod traits;

pub use {
    error::{CryptoError, ErrorKind, Result},
    gcm::{GcmCipher, NONCE_LEN, OsNonceSource, TAG_LEN},
    key::{EncryptionKey, KEY_LEN, KeyId, KeyMaterial, KeySet},
    refresh::{KeySource, RefreshOptions, refresh_once, spawn_key_refresh},
    service::{CryptoService, Encrypted, ServiceStatus},
    store::{KeySnapshot, KeyStore},
    traits::{Cipher, NonceSource},
};
