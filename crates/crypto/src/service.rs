//! Encrypt / decrypt / rotate over the current key snapshot.

use std::{collections::HashMap, sync::Arc};

use secrecy::ExposeSecret;

#[cfg(feature = "metrics")]
use xid_metrics::{counter, crypto as crypto_metrics, gauge, labels};

use crate::{
    error::{CryptoError, Result},
    gcm::GcmCipher,
    key::{KeyId, KeyMaterial, KeySet, decode_hex_key},
    store::{KeySnapshot, KeyStore},
    traits::Cipher,
};

/// Largest key id a token can carry (single decimal digit).
#[cfg(feature = "tracing")]
const MAX_TOKEN_KEY_ID: KeyId = 9;

/// Whether the service has ever received keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    /// No key set loaded yet; every encrypt and decrypt fails.
    Unconfigured,
    /// At least one rotation succeeded.
    Configured,
}

/// Ciphertext together with the id of the key that sealed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub key_id: KeyId,
    pub ciphertext: Vec<u8>,
}

/// Application-level crypto: the AEAD cipher over a rotating key store.
///
/// Generic over [`Cipher`] but defaults to [`GcmCipher`]. Share one instance
/// through an `Arc`; all methods take `&self`.
pub struct CryptoService<C: Cipher = GcmCipher> {
    cipher: C,
    keys: KeyStore,
}

impl<C: Cipher> std::fmt::Debug for CryptoService<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoService")
            .field("status", &self.status())
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl CryptoService<GcmCipher> {
    /// Create an unconfigured service with the default AES-256-GCM cipher.
    pub fn new() -> Self {
        Self::with_cipher(GcmCipher::new())
    }
}

impl Default for CryptoService<GcmCipher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cipher> CryptoService<C> {
    /// Create an unconfigured service with a custom cipher.
    pub fn with_cipher(cipher: C) -> Self {
        Self {
            cipher,
            keys: KeyStore::new(),
        }
    }

    pub fn status(&self) -> ServiceStatus {
        if self.keys.is_configured() {
            ServiceStatus::Configured
        } else {
            ServiceStatus::Unconfigured
        }
    }

    /// The underlying key store.
    pub fn keys(&self) -> &KeyStore {
        &self.keys
    }

    /// Seal `plaintext` under the current encryption key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Encrypted> {
        let result = self.keys.current_encryption_key().and_then(|(key_id, key)| {
            self.cipher
                .encrypt(&key, plaintext)
                .map(|ciphertext| Encrypted { key_id, ciphertext })
                .map_err(CryptoError::encrypt_failed)
        });

        match &result {
            Ok(_) => {
                #[cfg(feature = "metrics")]
                counter!(crypto_metrics::ENCRYPTIONS_TOTAL).increment(1);
            },
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!(kind = %e.kind(), error = %e, "encryption failed");
                #[cfg(feature = "metrics")]
                counter!(crypto_metrics::ENCRYPTION_ERRORS_TOTAL, labels::KIND => e.kind().as_str())
                    .increment(1);
                #[cfg(not(any(feature = "tracing", feature = "metrics")))]
                let _ = e;
            },
        }

        result
    }

    /// Open `ciphertext` with the decryption key registered under `key_id`.
    ///
    /// `KeyUnknown` is the expected outcome for tokens whose key has rolled off
    /// the retention window; `AuthenticationFailed` means tampering or bit rot.
    pub fn decrypt(&self, key_id: KeyId, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let result = self
            .keys
            .decryption_key(key_id)
            .and_then(|key| self.cipher.decrypt(&key, ciphertext));

        match &result {
            Ok(_) => {
                #[cfg(feature = "metrics")]
                counter!(crypto_metrics::DECRYPTIONS_TOTAL).increment(1);
            },
            Err(e) => {
                #[cfg(feature = "tracing")]
                match e {
                    CryptoError::KeyUnknown(_) => {
                        tracing::debug!(key_id, "decryption key not in current set");
                    },
                    _ => tracing::warn!(key_id, kind = %e.kind(), error = %e, "decryption failed"),
                }
                #[cfg(feature = "metrics")]
                counter!(crypto_metrics::DECRYPTION_ERRORS_TOTAL, labels::KIND => e.kind().as_str())
                    .increment(1);
                #[cfg(not(any(feature = "tracing", feature = "metrics")))]
                let _ = e;
            },
        }

        result
    }

    /// Replace all key material with `keys`.
    ///
    /// Every key is decoded and validated before anything is published: on
    /// error the previous snapshot stays active, untouched.
    pub fn rotate_keys(&self, keys: &KeySet) -> Result<()> {
        match build_snapshot(keys) {
            Ok(snapshot) => {
                let encryption_id = keys.encryption.id;
                let decryption_keys = snapshot.decryption_len();
                let generation = self.keys.replace(snapshot);

                #[cfg(feature = "tracing")]
                {
                    if encryption_id > MAX_TOKEN_KEY_ID {
                        tracing::warn!(
                            encryption_key_id = encryption_id,
                            "encryption key id does not fit in a single-digit token prefix"
                        );
                    }
                    tracing::info!(
                        generation,
                        encryption_key_id = encryption_id,
                        decryption_keys,
                        "key snapshot published"
                    );
                }
                #[cfg(feature = "metrics")]
                {
                    counter!(crypto_metrics::KEY_ROTATIONS_TOTAL).increment(1);
                    gauge!(crypto_metrics::DECRYPTION_KEYS).set(decryption_keys as f64);
                    gauge!(crypto_metrics::SNAPSHOT_GENERATION).set(generation as f64);
                }
                #[cfg(not(feature = "tracing"))]
                let _ = encryption_id;
                #[cfg(not(any(feature = "tracing", feature = "metrics")))]
                let _ = (decryption_keys, generation);

                Ok(())
            },
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %e, "key rotation rejected, keeping previous snapshot");
                #[cfg(feature = "metrics")]
                counter!(crypto_metrics::KEY_ROTATION_ERRORS_TOTAL).increment(1);
                Err(e)
            },
        }
    }
}

/// Decode every key in `keys` into a snapshot, failing on the first bad one.
fn build_snapshot(keys: &KeySet) -> Result<KeySnapshot> {
    let encryption_id = keys.encryption.id;
    let encryption_bytes = decode_hex_key(keys.encryption_hex())?;
    let encryption = Arc::new(KeyMaterial::from_bytes(&encryption_bytes)?);

    let mut decryption = HashMap::with_capacity(keys.decryption.len() + 1);
    for (&id, value) in &keys.decryption {
        let bytes = decode_hex_key(value.expose_secret())?;
        if id == encryption_id {
            if *bytes != *encryption_bytes {
                return Err(CryptoError::ConflictingKey(id));
            }
            decryption.insert(id, Arc::clone(&encryption));
            continue;
        }
        decryption.insert(id, Arc::new(KeyMaterial::from_bytes(&bytes)?));
    }

    Ok(KeySnapshot::new(encryption_id, encryption, decryption))
}
