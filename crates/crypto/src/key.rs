//! Key identifiers, key material, and the key-set wire format.

use std::collections::HashMap;

use {
    aes_gcm::{Aes256Gcm, KeyInit},
    rand::{TryRngCore, rngs::OsRng},
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    zeroize::Zeroizing,
};

use crate::error::{CryptoError, Result};

/// Opaque tag naming the key that sealed a payload.
///
/// Assigned by the key-issuing service; carries no ordering or freshness.
pub type KeyId = u8;

/// Raw AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// An immutable AES-256-GCM key, ready for sealing and opening.
///
/// The expanded key schedule is zeroized on drop.
pub struct KeyMaterial {
    aead: Aes256Gcm,
}

impl KeyMaterial {
    /// Build key material from exactly [`KEY_LEN`] raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LEN {
            return Err(CryptoError::invalid_key(format!(
                "expected {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let aead =
            Aes256Gcm::new_from_slice(bytes).map_err(|e| CryptoError::invalid_key(e.to_string()))?;
        Ok(Self { aead })
    }

    /// Build key material from its hex encoding (64 hex characters).
    pub fn from_hex(value: &str) -> Result<Self> {
        let bytes = decode_hex_key(value)?;
        Self::from_bytes(&bytes)
    }

    /// Generate a fresh random key and return its hex encoding.
    pub fn generate_hex() -> Result<String> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        OsRng
            .try_fill_bytes(&mut key[..])
            .map_err(|e| CryptoError::RandomSource(e.to_string()))?;
        Ok(hex::encode(&key[..]))
    }

    pub(crate) fn aead(&self) -> &Aes256Gcm {
        &self.aead
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyMaterial([REDACTED])")
    }
}

/// Decode a hex key and check its length.
pub(crate) fn decode_hex_key(value: &str) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = Zeroizing::new(hex::decode(value).map_err(|e| CryptoError::InvalidKey {
        reason: "key is not valid hex".to_string(),
        source: Some(e),
    })?);
    if bytes.len() != KEY_LEN {
        return Err(CryptoError::invalid_key(format!(
            "expected {KEY_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(bytes)
}

/// The key currently designated for new encryptions, as delivered on the wire.
#[derive(Debug, Deserialize)]
pub struct EncryptionKey {
    pub id: KeyId,
    pub value: Secret<String>,
}

/// A complete replacement key set from the key-issuing service.
///
/// JSON shape:
///
/// ```json
/// {"encryption": {"id": 1, "value": "<64 hex>"},
///  "decryption": {"0": "<64 hex>", "1": "<64 hex>"}}
/// ```
///
/// The set is trusted as-is: no expiry is computed locally, a key disappears
/// only when a later set omits it.
#[derive(Debug, Deserialize)]
pub struct KeySet {
    pub encryption: EncryptionKey,
    #[serde(default)]
    pub decryption: HashMap<KeyId, Secret<String>>,
}

impl KeySet {
    /// Start a key set with only the encryption key.
    pub fn new(id: KeyId, value: impl Into<String>) -> Self {
        Self {
            encryption: EncryptionKey {
                id,
                value: Secret::new(value.into()),
            },
            decryption: HashMap::new(),
        }
    }

    /// Add a key that stays valid for decryption.
    #[must_use]
    pub fn with_decryption_key(mut self, id: KeyId, value: impl Into<String>) -> Self {
        self.decryption.insert(id, Secret::new(value.into()));
        self
    }

    /// Decryption key ids, sorted.
    pub fn decryption_ids(&self) -> Vec<KeyId> {
        let mut ids: Vec<KeyId> = self.decryption.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn encryption_hex(&self) -> &str {
        self.encryption.value.expose_secret()
    }
}
