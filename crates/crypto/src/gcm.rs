//! AES-256-GCM implementation of the [`Cipher`] trait.

use {
    aes_gcm::{Nonce, aead::Aead},
    rand::{TryRngCore, rngs::OsRng},
};

use crate::{
    error::{CryptoError, Result},
    key::KeyMaterial,
    traits::{Cipher, NonceSource},
};

/// Nonce size for AES-GCM (96 bits).
pub const NONCE_LEN: usize = 12;

/// Authentication tag size for AES-GCM.
pub const TAG_LEN: usize = 16;

/// Nonces from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn fill(&self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::RandomSource(e.to_string()))
    }
}

/// AES-256-GCM AEAD cipher.
///
/// Blob layout: `[nonce: 12 bytes][ciphertext + GCM tag: N + 16 bytes]`.
/// No associated data is bound. Every call draws an independent random nonce,
/// which is what keeps `(key, nonce)` pairs from repeating.
#[derive(Debug, Clone, Default)]
pub struct GcmCipher<N: NonceSource = OsNonceSource> {
    nonces: N,
}

impl GcmCipher<OsNonceSource> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<N: NonceSource> GcmCipher<N> {
    /// Use a custom nonce source.
    pub fn with_nonce_source(nonces: N) -> Self {
        Self { nonces }
    }
}

impl<N: NonceSource> Cipher for GcmCipher<N> {
    fn encrypt(&self, key: &KeyMaterial, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.nonces.fill(&mut nonce_bytes)?;
        let nonce = Nonce::from_slice(&nonce_bytes);

        // Sealing only fails for plaintexts beyond GCM's length limit.
        let sealed = key
            .aead()
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::PlaintextTooLong)?;

        let mut result = Vec::with_capacity(NONCE_LEN + sealed.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&sealed);
        Ok(result)
    }

    fn decrypt(&self, key: &KeyMaterial, blob: &[u8]) -> Result<Vec<u8>> {
        if blob.len() < NONCE_LEN {
            return Err(CryptoError::TooShort {
                len: blob.len(),
                min: NONCE_LEN,
            });
        }

        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        key.aead()
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }
}
