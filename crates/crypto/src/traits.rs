//! Seams for swappable AEAD backends and nonce sources.

use crate::{error::Result, key::KeyMaterial};

/// Authenticated encryption over an already-resolved key.
///
/// Implementations are stateless with respect to keys: lookup and rotation
/// happen in [`KeyStore`](crate::store::KeyStore), not here.
pub trait Cipher: Send + Sync {
    /// Seal `plaintext` under `key`.
    ///
    /// Returns `[nonce || ciphertext || tag]`.
    fn encrypt(&self, key: &KeyMaterial, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Open a blob previously produced by [`encrypt`](Self::encrypt).
    fn decrypt(&self, key: &KeyMaterial, blob: &[u8]) -> Result<Vec<u8>>;
}

/// Supplier of nonce bytes.
///
/// Must fill the whole buffer or fail; a short read is an error, never a
/// reason to fall back to a weaker source.
pub trait NonceSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<()>;
}
