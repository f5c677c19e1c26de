//! Crypto error types.

use crate::key::KeyId;

/// Coarse classification of a [`CryptoError`].
///
/// Used as the `kind` label on logs and metrics so operators can tell a short
/// retention window (`key_unknown`) apart from tampering
/// (`authentication_failed`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No key loaded yet, or malformed key material supplied to rotation.
    Configuration,
    /// Decryption requested for a key id outside the current decryption set.
    KeyUnknown,
    /// Tag mismatch or corrupted ciphertext.
    AuthenticationFailed,
    /// Malformed ciphertext framing.
    Encoding,
    /// The entropy source failed while drawing a nonce.
    RandomSource,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::KeyUnknown => "key_unknown",
            Self::AuthenticationFailed => "authentication_failed",
            Self::Encoding => "encoding",
            Self::RandomSource => "random_source",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by key storage, rotation, and AEAD operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// No key snapshot has been published yet.
    #[error("no encryption key configured")]
    NotConfigured,

    /// Key material failed to decode or has the wrong length.
    #[error("invalid key material: {reason}")]
    InvalidKey {
        reason: String,
        #[source]
        source: Option<hex::FromHexError>,
    },

    /// The decryption set maps the encryption key's id to different key material.
    #[error("key id {0} maps to different material in the encryption and decryption sets")]
    ConflictingKey(KeyId),

    /// The key id is not part of the current decryption set.
    #[error("unknown key id {0}")]
    KeyUnknown(KeyId),

    /// Ciphertext shorter than the nonce.
    #[error("ciphertext too short: {len} bytes, need at least {min}")]
    TooShort { len: usize, min: usize },

    /// Plaintext exceeds the AEAD's per-message length limit.
    #[error("plaintext too long to seal")]
    PlaintextTooLong,

    /// Tag mismatch: the ciphertext was corrupted or sealed under another key.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The entropy source could not supply a nonce.
    #[error("random source error: {0}")]
    RandomSource(String),

    /// Encryption failed; `source` holds the root cause.
    #[error("encrypt failed: {source}")]
    EncryptFailed {
        #[source]
        source: Box<CryptoError>,
    },

    /// A [`KeySource`](crate::refresh::KeySource) could not produce a key set.
    #[error("key source error: {0}")]
    Source(String),
}

impl CryptoError {
    pub(crate) fn invalid_key(reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            reason: reason.into(),
            source: None,
        }
    }

    pub(crate) fn encrypt_failed(source: CryptoError) -> Self {
        Self::EncryptFailed {
            source: Box::new(source),
        }
    }

    /// Build a [`CryptoError::Source`] from any displayable failure.
    pub fn key_source(err: impl std::fmt::Display) -> Self {
        Self::Source(err.to_string())
    }

    /// Classify the error, looking through `EncryptFailed` to its root cause.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured
            | Self::InvalidKey { .. }
            | Self::ConflictingKey(_)
            | Self::Source(_) => ErrorKind::Configuration,
            Self::KeyUnknown(_) => ErrorKind::KeyUnknown,
            Self::TooShort { .. } | Self::PlaintextTooLong => ErrorKind::Encoding,
            Self::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            Self::RandomSource(_) => ErrorKind::RandomSource,
            Self::EncryptFailed { source } => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CryptoError>;
