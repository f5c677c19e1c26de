//! Token error types.

use xid_crypto::{CryptoError, KeyId};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Nothing after the key id digit.
    #[error("token too short")]
    TooShort,

    /// The first character is not a decimal digit.
    #[error("invalid key id prefix {0:?}")]
    InvalidKeyId(char),

    /// The ciphertext part is not valid base64.
    #[error("invalid token encoding: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The key id needs more than one digit.
    #[error("key id {0} does not fit in a token (max {max})", max = crate::codec::MAX_KEY_ID)]
    KeyIdOutOfRange(KeyId),

    /// Nothing to encode after the key id digit.
    #[error("cannot encode an empty ciphertext")]
    EmptyCiphertext,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl TokenError {
    /// Stable label for logs and metrics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TooShort => "too_short",
            Self::InvalidKeyId(_) => "invalid_key_id",
            Self::InvalidEncoding(_) => "invalid_encoding",
            Self::KeyIdOutOfRange(_) => "key_id_out_of_range",
            Self::EmptyCiphertext => "empty_ciphertext",
            Self::Crypto(e) => e.kind().as_str(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TokenError>;
