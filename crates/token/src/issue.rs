//! Issue tokens from plaintext ids and redeem them back.

use xid_crypto::{Cipher, CryptoService, Encrypted};

#[cfg(feature = "metrics")]
use xid_metrics::{counter, labels, token as token_metrics};

use crate::{
    codec::{Token, decode, encode},
    error::Result,
};

/// Seal `plaintext` under the current key and wrap it as a token.
pub fn issue_token<C: Cipher>(service: &CryptoService<C>, plaintext: &[u8]) -> Result<Token> {
    let Encrypted { key_id, ciphertext } = service.encrypt(plaintext)?;
    let token = encode(key_id, &ciphertext)?;

    #[cfg(feature = "metrics")]
    counter!(token_metrics::ISSUED_TOTAL).increment(1);

    Ok(token)
}

/// Decode `token` and open it with the key its prefix names.
pub fn redeem_token<C: Cipher>(service: &CryptoService<C>, token: &str) -> Result<Vec<u8>> {
    let (key_id, ciphertext) = decode(token).inspect_err(|e| {
        #[cfg(feature = "tracing")]
        tracing::debug!(kind = e.kind(), error = %e, "malformed token");
        #[cfg(feature = "metrics")]
        counter!(token_metrics::DECODE_ERRORS_TOTAL, labels::KIND => e.kind()).increment(1);
        #[cfg(not(any(feature = "tracing", feature = "metrics")))]
        let _ = e;
    })?;

    let plaintext = service.decrypt(key_id, &ciphertext)?;

    #[cfg(feature = "metrics")]
    counter!(token_metrics::REDEEMED_TOTAL).increment(1);

    Ok(plaintext)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::error::TokenError,
        xid_crypto::{CryptoError, KeySet},
    };

    const KEY_A: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    const KEY_B: &str = "abababababababababababababababababababababababababababababababab";

    #[test]
    fn issue_then_redeem() {
        let service = CryptoService::new();
        service.rotate_keys(&KeySet::new(4, KEY_A)).unwrap();

        let token = issue_token(&service, b"AAAZU2WSZICQIAZX").unwrap();
        assert_eq!(token.key_id().unwrap(), 4);
        assert_eq!(
            redeem_token(&service, token.as_str()).unwrap(),
            b"AAAZU2WSZICQIAZX"
        );
    }

    #[test]
    fn issue_before_configuration_fails() {
        let service = CryptoService::new();
        let err = issue_token(&service, b"id").unwrap_err();
        assert!(matches!(err, TokenError::Crypto(CryptoError::NotConfigured)));
    }

    #[test]
    fn issue_with_wide_key_id_fails() {
        let service = CryptoService::new();
        service.rotate_keys(&KeySet::new(42, KEY_A)).unwrap();
        let err = issue_token(&service, b"id").unwrap_err();
        assert!(matches!(err, TokenError::KeyIdOutOfRange(42)));
    }

    #[test]
    fn redeem_after_key_rolled_off_is_key_unknown() {
        let service = CryptoService::new();
        service.rotate_keys(&KeySet::new(1, KEY_A)).unwrap();
        let token = issue_token(&service, b"id").unwrap();

        service.rotate_keys(&KeySet::new(2, KEY_B)).unwrap();
        let err = redeem_token(&service, token.as_str()).unwrap_err();
        assert_eq!(err.kind(), "key_unknown");
    }

    #[test]
    fn redeem_with_swapped_prefix_is_authentication_failure() {
        let service = CryptoService::new();
        service
            .rotate_keys(&KeySet::new(2, KEY_B).with_decryption_key(1, KEY_A))
            .unwrap();
        let token = issue_token(&service, b"id").unwrap();
        let forged = format!("1{}", &token.as_str()[1..]);

        let err = redeem_token(&service, &forged).unwrap_err();
        assert_eq!(err.kind(), "authentication_failed");
    }

    #[test]
    fn redeem_garbage_is_decode_error() {
        let service = CryptoService::new();
        let err = redeem_token(&service, "1not base64!").unwrap_err();
        assert!(matches!(err, TokenError::InvalidEncoding(_)));
    }
}
