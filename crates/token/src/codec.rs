//! Encoding and decoding of `(key id, ciphertext)` pairs.

use std::{fmt, str::FromStr};

use {
    base64::{Engine, engine::general_purpose::STANDARD},
    serde::{Deserialize, Serialize},
    xid_crypto::KeyId,
};

use crate::error::{Result, TokenError};

/// Largest key id representable by the single-digit prefix.
pub const MAX_KEY_ID: KeyId = 9;

/// Encode a key id and ciphertext into token text.
///
/// The ciphertext must be non-empty so the token can be decoded again.
pub fn encode(key_id: KeyId, ciphertext: &[u8]) -> Result<Token> {
    if key_id > MAX_KEY_ID {
        return Err(TokenError::KeyIdOutOfRange(key_id));
    }
    // A lone digit would be rejected by `decode` as too short.
    if ciphertext.is_empty() {
        return Err(TokenError::EmptyCiphertext);
    }
    let mut text = String::with_capacity(1 + ciphertext.len().div_ceil(3) * 4);
    text.push(char::from(b'0' + key_id));
    STANDARD.encode_string(ciphertext, &mut text);
    Ok(Token(text))
}

/// Split token text back into its key id and ciphertext.
pub fn decode(token: &str) -> Result<(KeyId, Vec<u8>)> {
    if token.len() <= 1 {
        return Err(TokenError::TooShort);
    }
    let key_id = parse_key_id(token)?;
    // The prefix is a single ASCII byte, so index 1 is a char boundary.
    let ciphertext = STANDARD.decode(&token[1..])?;
    Ok((key_id, ciphertext))
}

fn parse_key_id(token: &str) -> Result<KeyId> {
    match token.as_bytes().first() {
        Some(digit @ b'0'..=b'9') => Ok(digit - b'0'),
        Some(_) => Err(TokenError::InvalidKeyId(
            token.chars().next().unwrap_or_default(),
        )),
        None => Err(TokenError::TooShort),
    }
}

/// Opaque token text as handed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Key id from the prefix digit.
    pub fn key_id(&self) -> Result<KeyId> {
        parse_key_id(&self.0)
    }

    /// Decoded ciphertext.
    pub fn payload(&self) -> Result<Vec<u8>> {
        decode(&self.0).map(|(_, ciphertext)| ciphertext)
    }

    /// Key id and decoded ciphertext.
    pub fn parts(&self) -> Result<(KeyId, Vec<u8>)> {
        decode(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Token {
    type Err = TokenError;

    /// Parse and validate token text.
    fn from_str(s: &str) -> Result<Self> {
        decode(s)?;
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Token> for String {
    fn from(token: Token) -> Self {
        token.0
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rand::RngCore, rstest::rstest};

    fn random_bytes(len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        rand::rng().fill_bytes(&mut buf);
        buf
    }

    #[rstest]
    fn round_trips_every_digit(
        #[values(0, 1, 5, 9)] key_id: KeyId,
        #[values(1, 16, 1000)] len: usize,
    ) {
        let ciphertext = random_bytes(len);
        let token = encode(key_id, &ciphertext).unwrap();
        assert_eq!(decode(token.as_str()).unwrap(), (key_id, ciphertext));
    }

    #[test]
    fn encodes_digit_then_standard_base64() {
        let token = encode(1, b"foo").unwrap();
        assert_eq!(token.as_str(), "1Zm9v");
        let token = encode(0, &[0xfb, 0xff]).unwrap();
        assert_eq!(token.as_str(), "0+/8=");
    }

    #[rstest]
    fn empty_ciphertext_is_rejected(#[values(0, 3, 9)] key_id: KeyId) {
        let err = encode(key_id, b"").unwrap_err();
        assert!(matches!(err, TokenError::EmptyCiphertext));
        assert_eq!(err.kind(), "empty_ciphertext");
        // The digit-only text it would have produced does not decode either.
        let digit_only = char::from(b'0' + key_id).to_string();
        assert!(matches!(decode(&digit_only), Err(TokenError::TooShort)));
    }

    #[rstest]
    #[case::ten(10)]
    #[case::max(255)]
    fn rejects_multi_digit_key_ids(#[case] key_id: KeyId) {
        assert!(matches!(
            encode(key_id, b"abc"),
            Err(TokenError::KeyIdOutOfRange(id)) if id == key_id
        ));
    }

    #[rstest]
    #[case::empty("")]
    #[case::digit_only("1")]
    #[case::letter_only("x")]
    fn too_short(#[case] token: &str) {
        assert!(matches!(decode(token), Err(TokenError::TooShort)));
    }

    #[rstest]
    #[case::letter("aZm9v", 'a')]
    #[case::sign("-Zm9v", '-')]
    #[case::multibyte("éZm9v", 'é')]
    fn invalid_key_id(#[case] token: &str, #[case] expected: char) {
        assert!(matches!(decode(token), Err(TokenError::InvalidKeyId(c)) if c == expected));
    }

    #[rstest]
    #[case::bad_chars("1!!!!")]
    #[case::bad_length("1Zm9")]
    #[case::url_safe_alphabet("0-_8=")]
    fn invalid_encoding(#[case] token: &str) {
        let err = decode(token).unwrap_err();
        assert!(matches!(err, TokenError::InvalidEncoding(_)));
        assert_eq!(err.kind(), "invalid_encoding");
    }

    #[test]
    fn token_accessors() {
        let token: Token = "7Zm9v".parse().unwrap();
        assert_eq!(token.key_id().unwrap(), 7);
        assert_eq!(token.payload().unwrap(), b"foo");
        assert_eq!(token.parts().unwrap(), (7, b"foo".to_vec()));
        assert_eq!(token.to_string(), "7Zm9v");
        assert_eq!(String::from(token), "7Zm9v");
    }

    #[test]
    fn from_str_validates() {
        assert!("Zm9v".parse::<Token>().is_err());
        assert!("".parse::<Token>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let token = encode(2, b"foo").unwrap();
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""2Zm9v""#);
        let back: Token = serde_json::from_str(r#""2Zm9v""#).unwrap();
        assert_eq!(back, token);
    }
}
