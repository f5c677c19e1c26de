//! xid token text format.
//!
//! A token is one decimal digit naming the sealing key followed by the
//! standard base64 encoding of the ciphertext:
//!
//! ```text
//! 1AAAAAAAAAAAAAAAAnW8v...
//! ^ key id (0-9)
//!  ^ base64([nonce:12][sealed bytes + tag:16])
//! ```
//!
//! Key ids above 9 cannot be carried; [`encode`] rejects them.

pub mod codec;
pub mod error;
pub mod issue;

pub use {
    codec::{MAX_KEY_ID, Token, decode, encode},
    error::{Result, TokenError},
    issue::{issue_token, redeem_token},
};
