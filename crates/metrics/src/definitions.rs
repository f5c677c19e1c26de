//! Metric name and label definitions.
//!
//! All metric names used across the xid crates live here so the exported
//! surface is documented in one place.

/// Key store and AEAD metrics
pub mod crypto {
    /// Total number of successful encryptions
    pub const ENCRYPTIONS_TOTAL: &str = "xid_crypto_encryptions_total";
    /// Encryption failures, labelled by error kind
    pub const ENCRYPTION_ERRORS_TOTAL: &str = "xid_crypto_encryption_errors_total";
    /// Total number of successful decryptions
    pub const DECRYPTIONS_TOTAL: &str = "xid_crypto_decryptions_total";
    /// Decryption failures, labelled by error kind.
    /// `key_unknown` points at retention windows, `authentication_failed` at tampering.
    pub const DECRYPTION_ERRORS_TOTAL: &str = "xid_crypto_decryption_errors_total";
    /// Key snapshots published
    pub const KEY_ROTATIONS_TOTAL: &str = "xid_crypto_key_rotations_total";
    /// Rotations rejected before publishing
    pub const KEY_ROTATION_ERRORS_TOTAL: &str = "xid_crypto_key_rotation_errors_total";
    /// Number of keys in the current decryption set
    pub const DECRYPTION_KEYS: &str = "xid_crypto_decryption_keys";
    /// Generation number of the current snapshot
    pub const SNAPSHOT_GENERATION: &str = "xid_crypto_snapshot_generation";
    /// Duration of one fetch-and-rotate cycle in seconds
    pub const KEY_REFRESH_DURATION_SECONDS: &str = "xid_crypto_key_refresh_duration_seconds";
}

/// Token codec metrics
pub mod token {
    /// Tokens issued
    pub const ISSUED_TOTAL: &str = "xid_token_issued_total";
    /// Tokens redeemed
    pub const REDEEMED_TOTAL: &str = "xid_token_redeemed_total";
    /// Malformed tokens, labelled by error kind
    pub const DECODE_ERRORS_TOTAL: &str = "xid_token_decode_errors_total";
}

/// Common label keys
pub mod labels {
    pub const KIND: &str = "kind";
}

/// Standard histogram buckets for different metric types
pub mod buckets {
    use once_cell::sync::Lazy;

    /// Key refresh duration buckets (in seconds)
    /// Covers 1ms to 60s, the upper end being a slow key service
    pub static KEY_REFRESH_DURATION: Lazy<Vec<f64>> = Lazy::new(|| {
        vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0,
        ]
    });
}
