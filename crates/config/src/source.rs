//! Key-set file as a [`KeySource`].

use std::path::PathBuf;

use {
    async_trait::async_trait,
    xid_crypto::{CryptoError, KeySet, KeySource},
    zeroize::Zeroizing,
};

use crate::loader::parse_key_set;

/// Re-reads a JSON key-set file on every fetch.
///
/// Lets an external process (a sidecar, a config-management agent) drop new
/// key sets on disk and have them picked up by the refresh loop.
#[derive(Debug, Clone)]
pub struct FileKeySource {
    path: PathBuf,
}

impl FileKeySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl KeySource for FileKeySource {
    async fn fetch(&self) -> xid_crypto::Result<KeySet> {
        let raw = Zeroizing::new(tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CryptoError::key_source(format!("failed to read {}: {e}", self.path.display()))
        })?);
        parse_key_set(&raw, &self.path).map_err(CryptoError::key_source)
    }
}
