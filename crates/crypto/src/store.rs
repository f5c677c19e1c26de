//! Atomically swapped key snapshots.

use std::{collections::HashMap, sync::Arc};

use arc_swap::ArcSwapOption;

use crate::{
    error::{CryptoError, Result},
    key::{KeyId, KeyMaterial},
};

/// One immutable generation of key material: the encryption slot plus every
/// key valid for decryption.
///
/// The decryption set always contains the encryption key.
#[derive(Debug, Clone)]
pub struct KeySnapshot {
    generation: u64,
    encryption_id: KeyId,
    encryption: Arc<KeyMaterial>,
    decryption: HashMap<KeyId, Arc<KeyMaterial>>,
}

impl KeySnapshot {
    /// Bundle an encryption slot with its decryption set.
    ///
    /// The encryption key is inserted into the decryption set under its id
    /// when missing. The generation is assigned when the snapshot is published.
    pub fn new(
        encryption_id: KeyId,
        encryption: Arc<KeyMaterial>,
        mut decryption: HashMap<KeyId, Arc<KeyMaterial>>,
    ) -> Self {
        decryption
            .entry(encryption_id)
            .or_insert_with(|| Arc::clone(&encryption));
        Self {
            generation: 0,
            encryption_id,
            encryption,
            decryption,
        }
    }

    /// Publish order of this snapshot, starting at 1. Zero until published.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn encryption_key(&self) -> (KeyId, &Arc<KeyMaterial>) {
        (self.encryption_id, &self.encryption)
    }

    pub fn decryption_key(&self, id: KeyId) -> Option<&Arc<KeyMaterial>> {
        self.decryption.get(&id)
    }

    /// Ids valid for decryption, sorted.
    pub fn decryption_ids(&self) -> Vec<KeyId> {
        let mut ids: Vec<KeyId> = self.decryption.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn decryption_len(&self) -> usize {
        self.decryption.len()
    }
}

/// Holder of the current [`KeySnapshot`].
///
/// Reads are lock-free loads of an `Arc`; [`replace`](Self::replace) publishes
/// a whole snapshot with one atomic store, so a reader sees either the old
/// snapshot or the new one, never a mix.
#[derive(Debug)]
pub struct KeyStore {
    current: ArcSwapOption<KeySnapshot>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwapOption::empty(),
        }
    }

    /// The key designated for new encryptions.
    pub fn current_encryption_key(&self) -> Result<(KeyId, Arc<KeyMaterial>)> {
        let guard = self.current.load();
        let snapshot = guard.as_deref().ok_or(CryptoError::NotConfigured)?;
        Ok((snapshot.encryption_id, Arc::clone(&snapshot.encryption)))
    }

    /// The decryption key registered under `id`.
    ///
    /// An unconfigured store knows no keys and reports `KeyUnknown` as well.
    pub fn decryption_key(&self, id: KeyId) -> Result<Arc<KeyMaterial>> {
        let guard = self.current.load();
        guard
            .as_deref()
            .and_then(|snapshot| snapshot.decryption.get(&id))
            .cloned()
            .ok_or(CryptoError::KeyUnknown(id))
    }

    /// Replace the current snapshot wholesale and return its generation.
    ///
    /// Nothing from the previous snapshot carries over; callers that want to
    /// keep older keys must include them.
    pub fn replace(&self, snapshot: KeySnapshot) -> u64 {
        let mut generation = 0;
        self.current.rcu(|previous| {
            let mut next = snapshot.clone();
            next.generation = previous.as_ref().map_or(1, |prev| prev.generation + 1);
            generation = next.generation;
            Some(Arc::new(next))
        });
        generation
    }

    /// The current snapshot, for callers that need several consistent reads.
    pub fn snapshot(&self) -> Option<Arc<KeySnapshot>> {
        self.current.load_full()
    }

    pub fn is_configured(&self) -> bool {
        self.current.load().is_some()
    }
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, std::thread};

    fn material(byte: u8) -> Arc<KeyMaterial> {
        Arc::new(KeyMaterial::from_bytes(&[byte; 32]).unwrap())
    }

    fn snapshot(enc: KeyId, dec: &[KeyId]) -> KeySnapshot {
        let decryption = dec.iter().map(|id| (*id, material(*id))).collect();
        KeySnapshot::new(enc, material(enc), decryption)
    }

    #[test]
    fn empty_store_is_not_configured() {
        let store = KeyStore::new();
        assert!(!store.is_configured());
        assert!(store.snapshot().is_none());
        assert!(matches!(
            store.current_encryption_key(),
            Err(CryptoError::NotConfigured)
        ));
        assert!(matches!(
            store.decryption_key(1),
            Err(CryptoError::KeyUnknown(1))
        ));
    }

    #[test]
    fn snapshot_always_contains_encryption_key() {
        let snap = snapshot(7, &[1, 2]);
        assert_eq!(snap.decryption_ids(), vec![1, 2, 7]);
        assert!(Arc::ptr_eq(
            snap.decryption_key(7).unwrap(),
            snap.encryption_key().1
        ));
    }

    #[test]
    fn replace_is_wholesale() {
        let store = KeyStore::new();
        store.replace(snapshot(1, &[0, 1]));
        assert!(store.decryption_key(0).is_ok());

        store.replace(snapshot(2, &[1]));
        let (id, _) = store.current_encryption_key().unwrap();
        assert_eq!(id, 2);
        assert!(store.decryption_key(1).is_ok());
        assert!(matches!(
            store.decryption_key(0),
            Err(CryptoError::KeyUnknown(0))
        ));
    }

    #[test]
    fn generations_increase_per_publish() {
        let store = KeyStore::new();
        assert_eq!(store.replace(snapshot(1, &[])), 1);
        assert_eq!(store.replace(snapshot(1, &[])), 2);
        assert_eq!(store.snapshot().unwrap().generation(), 2);
    }

    #[test]
    fn readers_never_observe_torn_snapshots() {
        let store = KeyStore::new();
        store.replace(snapshot(1, &[1, 10]));

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..2_000 {
                    if i % 2 == 0 {
                        store.replace(snapshot(2, &[2, 20]));
                    } else {
                        store.replace(snapshot(1, &[1, 10]));
                    }
                }
            });
            for _ in 0..4 {
                s.spawn(|| {
                    let mut last_generation = 0;
                    for _ in 0..2_000 {
                        let snap = store.snapshot().unwrap();
                        let (enc, _) = snap.encryption_key();
                        let expected = if enc == 1 { vec![1, 10] } else { vec![2, 20] };
                        assert_eq!(snap.decryption_ids(), expected);
                        assert!(snap.generation() >= last_generation);
                        last_generation = snap.generation();
                    }
                });
            }
        });
    }
}
