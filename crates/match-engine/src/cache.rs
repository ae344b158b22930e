//! Deterministic cache of action records
//!
//! Records are keyed by the two player identities and the turn count. Two
//! matches with the same key are assumed to produce the same record, which
//! only holds for noiseless matches between deterministic players; the
//! engine is responsible for never writing or trusting an entry otherwise.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::action::ActionRecord;
use crate::error::{Error, Result};
use crate::player::PlayerId;

/// (player 1, player 2, turns). Order matters: (a, b) and (b, a) are distinct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    pub player_1: PlayerId,
    pub player_2: PlayerId,
    pub turns: usize,
}

impl CacheKey {
    pub fn new(player_1: PlayerId, player_2: PlayerId, turns: usize) -> Self {
        Self { player_1, player_2, turns }
    }
}

/// Map from cache key to a previously observed record
///
/// Starts mutable. A frozen cache still serves reads but rejects writes.
#[derive(Clone, Debug)]
pub struct DeterministicCache {
    entries: HashMap<CacheKey, ActionRecord>,
    mutable: bool,
}

impl DeterministicCache {
    pub fn new() -> Self {
        Self { entries: HashMap::new(), mutable: true }
    }

    /// Wrap in the shared handle matches hold
    pub fn shared(self) -> SharedCache {
        Arc::new(Mutex::new(self))
    }

    pub fn contains_key(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &CacheKey) -> Option<&ActionRecord> {
        self.entries.get(key)
    }

    /// Store a record, replacing any existing entry for the key
    pub fn insert(&mut self, key: CacheKey, record: ActionRecord) -> Result<()> {
        if !self.mutable {
            return Err(Error::CacheFrozen);
        }
        self.entries.insert(key, record);
        Ok(())
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    pub fn set_mutable(&mut self, mutable: bool) {
        self.mutable = mutable;
    }

    /// Make the cache read-only
    pub fn freeze(&mut self) {
        self.mutable = false;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for DeterministicCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache handle shared between matches
///
/// Callers running matches on several threads against one cache get
/// serialized access through the mutex.
pub type SharedCache = Arc<Mutex<DeterministicCache>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action::{Cooperate as C, Defect as D};

    fn key(turns: usize) -> CacheKey {
        CacheKey::new(PlayerId::next(), PlayerId::next(), turns)
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = DeterministicCache::new();
        let k = key(2);
        assert!(!cache.contains_key(&k));

        cache.insert(k, vec![(C, D), (D, D)]).unwrap();
        assert!(cache.contains_key(&k));
        assert_eq!(cache.get(&k), Some(&vec![(C, D), (D, D)]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_order_matters() {
        let a = PlayerId::next();
        let b = PlayerId::next();
        let mut cache = DeterministicCache::new();
        cache.insert(CacheKey::new(a, b, 1), vec![(C, D)]).unwrap();
        assert!(!cache.contains_key(&CacheKey::new(b, a, 1)));
        assert!(!cache.contains_key(&CacheKey::new(a, b, 2)));
    }

    #[test]
    fn test_frozen_rejects_writes_but_serves_reads() {
        let mut cache = DeterministicCache::new();
        let k = key(1);
        cache.insert(k, vec![(C, C)]).unwrap();
        cache.freeze();

        assert!(!cache.is_mutable());
        assert_eq!(cache.insert(key(1), vec![(D, D)]), Err(Error::CacheFrozen));
        assert_eq!(cache.get(&k), Some(&vec![(C, C)]));

        cache.set_mutable(true);
        assert!(cache.insert(key(1), vec![(D, D)]).is_ok());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_empty_record_is_a_valid_entry() {
        let mut cache = DeterministicCache::new();
        let k = key(0);
        cache.insert(k, Vec::new()).unwrap();
        assert!(cache.contains_key(&k));
        assert_eq!(cache.get(&k).map(Vec::len), Some(0));
    }
}
