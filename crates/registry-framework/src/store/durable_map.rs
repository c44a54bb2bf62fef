//! Ordered key-value map that survives process restarts.

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::StoreResult;
use super::log::{LogFile, StoreOptions};

#[derive(Serialize, Deserialize)]
enum MapRecord<K, V> {
    Put { key: K, value: V },
    Remove { key: K },
}

#[derive(Serialize)]
enum MapRecordRef<'a, K, V> {
    Put { key: &'a K, value: &'a V },
    Remove { key: &'a K },
}

/// A `BTreeMap` mirrored by an append-only log.
///
/// Every mutation reaches the log before the in-memory map changes, so a failed write
/// leaves the map exactly as it was. Iteration is in key order.
pub struct DurableMap<K, V> {
    entries: BTreeMap<K, V>,
    log: LogFile,
    compact_after: usize,
}

impl<K, V> DurableMap<K, V>
where
    K: Ord + Clone + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Opens the map stored at `path`, replaying its log.
    pub fn open(path: &Path, options: &StoreOptions) -> StoreResult<Self> {
        let mut entries = BTreeMap::new();
        let log = LogFile::open(path, options, |record: MapRecord<K, V>| match record {
            MapRecord::Put { key, value } => {
                entries.insert(key, value);
            }
            MapRecord::Remove { key } => {
                entries.remove(&key);
            }
        })?;
        Ok(Self {
            entries,
            log,
            compact_after: options.compact_after,
        })
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: K, value: V) -> StoreResult<Option<V>> {
        self.log.append(&MapRecordRef::Put {
            key: &key,
            value: &value,
        })?;
        let previous = self.entries.insert(key, value);
        self.maybe_compact();
        Ok(previous)
    }

    /// Removes `key`, returning its value. Absent keys write nothing.
    pub fn remove(&mut self, key: &K) -> StoreResult<Option<V>> {
        if !self.entries.contains_key(key) {
            return Ok(None);
        }
        let record: MapRecordRef<'_, K, V> = MapRecordRef::Remove { key };
        self.log.append(&record)?;
        let removed = self.entries.remove(key);
        self.maybe_compact();
        Ok(removed)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }

    /// Drops `key` from memory only. The log still holds it, so this is for callers
    /// that know reopening will drop it too.
    pub(crate) fn forget(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    #[cfg(test)]
    pub(crate) fn log_mut(&mut self) -> &mut LogFile {
        &mut self.log
    }

    /// Rewrites the log as one `Put` per live entry.
    pub fn compact(&mut self) -> StoreResult<()> {
        let before = self.log.frames();
        let records: Vec<MapRecordRef<'_, K, V>> = self
            .entries
            .iter()
            .map(|(key, value)| MapRecordRef::Put { key, value })
            .collect();
        self.log.rewrite(records.iter())?;
        info!(path = %self.log.path().display(), before, after = self.log.frames(), "Compacted");
        Ok(())
    }

    // The mutation is already durable here; a failed compaction only leaves a longer log.
    fn maybe_compact(&mut self) {
        let limit = self.compact_after.max(self.entries.len().saturating_mul(2));
        if self.log.frames() > limit {
            if let Err(e) = self.compact() {
                warn!(path = %self.log.path().display(), error = %e, "Compaction failed");
            }
        }
    }
}
