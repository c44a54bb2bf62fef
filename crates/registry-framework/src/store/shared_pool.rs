//! Append-only, durable list of entities that have left the active map.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::StoreResult;
use super::log::{LogFile, StoreOptions};

/// Entries are terminal: there is no update or removal.
pub struct SharedPool<V> {
    items: Vec<V>,
    log: LogFile,
}

impl<V> SharedPool<V>
where
    V: Serialize + DeserializeOwned,
{
    pub fn open(path: &Path, options: &StoreOptions) -> StoreResult<Self> {
        let mut items = Vec::new();
        let log = LogFile::open(path, options, |item: V| items.push(item))?;
        Ok(Self { items, log })
    }

    pub fn append(&mut self, item: V) -> StoreResult<()> {
        self.log.append(&item)?;
        self.items.push(item);
        Ok(())
    }

    /// Takes back the most recent append, from the log and from memory.
    pub(crate) fn undo_append(&mut self) -> StoreResult<Option<V>> {
        self.log.undo_append()?;
        Ok(self.items.pop())
    }

    #[cfg(test)]
    pub(crate) fn log_mut(&mut self) -> &mut LogFile {
        &mut self.log
    }

    /// Items in the order they were appended.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.items.iter()
    }

    pub fn contains(&self, mut predicate: impl FnMut(&V) -> bool) -> bool {
        self.items.iter().any(|item| predicate(item))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn path(&self) -> &Path {
        self.log.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_pool_keeps_insertion_order_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared.log");
        let options = StoreOptions::default();
        {
            let mut pool = SharedPool::<String>::open(&path, &options).unwrap();
            assert!(pool.is_empty());
            pool.append("zucchini".into()).unwrap();
            pool.append("apple".into()).unwrap();
        }

        let pool = SharedPool::<String>::open(&path, &options).unwrap();
        assert!(pool.path().ends_with("shared.log"));
        let items: Vec<_> = pool.iter().cloned().collect();
        assert_eq!(items, vec!["zucchini", "apple"]);
        assert!(pool.contains(|item| item == "apple"));
        assert!(!pool.contains(|item| item == "pear"));
    }

    #[test]
    fn test_undo_append_takes_back_the_last_item() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shared.log");
        let options = StoreOptions::default();
        {
            let mut pool = SharedPool::<String>::open(&path, &options).unwrap();
            pool.append("kept".into()).unwrap();
            pool.append("undone".into()).unwrap();
            assert_eq!(pool.undo_append().unwrap(), Some("undone".to_string()));
            assert_eq!(pool.len(), 1);
        }

        let pool = SharedPool::<String>::open(&path, &options).unwrap();
        let items: Vec<_> = pool.iter().cloned().collect();
        assert_eq!(items, vec!["kept"]);
    }
}
