//! # Durable Storage
//!
//! Everything an actor owns lives here: the ordered map of active entities and the
//! append-only pool of shared ones. Both are logs of checksummed JSON frames that are
//! replayed on open.
//!
//! - [`DurableMap`] - ordered key-value map, one log file
//! - [`SharedPool`] - append-only list, one log file
//! - [`RegistryStore`] - both of the above in one data directory, kept disjoint

mod codec;
mod durable_map;
mod error;
mod log;
mod shared_pool;

pub use durable_map::DurableMap;
pub use error::{StoreError, StoreResult};
pub use log::StoreOptions;
pub use shared_pool::SharedPool;

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{error, info, warn};

use crate::entity::RegistryEntity;

/// File holding the active entities.
pub const ITEMS_FILE: &str = "items.log";
/// File holding the shared pool.
pub const SHARED_FILE: &str = "shared.log";

/// Active entities plus the shared pool, stored side by side in one directory.
///
/// An id is either in [`items`](Self::items) or in [`shared`](Self::shared), never both.
pub struct RegistryStore<T: RegistryEntity> {
    items: DurableMap<T::Id, T>,
    shared: SharedPool<T>,
}

impl<T: RegistryEntity> RegistryStore<T> {
    /// Opens (or creates) the store in `data_dir`.
    ///
    /// Sharing appends to the pool before removing from the map, so a crash between
    /// the two writes leaves the entity in both. Such entities are dropped from the
    /// map here.
    pub fn open(data_dir: &Path, options: &StoreOptions) -> StoreResult<Self> {
        let mut items = DurableMap::<T::Id, T>::open(&data_dir.join(ITEMS_FILE), options)?;
        let shared = SharedPool::<T>::open(&data_dir.join(SHARED_FILE), options)?;

        let shared_ids: BTreeSet<&T::Id> = shared.iter().map(|item| item.id()).collect();
        let stranded: Vec<T::Id> = items
            .iter()
            .filter(|(id, _)| shared_ids.contains(id))
            .map(|(id, _)| id.clone())
            .collect();
        for id in stranded {
            warn!(%id, "Entity found both active and shared; keeping the shared copy");
            items.remove(&id)?;
        }

        info!(
            data_dir = %data_dir.display(),
            active = items.len(),
            shared = shared.len(),
            "Store opened"
        );
        Ok(Self { items, shared })
    }

    pub fn items(&self) -> &DurableMap<T::Id, T> {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut DurableMap<T::Id, T> {
        &mut self.items
    }

    pub fn shared(&self) -> &SharedPool<T> {
        &self.shared
    }

    /// Moves the entity under `id` into the shared pool, unmodified.
    ///
    /// If the map write fails, the pool append is taken back and the error returned.
    /// If that fails too, the entity is on disk in both files; reopening keeps the
    /// shared copy, so memory is brought in line with that and the share succeeds.
    pub fn share(&mut self, id: &T::Id) -> StoreResult<Option<T>> {
        let Some(item) = self.items.get(id).cloned() else {
            return Ok(None);
        };
        self.shared.append(item.clone())?;
        if let Err(e) = self.items.remove(id) {
            let Err(undo) = self.shared.undo_append() else {
                return Err(e);
            };
            error!(
                %id,
                error = %e,
                undo_error = %undo,
                "Share half applied; keeping the shared copy"
            );
            self.items.forget(id);
        }
        Ok(Some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::Origin;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Parcel {
        id: String,
        weight: u32,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Parcel error")]
    struct ParcelError;

    #[async_trait]
    impl RegistryEntity for Parcel {
        type Id = String;
        type Create = u32;
        type Update = ();
        type Action = ();
        type ActionResult = ();
        type Query = ();
        type Context = ();
        type Error = ParcelError;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(
            id: String,
            weight: u32,
            _origin: &Origin,
            _ctx: &(),
        ) -> Result<Self, ParcelError> {
            Ok(Self { id, weight })
        }

        fn matches(&self, _query: &(), _origin: &Origin, _ctx: &()) -> bool {
            true
        }

        async fn on_update(&mut self, _: (), _: &Origin, _: &()) -> Result<(), ParcelError> {
            Ok(())
        }

        async fn handle_action(&mut self, _: (), _: &Origin, _: &()) -> Result<(), ParcelError> {
            Ok(())
        }
    }

    fn options() -> StoreOptions {
        StoreOptions {
            sync_writes: false,
            compact_after: 1024,
        }
    }

    fn parcel(id: &str) -> Parcel {
        Parcel {
            id: id.to_string(),
            weight: 3,
        }
    }

    fn open(dir: &TempDir) -> RegistryStore<Parcel> {
        RegistryStore::open(dir.path(), &options()).unwrap()
    }

    fn shared_ids(store: &RegistryStore<Parcel>) -> Vec<String> {
        store.shared().iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_share_moves_entity_between_files() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir);
        assert!(store.items().path().ends_with(ITEMS_FILE));
        store.items_mut().insert("p1".into(), parcel("p1")).unwrap();

        assert_eq!(store.share(&"p1".to_string()).unwrap(), Some(parcel("p1")));
        assert_eq!(store.share(&"p1".to_string()).unwrap(), None);
        drop(store);

        let store = open(&dir);
        assert!(store.items().is_empty());
        assert_eq!(shared_ids(&store), vec!["p1"]);
    }

    #[test]
    fn test_entity_in_both_files_is_kept_only_as_shared() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = open(&dir);
            store.items_mut().insert("p1".into(), parcel("p1")).unwrap();
            store.items_mut().insert("p2".into(), parcel("p2")).unwrap();
            store.share(&"p1".to_string()).unwrap();
        }
        // What a crash between the pool append and the map removal leaves behind.
        {
            let path = dir.path().join(ITEMS_FILE);
            let mut items = DurableMap::<String, Parcel>::open(&path, &options()).unwrap();
            items.insert("p1".into(), parcel("p1")).unwrap();
        }

        let store = open(&dir);
        assert!(!store.items().contains_key(&"p1".to_string()));
        assert!(store.items().contains_key(&"p2".to_string()));
        assert_eq!(shared_ids(&store), vec!["p1"]);
        drop(store);

        let store = open(&dir);
        assert_eq!(store.items().len(), 1);
        assert_eq!(shared_ids(&store), vec!["p1"]);
    }

    #[test]
    fn test_failed_map_write_takes_back_the_share() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir);
        store.items_mut().insert("p1".into(), parcel("p1")).unwrap();

        store.items.log_mut().faults.append = true;
        assert!(store.share(&"p1".to_string()).is_err());
        assert!(store.items().contains_key(&"p1".to_string()));
        assert!(store.shared().is_empty());
        drop(store);

        let store = open(&dir);
        assert!(store.items().contains_key(&"p1".to_string()));
        assert!(store.shared().is_empty());
    }

    #[test]
    fn test_share_that_cannot_be_taken_back_stays_shared() {
        let dir = TempDir::new().unwrap();
        let mut store = open(&dir);
        store.items_mut().insert("p1".into(), parcel("p1")).unwrap();

        store.items.log_mut().faults.append = true;
        store.shared.log_mut().faults.truncate = true;
        assert_eq!(store.share(&"p1".to_string()).unwrap(), Some(parcel("p1")));
        assert!(!store.items().contains_key(&"p1".to_string()));
        assert_eq!(shared_ids(&store), vec!["p1"]);
        drop(store);

        let store = open(&dir);
        assert!(!store.items().contains_key(&"p1".to_string()));
        assert_eq!(shared_ids(&store), vec!["p1"]);
    }
}
