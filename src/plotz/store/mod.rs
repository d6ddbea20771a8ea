//! # Storage Layer
//!
//! A [`RecordStore`] is an ordered, persisted collection of one record type.
//! There is one store per record kind (plants, activities), both built from the
//! same generic code.
//!
//! ## Layers
//!
//! ```text
//! RecordStore<R, B>      ordered Vec<R>, CRUD, undo support
//!        │
//!        │  codec::encode / codec::decode
//!        ▼
//! StorageBackend (B)     opaque string blob per key
//!   ├── FsBackend        <data_dir>/<key>.json
//!   └── MemBackend       shared in-memory map (tests)
//! ```
//!
//! ## Persistence
//!
//! The store is the single source of truth while the process runs. Every
//! mutation that changes the collection re-encodes the whole collection and
//! writes it under [`Record::STORAGE_KEY`]. The blob is read once, in
//! [`RecordStore::open`].
//!
//! ## Ordering
//!
//! Insertion order is meaningful: it is the default list order and the position
//! an undo restores to. `add` appends, `add_at_index` inserts at a clamped
//! position, nothing ever sorts the collection in place.
//!
//! ## Missing Ids
//!
//! Lookups and mutations of unknown ids are not errors. `get` returns `None`,
//! `update` and `delete` return `Ok(false)` without touching the backend. The
//! only errors a store reports come from the backend or the codec, and by then
//! the in-memory collection already holds the new state.

use crate::codec;
use crate::error::Result;
use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use uuid::Uuid;

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;

use backend::StorageBackend;

/// A record kind that can live in a [`RecordStore`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: fmt::Display + Clone + PartialEq;
    /// Creation input, without an id.
    type New;
    /// Partial update; only supplied fields are applied.
    type Patch;

    /// Backend key the collection is persisted under.
    const STORAGE_KEY: &'static str;
    /// Field name of the collection inside the persisted state.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    /// Build a full record from its creation input and a freshly assigned id.
    fn create(new: Self::New, id: String) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}

pub struct RecordStore<R: Record, B: StorageBackend> {
    records: Vec<R>,
    backend: B,
}

impl<R: Record, B: StorageBackend> RecordStore<R, B> {
    /// Rehydrate the store from `backend`.
    ///
    /// Falls back to `defaults` when nothing has been persisted yet, or when the
    /// persisted blob cannot be decoded (corrupt, or written by a newer
    /// version). An undecodable blob is copied to [`backup_key`] before the
    /// store starts over, so the next mutation never destroys the only copy.
    pub fn open(backend: B, defaults: Vec<R>) -> Self {
        let records = match backend.get_item(R::STORAGE_KEY) {
            Ok(Some(blob)) => match codec::decode(R::COLLECTION, &blob) {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        "discarding unreadable {} ({}), starting from defaults",
                        R::STORAGE_KEY,
                        e
                    );
                    set_aside(&backend, R::STORAGE_KEY, &blob);
                    defaults
                }
            },
            Ok(None) => defaults,
            Err(e) => {
                warn!("could not read {} ({}), starting from defaults", R::STORAGE_KEY, e);
                defaults
            }
        };
        debug!("opened {} with {} records", R::STORAGE_KEY, records.len());
        Self { records, backend }
    }

    /// Read and decode the persisted collection, if any.
    pub fn load(backend: &B) -> Result<Option<Vec<R>>> {
        match backend.get_item(R::STORAGE_KEY)? {
            Some(blob) => Ok(Some(codec::decode(R::COLLECTION, &blob)?)),
            None => Ok(None),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Index of the first record whose id equals `id` by string value.
    pub fn position(&self, id: impl fmt::Display) -> Option<usize> {
        let wanted = id.to_string();
        self.records
            .iter()
            .position(|record| record.id().to_string() == wanted)
    }

    pub fn get(&self, id: impl fmt::Display) -> Option<&R> {
        self.position(id).map(|index| &self.records[index])
    }

    /// Append a new record under a fresh id and persist.
    pub fn add(&mut self, new: R::New) -> Result<&R> {
        let id = self.fresh_id();
        let record = R::create(new, id);
        debug!("{}: add {}", R::STORAGE_KEY, record.id());
        self.records.push(record);
        self.persist()?;
        let last = self.records.len() - 1;
        Ok(&self.records[last])
    }

    /// Append a record that already carries an id.
    ///
    /// Returns `Ok(false)` without changing anything when the id is taken.
    pub fn add_with_id(&mut self, record: R) -> Result<bool> {
        let index = self.records.len();
        self.add_at_index(record, index)
    }

    /// Replace the supplied fields of the record matching `id` and persist.
    ///
    /// Returns `Ok(false)` when no record matches.
    pub fn update(&mut self, id: impl fmt::Display, patch: R::Patch) -> Result<bool> {
        let Some(index) = self.position(&id) else {
            debug!("{}: update of unknown id {}", R::STORAGE_KEY, id);
            return Ok(false);
        };
        self.records[index].apply(patch);
        debug!("{}: update {}", R::STORAGE_KEY, id);
        self.persist()?;
        Ok(true)
    }

    /// Remove the first record matching `id` and persist.
    ///
    /// Returns `Ok(false)` when no record matches.
    pub fn delete(&mut self, id: impl fmt::Display) -> Result<bool> {
        let Some(index) = self.position(&id) else {
            debug!("{}: delete of unknown id {}", R::STORAGE_KEY, id);
            return Ok(false);
        };
        self.records.remove(index);
        debug!("{}: delete {} at {}", R::STORAGE_KEY, id, index);
        self.persist()?;
        Ok(true)
    }

    /// Like [`delete`](Self::delete), but when the write fails the record is
    /// put back at its position before the error is returned.
    pub(crate) fn delete_or_restore(&mut self, id: impl fmt::Display) -> Result<bool> {
        let Some(index) = self.position(&id) else {
            debug!("{}: delete of unknown id {}", R::STORAGE_KEY, id);
            return Ok(false);
        };
        let removed = self.records.remove(index);
        debug!("{}: delete {} at {}", R::STORAGE_KEY, id, index);
        if let Err(e) = self.persist() {
            warn!("{}: write failed, keeping {} ({})", R::STORAGE_KEY, id, e);
            self.records.insert(index, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Insert a fully formed record at `min(index, len)` and persist.
    ///
    /// Ids stay unique: if a record with the same id is already present the
    /// insert is refused and `Ok(false)` is returned.
    pub fn add_at_index(&mut self, record: R, index: usize) -> Result<bool> {
        if self.position(record.id()).is_some() {
            warn!(
                "{}: refusing to insert duplicate id {}",
                R::STORAGE_KEY,
                record.id()
            );
            return Ok(false);
        }
        let index = index.min(self.records.len());
        debug!("{}: insert {} at {}", R::STORAGE_KEY, record.id(), index);
        self.records.insert(index, record);
        self.persist()?;
        Ok(true)
    }

    /// Write the current collection to the backend.
    pub fn persist(&self) -> Result<()> {
        let blob = codec::encode(R::COLLECTION, &self.records)?;
        self.backend.set_item(R::STORAGE_KEY, &blob)
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }
}

/// Key an undecodable blob stored under `key` is copied to.
pub fn backup_key(key: &str) -> String {
    format!("{}.bak", key)
}

/// Copy an undecodable blob aside. Failure to do so is logged, not fatal.
pub(crate) fn set_aside<B: StorageBackend>(backend: &B, key: &str, blob: &str) {
    let backup = backup_key(key);
    match backend.set_item(&backup, blob) {
        Ok(()) => warn!("kept the unreadable {} as {}", key, backup),
        Err(e) => warn!("could not back up {} ({})", key, e),
    }
}

#[cfg(test)]
mod tests {
    use super::mem_backend::MemBackend;
    use super::*;
    use crate::error::PlotzError;
    use crate::model::{
        Activity, ActivityPatch, ActivityType, Location, NewActivity, NewPlant, Plant, PlantId,
        PlantPatch, PlantStatus,
    };
    use crate::seed;
    use chrono::{TimeZone, Utc};

    fn plant_store() -> RecordStore<Plant, MemBackend> {
        RecordStore::open(MemBackend::new(), seed::plants())
    }

    fn ids(store: &RecordStore<Plant, MemBackend>) -> Vec<String> {
        store.records().iter().map(|p| p.id.to_string()).collect()
    }

    fn kale() -> NewPlant {
        NewPlant::new(
            "Kale",
            Location::HerbGarden,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn opens_with_defaults_when_nothing_is_persisted() {
        let store = plant_store();
        assert_eq!(ids(&store), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn get_compares_ids_by_value() {
        let store = plant_store();
        assert_eq!(store.get("3").unwrap().name, "Cucumber");
        assert_eq!(store.get(3).unwrap().name, "Cucumber");
        assert_eq!(store.get(PlantId::new("3")).unwrap().name, "Cucumber");
        assert!(store.get("42").is_none());
    }

    #[test]
    fn add_assigns_fresh_id_and_defaults_status() {
        let mut store = plant_store();
        let added = store.add(kale()).unwrap().clone();

        assert_eq!(added.status, PlantStatus::Growing);
        assert_eq!(added.name, "Kale");
        assert_eq!(added.location, Location::HerbGarden);
        assert_eq!(added.notes, "");
        assert!(!["1", "2", "3", "4", "5"].contains(&added.id.as_str()));

        assert_eq!(store.len(), 6);
        assert_eq!(store.records().last().unwrap().id, added.id);
        assert_eq!(store.get(&added.id), Some(&added));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = plant_store();
        let first = store.add(kale()).unwrap().id.clone();
        store.delete(&first).unwrap();
        let second = store.add(kale()).unwrap().id.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn update_changes_only_supplied_fields_and_keeps_position() {
        let mut store = plant_store();
        let before = store.get("2").unwrap().clone();

        let changed = store
            .update(
                "2",
                PlantPatch {
                    notes: Some("Needs pinching".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(changed);
        let after = store.get("2").unwrap();
        assert_eq!(after.notes, "Needs pinching");
        assert_eq!(after.name, before.name);
        assert_eq!(after.variety, before.variety);
        assert_eq!(after.location, before.location);
        assert_eq!(after.planted_date, before.planted_date);
        assert_eq!(after.status, before.status);
        assert_eq!(store.position("2"), Some(1));
    }

    #[test]
    fn update_of_unknown_id_is_a_silent_noop() {
        let mut store = plant_store();
        let changed = store.update("99", PlantPatch::default()).unwrap();
        assert!(!changed);
        assert_eq!(store.backend().write_count(), 0);
    }

    #[test]
    fn delete_removes_the_record() {
        let mut store = plant_store();
        assert!(store.delete("3").unwrap());
        assert!(store.get("3").is_none());
        assert_eq!(store.len(), 4);
        assert!(!store.delete("3").unwrap());
    }

    #[test]
    fn add_at_index_restores_original_position() {
        let mut store = plant_store();
        let plant3 = store.get("3").unwrap().clone();

        store.delete("3").unwrap();
        assert!(store.add_at_index(plant3, 2).unwrap());

        assert_eq!(store.len(), 5);
        assert_eq!(store.records()[2].id.as_str(), "3");
        assert_eq!(store.records(), seed::plants().as_slice());
    }

    #[test]
    fn add_at_index_clamps_to_the_end() {
        let mut store = plant_store();
        let plant1 = store.get("1").unwrap().clone();
        store.delete("1").unwrap();

        store.add_at_index(plant1, 100).unwrap();
        assert_eq!(ids(&store), vec!["2", "3", "4", "5", "1"]);
    }

    #[test]
    fn add_at_index_refuses_duplicate_ids() {
        let mut store = plant_store();
        let plant1 = store.get("1").unwrap().clone();
        assert!(!store.add_at_index(plant1, 0).unwrap());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn add_with_id_appends_and_keeps_the_id() {
        let mut store = RecordStore::<Plant, _>::open(MemBackend::new(), Vec::new());
        let mut plant = Plant::create(kale(), "garden-7".into());
        plant.status = PlantStatus::Dormant;

        assert!(store.add_with_id(plant.clone()).unwrap());
        assert_eq!(store.get("garden-7"), Some(&plant));
        assert!(!store.add_with_id(plant).unwrap());
    }

    #[test]
    fn mutations_persist_and_reopen() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone(), seed::plants());
        store.delete("4").unwrap();
        store
            .update(
                "1",
                PlantPatch {
                    status: Some(PlantStatus::Harvested),
                    ..Default::default()
                },
            )
            .unwrap();

        let reopened = RecordStore::<Plant, _>::open(backend, seed::plants());
        assert_eq!(reopened.records(), store.records());
        assert_eq!(reopened.get("1").unwrap().status, PlantStatus::Harvested);
    }

    #[test]
    fn persisted_empty_collection_does_not_reseed() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone(), seed::plants());
        for id in ["1", "2", "3", "4", "5"] {
            store.delete(id).unwrap();
        }
        let reopened = RecordStore::<Plant, _>::open(backend, seed::plants());
        assert!(reopened.is_empty());
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let backend = MemBackend::new();
        backend.set_item(Plant::STORAGE_KEY, "{oops").unwrap();

        assert!(matches!(
            RecordStore::<Plant, _>::load(&backend),
            Err(PlotzError::Serialization(_))
        ));

        let store = RecordStore::<Plant, _>::open(backend.clone(), seed::plants());
        assert_eq!(store.len(), 5);
        assert_eq!(backend.raw(Plant::STORAGE_KEY).as_deref(), Some("{oops"));
        assert_eq!(
            backend.raw(&backup_key(Plant::STORAGE_KEY)).as_deref(),
            Some("{oops")
        );
    }

    #[test]
    fn blob_from_a_newer_version_survives_the_next_write() {
        let backend = MemBackend::new();
        let newer = r#"{"state":{"plants":[]},"version":7}"#;
        backend.set_item(Plant::STORAGE_KEY, newer).unwrap();

        assert!(matches!(
            RecordStore::<Plant, _>::load(&backend),
            Err(PlotzError::Store(_))
        ));

        let mut store = RecordStore::<Plant, _>::open(backend.clone(), seed::plants());
        assert_eq!(store.len(), 5);
        store.add(kale()).unwrap();

        assert_ne!(backend.raw(Plant::STORAGE_KEY).as_deref(), Some(newer));
        assert_eq!(
            backend.raw(&backup_key(Plant::STORAGE_KEY)).as_deref(),
            Some(newer)
        );
    }

    #[test]
    fn readable_blob_is_not_backed_up() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone(), seed::plants());
        store.delete("2").unwrap();

        RecordStore::<Plant, _>::open(backend.clone(), seed::plants());
        assert_eq!(backend.raw(&backup_key(Plant::STORAGE_KEY)), None);
    }

    #[test]
    fn delete_or_restore_puts_the_record_back_on_write_failure() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone(), seed::plants());
        backend.set_simulate_write_error(true);

        assert!(store.delete_or_restore("3").is_err());
        assert_eq!(store.records(), seed::plants().as_slice());

        backend.set_simulate_write_error(false);
        assert!(store.delete_or_restore("3").unwrap());
        assert!(store.get("3").is_none());
    }

    #[test]
    fn write_failure_is_reported_after_the_memory_change() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone(), seed::plants());
        backend.set_simulate_write_error(true);

        assert!(store.delete("1").is_err());
        assert!(store.get("1").is_none());
    }

    #[test]
    fn activity_store_works_the_same_way() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone(), seed::activities(now));

        let added = store
            .add(NewActivity::new(ActivityType::Fertilizing, "2", now).with_notes("half strength"))
            .unwrap()
            .id
            .clone();
        store
            .update(
                &added,
                ActivityPatch {
                    kind: Some(ActivityType::Pruning),
                    ..Default::default()
                },
            )
            .unwrap();

        let reopened = RecordStore::<Activity, _>::open(backend, Vec::new());
        let activity = reopened.get(&added).unwrap();
        assert_eq!(activity.kind, ActivityType::Pruning);
        assert_eq!(activity.notes.as_deref(), Some("half strength"));
        assert_eq!(activity.date, now);
        assert_eq!(reopened.len(), 8);
    }
}
