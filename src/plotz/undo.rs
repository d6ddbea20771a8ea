//! # Delete / Undo
//!
//! Deleting a record is a three step exchange between the caller and a
//! [`RecordStore`]:
//!
//! ```text
//! Present ──stage_delete──▶ Staged ──commit_delete──▶ Deleted ──undo──▶ Restored
//!                             │                          (token)       (token consumed)
//!                             └─ drop = cancel
//! ```
//!
//! The record and its index are captured while staging, because once the
//! record is gone the store can no longer tell where it used to be.
//!
//! Restoring reinserts at the captured index, clamped to the current length.
//! If other records were added or removed in between, the index is applied
//! literally and the restored record may land next to different neighbours.
//!
//! A [`DeletionToken`] can be redeemed once. Later calls to
//! [`RecordStore::undo`] with the same token do nothing.

use crate::error::Result;
use crate::store::backend::StorageBackend;
use crate::store::{Record, RecordStore};
use log::debug;
use std::fmt;
use std::mem;

/// Snapshot of a record taken before it is deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedDelete<R> {
    record: R,
    index: usize,
}

impl<R> StagedDelete<R> {
    pub fn record(&self) -> &R {
        &self.record
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenState<R> {
    Pending { record: R, index: usize },
    Consumed,
}

/// Proof of a committed delete, redeemable once for an undo.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionToken<R> {
    state: TokenState<R>,
}

impl<R> DeletionToken<R> {
    pub fn is_consumed(&self) -> bool {
        matches!(self.state, TokenState::Consumed)
    }

    /// The deleted record, while the token is still redeemable.
    pub fn record(&self) -> Option<&R> {
        match &self.state {
            TokenState::Pending { record, .. } => Some(record),
            TokenState::Consumed => None,
        }
    }

    /// The index the record will be restored to.
    pub fn index(&self) -> Option<usize> {
        match &self.state {
            TokenState::Pending { index, .. } => Some(*index),
            TokenState::Consumed => None,
        }
    }

    fn take(&mut self) -> Option<(R, usize)> {
        match mem::replace(&mut self.state, TokenState::Consumed) {
            TokenState::Pending { record, index } => Some((record, index)),
            TokenState::Consumed => None,
        }
    }
}

impl<R: Record, B: StorageBackend> RecordStore<R, B> {
    /// Capture `{record, index}` for `id`. Nothing is removed yet.
    pub fn stage_delete(&self, id: impl fmt::Display) -> Option<StagedDelete<R>> {
        let index = self.position(id)?;
        Some(StagedDelete {
            record: self.records()[index].clone(),
            index,
        })
    }

    /// Delete the staged record and hand back a token for undoing it.
    ///
    /// If the write fails the record stays in the store and the error is
    /// returned; the caller can stage it again.
    pub fn commit_delete(&mut self, staged: StagedDelete<R>) -> Result<DeletionToken<R>> {
        self.delete_or_restore(staged.record.id())?;
        Ok(DeletionToken {
            state: TokenState::Pending {
                record: staged.record,
                index: staged.index,
            },
        })
    }

    /// Reinsert the record behind `token` at its captured index.
    ///
    /// Returns `Ok(true)` when the record went back in, `Ok(false)` when the
    /// token had already been used.
    pub fn undo(&mut self, token: &mut DeletionToken<R>) -> Result<bool> {
        match token.take() {
            Some((record, index)) => {
                debug!("{}: undo delete of {}", R::STORAGE_KEY, record.id());
                self.add_at_index(record, index)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, NewPlant, Plant};
    use crate::seed;
    use crate::store::mem_backend::MemBackend;
    use chrono::Utc;

    fn plant_store() -> RecordStore<Plant, MemBackend> {
        RecordStore::open(MemBackend::new(), seed::plants())
    }

    fn ids(store: &RecordStore<Plant, MemBackend>) -> Vec<&str> {
        store.records().iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn staging_does_not_remove_anything() {
        let store = plant_store();
        let staged = store.stage_delete("3").unwrap();
        assert_eq!(staged.index(), 2);
        assert_eq!(staged.record().name, "Cucumber");
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn staging_an_unknown_id_yields_nothing() {
        assert!(plant_store().stage_delete("nope").is_none());
    }

    #[test]
    fn delete_then_undo_restores_the_exact_sequence() {
        let mut store = plant_store();
        let before = store.records().to_vec();

        let staged = store.stage_delete("3").unwrap();
        let mut token = store.commit_delete(staged).unwrap();
        assert!(store.get("3").is_none());
        assert_eq!(store.len(), 4);

        assert!(store.undo(&mut token).unwrap());
        assert_eq!(store.records(), before.as_slice());
        assert!(token.is_consumed());
    }

    #[test]
    fn undo_twice_inserts_once() {
        let mut store = plant_store();
        let staged = store.stage_delete("2").unwrap();
        let mut token = store.commit_delete(staged).unwrap();

        assert!(store.undo(&mut token).unwrap());
        assert!(!store.undo(&mut token).unwrap());
        assert_eq!(store.len(), 5);
        assert_eq!(ids(&store), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn cloned_token_cannot_duplicate_the_record() {
        let mut store = plant_store();
        let staged = store.stage_delete("2").unwrap();
        let mut token = store.commit_delete(staged).unwrap();
        let mut copy = token.clone();

        assert!(store.undo(&mut token).unwrap());
        assert!(!store.undo(&mut copy).unwrap());
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn undo_uses_the_literal_index_after_other_changes() {
        let mut store = plant_store();
        let staged = store.stage_delete("4").unwrap();
        let mut token = store.commit_delete(staged).unwrap();

        store.delete("1").unwrap();
        store.delete("2").unwrap();
        assert_eq!(ids(&store), vec!["3", "5"]);

        store.undo(&mut token).unwrap();
        assert_eq!(ids(&store), vec!["3", "5", "4"]);
    }

    #[test]
    fn undo_after_an_insert_lands_at_the_original_index() {
        let mut store = plant_store();
        let staged = store.stage_delete("1").unwrap();
        let mut token = store.commit_delete(staged).unwrap();

        let new_id = store
            .add(NewPlant::new("Kale", Location::Greenhouse, Utc::now()))
            .unwrap()
            .id
            .clone();
        store.undo(&mut token).unwrap();

        assert_eq!(ids(&store)[0], "1");
        assert_eq!(store.records().last().unwrap().id, new_id);
    }

    #[test]
    fn failed_commit_keeps_the_record() {
        let backend = MemBackend::new();
        let mut store = RecordStore::open(backend.clone(), seed::plants());
        let staged = store.stage_delete("3").unwrap();
        backend.set_simulate_write_error(true);

        assert!(store.commit_delete(staged).is_err());
        assert_eq!(ids(&store), vec!["1", "2", "3", "4", "5"]);
        assert_eq!(backend.raw(Plant::STORAGE_KEY), None);

        backend.set_simulate_write_error(false);
        let staged = store.stage_delete("3").unwrap();
        let mut token = store.commit_delete(staged).unwrap();
        assert_eq!(store.len(), 4);
        assert!(store.undo(&mut token).unwrap());
        assert_eq!(ids(&store), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn token_exposes_the_snapshot_until_redeemed() {
        let mut store = plant_store();
        let staged = store.stage_delete("5").unwrap();
        let mut token = store.commit_delete(staged).unwrap();

        assert_eq!(token.index(), Some(4));
        assert_eq!(token.record().map(|p| p.name.as_str()), Some("Sunflower"));

        store.undo(&mut token).unwrap();
        assert_eq!(token.index(), None);
        assert!(token.record().is_none());
    }
}
