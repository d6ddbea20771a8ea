//! # Garden Context
//!
//! [`Garden`] is the one object a host application builds and passes around.
//! It owns the plant store, the activity store and the settings store, all
//! persisted through a single [`StorageBackend`].
//!
//! There is no global state: construct a `Garden` at startup, hand `&Garden`
//! or `&mut Garden` to whatever needs it, drop it on the way out.
//!
//! ## Generic Over StorageBackend
//!
//! - Production: `Garden<FsBackend>`
//! - Testing: `Garden<MemBackend>`
//!
//! ## Cross-record references
//!
//! `Activity::plant` is a weak reference. [`Garden::plant_for`] resolves it and
//! returns `None` for a dangling id; nothing ever deletes activities when their
//! plant goes away.

use crate::model::{Activity, Plant, PlantId};
use crate::seed;
use crate::settings::SettingsStore;
use crate::store::RecordStore;
use crate::store::backend::StorageBackend;
use chrono::{DateTime, Utc};

/// Display name used for activities whose plant no longer exists.
pub const UNKNOWN_PLANT: &str = "Unknown Plant";

/// Whether a fresh garden starts with sample records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    Samples,
    Empty,
}

pub struct Garden<B: StorageBackend + Clone> {
    plants: RecordStore<Plant, B>,
    activities: RecordStore<Activity, B>,
    settings: SettingsStore<B>,
}

impl<B: StorageBackend + Clone> Garden<B> {
    /// Rehydrate every store from `backend`.
    pub fn open(backend: B, seeding: Seed) -> Self {
        Self::open_at(backend, seeding, Utc::now())
    }

    /// Like [`Garden::open`], with sample activity dates relative to `now`.
    pub fn open_at(backend: B, seeding: Seed, now: DateTime<Utc>) -> Self {
        let (plant_defaults, activity_defaults) = match seeding {
            Seed::Samples => (seed::plants(), seed::activities(now)),
            Seed::Empty => (Vec::new(), Vec::new()),
        };
        Self {
            plants: RecordStore::open(backend.clone(), plant_defaults),
            activities: RecordStore::open(backend.clone(), activity_defaults),
            settings: SettingsStore::open(backend),
        }
    }

    pub fn plants(&self) -> &RecordStore<Plant, B> {
        &self.plants
    }

    pub fn plants_mut(&mut self) -> &mut RecordStore<Plant, B> {
        &mut self.plants
    }

    pub fn activities(&self) -> &RecordStore<Activity, B> {
        &self.activities
    }

    pub fn activities_mut(&mut self) -> &mut RecordStore<Activity, B> {
        &mut self.activities
    }

    pub fn settings(&self) -> &SettingsStore<B> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore<B> {
        &mut self.settings
    }

    /// Resolve an activity's plant reference.
    pub fn plant_for(&self, activity: &Activity) -> Option<&Plant> {
        self.plants.get(&activity.plant)
    }

    /// The plant's name, or [`UNKNOWN_PLANT`] for a dangling reference.
    pub fn plant_name_for(&self, activity: &Activity) -> &str {
        self.plant_for(activity)
            .map(|plant| plant.name.as_str())
            .unwrap_or(UNKNOWN_PLANT)
    }

    /// Activities referencing `plant`, in store order.
    pub fn activities_for_plant(&self, plant: &PlantId) -> Vec<&Activity> {
        self.activities
            .records()
            .iter()
            .filter(|activity| &activity.plant == plant)
            .collect()
    }

    /// Activities dated at or after `now`, soonest first.
    pub fn upcoming_activities(&self, now: DateTime<Utc>) -> Vec<&Activity> {
        let mut upcoming: Vec<&Activity> = self
            .activities
            .records()
            .iter()
            .filter(|activity| activity.is_upcoming(now))
            .collect();
        upcoming.sort_by_key(|activity| activity.date);
        upcoming
    }

    /// Activities dated before `now`, most recent first.
    pub fn recent_activities(&self, now: DateTime<Utc>) -> Vec<&Activity> {
        let mut recent: Vec<&Activity> = self
            .activities
            .records()
            .iter()
            .filter(|activity| !activity.is_upcoming(now))
            .collect();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent
    }
}
