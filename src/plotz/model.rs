//! # Record Types
//!
//! The two record kinds a garden keeps: [`Plant`] and [`Activity`].
//!
//! Records are plain data. Each kind comes with a creation input (`NewPlant`,
//! `NewActivity`) that has no id yet, and a partial update (`PlantPatch`,
//! `ActivityPatch`) where every `Some` field replaces the stored value and every
//! `None` field is left alone.
//!
//! ## Identifiers
//!
//! Ids are typed string newtypes ([`PlantId`], [`ActivityId`]) that serialize as
//! bare strings. `Activity::plant` is a *weak* reference: nothing guarantees the
//! plant still exists. Resolve it through [`crate::api::Garden::plant_for`].
//!
//! ## On-disk field names
//!
//! Fields are camelCase on disk (`plantedDate`, `type`) so blobs written by the
//! browser app remain readable.

use crate::codec;
use crate::error::{PlotzError, Result};
use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of a [`Plant`].
    PlantId
);

string_id!(
    /// Identifier of an [`Activity`].
    ActivityId
);

/// Garden areas a plant can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    VegetableBed,
    HerbGarden,
    FlowerBed,
    Container,
    Greenhouse,
}

impl Location {
    pub const ALL: [Location; 5] = [
        Location::VegetableBed,
        Location::HerbGarden,
        Location::FlowerBed,
        Location::Container,
        Location::Greenhouse,
    ];

    /// The stored label, e.g. `herb-garden`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::VegetableBed => "vegetable-bed",
            Location::HerbGarden => "herb-garden",
            Location::FlowerBed => "flower-bed",
            Location::Container => "container",
            Location::Greenhouse => "greenhouse",
        }
    }

    /// Human readable name, e.g. `Herb Garden`.
    pub fn display_name(&self) -> &'static str {
        match self {
            Location::VegetableBed => "Vegetable Bed",
            Location::HerbGarden => "Herb Garden",
            Location::FlowerBed => "Flower Bed",
            Location::Container => "Container",
            Location::Greenhouse => "Greenhouse",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = PlotzError;

    fn from_str(s: &str) -> Result<Self> {
        Location::ALL
            .into_iter()
            .find(|loc| loc.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = Location::ALL.iter().map(|l| l.as_str()).collect();
                PlotzError::Api(format!(
                    "Unknown location '{}' (expected one of: {})",
                    s,
                    known.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantStatus {
    #[default]
    Growing,
    Harvested,
    Dormant,
}

impl PlantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantStatus::Growing => "growing",
            PlantStatus::Harvested => "harvested",
            PlantStatus::Dormant => "dormant",
        }
    }
}

impl fmt::Display for PlantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlantStatus {
    type Err = PlotzError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "growing" => Ok(PlantStatus::Growing),
            "harvested" => Ok(PlantStatus::Harvested),
            "dormant" => Ok(PlantStatus::Dormant),
            other => Err(PlotzError::Api(format!(
                "Unknown status '{}' (expected growing, harvested or dormant)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Watering,
    Planting,
    Harvesting,
    Pruning,
    Fertilizing,
}

impl ActivityType {
    pub const ALL: [ActivityType; 5] = [
        ActivityType::Watering,
        ActivityType::Planting,
        ActivityType::Harvesting,
        ActivityType::Pruning,
        ActivityType::Fertilizing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Watering => "watering",
            ActivityType::Planting => "planting",
            ActivityType::Harvesting => "harvesting",
            ActivityType::Pruning => "pruning",
            ActivityType::Fertilizing => "fertilizing",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = PlotzError;

    fn from_str(s: &str) -> Result<Self> {
        ActivityType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PlotzError::Api(format!("Unknown activity type '{}'", s)))
    }
}

// --- Plant ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    #[serde(default)]
    pub variety: String,
    pub location: Location,
    #[serde(with = "codec::iso8601")]
    pub planted_date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: PlantStatus,
}

/// Everything needed to create a plant. The id and status are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlant {
    pub name: String,
    pub variety: String,
    pub location: Location,
    pub planted_date: DateTime<Utc>,
    pub notes: String,
}

impl NewPlant {
    pub fn new(name: impl Into<String>, location: Location, planted_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            variety: String::new(),
            location,
            planted_date,
            notes: String::new(),
        }
    }

    pub fn with_variety(mut self, variety: impl Into<String>) -> Self {
        self.variety = variety.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PlotzError::Api("Plant name cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantPatch {
    pub name: Option<String>,
    pub variety: Option<String>,
    pub location: Option<Location>,
    pub planted_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub status: Option<PlantStatus>,
}

impl PlantPatch {
    pub fn is_empty(&self) -> bool {
        *self == PlantPatch::default()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(PlotzError::Api("Plant name cannot be empty".into()));
            }
        }
        Ok(())
    }
}

impl Record for Plant {
    type Id = PlantId;
    type New = NewPlant;
    type Patch = PlantPatch;

    const STORAGE_KEY: &'static str = "garden-plants-storage";
    const COLLECTION: &'static str = "plants";

    fn id(&self) -> &PlantId {
        &self.id
    }

    fn create(new: NewPlant, id: String) -> Self {
        Plant {
            id: PlantId::new(id),
            name: new.name,
            variety: new.variety,
            location: new.location,
            planted_date: new.planted_date,
            notes: new.notes,
            status: PlantStatus::Growing,
        }
    }

    fn apply(&mut self, patch: PlantPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(variety) = patch.variety {
            self.variety = variety;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(planted_date) = patch.planted_date {
            self.planted_date = planted_date;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

// --- Activity ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub plant: PlantId,
    #[serde(with = "codec::iso8601")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Activity {
    /// Due at or after `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.date >= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub kind: ActivityType,
    pub plant: PlantId,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

impl NewActivity {
    pub fn new(kind: ActivityType, plant: impl Into<PlantId>, date: DateTime<Utc>) -> Self {
        Self {
            kind,
            plant: plant.into(),
            date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = normalize_notes(notes.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    pub kind: Option<ActivityType>,
    pub plant: Option<PlantId>,
    pub date: Option<DateTime<Utc>>,
    /// `Some("")` clears the notes.
    pub notes: Option<String>,
}

impl ActivityPatch {
    pub fn is_empty(&self) -> bool {
        *self == ActivityPatch::default()
    }
}

impl Record for Activity {
    type Id = ActivityId;
    type New = NewActivity;
    type Patch = ActivityPatch;

    const STORAGE_KEY: &'static str = "garden-activities-storage";
    const COLLECTION: &'static str = "activities";

    fn id(&self) -> &ActivityId {
        &self.id
    }

    fn create(new: NewActivity, id: String) -> Self {
        Activity {
            id: ActivityId::new(id),
            kind: new.kind,
            plant: new.plant,
            date: new.date,
            notes: new.notes,
        }
    }

    fn apply(&mut self, patch: ActivityPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(plant) = patch.plant {
            self.plant = plant;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(notes) = patch.notes {
            self.notes = normalize_notes(notes);
        }
    }
}

fn normalize_notes(notes: String) -> Option<String> {
    if notes.is_empty() { None } else { Some(notes) }
}
