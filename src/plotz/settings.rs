//! # Garden Settings
//!
//! A single persisted [`Settings`] record, stored under
//! `garden-settings-storage` with the same blob layout as the record stores.
//!
//! Keys are addressed in kebab-case from the CLI (`garden-name`,
//! `temperature-unit`, ...) and camelCase on disk.

use crate::codec;
use crate::error::{PlotzError, Result};
use crate::store::{self, backend::StorageBackend};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const STORAGE_KEY: &str = "garden-settings-storage";
const COLLECTION: &str = "settings";

/// Every key accepted by [`Settings::get`] and [`SettingsPatch::parse`].
pub const KEYS: [&str; 7] = [
    "garden-name",
    "location",
    "hardiness",
    "temperature-unit",
    "notifications",
    "email-notifications",
    "reminder-time",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    F,
    C,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::F => f.write_str("F"),
            TemperatureUnit::C => f.write_str("C"),
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = PlotzError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "F" | "f" => Ok(TemperatureUnit::F),
            "C" | "c" => Ok(TemperatureUnit::C),
            other => Err(PlotzError::Api(format!(
                "Unknown temperature unit '{}' (expected F or C)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderTime {
    #[default]
    Morning,
    Afternoon,
    Evening,
}

impl ReminderTime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderTime::Morning => "morning",
            ReminderTime::Afternoon => "afternoon",
            ReminderTime::Evening => "evening",
        }
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReminderTime {
    type Err = PlotzError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "morning" => Ok(ReminderTime::Morning),
            "afternoon" => Ok(ReminderTime::Afternoon),
            "evening" => Ok(ReminderTime::Evening),
            other => Err(PlotzError::Api(format!(
                "Unknown reminder time '{}' (expected morning, afternoon or evening)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_garden_name")]
    pub garden_name: String,
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_hardiness")]
    pub hardiness: String,
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default = "default_true")]
    pub email_notifications: bool,
    #[serde(default)]
    pub reminder_time: ReminderTime,
}

fn default_garden_name() -> String {
    "My Garden".to_string()
}

fn default_location() -> String {
    "New York, NY".to_string()
}

fn default_hardiness() -> String {
    "7b".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            garden_name: default_garden_name(),
            location: default_location(),
            hardiness: default_hardiness(),
            temperature_unit: TemperatureUnit::default(),
            notifications: true,
            email_notifications: true,
            reminder_time: ReminderTime::default(),
        }
    }
}

impl Settings {
    /// Current value of `key`, formatted for display.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "garden-name" => Some(self.garden_name.clone()),
            "location" => Some(self.location.clone()),
            "hardiness" => Some(self.hardiness.clone()),
            "temperature-unit" => Some(self.temperature_unit.to_string()),
            "notifications" => Some(self.notifications.to_string()),
            "email-notifications" => Some(self.email_notifications.to_string()),
            "reminder-time" => Some(self.reminder_time.to_string()),
            _ => None,
        }
    }

    /// All keys with their display values, in [`KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

/// USDA hardiness zone label, `1a` through `13b`.
fn is_hardiness_zone(zone: &str) -> bool {
    let Some(half) = zone.chars().last() else {
        return false;
    };
    if half != 'a' && half != 'b' {
        return false;
    }
    matches!(zone[..zone.len() - 1].parse::<u8>(), Ok(1..=13))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "on" | "yes" => Ok(true),
        "false" | "off" | "no" => Ok(false),
        other => Err(PlotzError::Api(format!(
            "Invalid value '{}' for {} (expected true or false)",
            other, key
        ))),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub garden_name: Option<String>,
    pub location: Option<String>,
    pub hardiness: Option<String>,
    pub temperature_unit: Option<TemperatureUnit>,
    pub notifications: Option<bool>,
    pub email_notifications: Option<bool>,
    pub reminder_time: Option<ReminderTime>,
}

impl SettingsPatch {
    /// Build a single-field patch from a CLI `key value` pair.
    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let mut patch = SettingsPatch::default();
        match key {
            "garden-name" => {
                if value.trim().is_empty() {
                    return Err(PlotzError::Api("Garden name cannot be empty".into()));
                }
                patch.garden_name = Some(value.to_string());
            }
            "location" => patch.location = Some(value.to_string()),
            "hardiness" => {
                if !is_hardiness_zone(value) {
                    return Err(PlotzError::Api(format!(
                        "Invalid hardiness zone '{}' (expected 1a to 13b)",
                        value
                    )));
                }
                patch.hardiness = Some(value.to_string());
            }
            "temperature-unit" => patch.temperature_unit = Some(value.parse()?),
            "notifications" => patch.notifications = Some(parse_bool(key, value)?),
            "email-notifications" => patch.email_notifications = Some(parse_bool(key, value)?),
            "reminder-time" => patch.reminder_time = Some(value.parse()?),
            other => {
                return Err(PlotzError::Api(format!("Unknown setting: {}", other)));
            }
        }
        Ok(patch)
    }

    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.garden_name {
            settings.garden_name = v;
        }
        if let Some(v) = self.location {
            settings.location = v;
        }
        if let Some(v) = self.hardiness {
            settings.hardiness = v;
        }
        if let Some(v) = self.temperature_unit {
            settings.temperature_unit = v;
        }
        if let Some(v) = self.notifications {
            settings.notifications = v;
        }
        if let Some(v) = self.email_notifications {
            settings.email_notifications = v;
        }
        if let Some(v) = self.reminder_time {
            settings.reminder_time = v;
        }
    }
}

/// The persisted settings record.
pub struct SettingsStore<B: StorageBackend> {
    settings: Settings,
    backend: B,
}

impl<B: StorageBackend> SettingsStore<B> {
    /// Rehydrate from `backend`, falling back to defaults when nothing (or
    /// nothing readable) is stored. An unreadable blob is set aside first.
    pub fn open(backend: B) -> Self {
        let settings = match backend.get_item(STORAGE_KEY) {
            Ok(Some(blob)) => match codec::decode(COLLECTION, &blob) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("discarding unreadable {} ({}), using defaults", STORAGE_KEY, e);
                    store::set_aside(&backend, STORAGE_KEY, &blob);
                    Settings::default()
                }
            },
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!("could not read {} ({}), using defaults", STORAGE_KEY, e);
                Settings::default()
            }
        };
        Self { settings, backend }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merge the supplied fields into the current settings and persist.
    pub fn update(&mut self, patch: SettingsPatch) -> Result<()> {
        debug!("{}: update {:?}", STORAGE_KEY, patch);
        patch.apply(&mut self.settings);
        self.persist()
    }

    /// Return every setting to its default and persist.
    pub fn reset(&mut self) -> Result<()> {
        self.settings = Settings::default();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let blob = codec::encode(COLLECTION, &self.settings)?;
        self.backend.set_item(STORAGE_KEY, &blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    #[test]
    fn defaults_match_a_fresh_garden() {
        let store = SettingsStore::open(MemBackend::new());
        let settings = store.settings();
        assert_eq!(settings.garden_name, "My Garden");
        assert_eq!(settings.location, "New York, NY");
        assert_eq!(settings.hardiness, "7b");
        assert_eq!(settings.temperature_unit, TemperatureUnit::F);
        assert!(settings.notifications);
        assert!(settings.email_notifications);
        assert_eq!(settings.reminder_time, ReminderTime::Morning);
    }

    #[test]
    fn update_merges_and_persists() {
        let backend = MemBackend::new();
        let mut store = SettingsStore::open(backend.clone());
        store
            .update(SettingsPatch {
                temperature_unit: Some(TemperatureUnit::C),
                ..Default::default()
            })
            .unwrap();

        let reopened = SettingsStore::open(backend);
        assert_eq!(reopened.settings().temperature_unit, TemperatureUnit::C);
        assert_eq!(reopened.settings().garden_name, "My Garden");
    }

    #[test]
    fn persisted_blob_uses_camel_case() {
        let backend = MemBackend::new();
        let mut store = SettingsStore::open(backend.clone());
        store
            .update(SettingsPatch::parse("garden-name", "Back Yard").unwrap())
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&backend.raw(STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(raw["state"]["settings"]["gardenName"], "Back Yard");
        assert_eq!(raw["state"]["settings"]["temperatureUnit"], "F");
    }

    #[test]
    fn partial_blob_fills_in_defaults() {
        let backend = MemBackend::new();
        backend
            .set_item(
                STORAGE_KEY,
                r#"{"state":{"settings":{"gardenName":"Allotment"}},"version":0}"#,
            )
            .unwrap();
        let store = SettingsStore::open(backend);
        assert_eq!(store.settings().garden_name, "Allotment");
        assert_eq!(store.settings().hardiness, "7b");
    }

    #[test]
    fn unreadable_blob_is_kept_aside() {
        let backend = MemBackend::new();
        let newer = r#"{"state":{"settings":{}},"version":3}"#;
        backend.set_item(STORAGE_KEY, newer).unwrap();

        let mut store = SettingsStore::open(backend.clone());
        store
            .update(SettingsPatch::parse("location", "Leeds").unwrap())
            .unwrap();

        assert_eq!(
            backend.raw(&crate::store::backup_key(STORAGE_KEY)).as_deref(),
            Some(newer)
        );
    }

    #[test]
    fn parse_validates_values() {
        assert!(SettingsPatch::parse("hardiness", "9a").is_ok());
        assert!(SettingsPatch::parse("hardiness", "13b").is_ok());
        assert!(SettingsPatch::parse("hardiness", "14a").is_err());
        assert!(SettingsPatch::parse("hardiness", "7").is_err());
        assert!(SettingsPatch::parse("notifications", "maybe").is_err());
        assert!(SettingsPatch::parse("reminder-time", "noon").is_err());
        assert!(SettingsPatch::parse("garden-name", " ").is_err());
        assert!(SettingsPatch::parse("colour", "green").is_err());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = SettingsStore::open(MemBackend::new());
        store
            .update(SettingsPatch::parse("notifications", "off").unwrap())
            .unwrap();
        store.reset().unwrap();
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn entries_cover_every_key() {
        let settings = Settings::default();
        let keys: Vec<&str> = settings.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, KEYS.to_vec());
    }
}
