//! # Command Layer
//!
//! Validated operations for a host that talks to people (the CLI). Each
//! function takes a [`Garden`](crate::api::Garden), calls the stores, and returns
//! a [`CmdResult`]: the records to show plus human readable messages.
//!
//! The stores themselves never fail on unknown ids. Commands are where a
//! missing id turns into a warning message, and where input that the data model
//! forbids (blank names, unknown labels, unparseable dates) becomes
//! [`PlotzError::Api`](crate::error::PlotzError::Api).
//!
//! Nothing here prints.

use crate::config::PlotzConfig;
use crate::model::{Activity, Plant};
use crate::settings::Settings;

pub mod activities;
pub mod config;
pub mod helpers;
pub mod plants;
pub mod settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// An activity together with the resolved name of its plant.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub activity: Activity,
    pub plant_name: String,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub plants: Vec<Plant>,
    pub activities: Vec<ActivityRow>,
    pub settings: Option<Settings>,
    pub config: Option<PlotzConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_plants(mut self, plants: Vec<Plant>) -> Self {
        self.plants = plants;
        self
    }

    pub fn with_activities(mut self, activities: Vec<ActivityRow>) -> Self {
        self.activities = activities;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_config(mut self, config: PlotzConfig) -> Self {
        self.config = Some(config);
        self
    }
}
