use crate::api::Garden;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PlotzError, Result};
use crate::model::{Activity, ActivityId, ActivityPatch, ActivityType, NewActivity, PlantId};
use crate::store::backend::StorageBackend;
use crate::undo::{DeletionToken, StagedDelete};
use chrono::{DateTime, Utc};

use super::helpers::activity_row;

/// Which slice of the timeline to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeline {
    /// Store order.
    #[default]
    All,
    /// Dated at or after now, soonest first.
    Upcoming,
    /// Dated before now, most recent first.
    Recent,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub timeline: Timeline,
    pub plant: Option<PlantId>,
    pub kind: Option<ActivityType>,
}

pub fn list<B: StorageBackend + Clone>(
    garden: &Garden<B>,
    filter: &ActivityFilter,
    now: DateTime<Utc>,
) -> CmdResult {
    let selected: Vec<&Activity> = match filter.timeline {
        Timeline::All => garden.activities().records().iter().collect(),
        Timeline::Upcoming => garden.upcoming_activities(now),
        Timeline::Recent => garden.recent_activities(now),
    };
    let rows = selected
        .into_iter()
        .filter(|activity| filter.plant.as_ref().is_none_or(|p| &activity.plant == p))
        .filter(|activity| filter.kind.is_none_or(|k| activity.kind == k))
        .map(|activity| activity_row(garden, activity))
        .collect();
    CmdResult::default().with_activities(rows)
}

pub fn add<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    activity: NewActivity,
) -> Result<CmdResult> {
    let known_plant = garden.plants().get(&activity.plant).is_some();
    let plant = activity.plant.clone();
    let added = garden.activities_mut().add(activity)?.clone();

    let mut result = CmdResult::default();
    if !known_plant {
        result.add_message(CmdMessage::warning(format!(
            "No plant with id {}; the activity was kept anyway",
            plant
        )));
    }
    let row = activity_row(garden, &added);
    result.add_message(CmdMessage::success(format!(
        "Activity added ({}): {} {}",
        added.id, added.kind, row.plant_name
    )));
    Ok(result.with_activities(vec![row]))
}

pub fn update<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    id: &ActivityId,
    patch: ActivityPatch,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if patch.is_empty() {
        result.add_message(CmdMessage::info("No changes given"));
        return Ok(result);
    }
    if let Some(plant) = &patch.plant {
        if garden.plants().get(plant).is_none() {
            result.add_message(CmdMessage::warning(format!("No plant with id {}", plant)));
        }
    }

    if !garden.activities_mut().update(id, patch)? {
        result.add_message(CmdMessage::warning(format!("Activity not found: {}", id)));
        return Ok(result);
    }

    if let Some(activity) = garden.activities().get(id) {
        let row = activity_row(garden, activity);
        result.add_message(CmdMessage::success(format!(
            "Activity updated ({}): {} {}",
            activity.id, activity.kind, row.plant_name
        )));
        result.activities.push(row);
    }
    Ok(result)
}

pub fn stage_delete<B: StorageBackend + Clone>(
    garden: &Garden<B>,
    id: &ActivityId,
) -> Result<StagedDelete<Activity>> {
    garden
        .activities()
        .stage_delete(id)
        .ok_or_else(|| PlotzError::Api(format!("Activity not found: {}", id)))
}

pub fn commit_delete<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    staged: StagedDelete<Activity>,
) -> Result<(CmdResult, DeletionToken<Activity>)> {
    let label = format!(
        "{} {}",
        staged.record().kind,
        garden.plant_name_for(staged.record())
    );
    let id = staged.record().id.clone();
    let token = garden.activities_mut().commit_delete(staged)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Activity deleted ({}): {}",
        id, label
    )));
    Ok((result, token))
}

pub fn undo_delete<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    token: &mut DeletionToken<Activity>,
) -> Result<CmdResult> {
    let id = token.record().map(|activity| activity.id.clone());
    let mut result = CmdResult::default();
    match id {
        Some(id) if garden.activities_mut().undo(token)? => {
            result.add_message(CmdMessage::success(format!("Deletion undone: {}", id)));
        }
        _ => result.add_message(CmdMessage::info("Nothing to undo")),
    }
    Ok(result)
}
