use crate::api::Garden;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PlotzError, Result};
use crate::model::{Location, NewPlant, Plant, PlantId, PlantPatch, PlantStatus};
use crate::store::backend::StorageBackend;
use crate::undo::{DeletionToken, StagedDelete};

use super::helpers::activity_row;

#[derive(Debug, Clone, Default)]
pub struct PlantFilter {
    pub status: Option<PlantStatus>,
    pub location: Option<Location>,
    /// Case-insensitive match against name and variety.
    pub search: Option<String>,
}

impl PlantFilter {
    fn matches(&self, plant: &Plant) -> bool {
        if self.status.is_some_and(|status| plant.status != status) {
            return false;
        }
        if self.location.is_some_and(|location| plant.location != location) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                plant.name.to_lowercase().contains(&term)
                    || plant.variety.to_lowercase().contains(&term)
            }
            None => true,
        }
    }
}

pub fn list<B: StorageBackend + Clone>(garden: &Garden<B>, filter: &PlantFilter) -> CmdResult {
    let plants: Vec<Plant> = garden
        .plants()
        .records()
        .iter()
        .filter(|plant| filter.matches(plant))
        .cloned()
        .collect();
    CmdResult::default().with_plants(plants)
}

/// One plant together with the activities that reference it.
pub fn view<B: StorageBackend + Clone>(garden: &Garden<B>, id: &PlantId) -> Result<CmdResult> {
    let plant = garden
        .plants()
        .get(id)
        .cloned()
        .ok_or_else(|| PlotzError::Api(format!("Plant not found: {}", id)))?;
    let activities = garden
        .activities_for_plant(id)
        .into_iter()
        .map(|activity| activity_row(garden, activity))
        .collect();
    Ok(CmdResult::default()
        .with_plants(vec![plant])
        .with_activities(activities))
}

pub fn add<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    plant: NewPlant,
) -> Result<CmdResult> {
    plant.validate()?;
    let added = garden.plants_mut().add(plant)?.clone();

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Plant added ({}): {}",
        added.id, added.name
    )));
    Ok(result.with_plants(vec![added]))
}

pub fn update<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    id: &PlantId,
    patch: PlantPatch,
) -> Result<CmdResult> {
    patch.validate()?;
    let mut result = CmdResult::default();
    if patch.is_empty() {
        result.add_message(CmdMessage::info("No changes given"));
        return Ok(result);
    }

    if !garden.plants_mut().update(id, patch)? {
        result.add_message(CmdMessage::warning(format!("Plant not found: {}", id)));
        return Ok(result);
    }

    if let Some(plant) = garden.plants().get(id) {
        result.add_message(CmdMessage::success(format!(
            "Plant updated ({}): {}",
            plant.id, plant.name
        )));
        result.plants.push(plant.clone());
    }
    Ok(result)
}

/// Capture a plant for deletion without removing it yet.
pub fn stage_delete<B: StorageBackend + Clone>(
    garden: &Garden<B>,
    id: &PlantId,
) -> Result<StagedDelete<Plant>> {
    garden
        .plants()
        .stage_delete(id)
        .ok_or_else(|| PlotzError::Api(format!("Plant not found: {}", id)))
}

pub fn commit_delete<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    staged: StagedDelete<Plant>,
) -> Result<(CmdResult, DeletionToken<Plant>)> {
    let name = staged.record().name.clone();
    let id = staged.record().id.clone();
    let token = garden.plants_mut().commit_delete(staged)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Plant deleted ({}): {}",
        id, name
    )));
    let orphans = garden.activities_for_plant(&id).len();
    if orphans > 0 {
        result.add_message(CmdMessage::info(format!(
            "{} activities still reference this plant",
            orphans
        )));
    }
    Ok((result, token))
}

pub fn undo_delete<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    token: &mut DeletionToken<Plant>,
) -> Result<CmdResult> {
    let name = token.record().map(|plant| plant.name.clone());
    let mut result = CmdResult::default();
    match name {
        Some(name) if garden.plants_mut().undo(token)? => {
            result.add_message(CmdMessage::success(format!("Deletion undone: {}", name)));
        }
        _ => result.add_message(CmdMessage::info("Nothing to undo")),
    }
    Ok(result)
}
