use crate::api::Garden;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::SettingsPatch;
use crate::store::backend::StorageBackend;

#[derive(Debug, Clone)]
pub enum SettingsAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
    Reset,
}

pub fn run<B: StorageBackend + Clone>(
    garden: &mut Garden<B>,
    action: SettingsAction,
) -> Result<CmdResult> {
    match action {
        SettingsAction::ShowAll => {
            Ok(CmdResult::default().with_settings(garden.settings().settings().clone()))
        }
        SettingsAction::ShowKey(key) => {
            let mut result = CmdResult::default();
            match garden.settings().settings().get(&key) {
                Some(value) => result.add_message(CmdMessage::info(value)),
                None => result.add_message(CmdMessage::error(format!("Unknown setting: {}", key))),
            }
            Ok(result)
        }
        SettingsAction::Set(key, value) => {
            let patch = SettingsPatch::parse(&key, &value)?;
            garden.settings_mut().update(patch)?;

            let settings = garden.settings().settings().clone();
            let display = settings.get(&key).unwrap_or(value);
            let mut result = CmdResult::default().with_settings(settings);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display)));
            Ok(result)
        }
        SettingsAction::Reset => {
            garden.settings_mut().reset()?;
            let mut result =
                CmdResult::default().with_settings(garden.settings().settings().clone());
            result.add_message(CmdMessage::success("Settings restored to defaults"));
            Ok(result)
        }
    }
}
