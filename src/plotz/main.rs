use chrono::{DateTime, Utc};
use clap::Parser;
use directories::ProjectDirs;
use log::debug;
use plotz::api::{Garden, Seed};
use plotz::commands::activities::{self, ActivityFilter, Timeline};
use plotz::commands::config::{self as config_cmd, ConfigAction};
use plotz::commands::helpers::parse_date;
use plotz::commands::plants::{self, PlantFilter};
use plotz::commands::settings::{self as settings_cmd, SettingsAction};
use plotz::config::PlotzConfig;
use plotz::error::{PlotzError, Result};
use plotz::logging::init_logging;
use plotz::model::{ActivityId, ActivityPatch, NewActivity, NewPlant, PlantId, PlantPatch};
use plotz::store::fs_backend::FsBackend;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

mod args;
mod cli;

use args::{ActivityCommand, Cli, Commands, PlantCommand, PlantFields};
use cli::print::{
    print_activities, print_config, print_messages, print_plant_detail, print_plants,
    print_settings,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    garden: Garden<FsBackend>,
    data_dir: PathBuf,
    now: DateTime<Utc>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;

    let config = match PlotzConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: ignoring unreadable config.json: {}", e);
            PlotzConfig::default()
        }
    };
    init_logging(&config.log_level, cli.verbose);
    debug!("data dir: {}", data_dir.display());

    let seeding = if config.seed_defaults {
        Seed::Samples
    } else {
        Seed::Empty
    };
    let mut ctx = AppContext {
        garden: Garden::open(FsBackend::new(&data_dir), seeding),
        data_dir,
        now: Utc::now(),
    };

    match cli.command {
        Some(Commands::Plants { action }) => handle_plants(&mut ctx, action),
        Some(Commands::Activities { action }) => handle_activities(&mut ctx, action),
        Some(Commands::Settings { key, value, reset }) => {
            handle_settings(&mut ctx, key, value, reset)
        }
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        None => handle_overview(&ctx),
    }
}

/// `--data-dir`, then `$PLOTZ_HOME`, then the platform data directory.
fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os("PLOTZ_HOME") {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "plotz", "plotz")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| PlotzError::Api("Could not determine a data directory".into()))
}

fn handle_overview(ctx: &AppContext) -> Result<()> {
    let settings = ctx.garden.settings().settings();
    println!("{} ({})", settings.garden_name, settings.location);
    println!();

    let filter = ActivityFilter {
        timeline: Timeline::Upcoming,
        ..Default::default()
    };
    let result = activities::list(&ctx.garden, &filter, ctx.now);
    println!(
        "{} plants, {} upcoming activities",
        ctx.garden.plants().len(),
        result.activities.len()
    );
    print_activities(&result.activities, ctx.now);
    Ok(())
}

fn handle_plants(ctx: &mut AppContext, action: Option<PlantCommand>) -> Result<()> {
    let action = action.unwrap_or(PlantCommand::List {
        status: None,
        location: None,
        search: None,
    });

    match action {
        PlantCommand::List {
            status,
            location,
            search,
        } => {
            let filter = PlantFilter {
                status: status.as_deref().map(str::parse).transpose()?,
                location: location.as_deref().map(str::parse).transpose()?,
                search,
            };
            let result = plants::list(&ctx.garden, &filter);
            print_plants(&result.plants, ctx.now);
            print_messages(&result.messages);
        }
        PlantCommand::View { id } => {
            let result = plants::view(&ctx.garden, &PlantId::new(id))?;
            for plant in &result.plants {
                print_plant_detail(plant, &result.activities, ctx.now);
            }
            print_messages(&result.messages);
        }
        PlantCommand::Add {
            name,
            location,
            variety,
            planted,
            notes,
        } => {
            let plant = NewPlant::new(name, location.parse()?, parse_date(&planted, ctx.now)?)
                .with_variety(variety)
                .with_notes(notes);
            let result = plants::add(&mut ctx.garden, plant)?;
            print_messages(&result.messages);
        }
        PlantCommand::Edit { id, fields } => {
            let patch = plant_patch(fields, ctx.now)?;
            let result = plants::update(&mut ctx.garden, &PlantId::new(id), patch)?;
            print_messages(&result.messages);
        }
        PlantCommand::Delete { id, yes } => {
            let staged = plants::stage_delete(&ctx.garden, &PlantId::new(id))?;
            let prompt = format!(
                "Delete plant {} ({})?",
                staged.record().name,
                staged.record().id
            );
            if !yes && !confirm(&prompt)? {
                println!("Nothing deleted.");
                return Ok(());
            }
            let (result, _token) = plants::commit_delete(&mut ctx.garden, staged)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn plant_patch(fields: PlantFields, now: DateTime<Utc>) -> Result<PlantPatch> {
    Ok(PlantPatch {
        name: fields.name,
        variety: fields.variety,
        location: fields.location.as_deref().map(str::parse).transpose()?,
        planted_date: fields
            .planted
            .as_deref()
            .map(|raw| parse_date(raw, now))
            .transpose()?,
        notes: fields.notes,
        status: fields.status.as_deref().map(str::parse).transpose()?,
    })
}

fn handle_activities(ctx: &mut AppContext, action: Option<ActivityCommand>) -> Result<()> {
    let action = action.unwrap_or(ActivityCommand::List {
        upcoming: false,
        recent: false,
        plant: None,
        kind: None,
    });

    match action {
        ActivityCommand::List {
            upcoming,
            recent,
            plant,
            kind,
        } => {
            let timeline = match (upcoming, recent) {
                (true, _) => Timeline::Upcoming,
                (_, true) => Timeline::Recent,
                _ => Timeline::All,
            };
            let filter = ActivityFilter {
                timeline,
                plant: plant.map(PlantId::new),
                kind: kind.as_deref().map(str::parse).transpose()?,
            };
            let result = activities::list(&ctx.garden, &filter, ctx.now);
            print_activities(&result.activities, ctx.now);
            print_messages(&result.messages);
        }
        ActivityCommand::Add {
            kind,
            plant,
            date,
            notes,
        } => {
            let mut activity =
                NewActivity::new(kind.parse()?, plant, parse_date(&date, ctx.now)?);
            if let Some(notes) = notes {
                activity = activity.with_notes(notes);
            }
            let result = activities::add(&mut ctx.garden, activity)?;
            print_messages(&result.messages);
        }
        ActivityCommand::Edit {
            id,
            kind,
            plant,
            date,
            notes,
        } => {
            let patch = ActivityPatch {
                kind: kind.as_deref().map(str::parse).transpose()?,
                plant: plant.map(PlantId::new),
                date: date
                    .as_deref()
                    .map(|raw| parse_date(raw, ctx.now))
                    .transpose()?,
                notes,
            };
            let result = activities::update(&mut ctx.garden, &ActivityId::new(id), patch)?;
            print_messages(&result.messages);
        }
        ActivityCommand::Delete { id, yes } => {
            let staged = activities::stage_delete(&ctx.garden, &ActivityId::new(id))?;
            let prompt = format!(
                "Delete {} activity for {} ({})?",
                staged.record().kind,
                ctx.garden.plant_name_for(staged.record()),
                staged.record().date.format("%Y-%m-%d")
            );
            if !yes && !confirm(&prompt)? {
                println!("Nothing deleted.");
                return Ok(());
            }
            let (result, _token) = activities::commit_delete(&mut ctx.garden, staged)?;
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_settings(
    ctx: &mut AppContext,
    key: Option<String>,
    value: Option<String>,
    reset: bool,
) -> Result<()> {
    let action = match (key, value) {
        _ if reset => SettingsAction::Reset,
        (None, _) => SettingsAction::ShowAll,
        (Some(key), None) => SettingsAction::ShowKey(key),
        (Some(key), Some(value)) => SettingsAction::Set(key, value),
    };
    let show_all = matches!(action, SettingsAction::ShowAll);

    let result = settings_cmd::run(&mut ctx.garden, action)?;
    if let (true, Some(settings)) = (show_all, &result.settings) {
        print_settings(settings);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = config_cmd::run(&ctx.data_dir, action)?;
    if let (true, Some(config)) = (show_all, &result.config) {
        print_config(config);
    }
    print_messages(&result.messages);
    Ok(())
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
