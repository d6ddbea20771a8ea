use chrono::{DateTime, Utc};
use colored::Colorize;
use plotz::commands::{ActivityRow, CmdMessage, MessageLevel};
use plotz::config::PlotzConfig;
use plotz::model::{Plant, PlantStatus};
use plotz::settings::Settings;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 10;
const LOCATION_WIDTH: usize = 15;
const KIND_WIDTH: usize = 13;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_plants(plants: &[Plant], now: DateTime<Utc>) {
    if plants.is_empty() {
        println!("No plants found.");
        return;
    }

    for plant in plants {
        let id = pad_to_width(&truncate_to_width(plant.id.as_str(), ID_WIDTH), ID_WIDTH);
        let location = pad_to_width(plant.location.display_name(), LOCATION_WIDTH);
        let name = if plant.variety.is_empty() {
            plant.name.clone()
        } else {
            format!("{} ({})", plant.name, plant.variety)
        };

        let fixed = ID_WIDTH + LOCATION_WIDTH + TIME_WIDTH + 2;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let name = pad_to_width(&truncate_to_width(&name, available), available);

        let name = match plant.status {
            PlantStatus::Growing => name.normal(),
            PlantStatus::Harvested => name.green(),
            PlantStatus::Dormant => name.dimmed(),
        };

        println!(
            "{} {}{} {}",
            id.yellow(),
            name,
            location,
            format_when(plant.planted_date, now).dimmed()
        );
    }
}

pub fn print_plant_detail(plant: &Plant, activities: &[ActivityRow], now: DateTime<Utc>) {
    println!("{} {}", plant.id.as_str().yellow(), plant.name.bold());
    println!("--------------------------------");
    if !plant.variety.is_empty() {
        println!("Variety:  {}", plant.variety);
    }
    println!("Location: {}", plant.location.display_name());
    println!("Status:   {}", plant.status);
    println!(
        "Planted:  {} ({})",
        plant.planted_date.format("%Y-%m-%d"),
        format_when(plant.planted_date, now).trim()
    );
    if !plant.notes.is_empty() {
        println!();
        println!("{}", plant.notes);
    }
    if !activities.is_empty() {
        println!();
        print_activities(activities, now);
    }
}

pub fn print_activities(rows: &[ActivityRow], now: DateTime<Utc>) {
    if rows.is_empty() {
        println!("No activities found.");
        return;
    }

    for row in rows {
        let activity = &row.activity;
        let id = pad_to_width(
            &truncate_to_width(activity.id.as_str(), ID_WIDTH),
            ID_WIDTH,
        );
        let kind = pad_to_width(activity.kind.as_str(), KIND_WIDTH);
        let summary = match &activity.notes {
            Some(notes) => format!("{}: {}", row.plant_name, notes.replace('\n', " ")),
            None => row.plant_name.clone(),
        };

        let fixed = ID_WIDTH + KIND_WIDTH + TIME_WIDTH + 2;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let summary = pad_to_width(&truncate_to_width(&summary, available), available);

        let when = format_when(activity.date, now);
        let when = if activity.is_upcoming(now) {
            when.cyan()
        } else {
            when.dimmed()
        };

        println!("{} {}{} {}", id.yellow(), kind, summary, when);
    }
}

pub fn print_settings(settings: &Settings) {
    for (key, value) in settings.entries() {
        println!("{} = {}", key, value);
    }
}

pub fn print_config(config: &PlotzConfig) {
    for key in PlotzConfig::keys() {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

/// Right-aligned relative time, "3 days ago" or "in 2 days".
fn format_when(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let formatter = Formatter::new();
    let delta = now.signed_duration_since(timestamp);

    let time_str = if delta.num_seconds() >= 0 {
        formatter.convert(delta.to_std().unwrap_or_default())
    } else {
        let mut ahead = Formatter::new();
        ahead.ago("");
        let text = ahead.convert((-delta).to_std().unwrap_or_default());
        format!("in {}", text.trim_end())
    };

    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
