//! Sample records a brand new garden starts with.
//!
//! Activity dates are relative to `now` so the sample always has a mix of
//! recent and upcoming work.

use crate::model::{Activity, ActivityId, ActivityType, Location, Plant, PlantId, PlantStatus};
use chrono::{DateTime, Duration, NaiveDate, Utc};

fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .unwrap_or_default()
}

fn plant(
    id: &str,
    name: &str,
    variety: &str,
    location: Location,
    planted_date: DateTime<Utc>,
    notes: &str,
    status: PlantStatus,
) -> Plant {
    Plant {
        id: PlantId::new(id),
        name: name.to_string(),
        variety: variety.to_string(),
        location,
        planted_date,
        notes: notes.to_string(),
        status,
    }
}

pub fn plants() -> Vec<Plant> {
    vec![
        plant(
            "1",
            "Tomato",
            "Roma",
            Location::VegetableBed,
            day(2023, 4, 15),
            "Growing well, needs regular watering during hot days.",
            PlantStatus::Growing,
        ),
        plant(
            "2",
            "Basil",
            "Sweet",
            Location::HerbGarden,
            day(2023, 5, 1),
            "Thriving in partial shade.",
            PlantStatus::Growing,
        ),
        plant(
            "3",
            "Cucumber",
            "English",
            Location::VegetableBed,
            day(2023, 4, 20),
            "Climbing well on trellis.",
            PlantStatus::Growing,
        ),
        plant(
            "4",
            "Lettuce",
            "Romaine",
            Location::VegetableBed,
            day(2023, 3, 10),
            "Ready for harvest.",
            PlantStatus::Harvested,
        ),
        plant(
            "5",
            "Sunflower",
            "Mammoth",
            Location::FlowerBed,
            day(2023, 5, 15),
            "Growing tall and strong.",
            PlantStatus::Growing,
        ),
    ]
}

pub fn activities(now: DateTime<Utc>) -> Vec<Activity> {
    let entry = |id: &str, kind, plant: &str, offset_days: i64, notes: &str| Activity {
        id: ActivityId::new(id),
        kind,
        plant: PlantId::new(plant),
        date: now + Duration::days(offset_days),
        notes: Some(notes.to_string()),
    };

    vec![
        entry("1", ActivityType::Watering, "1", 0, "Regular watering schedule"),
        entry("2", ActivityType::Planting, "2", 1, "Plant new basil seedlings"),
        entry("3", ActivityType::Harvesting, "4", 2, "Harvest outer leaves"),
        entry("4", ActivityType::Watering, "3", 3, "Deep watering"),
        entry("5", ActivityType::Watering, "3", -1, "Light watering"),
        entry("6", ActivityType::Harvesting, "5", -2, "Harvested ripe berries"),
        entry("7", ActivityType::Planting, "1", -3, "Planted new seeds"),
    ]
}
