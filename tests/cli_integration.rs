use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn plotz(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("plotz").unwrap();
    cmd.env("PLOTZ_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn fresh_garden_lists_sample_plants() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["plants", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tomato (Roma)"))
        .stdout(predicate::str::contains("Herb Garden"));

    // nothing is written until something changes
    assert!(!home.path().join("garden-plants-storage.json").exists());
}

#[test]
fn added_plant_survives_restart() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args([
            "plants",
            "add",
            "Kale",
            "--location",
            "container",
            "--planted",
            "2024-03-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plant added"));

    let blob = fs::read_to_string(home.path().join("garden-plants-storage.json")).unwrap();
    assert!(blob.contains("\"version\":0"));
    assert!(blob.contains("\"plantedDate\":\"2024-03-01T00:00:00Z\""));

    plotz(&home)
        .args(["plants", "list", "--location", "container"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Kale"))
        .stdout(predicate::str::contains("Tomato").not());
}

#[test]
fn blank_plant_name_is_rejected() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["plants", "add", "  ", "--location", "container"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Plant name cannot be empty"));
}

#[test]
fn unknown_location_is_rejected() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["plants", "add", "Kale", "--location", "patio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown location 'patio'"));
}

#[test]
fn delete_with_yes_removes_plant_but_keeps_its_activities() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["plants", "delete", "3", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plant deleted (3): Cucumber"));

    plotz(&home)
        .args(["plants", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cucumber").not());

    plotz(&home)
        .args(["activities", "list", "--plant", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown Plant"));
}

#[test]
fn declined_delete_changes_nothing() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["plants", "delete", "1"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing deleted."));

    assert!(!home.path().join("garden-plants-storage.json").exists());
}

#[test]
fn deleting_unknown_id_fails() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["activities", "delete", "nope", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Activity not found: nope"));
}

#[test]
fn activity_for_unknown_plant_is_kept_with_warning() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["activities", "add", "pruning", "42", "--date", "tomorrow"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plant with id 42"))
        .stdout(predicate::str::contains("Activity added"));

    plotz(&home)
        .args(["activities", "list", "--upcoming", "--plant", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pruning"));
}

#[test]
fn settings_set_and_get() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["settings", "garden-name", "Back Yard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("garden-name set to Back Yard"));

    plotz(&home)
        .args(["settings", "garden-name"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Back Yard"));

    plotz(&home)
        .args(["settings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hardiness = 7b"));

    plotz(&home)
        .args(["settings", "temperature-unit", "K"])
        .assert()
        .failure();
}

#[test]
fn corrupt_blob_falls_back_to_samples() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("garden-plants-storage.json"), "{not json").unwrap();

    plotz(&home)
        .args(["plants", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sunflower"));

    let kept = fs::read_to_string(home.path().join("garden-plants-storage.bak.json")).unwrap();
    assert_eq!(kept, "{not json");
}

#[test]
fn seed_defaults_off_starts_empty() {
    let home = TempDir::new().unwrap();

    plotz(&home)
        .args(["config", "seed-defaults", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seed-defaults set to false"));

    plotz(&home)
        .args(["plants", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No plants found."));
}

#[test]
fn data_dir_flag_wins_over_env() {
    let home = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();

    plotz(&home)
        .args(["settings", "location", "Lisbon"])
        .arg("--data-dir")
        .arg(other.path())
        .assert()
        .success();

    assert!(other.path().join("garden-settings-storage.json").exists());
    assert!(!home.path().join("garden-settings-storage.json").exists());
}
