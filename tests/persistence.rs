mod common;

use ameba_io::{parse_traits, parse_tunables_patch, ConfigStore, IoError};
use ameba_lib::model::config::{AppConfig, ConsumptionPolicy, Tunables};
use ameba_lib::model::world::World;
use common::WorldBuilder;
use std::collections::HashMap;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.world.seed = Some(1);
    config.world.config_path = dir
        .path()
        .join("config/world.json")
        .to_string_lossy()
        .into_owned();
    config
}

#[test]
fn test_tunables_survive_a_restart() {
    let dir = TempDir::new().expect("temp dir");
    let mut world = World::load(config_in(&dir)).expect("first start");
    world.apply_config(&HashMap::from([
        ("foodSpawnProb".to_string(), 0.9),
        ("reproductionBaseChance".to_string(), 0.05),
    ]));
    world.save_config().expect("save tunables");

    let restarted = World::load(config_in(&dir)).expect("second start");
    assert_eq!(restarted.config.tunables.food_spawn_prob, 0.9);
    assert_eq!(restarted.config.tunables.reproduction_base_chance, 0.05);
}

#[test]
fn test_stored_file_uses_wire_keys() {
    let dir = TempDir::new().expect("temp dir");
    let store = ConfigStore::new(dir.path().join("world.json"));
    store
        .save(&Tunables {
            food_spawn_prob: 0.25,
            reproduction_base_chance: 0.5,
        })
        .expect("save");
    let text = std::fs::read_to_string(store.path()).expect("read back");
    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["foodSpawnProb"], 0.25);
    assert_eq!(value["reproductionBaseChance"], 0.5);
}

#[test]
fn test_corrupt_file_falls_back_to_configured_tunables() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = config_in(&dir);
    config.tunables.food_spawn_prob = 0.33;
    std::fs::create_dir_all(dir.path().join("config")).expect("mkdir");
    std::fs::write(&config.world.config_path, "{ not json").expect("write garbage");

    let world = World::load(config).expect("start despite corrupt file");
    assert_eq!(world.config.tunables.food_spawn_prob, 0.33);
}

#[test]
fn test_out_of_range_values_are_clamped_on_load() {
    let dir = TempDir::new().expect("temp dir");
    let store = ConfigStore::new(dir.path().join("world.json"));
    std::fs::write(
        store.path(),
        r#"{"foodSpawnProb": 4.0, "reproductionBaseChance": -1, "worldWidth": 10}"#,
    )
    .expect("write");
    let tunables = store.load().expect("load");
    assert_eq!(tunables.food_spawn_prob, 1.0);
    assert_eq!(tunables.reproduction_base_chance, 0.0);
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let store = ConfigStore::new(dir.path().join("absent.json"));
    let err = store.load().expect_err("no file");
    assert!(err.is_not_found());
    assert_eq!(store.load_or_default(), Tunables::default());
}

#[test]
fn test_toml_config_overrides_defaults() {
    let config = AppConfig::from_toml(
        r#"
        [world]
        width = 800.0
        height = 600.0
        initial_population = 5
        seed = 9

        [tunables]
        foodSpawnProb = 0.3

        [policy]
        consumption = "nearest"
        "#,
    )
    .expect("valid toml");
    assert_eq!(config.world.width, 800.0);
    assert_eq!(config.tunables.food_spawn_prob, 0.3);
    assert_eq!(config.tunables.reproduction_base_chance, 0.12);
    assert_eq!(config.policy.consumption, ConsumptionPolicy::Nearest);
    assert_eq!(config.steering.friction, 0.92);

    let world = World::new(config).expect("world from toml");
    assert_eq!(world.organisms.len(), 5);
}

#[test]
fn test_invalid_toml_values_are_rejected() {
    assert!(AppConfig::from_toml("[tunables]\nfoodSpawnProb = 1.5").is_err());
    assert!(AppConfig::from_toml("[world]\nwidth = -1.0").is_err());
}

#[test]
fn test_boundary_parsers_feed_the_world() {
    let mut world = WorldBuilder::new().build();
    let traits = parse_traits(r#"{"cohesion": 0.8, "unknown": 1}"#)
        .expect("valid traits")
        .expect("seeded");
    let organism = world.spawn(Some(traits));
    assert_eq!(organism.traits.cohesion, Some(0.8));

    let patch = parse_tunables_patch(r#"{"reproductionBaseChance": 0.7}"#).expect("valid patch");
    let snapshot = world.apply_config(&patch);
    assert_eq!(snapshot.tunables.reproduction_base_chance, 0.7);

    assert!(matches!(
        parse_tunables_patch("[]"),
        Err(IoError::Validation(_))
    ));
}

#[test]
fn test_partial_file_keeps_configured_tunables() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = config_in(&dir);
    config.tunables.reproduction_base_chance = 0.4;
    std::fs::create_dir_all(dir.path().join("config")).expect("mkdir");
    std::fs::write(&config.world.config_path, r#"{"foodSpawnProb": 0.8}"#).expect("write");

    let world = World::load(config).expect("start with partial file");
    assert_eq!(world.config.tunables.food_spawn_prob, 0.8);
    assert_eq!(world.config.tunables.reproduction_base_chance, 0.4);
}
