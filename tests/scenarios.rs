mod common;

use ameba_lib::model::state::{EventKind, LifeState, Traits};
use common::{find, OrganismBuilder, WorldBuilder};
use uuid::Uuid;

const FIRST: Uuid = Uuid::from_u128(1);
const SECOND: Uuid = Uuid::from_u128(2);

#[test]
fn test_lone_still_organism_only_pays_base_cost() {
    let mut world = WorldBuilder::new()
        .with_organism(OrganismBuilder::new().at(300.0, 400.0).energy(1.0))
        .build();

    let report = world.step();

    assert_eq!(report.tick, 1);
    assert_eq!(report.events_appended, 0);
    let o = find(&world, FIRST).expect("organism retained");
    assert_eq!((o.position.x, o.position.y), (300.0, 400.0));
    assert_eq!((o.velocity.vx, o.velocity.vy), (0.0, 0.0));
    assert_energy_near!(world, FIRST, 1.0 - 0.006);
    assert_eq!(o.age, 1);
}

#[test]
fn test_metabolism_trait_scales_cost() {
    let mut world = WorldBuilder::new()
        .with_organism(OrganismBuilder::new().energy(1.0).traits(Traits {
            metabolism: Some(2.0),
            ..Default::default()
        }))
        .build();

    world.step();

    assert_energy_near!(world, FIRST, 1.0 - 0.012);
}

#[test]
fn test_close_pair_drifts_apart() {
    // 10 apart: cohesion pulls 0.01 inward, escape pushes 0.04 outward.
    let mut world = WorldBuilder::new()
        .with_organism(OrganismBuilder::new().at(100.0, 100.0))
        .with_organism(OrganismBuilder::new().at(110.0, 100.0))
        .build();

    world.step();

    let a = find(&world, FIRST).expect("first organism");
    let b = find(&world, SECOND).expect("second organism");
    assert!((a.position.x - 99.97).abs() < 1e-9);
    assert!((b.position.x - 110.03).abs() < 1e-9);
    assert!((a.velocity.vx + 0.03 * 0.92).abs() < 1e-9);
    assert!((b.velocity.vx - 0.03 * 0.92).abs() < 1e-9);
    assert_eq!(a.position.y, 100.0);
    assert_eq!(a.velocity.vy, 0.0);
}

#[test]
fn test_distant_pair_only_cohesion() {
    // 50 apart: inside the social radius, outside the escape radius.
    let mut world = WorldBuilder::new()
        .with_organism(OrganismBuilder::new().at(100.0, 100.0))
        .with_organism(OrganismBuilder::new().at(150.0, 100.0))
        .build();

    world.step();

    let a = find(&world, FIRST).expect("first organism");
    assert!((a.position.x - 100.05).abs() < 1e-9);
}

#[test]
fn test_hungry_organism_eats_food_in_reach() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.tunables.reproduction_base_chance = 0.0)
        .with_organism(OrganismBuilder::new().energy(0.5))
        .with_food(105.0, 100.0)
        .build();

    let report = world.step();

    assert_energy_near!(world, FIRST, 0.5 - 0.006 + 0.6);
    assert!(world.food.is_empty());
    let o = find(&world, FIRST).expect("organism retained");
    assert!((o.size - 10.06).abs() < 1e-9);
    // Foraging steered toward the pellet after the move.
    assert!((o.velocity.vx - 0.02).abs() < 1e-9);
    assert_eq!(report.events_appended, 1);
    let events = world.events_snapshot();
    assert_eq!(
        events[0].kind,
        EventKind::FoodConsumed {
            organism: FIRST,
            food: Uuid::from_u128(10_000),
        }
    );
    assert_eq!(events[0].tick, 0);
    assert!(!report.persist_requested);
}

#[test]
fn test_meal_energy_is_capped() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.tunables.reproduction_base_chance = 0.0)
        .with_organism(OrganismBuilder::new().energy(1.5))
        .with_food(100.0, 100.0)
        .build();

    world.step();

    assert_energy_near!(world, FIRST, 1.6);
}

#[test]
fn test_food_outside_capture_radius_is_left() {
    let mut world = WorldBuilder::new()
        .with_organism(OrganismBuilder::new().energy(1.0).size(10.0))
        .with_food(120.0, 100.0)
        .build();

    world.step();

    assert_eq!(world.food.len(), 1);
    assert_energy_near!(world, FIRST, 1.0 - 0.006);
}

#[test]
fn test_well_fed_organism_reproduces() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.tunables.reproduction_base_chance = 1.0)
        .with_organism(OrganismBuilder::new().energy(1.6))
        .with_food(100.0, 100.0)
        .build();

    let report = world.step();

    assert_population!(world, 2);
    assert_eq!(report.births, 1);
    assert!(report.persist_requested);
    assert_energy_near!(world, FIRST, 1.6 - 0.45);

    let child = world
        .organisms
        .iter()
        .find(|o| o.parent_id == Some(FIRST))
        .expect("child appended");
    assert_eq!(child.generation, 1);
    assert_eq!(child.age, 0, "offspring move from the next tick");
    assert!((0.5..1.5).contains(&child.energy));
    assert!(child.velocity.vx.abs() <= 0.125 && child.velocity.vy.abs() <= 0.125);
    assert!((child.position.x - 100.0).abs() <= 12.0);
    assert!((child.position.y - 100.0).abs() <= 12.0);
    assert!(!child.dna_layers.is_empty());

    let events = world.events_snapshot();
    assert!(events.iter().any(|e| e.kind
        == EventKind::Birth {
            parent: Some(FIRST),
            child: child.id,
        }));
    assert_eq!(world.metrics.births(), 1);
}

#[test]
fn test_no_reproduction_below_threshold() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.tunables.reproduction_base_chance = 1.0)
        .with_organism(OrganismBuilder::new().energy(0.2))
        .with_food(100.0, 100.0)
        .build();

    let report = world.step();

    // 0.2 - 0.006 + 0.6 stays under the 1.1 threshold.
    assert_eq!(report.births, 0);
    assert_population!(world, 1);
}

#[test]
fn test_starving_organism_dies_once() {
    let mut world = WorldBuilder::new()
        .with_organism(OrganismBuilder::new().energy(0.005))
        .with_food(100.0, 100.0)
        .build();

    let report = world.step();

    assert_eq!(report.deaths, 1);
    let o = find(&world, FIRST).expect("dead organism retained");
    assert_eq!(o.state, LifeState::Dead);
    assert_eq!(o.energy, 0.0);
    // A dead organism does not eat on the tick it died.
    assert_eq!(world.food.len(), 1);
    assert_eq!(
        world.events_snapshot()[0].kind,
        EventKind::Evolve { organism: FIRST }
    );

    let report = world.step();
    assert_eq!(report.deaths, 0);
    let o = find(&world, FIRST).expect("dead organism retained");
    assert_eq!(o.age, 1, "dead organisms are skipped");
    assert_eq!(world.metrics.deaths(), 1);
}

#[test]
fn test_dead_neighbour_still_repels() {
    let mut world = WorldBuilder::new()
        .with_organism(OrganismBuilder::new().at(100.0, 100.0))
        .with_organism(OrganismBuilder::new().at(110.0, 100.0).dead())
        .build();

    world.step();

    // Escape only: 0.04 outward, no cohesion toward the corpse.
    let a = find(&world, FIRST).expect("living organism");
    assert!((a.position.x - 99.96).abs() < 1e-9);
    let b = find(&world, SECOND).expect("corpse");
    assert_eq!(b.position.x, 110.0);
}

#[test]
fn test_first_in_line_wins_contested_food() {
    let mut world = WorldBuilder::new()
        .with_config(|c| c.tunables.reproduction_base_chance = 0.0)
        .with_organism(OrganismBuilder::new().at(100.0, 100.0).energy(0.5))
        .with_organism(OrganismBuilder::new().at(104.0, 100.0).energy(0.5))
        .with_food(102.0, 100.0)
        .build();

    world.step();

    let a = find(&world, FIRST).expect("first organism");
    let b = find(&world, SECOND).expect("second organism");
    assert!(a.energy > 1.0);
    assert!(b.energy < 0.5);
    assert!(world.food.is_empty());
}

#[test]
fn test_walls_clamp_position() {
    let mut world = WorldBuilder::new()
        .with_size(200.0, 200.0)
        .with_organism(OrganismBuilder::new().at(199.9, 0.05).velocity(1.0, -1.0))
        .build();

    world.step();

    let o = find(&world, FIRST).expect("organism");
    assert_eq!((o.position.x, o.position.y), (200.0, 0.0));
}

#[test]
fn test_negative_metabolism_seed_keeps_energy_bounded() {
    let mut world = WorldBuilder::new().build();
    let seed = Traits {
        metabolism: Some(-5.0),
        ..Default::default()
    };
    let organism = world.spawn(Some(seed));
    assert_eq!(organism.traits.metabolism, Some(0.0));

    for _ in 0..40 {
        world.step();
        assert_energy_invariants!(world);
    }
    let o = find(&world, organism.id).expect("organism retained");
    assert!(o.energy <= organism.energy);
}

#[test]
fn test_huge_world_steps_without_dense_grid() {
    let mut world = WorldBuilder::new()
        .with_size(1e12, 1e12)
        .with_organism(OrganismBuilder::new().at(5.0e11, 5.0e11))
        .with_organism(OrganismBuilder::new().at(5.0e11 + 10.0, 5.0e11))
        .build();

    for _ in 0..3 {
        world.step();
        assert_energy_invariants!(world);
    }

    let a = find(&world, FIRST).expect("first organism");
    let b = find(&world, SECOND).expect("second organism");
    assert!(b.position.x - a.position.x > 10.0, "neighbours still see each other");
}
