/// Asserts that the organism with the given ID holds approximately `expected` energy.
#[macro_export]
macro_rules! assert_energy_near {
    ($world:expr, $id:expr, $expected:expr) => {
        let organism = $world
            .organisms
            .iter()
            .find(|o| o.id == $id)
            .expect("Organism not found in world");
        assert!(
            (organism.energy - $expected).abs() < 1e-9,
            "Organism {} energy {} is not {}",
            $id,
            organism.energy,
            $expected
        );
    };
}

/// Asserts the total record count, living and dead.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!($world.organisms.len(), $count, "Population count mismatch");
    };
}

/// Asserts the energy bounds and the energy/state coupling for every organism.
#[macro_export]
macro_rules! assert_energy_invariants {
    ($world:expr) => {
        let max = $world.config.metabolism.max_energy;
        for o in &$world.organisms {
            assert!(
                o.energy >= 0.0 && o.energy <= max,
                "Organism {} energy {} outside [0, {}]",
                o.id,
                o.energy,
                max
            );
            assert_eq!(
                o.energy == 0.0,
                !o.is_alive(),
                "Organism {} energy {} disagrees with state {:?}",
                o.id,
                o.energy,
                o.state
            );
        }
    };
}
