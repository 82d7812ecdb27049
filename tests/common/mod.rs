pub mod macros;

use ameba_lib::model::config::AppConfig;
use ameba_lib::model::lifecycle;
use ameba_lib::model::state::{Food, Organism, Position, Traits, Velocity};
use ameba_lib::model::world::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

/// Builds a quiet world: no random organisms, no food, no spontaneous food.
#[allow(dead_code)]
pub struct WorldBuilder {
    config: AppConfig,
    organisms: Vec<OrganismBuilder>,
    food: Vec<(f64, f64)>,
}

#[allow(dead_code)]
impl WorldBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_population = 0;
        config.world.initial_food = 0;
        config.world.seed = Some(42);
        config.tunables.food_spawn_prob = 0.0;
        Self {
            config,
            organisms: Vec::new(),
            food: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.config.world.width = width;
        self.config.world.height = height;
        self
    }

    pub fn with_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        f(&mut self.config);
        self
    }

    pub fn with_organism(mut self, organism: OrganismBuilder) -> Self {
        self.organisms.push(organism);
        self
    }

    pub fn with_food(mut self, x: f64, y: f64) -> Self {
        self.food.push((x, y));
        self
    }

    pub fn build(self) -> World {
        let mut world = World::new(self.config).expect("Failed to create world in test builder");
        for (i, b) in self.organisms.into_iter().enumerate() {
            world.organisms.push(b.build(i as u128 + 1));
        }
        for (i, (x, y)) in self.food.into_iter().enumerate() {
            world
                .food
                .push(Food::new(Uuid::from_u128(10_000 + i as u128), x, y));
        }
        world
    }
}

/// A hand-placed organism with every random draw pinned down.
#[allow(dead_code)]
pub struct OrganismBuilder {
    x: f64,
    y: f64,
    velocity: Velocity,
    energy: f64,
    size: f64,
    traits: Traits,
    dead: bool,
}

#[allow(dead_code)]
impl OrganismBuilder {
    pub fn new() -> Self {
        Self {
            x: 100.0,
            y: 100.0,
            velocity: Velocity::default(),
            energy: 1.0,
            size: 10.0,
            traits: Traits::default(),
            dead: false,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = Velocity { vx, vy };
        self
    }

    pub fn energy(mut self, amount: f64) -> Self {
        self.energy = amount;
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn traits(mut self, traits: Traits) -> Self {
        self.traits = traits;
        self
    }

    pub fn dead(mut self) -> Self {
        self.dead = true;
        self
    }

    fn build(self, id: u128) -> Organism {
        let mut rng = ChaCha8Rng::seed_from_u64(id as u64);
        let mut o = lifecycle::create_organism_with_rng(
            Position::new(self.x, self.y),
            self.traits,
            "#88c1ff",
            0,
            &mut rng,
        );
        o.id = Uuid::from_u128(id);
        o.velocity = self.velocity;
        o.energy = self.energy;
        o.size = self.size;
        if self.dead {
            lifecycle::kill(&mut o);
        }
        o
    }
}

/// The organism with `id`, if the world still holds it.
#[allow(dead_code)]
pub fn find(world: &World, id: Uuid) -> Option<&Organism> {
    world.organisms.iter().find(|o| o.id == id)
}
