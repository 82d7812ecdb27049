use ameba_data::{Food, LifeState, Organism, Position, Traits, Velocity};
use rand::Rng;
use uuid::Uuid;

/// Nominal lifespan stamped into `expires_at`. Never enforced.
pub const LIFESPAN_MS: i64 = 24 * 60 * 60 * 1000;

/// Wall-clock milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Draws an id from the world RNG so seeded runs produce the same ids.
pub fn next_id<R: Rng>(rng: &mut R) -> Uuid {
    Uuid::from_u128(rng.gen::<u128>())
}

/// Uniform point in `[0, width) x [0, height)`.
pub fn random_position<R: Rng>(width: f64, height: f64, rng: &mut R) -> Position {
    Position {
        x: rng.gen::<f64>() * width,
        y: rng.gen::<f64>() * height,
    }
}

/// Clamps a point into `[0, width] x [0, height]`.
#[must_use]
pub fn clamp_to_world(x: f64, y: f64, width: f64, height: f64) -> Position {
    Position {
        x: x.clamp(0.0, width),
        y: y.clamp(0.0, height),
    }
}

/// Initial-body draw shared by spawned and born organisms: size `U(8, 12)`.
pub fn random_size<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(8.0..12.0)
}

/// A fresh, parentless organism at `(x, y)`.
///
/// Energy is drawn from `U(0.6, 1.5)`, velocity per axis from
/// `U(-0.25, 0.25)`; the DNA starts with the single `base_color` layer.
pub fn create_organism_with_rng<R: Rng>(
    position: Position,
    traits: Traits,
    base_color: &str,
    now: i64,
    rng: &mut R,
) -> Organism {
    let id = next_id(rng);
    let size = random_size(rng);
    let energy = rng.gen_range(0.6..1.5);
    let velocity = Velocity {
        vx: rng.gen_range(-0.25..0.25),
        vy: rng.gen_range(-0.25..0.25),
    };
    Organism {
        id,
        parent_id: None,
        generation: 0,
        position,
        velocity,
        size,
        energy,
        state: LifeState::Normal,
        traits,
        dna_layers: vec![base_color.to_string()],
        age: 0,
        spawned_at: now,
        expires_at: now + LIFESPAN_MS,
    }
}

pub fn create_food_with_rng<R: Rng>(position: Position, energy: f64, rng: &mut R) -> Food {
    Food {
        id: next_id(rng),
        position,
        energy,
    }
}

/// Marks `organism` dead with zero energy.
///
/// Returns `true` only on the transition, so callers count each death once.
pub fn kill(organism: &mut Organism) -> bool {
    organism.energy = 0.0;
    if organism.state == LifeState::Dead {
        return false;
    }
    organism.state = LifeState::Dead;
    true
}
