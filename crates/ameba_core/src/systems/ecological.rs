use crate::config::{ConsumptionPolicy, MetabolismConfig, SteeringConfig};
use crate::lifecycle;
use ameba_data::{Food, Organism};
use rand::Rng;

const DIRECTION_EPSILON: f64 = 1e-9;

/// Index of the food closest to `(x, y)`; ties go to the earlier record.
#[must_use]
pub fn nearest_food(foods: &[Food], x: f64, y: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, food) in foods.iter().enumerate() {
        let d_sq = food.position.distance_sq(x, y);
        if best.is_none_or(|(_, b)| d_sq < b) {
            best = Some((i, d_sq));
        }
    }
    best.map(|(i, _)| i)
}

/// Nudges a hungry organism toward the nearest food.
pub fn forage(organism: &mut Organism, foods: &[Food], cfg: &SteeringConfig) {
    if organism.energy >= cfg.forage_threshold {
        return;
    }
    let (px, py) = (organism.position.x, organism.position.y);
    let Some(idx) = nearest_food(foods, px, py) else {
        return;
    };
    let dx = foods[idx].position.x - px;
    let dy = foods[idx].position.y - py;
    let dist = (dx * dx + dy * dy).sqrt() + DIRECTION_EPSILON;
    organism.velocity.vx += cfg.forage_bias * dx / dist;
    organism.velocity.vy += cfg.forage_bias * dy / dist;
}

/// Picks the food `organism` eats this tick, if any.
///
/// A pellet is in reach when its squared distance is strictly below the
/// squared capture radius.
#[must_use]
pub fn select_food(
    organism: &Organism,
    foods: &[Food],
    capture_base: f64,
    policy: ConsumptionPolicy,
) -> Option<usize> {
    let r = organism.capture_radius(capture_base);
    let r_sq = r * r;
    let (px, py) = (organism.position.x, organism.position.y);
    let mut in_reach = foods
        .iter()
        .enumerate()
        .map(|(i, f)| (i, f.position.distance_sq(px, py)))
        .filter(|&(_, d_sq)| d_sq < r_sq);
    match policy {
        ConsumptionPolicy::FirstInOrder => in_reach.next().map(|(i, _)| i),
        ConsumptionPolicy::Nearest => in_reach
            .fold(None, |best: Option<(usize, f64)>, (i, d_sq)| match best {
                Some((_, b)) if b <= d_sq => best,
                _ => Some((i, d_sq)),
            })
            .map(|(i, _)| i),
    }
}

/// Transfers a pellet's energy into the organism and grows it.
pub fn consume(organism: &mut Organism, food: &Food, cfg: &MetabolismConfig) {
    organism.energy = (organism.energy + food.energy).min(cfg.max_energy);
    organism.size += food.energy * cfg.size_gain;
}

/// With probability `prob`, a new pellet at a uniformly random position.
pub fn maybe_spawn_food<R: Rng>(
    prob: f64,
    width: f64,
    height: f64,
    energy: f64,
    rng: &mut R,
) -> Option<Food> {
    if rng.gen::<f64>() >= prob {
        return None;
    }
    let position = lifecycle::random_position(width, height, rng);
    Some(lifecycle::create_food_with_rng(position, energy, rng))
}
