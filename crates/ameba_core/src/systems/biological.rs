use crate::config::MetabolismConfig;
use crate::lifecycle;
use ameba_data::Organism;

/// Energy spent this tick at the organism's current velocity.
#[inline]
#[must_use]
pub fn metabolic_cost(organism: &Organism, cfg: &MetabolismConfig) -> f64 {
    let speed = organism.velocity.vx.abs() + organism.velocity.vy.abs();
    (cfg.base_cost + cfg.speed_cost * speed) * organism.traits.metabolism()
}

/// Charges one tick of metabolism and ages the organism.
///
/// Energy never ends above `cfg.max_energy`, even for a negative cost.
/// Returns `true` when the organism starved on this call.
pub fn metabolize(organism: &mut Organism, cfg: &MetabolismConfig) -> bool {
    organism.energy = (organism.energy - metabolic_cost(organism, cfg)).min(cfg.max_energy);
    organism.age += 1;
    if organism.energy <= 0.0 {
        return lifecycle::kill(organism);
    }
    false
}
