use crate::config::EvolutionConfig;
use crate::lifecycle;
use crate::mutation::{self, DnaMutation};
use ameba_data::Organism;
use rand::Rng;

pub struct ReproductionContext<'a> {
    pub config: &'a EvolutionConfig,
    pub base_chance: f64,
    pub width: f64,
    pub height: f64,
    pub now: i64,
}

pub struct Offspring {
    pub child: Organism,
    /// The child's DNA differs from its parent's.
    pub mutated: bool,
}

/// Rolls for a birth after a meal.
///
/// Only a parent above the reproduction threshold rolls. On success the
/// parent pays the reproduction cost and the child is returned; the caller
/// owns appending it.
pub fn try_reproduce<R: Rng>(
    parent: &mut Organism,
    ctx: &ReproductionContext,
    rng: &mut R,
) -> Option<Offspring> {
    let cfg = ctx.config;
    if parent.energy <= cfg.reproduction_threshold || rng.gen::<f64>() >= ctx.base_chance {
        return None;
    }

    let traits = mutation::jitter_traits(&parent.traits, cfg.trait_jitter, rng);
    let params = DnaMutation {
        rate: cfg.mutation_rate,
        inherited_magnitude: cfg.inherited_magnitude,
        appended_magnitude: cfg.appended_magnitude,
        base_color: &cfg.base_color,
    };
    let (dna_layers, mutated) = mutation::mutate_dna(&parent.dna_layers, &params, rng);

    let offset = cfg.offspring_offset;
    let (ox, oy) = if offset > 0.0 {
        (rng.gen_range(-offset..offset), rng.gen_range(-offset..offset))
    } else {
        (0.0, 0.0)
    };
    let position = lifecycle::clamp_to_world(
        parent.position.x + ox,
        parent.position.y + oy,
        ctx.width,
        ctx.height,
    );

    let mut child = lifecycle::create_organism_with_rng(position, traits, &cfg.base_color, ctx.now, rng);
    child.velocity.vx *= 0.5;
    child.velocity.vy *= 0.5;
    child.energy = rng.gen_range(0.5..1.5);
    child.dna_layers = dna_layers;
    child.parent_id = Some(parent.id);
    child.generation = parent.generation.saturating_add(1);

    parent.energy -= cfg.reproduction_cost;
    Some(Offspring { child, mutated })
}
