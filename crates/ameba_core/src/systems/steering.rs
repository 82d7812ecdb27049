use crate::config::SteeringConfig;
use crate::spatial_hash::SpatialHash;
use ameba_data::Organism;

/// Read-only view of the tick's starting state.
///
/// `snapshot` is the organism collection as it was when the tick began and
/// `spatial` was built from exactly those positions, so indices agree.
pub struct SteeringContext<'a> {
    pub config: &'a SteeringConfig,
    pub snapshot: &'a [Organism],
    pub spatial: &'a SpatialHash,
}

/// Adds cohesion and escape forces to `organism.velocity`.
///
/// `idx` is the organism's index in the snapshot. Cohesion pulls toward the
/// centroid of living neighbours within the social radius. Escape pushes
/// away from every neighbour, dead or alive, closer than the escape radius.
/// Coincident neighbours exert no escape force.
pub fn steer(
    idx: usize,
    organism: &mut Organism,
    ctx: &SteeringContext,
    neighbors: &mut Vec<usize>,
) {
    let cfg = ctx.config;
    let Some(me) = ctx.snapshot.get(idx) else {
        return;
    };
    let (px, py) = (me.position.x, me.position.y);
    let social_sq = cfg.social_radius * cfg.social_radius;
    let escape_sq = cfg.escape_radius * cfg.escape_radius;

    ctx.spatial.query_into(
        px,
        py,
        cfg.social_radius.max(cfg.escape_radius),
        neighbors,
    );

    let (mut sum_x, mut sum_y, mut count) = (0.0, 0.0, 0usize);
    let (mut push_x, mut push_y) = (0.0, 0.0);
    for &j in neighbors.iter() {
        if j == idx {
            continue;
        }
        let other = &ctx.snapshot[j];
        let d_sq = other.position.distance_sq(px, py);
        if other.is_alive() && d_sq <= social_sq {
            sum_x += other.position.x;
            sum_y += other.position.y;
            count += 1;
        }
        if d_sq > 0.0 && d_sq < escape_sq {
            let d = d_sq.sqrt();
            push_x += (px - other.position.x) / d;
            push_y += (py - other.position.y) / d;
        }
    }

    if count > 0 {
        let gain = organism.traits.cohesion() * cfg.cohesion_scale * cfg.cohesion_gain;
        let cx = sum_x / count as f64;
        let cy = sum_y / count as f64;
        organism.velocity.vx += (cx - px) * gain;
        organism.velocity.vy += (cy - py) * gain;
    }
    let escape = organism.traits.escape() * cfg.escape_gain;
    organism.velocity.vx += push_x * escape;
    organism.velocity.vy += push_y * escape;
}
