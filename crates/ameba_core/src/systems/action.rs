use ameba_data::Organism;

/// Moves by the current velocity, then applies friction and keeps the
/// organism inside `[0, width] x [0, height]`.
pub fn integrate(organism: &mut Organism, friction: f64, width: f64, height: f64) {
    organism.position.x += organism.velocity.vx;
    organism.position.y += organism.velocity.vy;
    organism.velocity.vx *= friction;
    organism.velocity.vy *= friction;
    organism.position.x = organism.position.x.clamp(0.0, width);
    organism.position.y = organism.position.y.clamp(0.0, height);
}
