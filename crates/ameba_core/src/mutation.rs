//! Heritable colour-layer mutation and trait jitter.

use ameba_data::Traits;
use rand::Rng;

fn parse_hex_color(hex: &str) -> Option<(i32, i32, i32)> {
    let h = hex.strip_prefix('#').unwrap_or(hex);
    let expanded: String = match h.len() {
        3 => h.chars().flat_map(|c| [c, c]).collect(),
        6 => h.to_string(),
        _ => return None,
    };
    let v = u32::from_str_radix(&expanded, 16).ok()?;
    Some((
        ((v >> 16) & 0xFF) as i32,
        ((v >> 8) & 0xFF) as i32,
        (v & 0xFF) as i32,
    ))
}

/// Perturbs each RGB channel by up to `±floor(magnitude * 255)`.
///
/// Input may be `#rgb` or `#rrggbb`; anything unparseable is returned as is.
/// Output is always lowercase `#rrggbb`. `magnitude` is clamped into
/// `[0, 1]`; a NaN magnitude leaves the colour unchanged.
pub fn mutate_color<R: Rng>(hex: &str, magnitude: f64, rng: &mut R) -> String {
    let Some((r, g, b)) = parse_hex_color(hex) else {
        return hex.to_string();
    };
    let magnitude = if magnitude.is_nan() { 0.0 } else { magnitude.clamp(0.0, 1.0) };
    let change = (magnitude * 255.0) as i32;
    let mut channel = |c: i32| (c + rng.gen_range(-change..=change)).clamp(0, 255);
    let (r, g, b) = (channel(r), channel(g), channel(b));
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Parameters of one inheritance.
#[derive(Debug, Clone, Copy)]
pub struct DnaMutation<'a> {
    pub rate: f64,
    pub inherited_magnitude: f64,
    pub appended_magnitude: f64,
    pub base_color: &'a str,
}

/// Copies a parent's colour layers into a child's, mutating on the way.
///
/// Each layer mutates independently with probability `rate`. When no layer
/// changed, a new layer derived from `base_color` is appended with
/// probability `rate / 3`. Returns the child's layers and whether they differ
/// from the parent's.
pub fn mutate_dna<R: Rng>(parent: &[String], params: &DnaMutation, rng: &mut R) -> (Vec<String>, bool) {
    let mut out = Vec::with_capacity(parent.len() + 1);
    let mut mutated = false;
    for layer in parent {
        if rng.gen::<f64>() < params.rate {
            out.push(mutate_color(layer, params.inherited_magnitude, rng));
            mutated = true;
        } else {
            out.push(layer.clone());
        }
    }
    if !mutated && rng.gen::<f64>() < params.rate / 3.0 {
        out.push(mutate_color(params.base_color, params.appended_magnitude, rng));
    }
    let changed = out.as_slice() != parent;
    (out, changed)
}

/// Returns a copy of `traits` with cohesion nudged by up to `±amount`,
/// clamped to `[0, 1]`. An absent cohesion is nudged from its default.
pub fn jitter_traits<R: Rng>(traits: &Traits, amount: f64, rng: &mut R) -> Traits {
    let mut child = *traits;
    let delta = if amount > 0.0 {
        rng.gen_range(-amount..amount)
    } else {
        0.0
    };
    child.cohesion = Some((traits.cohesion() + delta).clamp(0.0, 1.0));
    child
}
