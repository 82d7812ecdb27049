use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Cohesion used when an organism carries no explicit value.
pub const DEFAULT_COHESION: f64 = 0.2;
/// Escape used when an organism carries no explicit value.
pub const DEFAULT_ESCAPE: f64 = 0.2;
/// Metabolism multiplier used when an organism carries no explicit value.
pub const DEFAULT_METABOLISM: f64 = 1.0;

/// World position of an organism or food item.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub fn distance_sq(&self, x: f64, y: f64) -> f64 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// Velocity of an organism, in world units per tick.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

/// Lifecycle state. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeState {
    #[default]
    Normal,
    Dead,
}

/// Heritable behavioural parameters.
///
/// Every field is optional; an absent value falls back to the documented
/// default through the accessor of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Traits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cohesion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metabolism: Option<f64>,
}

impl Traits {
    /// Recognised trait keys, in the order they are reported.
    pub const KEYS: [&'static str; 3] = ["cohesion", "escape", "metabolism"];

    #[inline]
    #[must_use]
    pub fn cohesion(&self) -> f64 {
        self.cohesion.unwrap_or(DEFAULT_COHESION)
    }

    #[inline]
    #[must_use]
    pub fn escape(&self) -> f64 {
        self.escape.unwrap_or(DEFAULT_ESCAPE)
    }

    #[inline]
    #[must_use]
    pub fn metabolism(&self) -> f64 {
        self.metabolism.unwrap_or(DEFAULT_METABOLISM)
    }

    /// Builds traits from a loose `name -> value` mapping.
    ///
    /// Recognised keys are kept; every other key is returned in the second
    /// element (sorted) so the caller can decide whether to warn or reject.
    /// Non-finite values for recognised keys are treated as absent.
    #[must_use]
    pub fn from_map(map: &HashMap<String, f64>) -> (Self, Vec<String>) {
        let mut traits = Self::default();
        let mut ignored = Vec::new();
        for (key, &value) in map {
            let slot = match key.as_str() {
                "cohesion" => &mut traits.cohesion,
                "escape" => &mut traits.escape,
                "metabolism" => &mut traits.metabolism,
                _ => {
                    ignored.push(key.clone());
                    continue;
                }
            };
            if value.is_finite() {
                *slot = Some(value);
            }
        }
        ignored.sort();
        (traits.sanitized(), ignored)
    }

    /// Clamps set values into their legal ranges: cohesion into `[0, 1]`,
    /// escape and metabolism to non-negative. Non-finite values are dropped.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let clamp = |v: Option<f64>, lo: f64, hi: f64| {
            v.filter(|v| v.is_finite()).map(|v| v.clamp(lo, hi))
        };
        Self {
            cohesion: clamp(self.cohesion, 0.0, 1.0),
            escape: clamp(self.escape, 0.0, f64::MAX),
            metabolism: clamp(self.metabolism, 0.0, f64::MAX),
        }
    }

    /// Flattens the explicitly set traits back into a mapping.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, f64> {
        let mut map = HashMap::new();
        for (key, value) in Self::KEYS
            .iter()
            .zip([self.cohesion, self.escape, self.metabolism])
        {
            if let Some(v) = value {
                map.insert((*key).to_string(), v);
            }
        }
        map
    }
}

/// A single ameba.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    #[serde(default)]
    pub generation: u32,
    pub position: Position,
    pub velocity: Velocity,
    pub size: f64,
    pub energy: f64,
    pub state: LifeState,
    #[serde(default)]
    pub traits: Traits,
    pub dna_layers: Vec<String>,
    pub age: u64,
    /// Wall-clock creation time in milliseconds.
    pub spawned_at: i64,
    /// Informational only; nothing enforces it.
    pub expires_at: i64,
}

impl Organism {
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == LifeState::Normal
    }

    /// Radius within which this organism swallows food.
    #[inline]
    #[must_use]
    pub fn capture_radius(&self, base: f64) -> f64 {
        base + self.size
    }
}

/// A food pellet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub position: Position,
    pub energy: f64,
}

impl Food {
    pub const DEFAULT_ENERGY: f64 = 0.6;

    #[must_use]
    pub fn new(id: Uuid, x: f64, y: f64) -> Self {
        Self {
            id,
            position: Position { x, y },
            energy: Self::DEFAULT_ENERGY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_defaults() {
        let traits = Traits::default();
        assert_eq!(traits.cohesion(), DEFAULT_COHESION);
        assert_eq!(traits.escape(), DEFAULT_ESCAPE);
        assert_eq!(traits.metabolism(), DEFAULT_METABOLISM);
    }

    #[test]
    fn test_traits_from_map_ignores_unknown_keys() {
        let mut map = HashMap::new();
        map.insert("cohesion".to_string(), 0.7);
        map.insert("warmth".to_string(), 1.0);
        map.insert("escape".to_string(), f64::NAN);
        let (traits, ignored) = Traits::from_map(&map);
        assert_eq!(traits.cohesion, Some(0.7));
        assert_eq!(traits.escape, None);
        assert_eq!(ignored, vec!["warmth".to_string()]);
    }

    #[test]
    fn test_traits_from_map_clamps_out_of_range() {
        let map = HashMap::from([
            ("cohesion".to_string(), 3.0),
            ("escape".to_string(), -1.0),
            ("metabolism".to_string(), -5.0),
        ]);
        let (traits, _) = Traits::from_map(&map);
        assert_eq!(traits.cohesion, Some(1.0));
        assert_eq!(traits.escape, Some(0.0));
        assert_eq!(traits.metabolism, Some(0.0));
    }

    #[test]
    fn test_sanitized_drops_non_finite() {
        let traits = Traits {
            cohesion: Some(f64::INFINITY),
            escape: Some(0.4),
            metabolism: Some(f64::NAN),
        }
        .sanitized();
        assert_eq!(traits.cohesion, None);
        assert_eq!(traits.escape, Some(0.4));
        assert_eq!(traits.metabolism, None);
    }

    #[test]
    fn test_traits_serialize_skips_absent() {
        let traits = Traits {
            metabolism: Some(2.0),
            ..Default::default()
        };
        let json = serde_json::to_string(&traits).expect("serialize traits");
        assert_eq!(json, r#"{"metabolism":2.0}"#);
        assert_eq!(traits.to_map().len(), 1);
    }

    #[test]
    fn test_life_state_is_lowercase_on_the_wire() {
        let json = serde_json::to_string(&LifeState::Dead).expect("serialize state");
        assert_eq!(json, "\"dead\"");
    }
}
