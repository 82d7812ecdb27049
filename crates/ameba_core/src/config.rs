//! Configuration management for simulation parameters.
//!
//! This module provides strongly-typed configuration structures that map to
//! the `config.toml` file. Every constant the tick algorithm uses lives here
//! with its default, so experiments can retune the ecosystem without code
//! changes.
//!
//! ## Configuration Hierarchy
//!
//! 1. Default values (hardcoded in `Default` impls)
//! 2. `config.toml` file (overrides defaults, missing sections keep defaults)
//! 3. The tunables file (`world.config_path`), which only carries
//!    [`Tunables`] and is rewritten at runtime
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 2000.0
//! height = 2000.0
//! initial_population = 20
//! seed = 42
//!
//! [tunables]
//! foodSpawnProb = 0.15
//! reproductionBaseChance = 0.12
//!
//! [policy]
//! consumption = "nearest"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// World-level simulation configuration.
///
/// Width and height are fixed for the lifetime of a world.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f64,
    pub height: f64,
    pub initial_population: usize,
    pub initial_food: usize,
    pub seed: Option<u64>,
    /// Period of the background tick driver.
    pub tick_interval_ms: u64,
    /// Location of the durable tunables file.
    pub config_path: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2000.0,
            height: 2000.0,
            initial_population: 20,
            initial_food: 12,
            seed: None,
            tick_interval_ms: 200,
            config_path: "config/world.json".to_string(),
        }
    }
}

/// The externally tunable, persisted parameters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Tunables {
    pub food_spawn_prob: f64,
    pub reproduction_base_chance: f64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            food_spawn_prob: 0.15,
            reproduction_base_chance: 0.12,
        }
    }
}

impl Tunables {
    pub const FOOD_SPAWN_PROB_KEY: &'static str = "foodSpawnProb";
    pub const REPRODUCTION_BASE_CHANCE_KEY: &'static str = "reproductionBaseChance";

    /// Merges recognised keys from a loose mapping.
    ///
    /// Values are clamped into `[0, 1]`; non-finite values and unknown keys
    /// (including world dimensions) are ignored. Returns the keys that were
    /// applied.
    pub fn apply_map(&mut self, map: &HashMap<String, f64>) -> Vec<&'static str> {
        let mut applied = Vec::new();
        if let Some(v) = map
            .get(Self::FOOD_SPAWN_PROB_KEY)
            .filter(|v| v.is_finite())
        {
            self.food_spawn_prob = v.clamp(0.0, 1.0);
            applied.push(Self::FOOD_SPAWN_PROB_KEY);
        }
        if let Some(v) = map
            .get(Self::REPRODUCTION_BASE_CHANCE_KEY)
            .filter(|v| v.is_finite())
        {
            self.reproduction_base_chance = v.clamp(0.0, 1.0);
            applied.push(Self::REPRODUCTION_BASE_CHANCE_KEY);
        }
        applied
    }

    #[must_use]
    pub fn to_map(&self) -> HashMap<String, f64> {
        HashMap::from([
            (Self::FOOD_SPAWN_PROB_KEY.to_string(), self.food_spawn_prob),
            (
                Self::REPRODUCTION_BASE_CHANCE_KEY.to_string(),
                self.reproduction_base_chance,
            ),
        ])
    }

    /// Stable digest of the values, used to skip redundant writes.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.food_spawn_prob.to_bits().to_le_bytes());
        hasher.update(self.reproduction_base_chance.to_bits().to_le_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.food_spawn_prob),
            "Food spawn probability must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.reproduction_base_chance),
            "Reproduction base chance must be in [0.0, 1.0]"
        );
        Ok(())
    }
}

/// Flocking forces and foraging bias.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SteeringConfig {
    pub social_radius: f64,
    pub escape_radius: f64,
    pub cohesion_scale: f64,
    pub cohesion_gain: f64,
    pub escape_gain: f64,
    pub friction: f64,
    pub forage_threshold: f64,
    pub forage_bias: f64,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            social_radius: 80.0,
            escape_radius: 20.0,
            cohesion_scale: 0.001,
            cohesion_gain: 5.0,
            escape_gain: 0.2,
            friction: 0.92,
            forage_threshold: 0.9,
            forage_bias: 0.02,
        }
    }
}

/// Energy budget and feeding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MetabolismConfig {
    pub base_cost: f64,
    pub speed_cost: f64,
    pub max_energy: f64,
    pub food_energy: f64,
    pub capture_base: f64,
    /// Size gained per unit of food energy eaten.
    pub size_gain: f64,
}

impl Default for MetabolismConfig {
    fn default() -> Self {
        Self {
            base_cost: 0.006,
            speed_cost: 0.001,
            max_energy: 1.6,
            food_energy: 0.6,
            capture_base: 10.0,
            size_gain: 0.1,
        }
    }
}

/// Reproduction and mutation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    pub mutation_rate: f64,
    pub inherited_magnitude: f64,
    pub appended_magnitude: f64,
    pub base_color: String,
    pub trait_jitter: f64,
    pub reproduction_threshold: f64,
    pub reproduction_cost: f64,
    pub offspring_offset: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_rate: 0.02,
            inherited_magnitude: 0.08,
            appended_magnitude: 0.15,
            base_color: "#88c1ff".to_string(),
            trait_jitter: 0.05,
            reproduction_threshold: 1.1,
            reproduction_cost: 0.45,
            offspring_offset: 12.0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    /// Events kept before the oldest are dropped.
    pub event_capacity: usize,
    /// Touch echoes kept for renderers.
    pub touch_capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            event_capacity: 4096,
            touch_capacity: 32,
        }
    }
}

/// Which food an organism eats when several are inside its capture radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsumptionPolicy {
    /// First record in collection order.
    #[default]
    FirstInOrder,
    /// Closest record; ties resolve to collection order.
    Nearest,
}

/// What happens to dead organisms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReapPolicy {
    #[default]
    Retain,
    /// Removed at the end of the tick they died in.
    RemoveDead,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PolicyConfig {
    pub consumption: ConsumptionPolicy,
    pub reap: ReapPolicy,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub tunables: Tunables,
    pub steering: SteeringConfig,
    pub metabolism: MetabolismConfig,
    pub evolution: EvolutionConfig,
    pub history: HistoryConfig,
    pub policy: PolicyConfig,
}

impl AppConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a description
    /// of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.world.width.is_finite() && self.world.width > 0.0,
            "World width must be positive"
        );
        anyhow::ensure!(
            self.world.height.is_finite() && self.world.height > 0.0,
            "World height must be positive"
        );
        anyhow::ensure!(
            self.world.initial_population <= 100_000,
            "Initial population too large (max 100000)"
        );
        anyhow::ensure!(
            self.world.tick_interval_ms > 0,
            "Tick interval must be positive"
        );

        self.tunables.validate()?;

        anyhow::ensure!(
            self.steering.social_radius >= 0.0,
            "Social radius must be non-negative"
        );
        anyhow::ensure!(
            self.steering.escape_radius >= 0.0,
            "Escape radius must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.steering.friction),
            "Friction must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.metabolism.base_cost >= 0.0,
            "Base metabolic cost must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.speed_cost >= 0.0,
            "Speed cost must be non-negative"
        );
        anyhow::ensure!(
            self.metabolism.max_energy > 0.0,
            "Max energy must be positive"
        );
        anyhow::ensure!(
            self.metabolism.food_energy >= 0.0,
            "Food energy must be non-negative"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.mutation_rate),
            "Mutation rate must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.inherited_magnitude)
                && (0.0..=1.0).contains(&self.evolution.appended_magnitude),
            "Mutation magnitudes must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.evolution.reproduction_cost >= 0.0,
            "Reproduction cost must be non-negative"
        );
        anyhow::ensure!(
            self.evolution.reproduction_cost <= self.evolution.reproduction_threshold,
            "Reproduction cost must not exceed the reproduction threshold"
        );
        anyhow::ensure!(
            self.evolution.offspring_offset >= 0.0,
            "Offspring offset must be non-negative"
        );

        anyhow::ensure!(
            self.history.event_capacity > 0,
            "Event capacity must be positive"
        );
        Ok(())
    }

    /// Loads and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path, "No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Cell size for the spatial hash: `clamp(min(w, h) / 50, 24, 200)`.
    #[must_use]
    pub fn spatial_cell_size(&self) -> f64 {
        crate::spatial_hash::cell_size_for(self.world.width, self.world.height)
    }
}
