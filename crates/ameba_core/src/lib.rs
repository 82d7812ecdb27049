//! # Ameba Core
//!
//! The simulation engine for the ameba ecosystem: a bounded 2-D world of
//! organisms that flock, forage, reproduce with heritable mutation, and
//! starve.
//!
//! This crate contains the deterministic tick logic, including:
//! - Uniform-grid spatial indexing for neighbour queries
//! - Steering (cohesion and escape), movement and metabolism
//! - Feeding with an explicit consumption policy
//! - Reproduction, trait jitter and colour-layer mutation
//! - A bounded event log, population metrics and structured logging
//!
//! Every stochastic decision draws from a caller-supplied RNG, so a seeded
//! `ChaCha8Rng` reproduces a run exactly.
//!
//! ## Example
//!
//! ```
//! use ameba_core::mutation::mutate_color;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let child = mutate_color("#88c1ff", 0.08, &mut rng);
//! assert_eq!(child.len(), 7);
//! ```

/// Configuration management for simulation parameters
pub mod config;
/// Bounded lifecycle event log
pub mod history;
/// Organism and food creation, death
pub mod lifecycle;
/// Population metrics and logging setup
pub mod metrics;
/// Colour-layer mutation and trait jitter
pub mod mutation;
/// Immutable views handed to readers
pub mod snapshot;
/// Spatial hashing for proximity queries
pub mod spatial_hash;
/// Per-organism tick passes
pub mod systems;

pub use config::{AppConfig, ConsumptionPolicy, ReapPolicy, Tunables};
pub use history::EventLog;
pub use metrics::{init_logging, render_prometheus, Metrics, MetricsSnapshot};
pub use snapshot::{ConfigSnapshot, FoodView, OrganismView, WorldSnapshot};
