use crate::model::config::AppConfig;
use crate::model::history::EventLog;
use crate::model::metrics::{Metrics, MetricsSnapshot};
use crate::model::snapshot::{ConfigSnapshot, FoodView, OrganismView, WorldSnapshot};
use crate::model::spatial_hash::SpatialHash;
use ameba_data::{Event, Food, Organism, TouchStimulus};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

pub mod commands;
pub mod init;
pub mod update;

pub use update::TickReport;

/// The simulated world.
///
/// Owns every organism, food item and event exclusively; accessors hand out
/// copies. Width and height never change after construction.
pub struct World {
    pub width: f64,
    pub height: f64,
    pub tick: u64,
    pub organisms: Vec<Organism>,
    pub food: Vec<Food>,
    pub config: AppConfig,
    pub events: EventLog,
    pub touches: VecDeque<TouchStimulus>,
    pub metrics: Metrics,
    pub rng: ChaCha8Rng,
    pub spatial_hash: SpatialHash,
    neighbor_buffer: Vec<usize>,
    position_buffer: Vec<(f64, f64)>,
}

impl World {
    #[must_use]
    pub fn snapshot_organisms(&self) -> Vec<Organism> {
        self.organisms.clone()
    }

    #[must_use]
    pub fn foods_snapshot(&self) -> Vec<Food> {
        self.food.clone()
    }

    /// Retained events, oldest first. Does not consume them.
    #[must_use]
    pub fn events_snapshot(&self) -> Vec<Event> {
        self.events.snapshot()
    }

    #[must_use]
    pub fn recent_touches(&self) -> Vec<TouchStimulus> {
        self.touches.iter().cloned().collect()
    }

    #[must_use]
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot::collect(self.tick, &self.organisms, self.food.len(), &self.metrics)
    }

    #[must_use]
    pub fn config_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            tunables: self.config.tunables,
            world_width: self.width,
            world_height: self.height,
        }
    }

    /// Everything a renderer needs, as one immutable value.
    #[must_use]
    pub fn world_snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            organisms: self.organisms.iter().map(OrganismView::from).collect(),
            food: self.food.iter().map(FoodView::from).collect(),
            metrics: self.metrics_snapshot(),
            config: self.config_snapshot(),
        }
    }

    #[must_use]
    pub fn living_count(&self) -> usize {
        self.organisms.iter().filter(|o| o.is_alive()).count()
    }
}
