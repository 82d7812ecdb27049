use crate::model::lifecycle;
use crate::model::snapshot::ConfigSnapshot;
use crate::model::world::World;
use ameba_data::{Event, EventKind, Food, Organism, TouchStimulus, Traits};
use std::collections::HashMap;
use uuid::Uuid;

impl World {
    /// Adds one organism at a uniformly random position.
    ///
    /// Seed traits are clamped into their legal ranges first.
    ///
    /// Counts as a birth, so the population always equals the initial
    /// population plus cumulative births (while dead organisms are retained).
    pub fn spawn(&mut self, seed: Option<Traits>) -> Organism {
        let now = lifecycle::now_ms();
        let position = lifecycle::random_position(self.width, self.height, &mut self.rng);
        let organism = lifecycle::create_organism_with_rng(
            position,
            seed.unwrap_or_default().sanitized(),
            &self.config.evolution.base_color,
            now,
            &mut self.rng,
        );
        self.organisms.push(organism.clone());
        self.events.push(Event::new(
            EventKind::Birth {
                parent: None,
                child: organism.id,
            },
            self.tick,
            now,
        ));
        self.metrics.record_births(1);
        tracing::debug!(id = %organism.id, x = position.x, y = position.y, "Spawned organism");
        organism
    }

    /// Drops a food pellet at `(x, y)`, clamped into the world.
    pub fn spawn_food(&mut self, x: f64, y: f64) -> Food {
        let position = lifecycle::clamp_to_world(x, y, self.width, self.height);
        let food = lifecycle::create_food_with_rng(
            position,
            self.config.metabolism.food_energy,
            &mut self.rng,
        );
        self.food.push(food.clone());
        food
    }

    /// Records an external touch for renderers.
    ///
    /// Touches have no effect on the simulation and do not draw from the
    /// world RNG. Only the most recent `history.touch_capacity` are kept.
    pub fn touch(&mut self, x: f64, y: f64, amplitude: f64, sigma: f64) -> TouchStimulus {
        let stimulus = TouchStimulus {
            id: Uuid::new_v4(),
            x,
            y,
            amplitude,
            sigma,
            created_at: lifecycle::now_ms(),
        };
        let capacity = self.config.history.touch_capacity;
        if capacity > 0 {
            while self.touches.len() >= capacity {
                self.touches.pop_front();
            }
            self.touches.push_back(stimulus.clone());
        }
        stimulus
    }

    /// Merges recognised tunables from `patch`.
    ///
    /// Values are clamped into `[0, 1]`; unknown keys and the world
    /// dimensions are ignored.
    pub fn apply_config(&mut self, patch: &HashMap<String, f64>) -> ConfigSnapshot {
        let applied = self.config.tunables.apply_map(patch);
        let ignored: Vec<&String> = patch
            .keys()
            .filter(|k| !applied.iter().any(|a| *a == k.as_str()))
            .collect();
        tracing::info!(?applied, ?ignored, tunables = ?self.config.tunables, "Applied config");
        self.config_snapshot()
    }

    /// Removes and returns every retained event, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.events.drain()
    }
}
