use crate::model::config::ReapPolicy;
use crate::model::lifecycle;
use crate::model::systems::{action, biological, ecological, reproduction, steering};
use crate::model::world::World;
use ameba_data::{Event, EventKind, Organism};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// What one call to [`World::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    /// The tick counter after the step.
    pub tick: u64,
    pub events_appended: usize,
    pub births: u64,
    pub deaths: u64,
    /// The tunables should be written to durable storage.
    pub persist_requested: bool,
}

impl World {
    /// Advances the world by one tick.
    ///
    /// Organisms, food and the random generator are updated on working
    /// copies that replace the live state only once the whole tick has run,
    /// so a tick that unwinds part-way leaves the world as it was. Organisms are processed
    /// from a snapshot taken at the start; offspring born this tick first
    /// move on the next one.
    pub fn step(&mut self) -> TickReport {
        let start = Instant::now();
        let tick = self.tick;
        let now = lifecycle::now_ms();
        let (width, height) = (self.width, self.height);

        let snapshot: Vec<Organism> = self.organisms.clone();
        let mut organisms = snapshot.clone();
        let mut food = self.food.clone();
        let mut rng = self.rng.clone();
        let mut events: Vec<Event> = Vec::new();
        let (mut births, mut deaths) = (0u64, 0u64);

        self.position_buffer.clear();
        self.position_buffer
            .extend(snapshot.iter().map(|o| (o.position.x, o.position.y)));
        self.spatial_hash.build(&self.position_buffer);

        let config = &self.config;
        let steering_ctx = steering::SteeringContext {
            config: &config.steering,
            snapshot: &snapshot,
            spatial: &self.spatial_hash,
        };
        let reproduction_ctx = reproduction::ReproductionContext {
            config: &config.evolution,
            base_chance: config.tunables.reproduction_base_chance,
            width,
            height,
            now,
        };

        for (idx, before) in snapshot.iter().enumerate() {
            if !before.is_alive() {
                continue;
            }
            let organism = &mut organisms[idx];

            steering::steer(idx, organism, &steering_ctx, &mut self.neighbor_buffer);
            action::integrate(organism, config.steering.friction, width, height);

            if biological::metabolize(organism, &config.metabolism) {
                events.push(Event::new(
                    EventKind::Evolve {
                        organism: organism.id,
                    },
                    tick,
                    now,
                ));
                deaths += 1;
                continue;
            }

            ecological::forage(organism, &food, &config.steering);

            let Some(food_idx) = ecological::select_food(
                organism,
                &food,
                config.metabolism.capture_base,
                config.policy.consumption,
            ) else {
                continue;
            };
            let eaten = food.remove(food_idx);
            ecological::consume(organism, &eaten, &config.metabolism);
            events.push(Event::new(
                EventKind::FoodConsumed {
                    organism: organism.id,
                    food: eaten.id,
                },
                tick,
                now,
            ));

            let parent_id = organism.id;
            let Some(offspring) =
                reproduction::try_reproduce(organism, &reproduction_ctx, &mut rng)
            else {
                continue;
            };
            let child = offspring.child;
            events.push(Event::new(
                EventKind::Birth {
                    parent: Some(parent_id),
                    child: child.id,
                },
                tick,
                now,
            ));
            if offspring.mutated {
                events.push(
                    Event::new(EventKind::Mutation { organism: child.id }, tick, now)
                        .with_detail(child.dna_layers.join(",")),
                );
            }
            births += 1;
            organisms.push(child);
        }

        if let Some(pellet) = ecological::maybe_spawn_food(
            config.tunables.food_spawn_prob,
            width,
            height,
            config.metabolism.food_energy,
            &mut rng,
        ) {
            food.push(pellet);
        }

        if config.policy.reap == ReapPolicy::RemoveDead {
            organisms.retain(Organism::is_alive);
        }

        // Commit.
        let events_appended = events.len();
        self.organisms = organisms;
        self.food = food;
        self.rng = rng;
        self.events.extend(events);
        self.tick += 1;
        self.metrics.record_births(births);
        self.metrics.record_deaths(deaths);
        self.metrics
            .record_tick(start.elapsed(), self.organisms.len(), self.food.len());

        tracing::trace!(
            tick = self.tick,
            population = self.organisms.len(),
            food = self.food.len(),
            births,
            deaths,
            "Tick complete"
        );

        TickReport {
            tick: self.tick,
            events_appended,
            births,
            deaths,
            persist_requested: births > 0,
        }
    }
}
