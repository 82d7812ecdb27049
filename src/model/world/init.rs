use crate::model::config::AppConfig;
use crate::model::history::EventLog;
use crate::model::lifecycle;
use crate::model::metrics::Metrics;
use crate::model::spatial_hash::SpatialHash;
use crate::model::world::World;
use ameba_data::Traits;
use ameba_io::ConfigStore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

impl World {
    /// Builds a world from `config` alone; nothing is read from disk.
    ///
    /// The initial population and food are placed uniformly at random. They
    /// are not counted as births.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let mut rng = if let Some(seed) = config.world.seed {
            ChaCha8Rng::seed_from_u64(seed)
        } else {
            ChaCha8Rng::from_entropy()
        };
        let (width, height) = (config.world.width, config.world.height);
        let now = lifecycle::now_ms();

        let mut organisms = Vec::with_capacity(config.world.initial_population);
        for _ in 0..config.world.initial_population {
            let position = lifecycle::random_position(width, height, &mut rng);
            organisms.push(lifecycle::create_organism_with_rng(
                position,
                Traits::default(),
                &config.evolution.base_color,
                now,
                &mut rng,
            ));
        }
        let mut food = Vec::with_capacity(config.world.initial_food);
        for _ in 0..config.world.initial_food {
            let position = lifecycle::random_position(width, height, &mut rng);
            food.push(lifecycle::create_food_with_rng(
                position,
                config.metabolism.food_energy,
                &mut rng,
            ));
        }

        tracing::info!(
            width,
            height,
            population = organisms.len(),
            food = food.len(),
            seed = ?config.world.seed,
            "World created"
        );

        Ok(Self {
            width,
            height,
            tick: 0,
            organisms,
            food,
            events: EventLog::with_capacity(config.history.event_capacity),
            touches: VecDeque::with_capacity(config.history.touch_capacity),
            metrics: Metrics::new(),
            spatial_hash: SpatialHash::new(config.spatial_cell_size(), width, height),
            rng,
            config,
            neighbor_buffer: Vec::new(),
            position_buffer: Vec::new(),
        })
    }

    /// Like [`World::new`], but first overlays the tunables stored at
    /// `config.world.config_path` onto the configured ones.
    ///
    /// Keys the file omits keep their configured values. A missing or
    /// unreadable file leaves the configured tunables in place.
    pub fn load(mut config: AppConfig) -> anyhow::Result<Self> {
        ConfigStore::new(&config.world.config_path).overlay(&mut config.tunables);
        Self::new(config)
    }

    /// Writes the current tunables to `config.world.config_path`.
    pub fn save_config(&self) -> ameba_io::Result<()> {
        ConfigStore::new(&self.config.world.config_path).save(&self.config.tunables)
    }
}
