//! Population metrics and structured logging.
//!
//! [`Metrics`] holds the cumulative counters a world updates while it ticks;
//! [`MetricsSnapshot`] is the copy handed to readers, and
//! [`render_prometheus`] turns it into the text exposition format.

use ameba_data::Organism;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Cumulative counters for one world.
#[derive(Debug)]
pub struct Metrics {
    tick_count: AtomicU64,
    births: AtomicU64,
    deaths: AtomicU64,
    population: AtomicU64,
    food_count: AtomicU64,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Metrics {
    fn clone(&self) -> Self {
        Self {
            tick_count: AtomicU64::new(self.tick_count()),
            births: AtomicU64::new(self.births()),
            deaths: AtomicU64::new(self.deaths()),
            population: AtomicU64::new(self.population.load(Ordering::Relaxed)),
            food_count: AtomicU64::new(self.food_count.load(Ordering::Relaxed)),
            start_time: self.start_time,
        }
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            births: AtomicU64::new(0),
            deaths: AtomicU64::new(0),
            population: AtomicU64::new(0),
            food_count: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_births(&self, n: u64) {
        self.births.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_deaths(&self, n: u64) {
        self.deaths.fetch_add(n, Ordering::Relaxed);
    }

    /// Records a completed tick with its duration.
    pub fn record_tick(&self, duration: Duration, population: usize, food: usize) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        self.population.store(population as u64, Ordering::Relaxed);
        self.food_count.store(food as u64, Ordering::Relaxed);

        let tick = self.tick_count.load(Ordering::Relaxed);
        if tick.is_multiple_of(1000) {
            tracing::info!(
                tick,
                population,
                food,
                births = self.births(),
                deaths = self.deaths(),
                duration_ms = duration.as_millis() as u64,
                "Simulation tick"
            );
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn births(&self) -> u64 {
        self.births.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn deaths(&self) -> u64 {
        self.deaths.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Point-in-time view of a world's population.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub tick: u64,
    /// Every retained organism, dead ones included.
    pub population: usize,
    pub living: usize,
    pub food: usize,
    /// Mean energy over `population`; zero for an empty world.
    pub avg_energy: f64,
    pub births: u64,
    pub deaths: u64,
}

impl MetricsSnapshot {
    #[must_use]
    pub fn collect(tick: u64, organisms: &[Organism], food: usize, metrics: &Metrics) -> Self {
        let population = organisms.len();
        let living = organisms.iter().filter(|o| o.is_alive()).count();
        let avg_energy = if population == 0 {
            0.0
        } else {
            organisms.iter().map(|o| o.energy).sum::<f64>() / population as f64
        };
        Self {
            tick,
            population,
            living,
            food,
            avg_energy,
            births: metrics.births(),
            deaths: metrics.deaths(),
        }
    }
}

/// Renders `snapshot` in the Prometheus text exposition format.
#[must_use]
pub fn render_prometheus(snapshot: &MetricsSnapshot) -> String {
    let mut out = String::new();
    let mut metric = |name: &str, help: &str, kind: &str, value: String| {
        let _ = writeln!(out, "# HELP {name} {help}");
        let _ = writeln!(out, "# TYPE {name} {kind}");
        let _ = writeln!(out, "{name} {value}");
    };
    metric(
        "ameba_population",
        "Current population",
        "gauge",
        snapshot.population.to_string(),
    );
    metric(
        "ameba_living",
        "Living organisms",
        "gauge",
        snapshot.living.to_string(),
    );
    metric(
        "ameba_food",
        "Food items in the world",
        "gauge",
        snapshot.food.to_string(),
    );
    metric(
        "ameba_avg_energy",
        "Average organism energy",
        "gauge",
        format!("{:.6}", snapshot.avg_energy),
    );
    metric(
        "ameba_births",
        "Total births",
        "counter",
        snapshot.births.to_string(),
    );
    metric(
        "ameba_deaths",
        "Total deaths",
        "counter",
        snapshot.deaths.to_string(),
    );
    metric("ameba_tick", "Current tick", "gauge", snapshot.tick.to_string());
    out
}

/// Initializes the global tracing subscriber.
///
/// Honours `RUST_LOG`, falling back to `default_filter`. Safe to call more
/// than once; later calls are no-ops.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .ok();
}
