//! Single-owner actor around a [`World`].
//!
//! One tokio task owns the world. Commands arrive over a bounded channel and
//! run strictly one at a time, interleaved with ticks from a fixed-period
//! interval. After every command or tick the task publishes an immutable
//! [`WorldSnapshot`] through a `watch` channel, so readers never wait on the
//! writer.

use crate::model::snapshot::{ConfigSnapshot, WorldSnapshot};
use crate::model::world::{TickReport, World};
use ameba_data::{Event, Food, Organism, TouchStimulus, Traits};
use ameba_io::{ConfigStore, ConfigWriter};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("world service is closed")]
    Closed,
    #[error("tick panicked: {0}")]
    TickPanicked(String),
}

pub enum Command {
    Spawn {
        seed: Option<Traits>,
        reply: oneshot::Sender<Organism>,
    },
    SpawnFood {
        x: f64,
        y: f64,
        reply: oneshot::Sender<Food>,
    },
    Touch {
        x: f64,
        y: f64,
        amplitude: f64,
        sigma: f64,
        reply: oneshot::Sender<TouchStimulus>,
    },
    ApplyConfig {
        patch: HashMap<String, f64>,
        reply: oneshot::Sender<ConfigSnapshot>,
    },
    DrainEvents {
        reply: oneshot::Sender<Vec<Event>>,
    },
    /// Runs one tick immediately, outside the interval schedule.
    Step {
        reply: oneshot::Sender<Result<TickReport, ServiceError>>,
    },
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub tick_interval: Duration,
    /// Drive ticks from the interval. Disable to advance only via `step`.
    pub auto_tick: bool,
    pub command_capacity: usize,
    /// Where birth- and config-triggered writes of the tunables go.
    pub store: Option<ConfigStore>,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            auto_tick: true,
            command_capacity: 256,
            store: None,
        }
    }
}

impl ServiceOptions {
    /// Options derived from the world's own configuration.
    #[must_use]
    pub fn for_world(world: &World) -> Self {
        Self {
            tick_interval: Duration::from_millis(world.config.world.tick_interval_ms),
            store: Some(ConfigStore::new(&world.config.world.config_path)),
            ..Self::default()
        }
    }
}

/// Cloneable client for a running [`WorldService`].
#[derive(Clone)]
pub struct WorldHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<Arc<WorldSnapshot>>,
}

impl WorldHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ServiceError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| ServiceError::Closed)?;
        rx.await.map_err(|_| ServiceError::Closed)
    }

    pub async fn spawn(&self, seed: Option<Traits>) -> Result<Organism, ServiceError> {
        self.request(|reply| Command::Spawn { seed, reply }).await
    }

    pub async fn spawn_food(&self, x: f64, y: f64) -> Result<Food, ServiceError> {
        self.request(|reply| Command::SpawnFood { x, y, reply }).await
    }

    pub async fn touch(
        &self,
        x: f64,
        y: f64,
        amplitude: f64,
        sigma: f64,
    ) -> Result<TouchStimulus, ServiceError> {
        self.request(|reply| Command::Touch {
            x,
            y,
            amplitude,
            sigma,
            reply,
        })
        .await
    }

    pub async fn apply_config(
        &self,
        patch: HashMap<String, f64>,
    ) -> Result<ConfigSnapshot, ServiceError> {
        self.request(|reply| Command::ApplyConfig { patch, reply })
            .await
    }

    pub async fn drain_events(&self) -> Result<Vec<Event>, ServiceError> {
        self.request(|reply| Command::DrainEvents { reply }).await
    }

    pub async fn step(&self) -> Result<TickReport, ServiceError> {
        self.request(|reply| Command::Step { reply }).await?
    }

    /// Asks the actor to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<(), ServiceError> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| ServiceError::Closed)
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<WorldSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// A receiver that is notified on every publication.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Arc<WorldSnapshot>> {
        self.snapshots.clone()
    }
}

pub struct WorldService {
    handle: WorldHandle,
    task: JoinHandle<World>,
}

impl WorldService {
    /// Moves `world` into a new actor task. Must be called inside a tokio
    /// runtime.
    pub fn spawn(world: World, options: ServiceOptions) -> Self {
        let (tx, rx) = mpsc::channel(options.command_capacity.max(1));
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(world.world_snapshot()));
        let task = tokio::spawn(run(world, rx, snapshot_tx, options));
        Self {
            handle: WorldHandle {
                commands: tx,
                snapshots: snapshot_rx,
            },
            task,
        }
    }

    #[must_use]
    pub fn handle(&self) -> WorldHandle {
        self.handle.clone()
    }

    /// Stops the actor and hands the world back.
    pub async fn stop(self) -> Result<World, ServiceError> {
        // The actor may already be gone; the join result tells.
        let _ = self.handle.shutdown().await;
        self.task.await.map_err(|_| ServiceError::Closed)
    }
}

fn run_tick(world: &mut World) -> Result<TickReport, ServiceError> {
    catch_unwind(AssertUnwindSafe(|| world.step())).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        tracing::error!(tick = world.tick, %message, "Tick panicked; world left at previous state");
        ServiceError::TickPanicked(message)
    })
}

async fn run(
    mut world: World,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<Arc<WorldSnapshot>>,
    options: ServiceOptions,
) -> World {
    let writer = options.store.clone().map(ConfigWriter::spawn);
    let persist = |world: &World| {
        if let Some(writer) = &writer {
            writer.persist(world.config.tunables);
        }
    };

    let mut interval = tokio::time::interval(options.tick_interval.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of a tokio interval fires immediately.
    interval.tick().await;

    tracing::info!(
        interval_ms = options.tick_interval.as_millis() as u64,
        auto_tick = options.auto_tick,
        "World service started"
    );

    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                match command {
                    Command::Spawn { seed, reply } => {
                        let _ = reply.send(world.spawn(seed));
                    }
                    Command::SpawnFood { x, y, reply } => {
                        let _ = reply.send(world.spawn_food(x, y));
                    }
                    Command::Touch { x, y, amplitude, sigma, reply } => {
                        let _ = reply.send(world.touch(x, y, amplitude, sigma));
                    }
                    Command::ApplyConfig { patch, reply } => {
                        let snapshot = world.apply_config(&patch);
                        persist(&world);
                        let _ = reply.send(snapshot);
                    }
                    Command::DrainEvents { reply } => {
                        let _ = reply.send(world.drain_events());
                    }
                    Command::Step { reply } => {
                        let report = run_tick(&mut world);
                        if matches!(report, Ok(r) if r.persist_requested) {
                            persist(&world);
                        }
                        let _ = reply.send(report);
                    }
                    Command::Shutdown => break,
                }
            }
            _ = interval.tick(), if options.auto_tick => {
                if let Ok(report) = run_tick(&mut world) {
                    if report.persist_requested {
                        persist(&world);
                    }
                }
            }
        }
        snapshots.send_replace(Arc::new(world.world_snapshot()));
    }

    if let Some(writer) = writer {
        writer.stop();
    }
    tracing::info!(tick = world.tick, "World service stopped");
    world
}
