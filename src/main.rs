use ameba_lib::app::{ServiceOptions, ShutdownManager, WorldService};
use ameba_lib::model::config::AppConfig;
use ameba_lib::model::metrics::{init_logging, render_prometheus};
use ameba_lib::model::world::World;
use anyhow::Result;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mode to run the simulation in
    #[arg(short, long, value_enum, default_value = "headless")]
    mode: Mode,

    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Seed for the world RNG; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks to run in headless mode
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Print Prometheus text instead of JSON when headless
    #[arg(long)]
    prometheus: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum Mode {
    /// Run a fixed number of ticks as fast as possible and print metrics
    Headless,
    /// Drive the world on its tick interval until Ctrl-C
    Service,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging("info");
    let args = Args::parse();

    let mut config = AppConfig::load_or_default(&args.config)?;
    if args.seed.is_some() {
        config.world.seed = args.seed;
    }
    let world = World::load(config)?;

    match args.mode {
        Mode::Headless => run_headless(world, args.ticks, args.prometheus),
        Mode::Service => run_service(world).await,
    }
}

fn run_headless(mut world: World, ticks: u64, prometheus: bool) -> Result<()> {
    tracing::info!(ticks, "Running in headless mode");
    for _ in 0..ticks {
        let report = world.step();
        if report.persist_requested {
            if let Err(e) = world.save_config() {
                tracing::warn!(error = %e, "Failed to persist tunables");
            }
        }
        if world.living_count() == 0 {
            tracing::info!(tick = world.tick, "Population extinct");
            break;
        }
    }
    let metrics = world.metrics_snapshot();
    if prometheus {
        print!("{}", render_prometheus(&metrics));
    } else {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }
    Ok(())
}

async fn run_service(world: World) -> Result<()> {
    let shutdown = ShutdownManager::new();
    shutdown.listen_for_ctrl_c();

    let options = ServiceOptions::for_world(&world);
    let service = WorldService::spawn(world, options);
    let handle = service.handle();
    let mut report = tokio::time::interval(Duration::from_secs(10));
    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            _ = report.tick() => {
                let snapshot = handle.snapshot();
                tracing::info!(
                    tick = snapshot.tick,
                    population = snapshot.metrics.population,
                    living = snapshot.metrics.living,
                    food = snapshot.metrics.food,
                    avg_energy = snapshot.metrics.avg_energy,
                    "Status"
                );
            }
        }
    }

    let world = service.stop().await?;
    shutdown.cleanup(&world);
    Ok(())
}
