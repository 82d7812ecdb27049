//! # Ameba
//!
//! A tick-stepped ecosystem of amebas: organisms flock, forage, reproduce
//! with heritable colour mutation, and starve inside a bounded 2-D world.
//!
//! - [`model::world::World`] owns the state and advances it one tick at a time.
//! - [`app::service`] wraps a world in a single-owner tokio actor with a
//!   fixed-period tick driver and published snapshots.
//!
//! ## Example
//!
//! ```
//! use ameba_lib::model::config::AppConfig;
//! use ameba_lib::model::world::World;
//!
//! let mut config = AppConfig::default();
//! config.world.seed = Some(7);
//! let mut world = World::new(config).expect("valid config");
//! let report = world.step();
//! assert_eq!(report.tick, 1);
//! ```

pub mod app;
pub mod model;
