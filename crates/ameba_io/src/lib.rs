//! # Ameba IO
//!
//! Persistence layer for the ameba simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - The durable tunables file and its background writer
//! - Validated parsing of seed traits and tunable patches

/// Error types and result aliases for I/O operations
pub mod error;
/// Tunables file load/save
pub mod persistence;
/// Validated JSON helpers and boundary parsers
pub mod serialization;
/// Background writer thread for tunables
pub mod storage;

pub use error::{IoError, Result};
pub use persistence::ConfigStore;
pub use serialization::{parse_traits, parse_tunables_patch, read_json_file, write_json_file};
pub use storage::{ConfigWriter, WriterCommand, WriterStats};
