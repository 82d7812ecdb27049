//! # Ameba Data
//!
//! Plain data records shared by the engine, the persistence layer and any
//! state reader: organisms, food, traits and lifecycle events.

pub mod data;

pub use data::entity::{
    Food, LifeState, Organism, Position, Traits, Velocity, DEFAULT_COHESION, DEFAULT_ESCAPE,
    DEFAULT_METABOLISM,
};
pub use data::event::{Event, EventKind, TouchStimulus};
