//! Core data structures for the Ameba simulation.

pub mod entity;
pub mod event;
