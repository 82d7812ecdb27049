//! Per-organism passes of a world tick, in the order the world runs them:
//! steering, integration, metabolism, foraging and feeding, reproduction.

pub mod action;
pub mod biological;
pub mod ecological;
pub mod reproduction;
pub mod steering;
