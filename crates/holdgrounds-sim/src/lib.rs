//! Simulation engine for Hold the Grounds.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces MatchSnapshots for the frontend.

pub mod engine;
pub mod systems;
pub mod vfx;
pub mod world_setup;

pub use engine::MatchEngine;
pub use holdgrounds_core as core;

#[cfg(test)]
mod tests;
