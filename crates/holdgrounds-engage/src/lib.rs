//! Engagement decision logic for combat-capable entities.
//!
//! Pure functions over plain data — no ECS access. The simulation crate
//! feeds each fighter's situation in and applies the resulting transitions
//! and actions against the world.

pub mod fsm;
