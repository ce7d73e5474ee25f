//! ECS systems that operate on the match world each tick.
//!
//! Systems are free functions over `&mut World` plus whatever engine state
//! they need. They do not own state — state lives in components or on the
//! engine.

pub mod cleanup;
pub mod damage;
pub mod economy;
pub mod engagement;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod training;
pub mod wave_director;
