//! Match state snapshot — the complete visible state sent to the frontend
//! each tick.

use serde::{Deserialize, Serialize};

use crate::components::ObjectId;
use crate::enums::*;
use crate::events::MatchEvent;
use crate::types::{Position, SimTime};

/// Complete match state broadcast to the frontend after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub phase: MatchPhase,
    pub economy: EconomyView,
    pub wave: WaveView,
    pub objects: Vec<ObjectView>,
    /// Live projectiles for rendering.
    pub projectiles: Vec<ProjectileView>,
    /// Events emitted since the previous snapshot.
    pub events: Vec<MatchEvent>,
}

/// One visible entity (building, unit or flag).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectView {
    pub object_id: ObjectId,
    pub team: Team,
    pub category: EntityCategory,
    /// Profile name ("Knight", "Farm", ...). Flags report "Flag".
    pub name: String,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    /// Engagement state for entities that fight.
    pub engage_mode: Option<EngageMode>,
    /// Action timer progress in percent (training or farm income), if a
    /// timer is running. Drives the building tooltip.
    pub action_progress: Option<f64>,
}

/// A pooled projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub effect: usize,
    pub team: Team,
    pub position: Position,
}

/// Player-side resources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomyView {
    pub gold: i64,
    pub morale: i32,
    pub score: u32,
    pub buildings_lost: u32,
    pub units_lost: u32,
    pub enemy_buildings_destroyed: u32,
    pub enemy_units_destroyed: u32,
}

/// Red wave schedule status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    /// Seconds until the next wave order.
    pub next_wave_in_secs: f64,
    pub waves_launched: u32,
}
