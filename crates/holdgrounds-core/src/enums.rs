//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// The two opposing factions. Blue is the player side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    #[default]
    Blue,
    Red,
}

impl Team {
    /// The opposing team — the only valid target filter.
    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

/// Match phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No match running yet.
    #[default]
    NotStarted,
    /// Simulation advancing.
    Playing,
    /// Frozen; commands other than Resume are still queued.
    Paused,
    /// Blue destroyed the red flag (or red morale collapsed).
    BlueWon,
    /// Red destroyed the blue flag or blue morale reached zero.
    RedWon,
}

/// Building archetypes, matching the construction menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    /// Generates gold on an income timer; bonus per nearby tree.
    Farm,
    /// Trains melee units.
    Barracks,
    /// Ranged defensive tower; also trains archers.
    DefenseTower,
    /// Magic tower; stronger, slower projectile, trains mages.
    MagicTower,
}

/// Unit archetypes that buildings can train.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Knight,
    Archer,
    Mage,
}

/// How an entity delivers its attack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackStyle {
    /// Damage is applied directly on the attack swing.
    #[default]
    Melee,
    /// A pooled projectile is dispatched; damage applies on projectile hit.
    Ranged,
}

/// Engagement controller state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngageMode {
    /// Waiting for the search timer; moving toward the main objective.
    #[default]
    Idle,
    /// Running a nearest-enemy acquisition this tick.
    Seeking,
    /// Target acquired, closing to attack range (mobile entities only).
    Moving,
    /// Within range, attack timer running.
    InCombat,
}

/// Coarse category of a destroyable entity, used for scoring and morale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityCategory {
    Building,
    Unit,
    Flag,
}

/// What a pooled effect slot does when dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Fire-and-forget particle/sound cue; expires on its own.
    Cue,
    /// Moving projectile carrying a team and damage payload.
    Projectile,
}
