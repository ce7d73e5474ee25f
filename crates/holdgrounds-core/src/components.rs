//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic.
//! Logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Position;

/// Stable per-entity identifier, assigned on spawn and exposed in snapshots
/// and commands. Also the deterministic nearest-target tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Health, defense and the terminal-state guard shared by every destroyable
/// entity (buildings, units, flags).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveState {
    pub health: f64,
    pub max_health: f64,
    /// Flat defense folded into incoming damage.
    pub defense: f64,
    /// Tick at which health reached zero, if it has. Once set, the entity is
    /// terminal: further damage is ignored and cleanup will despawn it after
    /// the linger window.
    pub dead_since: Option<u64>,
}

impl LiveState {
    pub fn new(max_health: f64, defense: f64) -> Self {
        Self {
            health: max_health,
            max_health,
            defense,
            dead_since: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Immutable combat tuning copied out of the matching profile at spawn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatProfile {
    pub damage: f64,
    /// Seconds between attacks.
    pub attack_rate: f64,
    pub attack_range: f64,
    pub search_radius: f64,
    /// Seconds between nearest-enemy searches while idle.
    pub search_interval: f64,
    pub style: AttackStyle,
    /// Effect id dispatched on ranged attacks. Validated at config load.
    pub projectile_effect: Option<usize>,
}

/// Mutable engagement controller state. Owned exclusively by its entity and
/// reset on spawn.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngagementState {
    pub mode: EngageMode,
    /// Current target. `None` is the normal "no enemy nearby" case, never an
    /// error. Resolved against the world each tick; a despawned or dead
    /// target clears back to Seeking.
    #[serde(skip)]
    pub target: Option<hecs::Entity>,
    pub attack_cooldown: f64,
    pub search_cooldown: f64,
    /// Continuous seconds below the progress threshold while out of range.
    pub stall_secs: f64,
    /// Ranged commitment: set on the first shot; while set, the range check
    /// is skipped until the target is cleared.
    pub committed: bool,
}

/// Navigation state for mobile units. Buildings have no NavAgent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavAgent {
    /// Current steering destination, if any.
    pub destination: Option<Position>,
    pub speed: f64,
    /// Distance at which the agent stops short of its destination.
    pub stop_distance: f64,
    /// The main objective (the enemy flag). Engagement temporarily overrides
    /// the destination; clearing a target resumes this.
    pub objective: Position,
    /// Distance actually covered last tick divided by dt. Feeds the
    /// anti-stall check.
    pub last_progress_speed: f64,
}

/// Building-specific state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingState {
    pub kind: BuildingKind,
    /// Multi-purpose action timer: income countdown for farms, training
    /// countdown for unit-producing buildings (0 = idle).
    pub action_timer: f64,
    /// Flat gold added to each income tick, from trees counted at placement.
    pub tree_gold_bonus: u32,
}

/// Marks an entity as a mobile unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Unit {
    pub kind: UnitKind,
}

/// Marks an entity as a team's flag — the match-ending objective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Flag;

/// Marks an entity as a tree; counted for farm income bonuses, never targeted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tree;
