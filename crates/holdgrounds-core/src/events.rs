//! Events emitted by the simulation for the frontend's audio, VFX and UI
//! layers. All fire-and-forget: the simulation never waits on a consumer.

use serde::{Deserialize, Serialize};

use crate::components::ObjectId;
use crate::enums::*;

/// One tick's worth of these is drained into every snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    /// A building finished placement.
    BuildingPlaced {
        object_id: ObjectId,
        kind: BuildingKind,
        team: Team,
    },
    /// A building finished training a unit.
    UnitTrained {
        object_id: ObjectId,
        kind: UnitKind,
        team: Team,
    },
    /// The wave director ordered a red attack wave.
    WaveLaunched {
        wave_number: u32,
        /// Seconds until the next wave.
        next_interval_secs: f64,
    },
    /// A melee attack landed (drives the swing animation cue).
    AttackSwing { attacker: ObjectId },
    /// A pooled projectile was dispatched.
    ProjectileLaunched { effect: usize, team: Team },
    /// A projectile connected with an enemy.
    ProjectileHit { victim: ObjectId },
    /// A farm paid out.
    GoldIncome { object_id: ObjectId, amount: u32 },
    /// An entity's health reached zero. Emitted exactly once per entity.
    Destroyed {
        object_id: ObjectId,
        team: Team,
        category: EntityCategory,
    },
    /// Informational player-facing warning ("Not enough gold!").
    Warning { message: String },
    /// The match ended.
    MatchOver { winner: Team },
}
