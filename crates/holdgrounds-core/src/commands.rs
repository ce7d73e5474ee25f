//! Player commands sent from the frontend to the simulation.
//!
//! Commands are validated and queued for processing at the next tick
//! boundary. Rejections (not enough gold, already training) surface as
//! warning events in the snapshot rather than errors.

use serde::{Deserialize, Serialize};

use crate::components::ObjectId;
use crate::enums::BuildingKind;
use crate::types::Position;

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Construction ---
    /// Place a new blue building. Gated on gold; placement position is
    /// trusted (ground validation happens in the frontend).
    PlaceBuilding {
        kind: BuildingKind,
        position: Position,
    },
    /// Start training a unit from the identified building.
    TrainUnit { object_id: ObjectId },

    // --- Match control ---
    /// Start a new match. Ignored while one is running.
    StartMatch,
    /// Pause the simulation.
    Pause,
    /// Resume from pause.
    Resume,
    /// Set time scale (1.0 = normal, 0.0 = frozen). Clamped to 0.0..4.0.
    SetTimeScale { scale: f64 },
}
