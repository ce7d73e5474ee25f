//! Unit training system.
//!
//! Counts down the training timer on producing buildings and spawns the
//! finished unit next to its building. Timers are started elsewhere: by the
//! TrainUnit command for blue, by the wave director for red.

use hecs::World;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use holdgrounds_core::components::{BuildingState, LiveState, ObjectId};
use holdgrounds_core::config::MatchConfig;
use holdgrounds_core::constants::DT;
use holdgrounds_core::enums::{Team, UnitKind};
use holdgrounds_core::events::MatchEvent;
use holdgrounds_core::types::Position;

use crate::world_setup;

pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    config: &MatchConfig,
    next_object_id: &mut u32,
    events: &mut Vec<MatchEvent>,
) {
    // Collect finished trainings first; spawning borrows the world mutably.
    let mut completed: Vec<(ObjectId, Team, UnitKind, Position)> = Vec::new();

    for (_entity, (id, team, building, live, pos)) in
        world.query_mut::<(&ObjectId, &Team, &mut BuildingState, &LiveState, &Position)>()
    {
        if live.is_dead() || building.action_timer <= 0.0 {
            continue;
        }
        let Some(kind) = config
            .building_profile(building.kind)
            .and_then(|p| p.trains)
        else {
            continue;
        };

        building.action_timer -= DT;
        if building.action_timer <= 0.0 {
            building.action_timer = 0.0;
            completed.push((*id, *team, kind, *pos));
        }
    }

    for (building_id, team, kind, position) in completed {
        let entity = world_setup::spawn_unit(world, rng, config, next_object_id, team, kind, &position);
        if let Ok(unit_id) = world.get::<&ObjectId>(entity) {
            debug!(building = building_id.0, unit = unit_id.0, ?kind, "trained");
            events.push(MatchEvent::UnitTrained {
                object_id: *unit_id,
                kind,
                team,
            });
        }
    }
}
