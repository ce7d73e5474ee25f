//! Cleanup system: removes entities that are out of bounds or have finished
//! their death linger.

use hecs::{Entity, World};

use holdgrounds_core::components::{LiveState, Unit};
use holdgrounds_core::constants::{DEATH_LINGER_SECS, TICK_RATE, WORLD_HALF_EXTENT};
use holdgrounds_core::types::Position;

/// Remove lingering corpses and strays. Uses a pre-allocated buffer to
/// avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, current_tick: u64) {
    despawn_buffer.clear();

    let linger_ticks = (DEATH_LINGER_SECS * TICK_RATE as f64) as u64;

    // Corpses past the linger window. The window exists so attackers see
    // health <= 0 and clear their target before the entity vanishes.
    for (entity, live) in world.query_mut::<&LiveState>() {
        if let Some(dead_at) = live.dead_since {
            if current_tick.saturating_sub(dead_at) >= linger_ticks {
                despawn_buffer.push(entity);
            }
        }
    }

    // Units that wandered off the map.
    for (entity, (pos, _unit)) in world.query_mut::<(&Position, &Unit)>() {
        if pos.x.abs() > WORLD_HALF_EXTENT || pos.y.abs() > WORLD_HALF_EXTENT {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
