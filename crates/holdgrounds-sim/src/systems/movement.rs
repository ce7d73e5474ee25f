//! Navigation integration system.
//!
//! Steps every live NavAgent toward its current destination and records the
//! distance actually covered, which feeds the engagement anti-stall check.

use hecs::World;

use holdgrounds_core::components::{LiveState, NavAgent};
use holdgrounds_core::constants::DT;
use holdgrounds_core::types::Position;

/// Move all live agents toward their destinations.
pub fn run(world: &mut World) {
    for (_entity, (pos, nav, live)) in world.query_mut::<(&mut Position, &mut NavAgent, &LiveState)>()
    {
        if live.is_dead() {
            nav.last_progress_speed = 0.0;
            continue;
        }

        let Some(dest) = nav.destination else {
            nav.last_progress_speed = 0.0;
            continue;
        };

        let distance = pos.horizontal_distance_to(&dest);
        if distance <= nav.stop_distance {
            nav.destination = None;
            nav.last_progress_speed = 0.0;
            continue;
        }

        let step = (nav.speed * DT).min(distance);
        let dx = (dest.x - pos.x) / distance;
        let dy = (dest.y - pos.y) / distance;
        pos.x += dx * step;
        pos.y += dy * step;
        nav.last_progress_speed = step / DT;
    }
}
