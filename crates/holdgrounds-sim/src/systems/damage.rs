//! Damage resolution system.
//!
//! All damage in the simulation flows through one queue drained here, so
//! this system is the only writer of entity health. Deaths are detected in
//! the same pass: scoring, morale and the death cue all happen at the
//! moment health first reaches zero.

use hecs::{Entity, World};
use tracing::info;

use holdgrounds_core::components::*;
use holdgrounds_core::constants::*;
use holdgrounds_core::enums::{EntityCategory, Team};
use holdgrounds_core::events::MatchEvent;
use holdgrounds_core::types::Position;

use crate::engine::EconomyState;
use crate::vfx::VfxPool;

/// One pending hit. Queued by melee swings, projectile arrivals, and
/// nothing else.
#[derive(Debug, Clone, Copy)]
pub struct DamageInstance {
    pub victim: Entity,
    pub amount: f64,
}

pub fn run(
    world: &mut World,
    damage_queue: &mut Vec<DamageInstance>,
    economy: &mut EconomyState,
    vfx: &mut VfxPool,
    death_effect: Option<usize>,
    events: &mut Vec<MatchEvent>,
    current_tick: u64,
) {
    for hit in damage_queue.drain(..) {
        let Ok(mut live) = world.get::<&mut LiveState>(hit.victim) else {
            continue;
        };
        // Already dead: terminal state, further hits are no-ops.
        if live.is_dead() {
            continue;
        }

        // Defense folds in as a distance from the raw amount. A defense
        // higher than the hit still hurts; the difference comes back as
        // positive damage.
        let net = (hit.amount - live.defense).abs();
        live.health -= net;

        if live.health > 0.0 {
            continue;
        }
        live.health = 0.0;
        live.dead_since = Some(current_tick);
        drop(live);

        on_death(world, hit.victim, economy, vfx, death_effect, events);
    }
}

fn on_death(
    world: &World,
    victim: Entity,
    economy: &mut EconomyState,
    vfx: &mut VfxPool,
    death_effect: Option<usize>,
    events: &mut Vec<MatchEvent>,
) {
    let Ok(id) = world.get::<&ObjectId>(victim) else {
        return;
    };
    let Ok(team) = world.get::<&Team>(victim) else {
        return;
    };
    let category = categorize(world, victim);

    info!(object = id.0, ?category, team = ?*team, "destroyed");

    match (*team, category) {
        (Team::Blue, EntityCategory::Building) => {
            economy.buildings_lost += 1;
            economy.morale -= MORALE_LOSS_PER_BUILDING;
        }
        (Team::Blue, EntityCategory::Unit) => {
            economy.units_lost += 1;
        }
        (Team::Red, EntityCategory::Building) => {
            economy.enemy_buildings_destroyed += 1;
            economy.score += SCORE_PER_BUILDING;
        }
        (Team::Red, EntityCategory::Unit) => {
            economy.enemy_units_destroyed += 1;
            economy.score += SCORE_PER_UNIT;
        }
        // Flag deaths end the match; the engine notices via phase check.
        (_, EntityCategory::Flag) => {}
    }

    if let (Some(effect), Ok(position)) = (death_effect, world.get::<&Position>(victim)) {
        vfx.dispatch_cue(effect, *position);
    }

    events.push(MatchEvent::Destroyed {
        object_id: *id,
        team: *team,
        category,
    });
}

pub fn categorize(world: &World, entity: Entity) -> EntityCategory {
    if world.get::<&Flag>(entity).is_ok() {
        EntityCategory::Flag
    } else if world.get::<&Unit>(entity).is_ok() {
        EntityCategory::Unit
    } else {
        EntityCategory::Building
    }
}
