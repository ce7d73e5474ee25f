//! Engagement system: runs the per-fighter FSM and applies its actions.
//!
//! Every live entity with a combat bundle is evaluated once per tick. The
//! FSM itself is pure (holdgrounds-engage); this system gathers each
//! fighter's situation from the world, resolves searches against the world,
//! and applies the resulting transitions: destinations, target slots, melee
//! swings and projectile dispatches.

use hecs::{Entity, World};
use tracing::debug;

use holdgrounds_core::components::*;
use holdgrounds_core::constants::DT;
use holdgrounds_core::enums::{AttackStyle, EngageMode, Team};
use holdgrounds_core::events::MatchEvent;
use holdgrounds_core::types::Position;
use holdgrounds_engage::fsm::{self, EngageAction, EngageContext, TargetInfo};

use crate::systems::damage::DamageInstance;
use crate::vfx::VfxPool;

/// Snapshot of one fighter taken before evaluation, so the FSM can run
/// without holding world borrows.
struct FighterRow {
    entity: Entity,
    object_id: ObjectId,
    team: Team,
    position: Position,
    mode: EngageMode,
    target: Option<Entity>,
    style: AttackStyle,
    damage: f64,
    attack_rate: f64,
    attack_range: f64,
    search_radius: f64,
    search_interval: f64,
    projectile_effect: Option<usize>,
    attack_cooldown: f64,
    search_cooldown: f64,
    stall_secs: f64,
    committed: bool,
    progress_speed: f64,
    mobile: bool,
}

/// A potential target: anything with health on a team. Trees are scenery
/// and never appear here.
struct Candidate {
    entity: Entity,
    object_id: ObjectId,
    team: Team,
    position: Position,
    dead: bool,
}

pub fn run(
    world: &mut World,
    vfx: &mut VfxPool,
    damage_queue: &mut Vec<DamageInstance>,
    events: &mut Vec<MatchEvent>,
) {
    let fighters = collect_fighters(world);
    let candidates = collect_candidates(world);

    for row in fighters {
        let target_info = row.target.and_then(|t| resolve_target(world, t));

        let ctx = EngageContext {
            mode: row.mode,
            position: row.position,
            target: target_info,
            style: row.style,
            attack_rate: row.attack_rate,
            attack_range: row.attack_range,
            search_interval: row.search_interval,
            attack_cooldown: row.attack_cooldown,
            search_cooldown: row.search_cooldown,
            stall_secs: row.stall_secs,
            committed: row.committed,
            progress_speed: row.progress_speed,
            mobile: row.mobile,
            dt: DT,
        };
        let update = fsm::evaluate(&ctx);

        let mut new_mode = update.mode;
        let mut new_target = row.target;

        match update.action {
            EngageAction::None => {}
            EngageAction::Search => {
                if let Some(found) = nearest_enemy(&candidates, &row) {
                    debug!(
                        fighter = row.object_id.0,
                        target = found.object_id.0,
                        "acquired target"
                    );
                    new_target = Some(found.entity);
                    new_mode = EngageMode::Seeking;
                }
            }
            EngageAction::SetDestination(dest) => {
                set_destination(world, row.entity, dest);
            }
            EngageAction::ClearTarget => {
                new_target = None;
                resume_objective(world, row.entity);
            }
            EngageAction::Fire => {
                fire(world, vfx, damage_queue, events, &row);
            }
        }

        if let Ok(mut state) = world.get::<&mut EngagementState>(row.entity) {
            state.mode = new_mode;
            state.target = new_target;
            state.attack_cooldown = update.attack_cooldown;
            state.search_cooldown = update.search_cooldown;
            state.stall_secs = update.stall_secs;
            state.committed = update.committed;
        }
    }
}

fn collect_fighters(world: &mut World) -> Vec<FighterRow> {
    world
        .query_mut::<(
            &ObjectId,
            &Team,
            &Position,
            &LiveState,
            &CombatProfile,
            &EngagementState,
            Option<&NavAgent>,
        )>()
        .into_iter()
        .filter(|(_, (_, _, _, live, _, _, _))| !live.is_dead())
        .map(
            |(entity, (id, team, pos, _live, profile, state, nav))| FighterRow {
                entity,
                object_id: *id,
                team: *team,
                position: *pos,
                mode: state.mode,
                target: state.target,
                style: profile.style,
                damage: profile.damage,
                attack_rate: profile.attack_rate,
                attack_range: profile.attack_range,
                search_radius: profile.search_radius,
                search_interval: profile.search_interval,
                projectile_effect: profile.projectile_effect,
                attack_cooldown: state.attack_cooldown,
                search_cooldown: state.search_cooldown,
                stall_secs: state.stall_secs,
                committed: state.committed,
                progress_speed: nav.map_or(0.0, |n| n.last_progress_speed),
                mobile: nav.is_some(),
            },
        )
        .collect()
}

fn collect_candidates(world: &mut World) -> Vec<Candidate> {
    world
        .query_mut::<(&ObjectId, &Team, &Position, &LiveState)>()
        .into_iter()
        .map(|(entity, (id, team, pos, live))| Candidate {
            entity,
            object_id: *id,
            team: *team,
            position: *pos,
            dead: live.is_dead(),
        })
        .collect()
}

fn resolve_target(world: &World, target: Entity) -> Option<TargetInfo> {
    let position = world.get::<&Position>(target).ok()?;
    let alive = world
        .get::<&LiveState>(target)
        .map(|live| !live.is_dead())
        .unwrap_or(false);
    Some(TargetInfo {
        position: *position,
        alive,
    })
}

/// Nearest live enemy within search radius. Ties on distance break by the
/// lower object id, which keeps acquisition deterministic across runs.
fn nearest_enemy<'a>(candidates: &'a [Candidate], row: &FighterRow) -> Option<&'a Candidate> {
    let mut best: Option<(f64, &Candidate)> = None;
    for candidate in candidates {
        if candidate.team == row.team || candidate.dead {
            continue;
        }
        let distance = row.position.horizontal_distance_to(&candidate.position);
        if distance > row.search_radius {
            continue;
        }
        let closer = match best {
            None => true,
            Some((best_distance, best_candidate)) => {
                distance < best_distance
                    || (distance == best_distance
                        && candidate.object_id.0 < best_candidate.object_id.0)
            }
        };
        if closer {
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, candidate)| candidate)
}

fn set_destination(world: &mut World, entity: Entity, dest: Position) {
    if let Ok(mut nav) = world.get::<&mut NavAgent>(entity) {
        nav.destination = Some(dest);
    }
}

/// Back to marching on the flag.
fn resume_objective(world: &mut World, entity: Entity) {
    if let Ok(mut nav) = world.get::<&mut NavAgent>(entity) {
        nav.destination = Some(nav.objective);
    }
}

fn fire(
    world: &World,
    vfx: &mut VfxPool,
    damage_queue: &mut Vec<DamageInstance>,
    events: &mut Vec<MatchEvent>,
    row: &FighterRow,
) {
    let Some(target) = row.target else {
        return;
    };

    match row.style {
        AttackStyle::Melee => {
            damage_queue.push(DamageInstance {
                victim: target,
                amount: row.damage,
            });
            events.push(MatchEvent::AttackSwing {
                attacker: row.object_id,
            });
        }
        AttackStyle::Ranged => {
            // Validated at config load for every ranged profile.
            let Some(effect) = row.projectile_effect else {
                return;
            };
            let dest = world
                .get::<&Position>(target)
                .map(|p| *p)
                .unwrap_or(row.position);
            vfx.dispatch_projectile(effect, row.team, row.position, dest, target, row.damage);
            events.push(MatchEvent::ProjectileLaunched {
                effect,
                team: row.team,
            });
        }
    }
}
