//! Snapshot system: queries the ECS world and builds a complete
//! MatchSnapshot. Read-only — it never modifies the world.

use hecs::World;

use holdgrounds_core::components::*;
use holdgrounds_core::config::MatchConfig;
use holdgrounds_core::enums::*;
use holdgrounds_core::events::MatchEvent;
use holdgrounds_core::state::*;
use holdgrounds_core::types::{Position, SimTime};

use crate::engine::EconomyState;
use crate::systems::wave_director::WaveDirector;
use crate::vfx::VfxPool;

#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    config: &MatchConfig,
    time: &SimTime,
    phase: MatchPhase,
    economy: &EconomyState,
    wave: &WaveDirector,
    vfx: &VfxPool,
    events: Vec<MatchEvent>,
) -> MatchSnapshot {
    MatchSnapshot {
        time: *time,
        phase,
        economy: EconomyView {
            gold: economy.gold,
            morale: economy.morale,
            score: economy.score,
            buildings_lost: economy.buildings_lost,
            units_lost: economy.units_lost,
            enemy_buildings_destroyed: economy.enemy_buildings_destroyed,
            enemy_units_destroyed: economy.enemy_units_destroyed,
        },
        wave: WaveView {
            next_wave_in_secs: (wave.next_wave_at_secs - time.elapsed_secs).max(0.0),
            waves_launched: wave.waves_launched,
        },
        objects: build_objects(world, config),
        projectiles: build_projectiles(vfx),
        events,
    }
}

fn build_objects(world: &World, config: &MatchConfig) -> Vec<ObjectView> {
    let mut objects: Vec<ObjectView> = world
        .query::<(
            &ObjectId,
            &Team,
            &Position,
            &LiveState,
            Option<&BuildingState>,
            Option<&Unit>,
            Option<&Flag>,
            Option<&EngagementState>,
        )>()
        .iter()
        .map(|(_, (id, team, pos, live, building, unit, flag, engage))| {
            let (category, name) = describe(config, building, unit, flag);
            ObjectView {
                object_id: *id,
                team: *team,
                category,
                name,
                position: *pos,
                health: live.health,
                max_health: live.max_health,
                engage_mode: engage.map(|e| e.mode),
                action_progress: building.and_then(|b| action_progress(config, b)),
            }
        })
        .collect();

    objects.sort_by_key(|o| o.object_id.0);
    objects
}

fn describe(
    config: &MatchConfig,
    building: Option<&BuildingState>,
    unit: Option<&Unit>,
    flag: Option<&Flag>,
) -> (EntityCategory, String) {
    if flag.is_some() {
        return (EntityCategory::Flag, "Flag".to_string());
    }
    if let Some(unit) = unit {
        let name = config
            .unit_profile(unit.kind)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        return (EntityCategory::Unit, name);
    }
    let name = building
        .and_then(|b| config.building_profile(b.kind))
        .map(|p| p.name.clone())
        .unwrap_or_default();
    (EntityCategory::Building, name)
}

/// Percent complete of the building's running action timer, if any.
fn action_progress(config: &MatchConfig, building: &BuildingState) -> Option<f64> {
    if building.action_timer <= 0.0 {
        return None;
    }
    let profile = config.building_profile(building.kind)?;
    let total = if profile.gold_income > 0 {
        profile.income_interval
    } else {
        let kind = profile.trains?;
        config.unit_profile(kind)?.train_time
    };
    if total <= 0.0 {
        return None;
    }
    Some(((1.0 - building.action_timer / total) * 100.0).clamp(0.0, 100.0))
}

fn build_projectiles(vfx: &VfxPool) -> Vec<ProjectileView> {
    let mut views = Vec::new();
    for effect in 0..vfx.effect_count() {
        if vfx.profile(effect).kind != EffectKind::Projectile {
            continue;
        }
        for slot in vfx.slots(effect) {
            if slot.active {
                views.push(ProjectileView {
                    effect,
                    team: slot.team,
                    position: slot.position,
                });
            }
        }
    }
    views
}
