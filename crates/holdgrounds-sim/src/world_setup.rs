//! Entity spawn factories for setting up the match world.
//!
//! Creates flags, starting buildings, trees and trained units with
//! appropriate component bundles.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use holdgrounds_core::components::*;
use holdgrounds_core::config::MatchConfig;
use holdgrounds_core::constants::*;
use holdgrounds_core::enums::*;
use holdgrounds_core::types::Position;

/// Flag position for a team. Blue holds the south end, red the north.
pub fn flag_position(team: Team) -> Position {
    match team {
        Team::Blue => Position::new(0.0, -BASE_DISTANCE, 0.0),
        Team::Red => Position::new(0.0, BASE_DISTANCE, 0.0),
    }
}

/// Set up the initial match world: both flags, red's starting base and the
/// midfield trees. Blue builds everything else itself.
pub fn setup_match(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    config: &MatchConfig,
    next_object_id: &mut u32,
) {
    spawn_flag(world, next_object_id, Team::Blue, config.flag_health);
    spawn_flag(world, next_object_id, Team::Red, config.flag_health);

    // Red starts with a full production base clustered around its flag.
    for (kind, dx) in [
        (BuildingKind::Barracks, -8.0),
        (BuildingKind::DefenseTower, 0.0),
        (BuildingKind::MagicTower, 8.0),
    ] {
        let position = Position::new(dx, BASE_DISTANCE - 6.0, 0.0);
        spawn_building(world, config, next_object_id, Team::Red, kind, position);
    }

    for _ in 0..TREE_COUNT {
        let x = rng.gen_range(-WORLD_HALF_EXTENT * 0.4..WORLD_HALF_EXTENT * 0.4);
        let y = rng.gen_range(-BASE_DISTANCE * 0.6..BASE_DISTANCE * 0.6);
        world.spawn((Tree, Position::new(x, y, 0.0)));
    }
}

fn spawn_flag(world: &mut World, next_object_id: &mut u32, team: Team, health: f64) -> hecs::Entity {
    let id = ObjectId(*next_object_id);
    *next_object_id += 1;
    world.spawn((
        Flag,
        id,
        team,
        flag_position(team),
        LiveState::new(health, 0.0),
    ))
}

/// Spawn a building of the given kind. The profile must exist (validated at
/// config load). Farms count nearby trees for their income bonus here, at
/// placement, never again.
pub fn spawn_building(
    world: &mut World,
    config: &MatchConfig,
    next_object_id: &mut u32,
    team: Team,
    kind: BuildingKind,
    position: Position,
) -> hecs::Entity {
    let profile = config
        .building_profile(kind)
        .expect("building profiles validated at load");

    let tree_gold_bonus = if profile.gold_income > 0 {
        let nearby = count_trees_near(world, &position, profile.tree_search_radius);
        profile.tree_gold_bonus * nearby
    } else {
        0
    };

    // Farms start their income countdown immediately.
    let action_timer = if profile.gold_income > 0 {
        profile.income_interval
    } else {
        0.0
    };

    let id = ObjectId(*next_object_id);
    *next_object_id += 1;

    let entity = world.spawn((
        id,
        team,
        position,
        LiveState::new(profile.max_health, profile.defense),
        BuildingState {
            kind,
            action_timer,
            tree_gold_bonus,
        },
    ));

    // Towers fight: give them the combat bundle, but no NavAgent.
    if let Some(defense) = &profile.defense_mode {
        let combat = CombatProfile {
            damage: defense.damage,
            attack_rate: defense.attack_rate,
            attack_range: defense.attack_range,
            search_radius: defense.attack_range,
            search_interval: defense.search_interval,
            style: AttackStyle::Ranged,
            projectile_effect: Some(defense.projectile_effect),
        };
        world
            .insert(entity, (combat, EngagementState::default()))
            .expect("entity just spawned");
    }

    entity
}

fn count_trees_near(world: &World, position: &Position, radius: f64) -> u32 {
    world
        .query::<(&Tree, &Position)>()
        .iter()
        .filter(|(_, (_, tree_pos))| position.horizontal_distance_to(tree_pos) <= radius)
        .count() as u32
}

/// Spawn a freshly trained unit just outside its building, already marching
/// on the enemy flag.
pub fn spawn_unit(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    config: &MatchConfig,
    next_object_id: &mut u32,
    team: Team,
    kind: UnitKind,
    building_position: &Position,
) -> hecs::Entity {
    let profile = config
        .unit_profile(kind)
        .expect("unit profiles validated at load");

    // Step out toward the enemy side, fanned by jitter so simultaneous
    // spawns don't stack.
    let forward = match team {
        Team::Blue => UNIT_SPAWN_OFFSET,
        Team::Red => -UNIT_SPAWN_OFFSET,
    };
    let jitter = rng.gen_range(-UNIT_SPAWN_JITTER..UNIT_SPAWN_JITTER);
    let position = Position::new(
        building_position.x + jitter,
        building_position.y + forward,
        0.0,
    );

    let objective = flag_position(team.opponent());

    let id = ObjectId(*next_object_id);
    *next_object_id += 1;

    world.spawn((
        id,
        team,
        Unit { kind },
        position,
        LiveState::new(profile.max_health, profile.defense),
        CombatProfile {
            damage: profile.damage,
            attack_rate: profile.attack_rate,
            attack_range: profile.attack_range,
            search_radius: profile.search_radius,
            search_interval: profile.search_interval,
            style: profile.style,
            projectile_effect: profile.projectile_effect,
        },
        EngagementState::default(),
        NavAgent {
            destination: Some(objective),
            speed: profile.move_speed,
            stop_distance: OBJECTIVE_STOP_DISTANCE,
            objective,
            last_progress_speed: 0.0,
        },
    ))
}
