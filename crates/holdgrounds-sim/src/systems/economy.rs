//! Farm income system.
//!
//! Blue farms pay out on a fixed interval; each payout is the base income
//! plus the tree bonus counted once at placement. Red runs no economy — its
//! production is driven by the wave director.

use hecs::World;

use holdgrounds_core::components::{BuildingState, LiveState, ObjectId};
use holdgrounds_core::config::MatchConfig;
use holdgrounds_core::constants::DT;
use holdgrounds_core::enums::Team;
use holdgrounds_core::events::MatchEvent;

use crate::engine::EconomyState;

pub fn run(
    world: &mut World,
    config: &MatchConfig,
    economy: &mut EconomyState,
    events: &mut Vec<MatchEvent>,
) {
    for (_entity, (id, team, building, live)) in
        world.query_mut::<(&ObjectId, &Team, &mut BuildingState, &LiveState)>()
    {
        if *team != Team::Blue || live.is_dead() {
            continue;
        }
        let Some(profile) = config.building_profile(building.kind) else {
            continue;
        };
        if profile.gold_income == 0 {
            continue;
        }

        building.action_timer -= DT;
        if building.action_timer > 0.0 {
            continue;
        }
        building.action_timer = profile.income_interval;

        let amount = profile.gold_income + building.tree_gold_bonus;
        economy.gold += amount as i64;
        events.push(MatchEvent::GoldIncome {
            object_id: *id,
            amount,
        });
    }
}
