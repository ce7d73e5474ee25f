//! Red wave director.
//!
//! Replaces an opponent player: on a growing timer, every living red
//! building that can train is ordered to start. The gap between waves is
//! `min(base * wave_number, max)`, so pressure ramps early and plateaus.

use hecs::World;
use tracing::info;

use holdgrounds_core::components::{BuildingState, LiveState};
use holdgrounds_core::config::{MatchConfig, WaveConfig};
use holdgrounds_core::enums::Team;
use holdgrounds_core::events::MatchEvent;

/// Wave schedule state, owned by the engine and reset per match.
#[derive(Debug, Clone, Default)]
pub struct WaveDirector {
    /// Elapsed-seconds mark at which the next wave launches.
    pub next_wave_at_secs: f64,
    pub waves_launched: u32,
}

impl WaveDirector {
    pub fn new(wave: &WaveConfig) -> Self {
        Self {
            next_wave_at_secs: wave.initial_wait_secs,
            waves_launched: 0,
        }
    }
}

pub fn run(
    world: &mut World,
    director: &mut WaveDirector,
    config: &MatchConfig,
    elapsed_secs: f64,
    events: &mut Vec<MatchEvent>,
) {
    if elapsed_secs < director.next_wave_at_secs {
        return;
    }

    director.waves_launched += 1;
    let interval = (config.wave.wave_timer_secs * director.waves_launched as f64)
        .min(config.wave.max_wave_timer_secs);
    director.next_wave_at_secs += interval;

    let mut ordered = 0u32;
    for (_entity, (team, building, live)) in
        world.query_mut::<(&Team, &mut BuildingState, &LiveState)>()
    {
        if *team != Team::Red || live.is_dead() || building.action_timer > 0.0 {
            continue;
        }
        let Some(kind) = config
            .building_profile(building.kind)
            .and_then(|p| p.trains)
        else {
            continue;
        };
        let Some(profile) = config.unit_profile(kind) else {
            continue;
        };
        building.action_timer = profile.train_time;
        ordered += 1;
    }

    info!(
        wave = director.waves_launched,
        ordered, next_in = interval, "wave launched"
    );
    events.push(MatchEvent::WaveLaunched {
        wave_number: director.waves_launched,
        next_interval_secs: interval,
    });
}
