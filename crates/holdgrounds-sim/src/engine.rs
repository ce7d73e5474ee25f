//! Match engine — the core of the game.
//!
//! `MatchEngine` owns the hecs ECS world, processes player commands, runs
//! all systems, and produces `MatchSnapshot`s. Completely headless, which
//! is what makes same-seed determinism testable.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use holdgrounds_core::commands::PlayerCommand;
use holdgrounds_core::components::{BuildingState, LiveState, ObjectId};
use holdgrounds_core::config::MatchConfig;
use holdgrounds_core::enums::{BuildingKind, MatchPhase, Team};
use holdgrounds_core::events::MatchEvent;
use holdgrounds_core::state::MatchSnapshot;
use holdgrounds_core::types::{Position, SimTime};

use crate::systems;
use crate::systems::damage::DamageInstance;
use crate::systems::wave_director::WaveDirector;
use crate::vfx::VfxPool;
use crate::world_setup;

/// Blue's resources and running score for one match.
#[derive(Debug, Clone, Default)]
pub struct EconomyState {
    pub gold: i64,
    pub morale: i32,
    pub score: u32,
    pub buildings_lost: u32,
    pub units_lost: u32,
    pub enemy_buildings_destroyed: u32,
    pub enemy_units_destroyed: u32,
}

/// The match engine. Owns the ECS world and all sim state.
pub struct MatchEngine {
    world: World,
    config: MatchConfig,
    time: SimTime,
    phase: MatchPhase,
    time_scale: f64,
    rng: ChaCha8Rng,
    next_object_id: u32,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    damage_queue: Vec<DamageInstance>,
    events: Vec<MatchEvent>,
    economy: EconomyState,
    wave: WaveDirector,
    vfx: VfxPool,
    // Cue ids resolved from the catalog once, at construction.
    death_effect: Option<usize>,
    build_effect: Option<usize>,
}

impl MatchEngine {
    /// Create a new engine from a validated config.
    pub fn new(config: MatchConfig) -> Self {
        let death_effect = config.effect_named("death-burst");
        let build_effect = config.effect_named("build-dust");
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: MatchPhase::default(),
            time_scale: config.time_scale,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            next_object_id: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            damage_queue: Vec::new(),
            events: Vec::new(),
            economy: EconomyState::default(),
            wave: WaveDirector::new(&config.wave),
            vfx: VfxPool::new(&config.effects),
            death_effect,
            build_effect,
            config,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> MatchSnapshot {
        self.process_commands();

        if self.phase == MatchPhase::Playing {
            self.run_systems();
            self.time.advance();
            self.check_match_over();
        }

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.config,
            &self.time,
            self.phase,
            &self.economy,
            &self.wave,
            &self.vfx,
            events,
        )
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Inject a hit directly (for tests exercising death handling).
    #[cfg(test)]
    pub fn queue_damage(&mut self, victim: hecs::Entity, amount: f64) {
        self.damage_queue.push(DamageInstance { victim, amount });
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartMatch => {
                if matches!(
                    self.phase,
                    MatchPhase::NotStarted | MatchPhase::BlueWon | MatchPhase::RedWon
                ) {
                    self.reset_match();
                    self.phase = MatchPhase::Playing;
                    info!(seed = self.config.seed, "match started");
                }
            }
            PlayerCommand::Pause => {
                if self.phase == MatchPhase::Playing {
                    self.phase = MatchPhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == MatchPhase::Paused {
                    self.phase = MatchPhase::Playing;
                }
            }
            PlayerCommand::SetTimeScale { scale } => {
                self.time_scale = scale.clamp(0.0, 4.0);
            }
            PlayerCommand::PlaceBuilding { kind, position } => {
                self.place_building(kind, position);
            }
            PlayerCommand::TrainUnit { object_id } => {
                self.start_training(object_id);
            }
        }
    }

    fn reset_match(&mut self) {
        self.world = World::new();
        self.time = SimTime::default();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.next_object_id = 0;
        self.damage_queue.clear();
        self.despawn_buffer.clear();
        self.events.clear();
        self.economy = EconomyState {
            gold: self.config.starting_gold as i64,
            morale: self.config.starting_morale,
            ..EconomyState::default()
        };
        self.wave = WaveDirector::new(&self.config.wave);
        self.vfx = VfxPool::new(&self.config.effects);
        world_setup::setup_match(
            &mut self.world,
            &mut self.rng,
            &self.config,
            &mut self.next_object_id,
        );
    }

    fn place_building(&mut self, kind: BuildingKind, position: Position) {
        if self.phase != MatchPhase::Playing {
            return;
        }
        let Some(profile) = self.config.building_profile(kind) else {
            return;
        };
        let cost = profile.gold_cost as i64;
        if self.economy.gold < cost {
            self.events.push(MatchEvent::Warning {
                message: "Not enough gold!".to_string(),
            });
            return;
        }
        self.economy.gold -= cost;

        let entity = world_setup::spawn_building(
            &mut self.world,
            &self.config,
            &mut self.next_object_id,
            Team::Blue,
            kind,
            position,
        );
        if let Some(effect) = self.build_effect {
            self.vfx.dispatch_cue(effect, position);
        }
        if let Ok(id) = self.world.get::<&ObjectId>(entity) {
            self.events.push(MatchEvent::BuildingPlaced {
                object_id: *id,
                kind,
                team: Team::Blue,
            });
        }
    }

    fn start_training(&mut self, object_id: ObjectId) {
        if self.phase != MatchPhase::Playing {
            return;
        }

        // Find the blue building, check it can train and is idle.
        let mut request: Option<(hecs::Entity, f64, u32)> = None;
        for (entity, (id, team, building, live)) in self
            .world
            .query::<(&ObjectId, &Team, &BuildingState, &LiveState)>()
            .iter()
        {
            if *id != object_id || *team != Team::Blue || live.is_dead() {
                continue;
            }
            if building.action_timer > 0.0 {
                self.events.push(MatchEvent::Warning {
                    message: "Already training!".to_string(),
                });
                return;
            }
            let Some(profile) = self
                .config
                .building_profile(building.kind)
                .filter(|p| p.trains.is_some())
            else {
                return;
            };
            let Some(unit) = profile.trains.and_then(|k| self.config.unit_profile(k)) else {
                return;
            };
            request = Some((entity, unit.train_time, unit.gold_cost));
            break;
        }

        let Some((entity, train_time, gold_cost)) = request else {
            warn!(object = object_id.0, "train order for unknown building");
            return;
        };
        if self.economy.gold < gold_cost as i64 {
            self.events.push(MatchEvent::Warning {
                message: "Not enough gold!".to_string(),
            });
            return;
        }
        self.economy.gold -= gold_cost as i64;
        if let Ok(mut building) = self.world.get::<&mut BuildingState>(entity) {
            building.action_timer = train_time;
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Red wave orders
        systems::wave_director::run(
            &mut self.world,
            &mut self.wave,
            &self.config,
            self.time.elapsed_secs,
            &mut self.events,
        );
        // 2. Training countdowns + unit spawns
        systems::training::run(
            &mut self.world,
            &mut self.rng,
            &self.config,
            &mut self.next_object_id,
            &mut self.events,
        );
        // 3. Farm income
        systems::economy::run(
            &mut self.world,
            &self.config,
            &mut self.economy,
            &mut self.events,
        );
        // 4. Engagement (FSM, target acquisition, swings and dispatches)
        systems::engagement::run(
            &mut self.world,
            &mut self.vfx,
            &mut self.damage_queue,
            &mut self.events,
        );
        // 5. Navigation integration
        systems::movement::run(&mut self.world);
        // 6. Projectile flight + cue lifetimes
        systems::projectiles::run(
            &self.world,
            &mut self.vfx,
            &mut self.damage_queue,
            &mut self.events,
        );
        // 7. Damage resolution (single writer of health)
        systems::damage::run(
            &mut self.world,
            &mut self.damage_queue,
            &mut self.economy,
            &mut self.vfx,
            self.death_effect,
            &mut self.events,
            self.time.tick,
        );
        // 8. Corpse + out-of-bounds cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, self.time.tick);
    }

    /// A match ends when a flag falls or blue's morale collapses.
    fn check_match_over(&mut self) {
        use holdgrounds_core::components::Flag;

        let mut winner: Option<Team> = None;
        for (_entity, (_flag, team, live)) in
            self.world.query::<(&Flag, &Team, &LiveState)>().iter()
        {
            if live.is_dead() {
                winner = Some(team.opponent());
            }
        }
        if winner.is_none() && self.economy.morale <= 0 {
            winner = Some(Team::Red);
        }

        if let Some(winner) = winner {
            self.phase = match winner {
                Team::Blue => MatchPhase::BlueWon,
                Team::Red => MatchPhase::RedWon,
            };
            info!(?winner, tick = self.time.tick, "match over");
            self.events.push(MatchEvent::MatchOver { winner });
        }
    }
}
