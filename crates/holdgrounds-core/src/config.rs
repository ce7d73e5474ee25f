//! Immutable match configuration.
//!
//! Every profile is loaded (or built in) once before the match starts,
//! validated, and then only ever read. Effect ids are checked here so that
//! dispatching an effect at runtime can index the pool without a
//! recoverable-error path.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::*;

/// Configuration loading and validation failures. All fatal at startup —
/// the simulation never starts with a half-valid config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse match config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{referenced_by} references unknown effect id {effect}")]
    UnknownEffect {
        effect: usize,
        referenced_by: String,
    },
    #[error("effect {effect} is a {actual:?} but {referenced_by} needs a Projectile")]
    EffectKindMismatch {
        effect: usize,
        actual: EffectKind,
        referenced_by: String,
    },
    #[error("no unit profile for {0:?}")]
    MissingUnitProfile(UnitKind),
    #[error("no building profile for {0:?}")]
    MissingBuildingProfile(BuildingKind),
    #[error("{field} must be positive in profile '{profile}'")]
    NonPositive { profile: String, field: String },
}

/// Tuning for one trainable unit archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitProfile {
    pub name: String,
    pub kind: UnitKind,
    pub gold_cost: u32,
    pub max_health: f64,
    pub damage: f64,
    pub defense: f64,
    /// Minimum distance to start attacking; also the navigation stop distance.
    pub attack_range: f64,
    /// Seconds between attacks.
    pub attack_rate: f64,
    pub search_radius: f64,
    pub search_interval: f64,
    pub move_speed: f64,
    /// Seconds a building takes to train this unit.
    pub train_time: f64,
    pub style: AttackStyle,
    /// Required when `style` is Ranged.
    pub projectile_effect: Option<usize>,
}

/// Combat tuning for a building that shoots back (towers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerDefense {
    pub damage: f64,
    pub attack_rate: f64,
    pub attack_range: f64,
    pub search_interval: f64,
    pub projectile_effect: usize,
}

/// Tuning for one building archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingProfile {
    pub name: String,
    pub kind: BuildingKind,
    pub gold_cost: u32,
    pub max_health: f64,
    pub defense: f64,
    /// Farm income per payout. Zero for non-farms.
    pub gold_income: u32,
    /// Seconds between farm payouts.
    pub income_interval: f64,
    /// Extra gold per tree found within `tree_search_radius` at placement.
    pub tree_gold_bonus: u32,
    pub tree_search_radius: f64,
    /// Unit this building can train, if any.
    pub trains: Option<UnitKind>,
    /// Present for buildings that attack on their own.
    pub defense_mode: Option<TowerDefense>,
}

/// One entry in the pooled-effect catalog. Indexed by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectProfile {
    pub name: String,
    pub kind: EffectKind,
    /// Projectile flight speed (m/s). Unused for cues.
    pub speed: f64,
    /// Seconds before an undelivered slot deactivates.
    pub ttl: f64,
    /// Projectile hit radius (m). Unused for cues.
    pub hit_radius: f64,
    /// Cue dispatched where a projectile lands.
    pub impact_effect: Option<usize>,
}

/// Red wave scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Grace period before the first wave (seconds).
    pub initial_wait_secs: f64,
    /// Base interval; the n-th gap is `min(base * n, max)`.
    pub wave_timer_secs: f64,
    pub max_wave_timer_secs: f64,
}

/// The complete, immutable match configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// RNG seed for determinism. Same seed + same commands = same match.
    pub seed: u64,
    pub time_scale: f64,
    pub starting_gold: u32,
    pub starting_morale: i32,
    pub flag_health: f64,
    pub wave: WaveConfig,
    pub units: Vec<UnitProfile>,
    pub buildings: Vec<BuildingProfile>,
    pub effects: Vec<EffectProfile>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::default_match()
    }
}

impl MatchConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up the profile for a unit kind.
    pub fn unit_profile(&self, kind: UnitKind) -> Option<&UnitProfile> {
        self.units.iter().find(|u| u.kind == kind)
    }

    /// Look up the profile for a building kind.
    pub fn building_profile(&self, kind: BuildingKind) -> Option<&BuildingProfile> {
        self.buildings.iter().find(|b| b.kind == kind)
    }

    /// Look up an effect id by catalog name.
    pub fn effect_named(&self, name: &str) -> Option<usize> {
        self.effects.iter().position(|e| e.name == name)
    }

    /// Check cross-references and numeric sanity. Called once at load; after
    /// this passes, effect ids index the pool unchecked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for unit in &self.units {
            require_positive(&unit.name, "max_health", unit.max_health)?;
            require_positive(&unit.name, "attack_rate", unit.attack_rate)?;
            require_positive(&unit.name, "attack_range", unit.attack_range)?;
            require_positive(&unit.name, "search_radius", unit.search_radius)?;
            require_positive(&unit.name, "search_interval", unit.search_interval)?;
            require_positive(&unit.name, "move_speed", unit.move_speed)?;
            require_positive(&unit.name, "train_time", unit.train_time)?;
            if unit.style == AttackStyle::Ranged {
                let effect = unit.projectile_effect.ok_or(ConfigError::UnknownEffect {
                    effect: usize::MAX,
                    referenced_by: unit.name.clone(),
                })?;
                self.check_projectile_ref(effect, &unit.name)?;
            }
        }

        for building in &self.buildings {
            require_positive(&building.name, "max_health", building.max_health)?;
            if building.gold_income > 0 {
                require_positive(&building.name, "income_interval", building.income_interval)?;
            }
            if let Some(kind) = building.trains {
                if self.unit_profile(kind).is_none() {
                    return Err(ConfigError::MissingUnitProfile(kind));
                }
            }
            if let Some(defense) = &building.defense_mode {
                require_positive(&building.name, "attack_rate", defense.attack_rate)?;
                require_positive(&building.name, "attack_range", defense.attack_range)?;
                require_positive(&building.name, "search_interval", defense.search_interval)?;
                self.check_projectile_ref(defense.projectile_effect, &building.name)?;
            }
        }

        for effect in &self.effects {
            require_positive(&effect.name, "ttl", effect.ttl)?;
            if let Some(impact) = effect.impact_effect {
                if impact >= self.effects.len() {
                    return Err(ConfigError::UnknownEffect {
                        effect: impact,
                        referenced_by: effect.name.clone(),
                    });
                }
            }
        }

        require_positive("wave", "wave_timer_secs", self.wave.wave_timer_secs)?;
        require_positive("wave", "max_wave_timer_secs", self.wave.max_wave_timer_secs)?;
        require_positive("match", "flag_health", self.flag_health)?;

        Ok(())
    }

    fn check_projectile_ref(&self, effect: usize, referenced_by: &str) -> Result<(), ConfigError> {
        match self.effects.get(effect) {
            None => Err(ConfigError::UnknownEffect {
                effect,
                referenced_by: referenced_by.to_string(),
            }),
            Some(profile) if profile.kind != EffectKind::Projectile => {
                Err(ConfigError::EffectKindMismatch {
                    effect,
                    actual: profile.kind,
                    referenced_by: referenced_by.to_string(),
                })
            }
            Some(_) => Ok(()),
        }
    }

    /// The built-in skirmish setup: three unit lines, four building types,
    /// arrow/fireball projectiles plus impact and death cues.
    pub fn default_match() -> Self {
        let effects = vec![
            EffectProfile {
                name: "arrow".into(),
                kind: EffectKind::Projectile,
                speed: 25.0,
                ttl: 3.0,
                hit_radius: 0.6,
                impact_effect: Some(2),
            },
            EffectProfile {
                name: "fireball".into(),
                kind: EffectKind::Projectile,
                speed: 15.0,
                ttl: 4.0,
                hit_radius: 1.0,
                impact_effect: Some(3),
            },
            EffectProfile {
                name: "arrow-impact".into(),
                kind: EffectKind::Cue,
                speed: 0.0,
                ttl: 1.0,
                hit_radius: 0.0,
                impact_effect: None,
            },
            EffectProfile {
                name: "fire-impact".into(),
                kind: EffectKind::Cue,
                speed: 0.0,
                ttl: 1.5,
                hit_radius: 0.0,
                impact_effect: None,
            },
            EffectProfile {
                name: "death-burst".into(),
                kind: EffectKind::Cue,
                speed: 0.0,
                ttl: 2.0,
                hit_radius: 0.0,
                impact_effect: None,
            },
            EffectProfile {
                name: "build-dust".into(),
                kind: EffectKind::Cue,
                speed: 0.0,
                ttl: 1.0,
                hit_radius: 0.0,
                impact_effect: None,
            },
        ];

        let units = vec![
            UnitProfile {
                name: "Knight".into(),
                kind: UnitKind::Knight,
                gold_cost: 20,
                max_health: 120.0,
                damage: 18.0,
                defense: 6.0,
                attack_range: 2.0,
                attack_rate: 2.0,
                search_radius: 10.0,
                search_interval: 2.0,
                move_speed: 3.5,
                train_time: 5.0,
                style: AttackStyle::Melee,
                projectile_effect: None,
            },
            UnitProfile {
                name: "Archer".into(),
                kind: UnitKind::Archer,
                gold_cost: 25,
                max_health: 80.0,
                damage: 14.0,
                defense: 2.0,
                attack_range: 9.0,
                attack_rate: 2.5,
                search_radius: 12.0,
                search_interval: 2.0,
                move_speed: 3.0,
                train_time: 6.0,
                style: AttackStyle::Ranged,
                projectile_effect: Some(0),
            },
            UnitProfile {
                name: "Mage".into(),
                kind: UnitKind::Mage,
                gold_cost: 40,
                max_health: 60.0,
                damage: 30.0,
                defense: 0.0,
                attack_range: 11.0,
                attack_rate: 4.0,
                search_radius: 14.0,
                search_interval: 2.0,
                move_speed: 2.5,
                train_time: 9.0,
                style: AttackStyle::Ranged,
                projectile_effect: Some(1),
            },
        ];

        let buildings = vec![
            BuildingProfile {
                name: "Farm".into(),
                kind: BuildingKind::Farm,
                gold_cost: 30,
                max_health: 150.0,
                defense: 0.0,
                gold_income: 10,
                income_interval: 8.0,
                tree_gold_bonus: 2,
                tree_search_radius: 8.0,
                trains: None,
                defense_mode: None,
            },
            BuildingProfile {
                name: "Barracks".into(),
                kind: BuildingKind::Barracks,
                gold_cost: 50,
                max_health: 300.0,
                defense: 5.0,
                gold_income: 0,
                income_interval: 0.0,
                tree_gold_bonus: 0,
                tree_search_radius: 0.0,
                trains: Some(UnitKind::Knight),
                defense_mode: None,
            },
            BuildingProfile {
                name: "Defense Tower".into(),
                kind: BuildingKind::DefenseTower,
                gold_cost: 60,
                max_health: 250.0,
                defense: 8.0,
                gold_income: 0,
                income_interval: 0.0,
                tree_gold_bonus: 0,
                tree_search_radius: 0.0,
                trains: Some(UnitKind::Archer),
                defense_mode: Some(TowerDefense {
                    damage: 16.0,
                    attack_rate: 2.0,
                    attack_range: 14.0,
                    search_interval: 2.0,
                    projectile_effect: 0,
                }),
            },
            BuildingProfile {
                name: "Magic Tower".into(),
                kind: BuildingKind::MagicTower,
                gold_cost: 90,
                max_health: 220.0,
                defense: 4.0,
                gold_income: 0,
                income_interval: 0.0,
                tree_gold_bonus: 0,
                tree_search_radius: 0.0,
                trains: Some(UnitKind::Mage),
                defense_mode: Some(TowerDefense {
                    damage: 28.0,
                    attack_rate: 3.5,
                    attack_range: 16.0,
                    search_interval: 2.0,
                    projectile_effect: 1,
                }),
            },
        ];

        Self {
            seed: 42,
            time_scale: 1.0,
            starting_gold: 50,
            starting_morale: 100,
            flag_health: 500.0,
            wave: WaveConfig {
                initial_wait_secs: 30.0,
                wave_timer_secs: 60.0,
                max_wave_timer_secs: 300.0,
            },
            units,
            buildings,
            effects,
        }
    }
}

fn require_positive(profile: &str, field: &str, value: f64) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive {
            profile: profile.to_string(),
            field: field.to_string(),
        })
    }
}
