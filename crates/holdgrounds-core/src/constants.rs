//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- World bounds ---

/// Half-extent of the playable square, in meters. Entities beyond this
/// are removed by the cleanup system.
pub const WORLD_HALF_EXTENT: f64 = 200.0;

// --- Engagement ---

/// Speed below which a mobile unit counts as making no progress (m/s).
pub const MIN_PROGRESS_SPEED: f64 = 0.25;

/// Continuous seconds below MIN_PROGRESS_SPEED, while out of attack range,
/// before the destination is re-issued to the target's current position.
pub const STALL_REISSUE_SECS: f64 = 1.0;

/// How close a unit navigates to its main objective before stopping (m).
pub const OBJECTIVE_STOP_DISTANCE: f64 = 2.0;

// --- Death handling ---

/// Seconds a destroyed entity lingers before despawn, so attackers observe
/// health <= 0 and clear their target while the frontend plays the death
/// animation.
pub const DEATH_LINGER_SECS: f64 = 2.0;

// --- Effects / projectiles ---

/// Slots pre-allocated per effect id. Must exceed the maximum number of
/// concurrently live instances of one effect or the round-robin reuse will
/// cut an effect short.
pub const VFX_POOL_SIZE: usize = 16;

// --- Economy ---

/// Morale lost when an allied building is destroyed.
pub const MORALE_LOSS_PER_BUILDING: i32 = 1;

/// Score awarded for destroying an enemy building.
pub const SCORE_PER_BUILDING: u32 = 50;

/// Score awarded for destroying an enemy unit.
pub const SCORE_PER_UNIT: u32 = 10;

// --- World layout ---

/// Distance from the centerline to each team's flag (m). Blue sits at
/// negative y, red at positive y.
pub const BASE_DISTANCE: f64 = 80.0;

/// Trees scattered across the midfield at match start.
pub const TREE_COUNT: usize = 12;

// --- Spawning ---

/// Units spawn this far south (blue) or north (red) of their building (m).
pub const UNIT_SPAWN_OFFSET: f64 = 2.0;

/// Random jitter applied to unit spawn positions so stacked spawns fan out (m).
pub const UNIT_SPAWN_JITTER: f64 = 0.75;
