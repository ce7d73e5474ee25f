//! Engagement finite state machine.
//!
//! Pure functions that compute mode transitions, attack timing and movement
//! intent for a single fighter based on its current situation. No ECS
//! dependency — operates on plain data.

use holdgrounds_core::constants::*;
use holdgrounds_core::enums::{AttackStyle, EngageMode};
use holdgrounds_core::types::Position;

/// What the FSM knows about the current target, if any.
#[derive(Debug, Clone, Copy)]
pub struct TargetInfo {
    pub position: Position,
    pub alive: bool,
}

/// Input to the engagement FSM for a single fighter.
pub struct EngageContext {
    pub mode: EngageMode,
    pub position: Position,
    pub target: Option<TargetInfo>,
    pub style: AttackStyle,
    pub attack_rate: f64,
    pub attack_range: f64,
    pub search_interval: f64,
    pub attack_cooldown: f64,
    pub search_cooldown: f64,
    pub stall_secs: f64,
    pub committed: bool,
    /// Distance actually covered this tick divided by dt. Stationary
    /// fighters (buildings) report 0 but are never `mobile`.
    pub progress_speed: f64,
    pub mobile: bool,
    pub dt: f64,
}

/// Side effect the simulation must apply after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngageAction {
    None,
    /// Run a nearest-enemy search this tick.
    Search,
    /// Steer toward the given point.
    SetDestination(Position),
    /// Attack the current target (swing or projectile dispatch).
    Fire,
    /// Forget the current target and resume the main objective.
    ClearTarget,
}

/// Output from the engagement FSM.
pub struct EngageUpdate {
    pub mode: EngageMode,
    pub attack_cooldown: f64,
    pub search_cooldown: f64,
    pub stall_secs: f64,
    pub committed: bool,
    pub action: EngageAction,
}

impl EngageUpdate {
    fn unchanged(ctx: &EngageContext) -> Self {
        Self {
            mode: ctx.mode,
            attack_cooldown: ctx.attack_cooldown,
            search_cooldown: ctx.search_cooldown,
            stall_secs: ctx.stall_secs,
            committed: ctx.committed,
            action: EngageAction::None,
        }
    }
}

/// Evaluate the FSM for one fighter. Returns the updated engagement state
/// and at most one action for the simulation to apply.
pub fn evaluate(ctx: &EngageContext) -> EngageUpdate {
    match ctx.mode {
        EngageMode::Idle => evaluate_idle(ctx),
        EngageMode::Seeking => evaluate_seeking(ctx),
        EngageMode::Moving => evaluate_moving(ctx),
        EngageMode::InCombat => evaluate_in_combat(ctx),
    }
}

fn range_to(ctx: &EngageContext, target: &TargetInfo) -> f64 {
    ctx.position.horizontal_distance_to(&target.position)
}

fn evaluate_idle(ctx: &EngageContext) -> EngageUpdate {
    let mut update = EngageUpdate::unchanged(ctx);
    update.search_cooldown = ctx.search_cooldown - ctx.dt;
    if update.search_cooldown <= 0.0 {
        update.search_cooldown = ctx.search_interval;
        update.action = EngageAction::Search;
    }
    update
}

/// Seeking means a search found an enemy and the target slot is filled; the
/// fighter decides here how to close.
fn evaluate_seeking(ctx: &EngageContext) -> EngageUpdate {
    let mut update = EngageUpdate::unchanged(ctx);

    let Some(target) = ctx.target.filter(|t| t.alive) else {
        update.mode = EngageMode::Idle;
        update.action = EngageAction::ClearTarget;
        return update;
    };

    if range_to(ctx, &target) <= ctx.attack_range {
        update.mode = EngageMode::InCombat;
        // First swing waits a full attack period.
        update.attack_cooldown = ctx.attack_rate;
        return update;
    }

    if ctx.mobile {
        update.mode = EngageMode::Moving;
        update.stall_secs = 0.0;
        update.action = EngageAction::SetDestination(target.position);
    } else {
        // Stationary fighter, target out of reach: forget it.
        update.mode = EngageMode::Idle;
        update.action = EngageAction::ClearTarget;
    }
    update
}

fn evaluate_moving(ctx: &EngageContext) -> EngageUpdate {
    let mut update = EngageUpdate::unchanged(ctx);

    let Some(target) = ctx.target.filter(|t| t.alive) else {
        update.mode = EngageMode::Idle;
        update.stall_secs = 0.0;
        update.action = EngageAction::ClearTarget;
        return update;
    };

    if range_to(ctx, &target) <= ctx.attack_range {
        update.mode = EngageMode::InCombat;
        update.attack_cooldown = ctx.attack_rate;
        update.stall_secs = 0.0;
        return update;
    }

    // Anti-stall: blocked fighters get their chase destination re-issued
    // so pathing recovers instead of grinding against an obstacle forever.
    if ctx.progress_speed < MIN_PROGRESS_SPEED {
        update.stall_secs = ctx.stall_secs + ctx.dt;
        if update.stall_secs > STALL_REISSUE_SECS {
            update.stall_secs = 0.0;
            update.action = EngageAction::SetDestination(target.position);
        }
    } else {
        update.stall_secs = 0.0;
        // Keep chasing the target's live position.
        update.action = EngageAction::SetDestination(target.position);
    }
    update
}

/// A live target that slips out of reach is chased (back to `Moving` with
/// the same target), not dropped for a fresh search. Fighters only give up
/// a target when it dies or, for stationary ones, when it leaves reach.
fn evaluate_in_combat(ctx: &EngageContext) -> EngageUpdate {
    let mut update = EngageUpdate::unchanged(ctx);

    let Some(target) = ctx.target.filter(|t| t.alive) else {
        // Target died: immediately look for the next enemy rather than
        // resuming the objective first.
        update.mode = EngageMode::Seeking;
        update.committed = false;
        update.action = EngageAction::ClearTarget;
        return update;
    };

    // A ranged fighter that has opened fire stays locked on regardless of
    // range; only melee (and ranged pre-commitment) re-checks reach.
    let locked = ctx.style == AttackStyle::Ranged && ctx.committed;
    if !locked && range_to(ctx, &target) > ctx.attack_range {
        update.committed = false;
        if ctx.mobile {
            update.mode = EngageMode::Moving;
            update.stall_secs = 0.0;
            update.action = EngageAction::SetDestination(target.position);
        } else {
            update.mode = EngageMode::Idle;
            update.action = EngageAction::ClearTarget;
        }
        return update;
    }

    update.attack_cooldown = ctx.attack_cooldown - ctx.dt;
    if update.attack_cooldown <= 0.0 {
        update.attack_cooldown = ctx.attack_rate;
        if ctx.style == AttackStyle::Ranged {
            update.committed = true;
        }
        update.action = EngageAction::Fire;
    }
    update
}
