//! Pooled effect instances.
//!
//! Every effect id in the catalog gets a fixed block of slots allocated at
//! match start. Dispatching reuses slots round-robin: when all slots of an
//! effect are live, the oldest is overwritten rather than failing or
//! allocating. Effect ids are validated at config load, so indexing here is
//! unchecked.

use hecs::Entity;

use holdgrounds_core::config::EffectProfile;
use holdgrounds_core::constants::VFX_POOL_SIZE;
use holdgrounds_core::enums::{EffectKind, Team};
use holdgrounds_core::types::Position;

/// One pooled effect instance.
#[derive(Debug, Clone)]
pub struct EffectSlot {
    pub active: bool,
    pub team: Team,
    pub position: Position,
    /// Last known target position; projectiles keep flying here if the
    /// target despawns mid-flight.
    pub dest: Position,
    /// Victim the projectile will damage on arrival. Cues carry no target.
    pub target: Option<Entity>,
    pub damage: f64,
    pub ttl_remaining: f64,
}

impl EffectSlot {
    fn inactive() -> Self {
        Self {
            active: false,
            team: Team::Blue,
            position: Position::default(),
            dest: Position::default(),
            target: None,
            damage: 0.0,
            ttl_remaining: 0.0,
        }
    }
}

struct EffectPool {
    profile: EffectProfile,
    next_slot: usize,
    slots: Vec<EffectSlot>,
}

/// All effect pools for a match, indexed by effect id.
pub struct VfxPool {
    pools: Vec<EffectPool>,
}

impl VfxPool {
    /// Allocate pools for every effect in the catalog.
    pub fn new(effects: &[EffectProfile]) -> Self {
        let pools = effects
            .iter()
            .map(|profile| EffectPool {
                profile: profile.clone(),
                next_slot: 0,
                slots: vec![EffectSlot::inactive(); VFX_POOL_SIZE],
            })
            .collect();
        Self { pools }
    }

    /// Number of effect ids in the catalog.
    pub fn effect_count(&self) -> usize {
        self.pools.len()
    }

    pub fn profile(&self, effect: usize) -> &EffectProfile {
        &self.pools[effect].profile
    }

    pub fn slots(&self, effect: usize) -> &[EffectSlot] {
        &self.pools[effect].slots
    }

    pub fn slots_mut(&mut self, effect: usize) -> &mut [EffectSlot] {
        &mut self.pools[effect].slots
    }

    pub fn active_count(&self, effect: usize) -> usize {
        self.pools[effect].slots.iter().filter(|s| s.active).count()
    }

    /// Dispatch a stationary cue (impact flash, death burst, build dust).
    pub fn dispatch_cue(&mut self, effect: usize, position: Position) {
        let ttl = self.pools[effect].profile.ttl;
        let slot = self.claim(effect);
        slot.team = Team::Blue;
        slot.position = position;
        slot.dest = position;
        slot.target = None;
        slot.damage = 0.0;
        slot.ttl_remaining = ttl;
    }

    /// Dispatch a projectile that flies from `from` toward `target`.
    pub fn dispatch_projectile(
        &mut self,
        effect: usize,
        team: Team,
        from: Position,
        dest: Position,
        target: Entity,
        damage: f64,
    ) {
        let ttl = self.pools[effect].profile.ttl;
        let slot = self.claim(effect);
        slot.team = team;
        slot.position = from;
        slot.dest = dest;
        slot.target = Some(target);
        slot.damage = damage;
        slot.ttl_remaining = ttl;
    }

    /// Take the next slot round-robin, reusing the oldest if all are live.
    fn claim(&mut self, effect: usize) -> &mut EffectSlot {
        let pool = &mut self.pools[effect];
        let index = pool.next_slot;
        pool.next_slot = (index + 1) % VFX_POOL_SIZE;
        let slot = &mut pool.slots[index];
        slot.active = true;
        slot
    }
}
