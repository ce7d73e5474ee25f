//! Projectile flight and cue lifetime system.
//!
//! Advances every active effect slot: cues just burn down their TTL,
//! projectiles home on their victim's live position and deliver damage on
//! arrival. Expired slots deactivate in place and wait for reuse.

use hecs::World;

use holdgrounds_core::components::LiveState;
use holdgrounds_core::constants::DT;
use holdgrounds_core::enums::EffectKind;
use holdgrounds_core::events::MatchEvent;
use holdgrounds_core::types::Position;

use crate::systems::damage::DamageInstance;
use crate::vfx::VfxPool;

pub fn run(
    world: &World,
    vfx: &mut VfxPool,
    damage_queue: &mut Vec<DamageInstance>,
    events: &mut Vec<MatchEvent>,
) {
    // Impact cues requested while iterating; dispatched after, since
    // dispatching mutates another pool.
    let mut impacts: Vec<(usize, Position)> = Vec::new();

    for effect in 0..vfx.effect_count() {
        let profile = vfx.profile(effect).clone();

        for slot in vfx.slots_mut(effect) {
            if !slot.active {
                continue;
            }

            slot.ttl_remaining -= DT;
            if slot.ttl_remaining <= 0.0 {
                slot.active = false;
                continue;
            }

            if profile.kind != EffectKind::Projectile {
                continue;
            }

            // Home on the victim while it still exists; keep the last known
            // destination otherwise.
            if let Some(target) = slot.target {
                if let Ok(pos) = world.get::<&Position>(target) {
                    slot.dest = *pos;
                }
            }

            let distance = slot.position.horizontal_distance_to(&slot.dest);
            let step = profile.speed * DT;

            if distance <= profile.hit_radius || distance <= step {
                // Arrived. Dead or despawned victims just eat the visual.
                if let Some(target) = slot.target {
                    let alive = world
                        .get::<&LiveState>(target)
                        .map(|live| !live.is_dead())
                        .unwrap_or(false);
                    if alive {
                        damage_queue.push(DamageInstance {
                            victim: target,
                            amount: slot.damage,
                        });
                        if let Ok(id) =
                            world.get::<&holdgrounds_core::components::ObjectId>(target)
                        {
                            events.push(MatchEvent::ProjectileHit { victim: *id });
                        }
                    }
                }
                if let Some(impact) = profile.impact_effect {
                    impacts.push((impact, slot.dest));
                }
                slot.active = false;
                continue;
            }

            let dx = (slot.dest.x - slot.position.x) / distance;
            let dy = (slot.dest.y - slot.position.y) / distance;
            slot.position.x += dx * step;
            slot.position.y += dy * step;
        }
    }

    for (effect, position) in impacts {
        vfx.dispatch_cue(effect, position);
    }
}
