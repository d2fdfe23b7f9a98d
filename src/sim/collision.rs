//! Collision detection and combat resolution
//!
//! Everything collides as a circle. Resolution order matters: bullets hit
//! enemies first, then enemies ram the player, then the core, and finally
//! the player collects pickups.

use glam::Vec2;
use rand::Rng;

use super::state::{Body, GameEvent, Pickup, PickupKind, WorldState};
use super::weapon::grant_power_up;
use crate::tuning::Tuning;

/// Two circles collide iff their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: &impl Body, b: &impl Body) -> bool {
    a.pos().distance(b.pos()) < a.radius() + b.radius()
}

/// Run every collision pass for one tick, in order
pub fn resolve(state: &mut WorldState, tuning: &Tuning, rng: &mut impl Rng) {
    resolve_bullet_hits(state, tuning, rng);
    resolve_player_contacts(state, tuning);
    resolve_core_contacts(state, tuning);
    collect_pickups(state, tuning, rng);
}

/// Bullets against enemies.
///
/// Each bullet damages at most one enemy (the last-spawned one it touches)
/// and is consumed by the hit whether or not the enemy dies.
pub fn resolve_bullet_hits(state: &mut WorldState, tuning: &Tuning, rng: &mut impl Rng) {
    for i in (0..state.bullets.len()).rev() {
        let bullet = &state.bullets[i];
        let Some(j) = state
            .enemies
            .iter()
            .rposition(|enemy| circles_overlap(bullet, enemy))
        else {
            continue;
        };

        let bullet = state.bullets.remove(i);
        let enemy = &mut state.enemies[j];
        enemy.health -= bullet.damage;
        let (id, kind, pos) = (enemy.id, enemy.kind, enemy.pos);
        state.events.push(GameEvent::EnemyHit {
            id,
            damage: bullet.damage,
        });

        if enemy.health <= 0.0 {
            state.enemies.remove(j);
            let score = tuning.enemy_stats(kind).score;
            state.score += score;
            state
                .events
                .push(GameEvent::EnemyDestroyed { id, kind, score });
            log::debug!("Enemy {id} destroyed (+{score})");
            maybe_drop_pickup(state, pos, tuning, rng);
        }
    }
}

/// Roll for a loot drop at a destroyed enemy's position
fn maybe_drop_pickup(state: &mut WorldState, pos: Vec2, tuning: &Tuning, rng: &mut impl Rng) {
    if !rng.random_bool(tuning.pickup_drop_chance) {
        return;
    }
    let kind = if rng.random_bool(tuning.pickup_orb_share) {
        PickupKind::VerifiedOrb
    } else {
        PickupKind::PowerUpShard
    };
    let id = state.next_entity_id();
    state.pickups.push(Pickup {
        id,
        kind,
        pos,
        vel: Vec2::ZERO,
        radius: tuning.pickup_radius,
    });
    state.events.push(GameEvent::PickupDropped { id, kind });
}

/// Enemies touching the player hurt it and die, whatever their health
pub fn resolve_player_contacts(state: &mut WorldState, tuning: &Tuning) {
    let damage = tuning.enemy_player_contact_damage;
    for i in (0..state.enemies.len()).rev() {
        if circles_overlap(&state.player, &state.enemies[i]) {
            state.enemies.remove(i);
            state.player.take_damage(damage);
            state.events.push(GameEvent::PlayerHit { damage });
        }
    }
}

/// Enemies touching the core hurt it and die, whatever their health
pub fn resolve_core_contacts(state: &mut WorldState, tuning: &Tuning) {
    let damage = tuning.enemy_core_contact_damage;
    for i in (0..state.enemies.len()).rev() {
        if circles_overlap(&state.core, &state.enemies[i]) {
            state.enemies.remove(i);
            state.core.take_damage(damage);
            state.events.push(GameEvent::CoreHit { damage });
        }
    }
}

/// Player picks up anything it touches
pub fn collect_pickups(state: &mut WorldState, tuning: &Tuning, rng: &mut impl Rng) {
    for i in (0..state.pickups.len()).rev() {
        if !circles_overlap(&state.player, &state.pickups[i]) {
            continue;
        }
        let pickup = state.pickups.remove(i);
        match pickup.kind {
            PickupKind::VerifiedOrb => {
                state
                    .player
                    .restore(tuning.orb_health_restore, tuning.orb_proof_restore);
            }
            PickupKind::PowerUpShard => {
                let mode = grant_power_up(&mut state.player, tuning, rng);
                log::debug!("Power-up: {mode:?}");
                state.events.push(GameEvent::PowerUpStarted { mode });
            }
        }
        state.events.push(GameEvent::PickupCollected {
            id: pickup.id,
            kind: pickup.kind,
        });
    }
}
