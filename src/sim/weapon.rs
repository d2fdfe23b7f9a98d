//! Weapon system: cooldown gating, firing modes and power-up timing

use rand::Rng;

use super::state::{Bullet, FiringMode, GameEvent, Player, Upgrade, WorldState};
use crate::direction_from_angle;
use crate::tuning::Tuning;

/// Milliseconds between shots for the given mode
pub fn fire_cooldown_ms(tuning: &Tuning, upgrades: &Upgrade, mode: FiringMode) -> f32 {
    let cooldown = (tuning.base_fire_rate_ms
        - upgrades.data_throughput as f32 * tuning.data_throughput_cooldown_reduction_ms)
        .max(tuning.min_fire_cooldown_ms);
    match mode {
        FiringMode::Beam => cooldown * tuning.beam_fire_rate_multiplier,
        FiringMode::Normal | FiringMode::Spread => cooldown,
    }
}

/// Damage carried by each bullet for the given mode
pub fn shot_damage(tuning: &Tuning, upgrades: &Upgrade, mode: FiringMode) -> f32 {
    let damage =
        tuning.base_bullet_damage + upgrades.proof_power as f32 * tuning.proof_power_damage_bonus;
    match mode {
        FiringMode::Beam => damage * tuning.beam_damage_multiplier,
        FiringMode::Normal | FiringMode::Spread => damage,
    }
}

/// Angular offsets (radians) of each bullet in a spread volley, center first
/// in index order: `-k*step .. 0 .. +k*step`.
pub fn spread_offsets(count: u32, step_deg: f32) -> impl Iterator<Item = f32> {
    let half = (count / 2) as i32;
    let step = step_deg.to_radians();
    (0..count as i32).map(move |i| (i - half) as f32 * step)
}

/// Fire if the trigger is held and the cooldown has elapsed.
///
/// Returns the number of bullets emitted (0 when nothing fired).
pub fn try_fire(
    state: &mut WorldState,
    firing: bool,
    aim_angle: f32,
    tuning: &Tuning,
    upgrades: &Upgrade,
) -> u32 {
    if !firing {
        return 0;
    }

    let mode = state.player.firing_mode;
    let cooldown = fire_cooldown_ms(tuning, upgrades, mode) as f64;
    if let Some(last) = state.last_shot_ms {
        if state.clock_ms - last <= cooldown {
            return 0;
        }
    }
    state.last_shot_ms = Some(state.clock_ms);

    let damage = shot_damage(tuning, upgrades, mode);
    let origin = state.player.pos;
    let (angles, radius): (Vec<f32>, f32) = match mode {
        FiringMode::Spread => (
            spread_offsets(tuning.spread_shot_bullets, tuning.spread_shot_angle_deg)
                .map(|offset| aim_angle + offset)
                .collect(),
            tuning.bullet_radius,
        ),
        FiringMode::Beam => (
            vec![aim_angle],
            tuning.bullet_radius * tuning.beam_radius_multiplier,
        ),
        FiringMode::Normal => (vec![aim_angle], tuning.bullet_radius),
    };

    let fired = angles.len() as u32;
    for angle in angles {
        let id = state.next_entity_id();
        state.bullets.push(Bullet {
            id,
            pos: origin,
            vel: direction_from_angle(angle) * tuning.bullet_speed,
            radius,
            damage,
            trail: Vec::with_capacity(tuning.bullet_trail_length),
        });
    }

    state.events.push(GameEvent::ShotFired {
        mode,
        bullets: fired,
    });
    fired
}

/// Count down an active power-up; reverts to Normal fire when it runs out.
///
/// Returns true on the tick the power-up expires.
pub fn tick_power_up(player: &mut Player, dt_ms: f32) -> bool {
    if player.power_up_ms <= 0.0 {
        return false;
    }
    player.power_up_ms -= dt_ms;
    if player.power_up_ms <= 0.0 {
        player.power_up_ms = 0.0;
        player.firing_mode = FiringMode::Normal;
        return true;
    }
    false
}

/// Start (or refresh) a power-up with a random temporary firing mode
pub fn grant_power_up(player: &mut Player, tuning: &Tuning, rng: &mut impl Rng) -> FiringMode {
    player.power_up_ms = tuning.power_up_duration_ms;
    player.firing_mode = if rng.random_bool(0.5) {
        FiringMode::Spread
    } else {
        FiringMode::Beam
    };
    player.firing_mode
}
