//! Movement for the player, enemies and bullets
//!
//! Velocities are in units per tick; nothing here accelerates.

use glam::Vec2;
use rand::Rng;

use super::input::Aim;
use super::state::{Bullet, Enemy, Player, Upgrade};
use crate::tuning::Tuning;

/// Player speed after replication-speed upgrades
pub fn player_speed(tuning: &Tuning, upgrades: &Upgrade) -> f32 {
    tuning.base_player_speed + upgrades.replication_speed as f32 * tuning.replication_speed_bonus
}

/// Move the player along `move_dir` and keep it inside the playfield
pub fn move_player(player: &mut Player, move_dir: Vec2, speed: f32, tuning: &Tuning) {
    player.vel = move_dir * speed;
    player.pos += player.vel;

    let r = player.radius;
    player.pos.x = player.pos.x.clamp(r, tuning.playfield_width - r);
    player.pos.y = player.pos.y.clamp(r, tuning.playfield_height - r);
}

/// Point the player along its aim; returns the aim angle in radians
pub fn face(player: &mut Player, aim: &Aim) -> f32 {
    let dir = aim.direction(player.pos);
    let angle = dir.y.atan2(dir.x);
    player.angle_deg = angle.to_degrees();
    angle
}

/// Enemy speed for a kind on a given wave
pub fn enemy_speed(tuning: &Tuning, enemy: &Enemy, wave: u32) -> f32 {
    let stats = tuning.enemy_stats(enemy.kind);
    stats.base_speed + wave.saturating_sub(1) as f32 * stats.speed_growth
}

/// Steer every enemy toward the player or the core (re-rolled each tick)
/// and move it one step.
pub fn advance_enemies(
    enemies: &mut [Enemy],
    player_pos: Vec2,
    core_pos: Vec2,
    wave: u32,
    tuning: &Tuning,
    rng: &mut impl Rng,
) {
    for enemy in enemies.iter_mut() {
        let target = if rng.random_bool(tuning.enemy_player_target_chance) {
            player_pos
        } else {
            core_pos
        };
        let to_target = target - enemy.pos;
        // Standing on the target keeps the previous heading
        if to_target != Vec2::ZERO {
            enemy.vel = to_target.normalize() * enemy_speed(tuning, enemy, wave);
        }
        enemy.pos += enemy.vel;
    }
}

/// Move bullets, record trails, and drop any that left the playfield
pub fn advance_bullets(bullets: &mut Vec<Bullet>, tuning: &Tuning) {
    bullets.retain_mut(|b| {
        b.record_trail(tuning.bullet_trail_length);
        b.pos += b.vel;
        b.pos.x > 0.0
            && b.pos.x < tuning.playfield_width
            && b.pos.y > 0.0
            && b.pos.y < tuning.playfield_height
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::EnemyKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bullet_at(pos: Vec2, vel: Vec2) -> Bullet {
        Bullet {
            id: 1,
            pos,
            vel,
            radius: 5.0,
            damage: 20.0,
            trail: Vec::new(),
        }
    }

    #[test]
    fn test_player_speed_upgrades() {
        let tuning = Tuning::default();
        let upgrades = Upgrade {
            replication_speed: 2,
            ..Default::default()
        };
        assert_eq!(player_speed(&tuning, &Upgrade::default()), 3.0);
        assert_eq!(player_speed(&tuning, &upgrades), 4.0);
    }

    #[test]
    fn test_player_clamped_to_playfield() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.pos = Vec2::new(21.0, 779.0);
        move_player(&mut player, Vec2::new(-1.0, 0.0), 3.0, &tuning);
        assert_eq!(player.pos.x, 20.0);
        move_player(&mut player, Vec2::new(0.0, 1.0), 3.0, &tuning);
        assert_eq!(player.pos.y, 780.0);
        assert_eq!(player.vel, Vec2::new(0.0, 3.0));
    }

    #[test]
    fn test_face_pointer() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let angle = face(&mut player, &Aim::Pointer(Vec2::new(500.0, 100.0)));
        assert!((player.angle_deg + 90.0).abs() < 1e-4);
        assert!((angle + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_enemy_speed_grows_with_wave() {
        let tuning = Tuning::default();
        let enemy = Enemy::new(1, EnemyKind::Bee, Vec2::ZERO, tuning.enemy_stats(EnemyKind::Bee));
        assert_eq!(enemy_speed(&tuning, &enemy, 1), 1.0);
        assert!((enemy_speed(&tuning, &enemy, 5) - 1.2).abs() < 1e-6);
        assert_eq!(enemy_speed(&tuning, &enemy, 0), 1.0);
    }

    #[test]
    fn test_enemies_home_on_player_or_core() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let player_pos = Vec2::new(100.0, 400.0);
        let core_pos = Vec2::new(500.0, 400.0);
        let mut enemies = vec![Enemy::new(
            1,
            EnemyKind::Bee,
            Vec2::new(300.0, 0.0),
            tuning.enemy_stats(EnemyKind::Bee),
        )];
        for _ in 0..50 {
            let before = enemies[0].pos;
            advance_enemies(&mut enemies, player_pos, core_pos, 1, &tuning, &mut rng);
            let step = enemies[0].pos - before;
            assert!((step.length() - 1.0).abs() < 1e-4);
            // Always heading downward toward one of the two targets
            assert!(step.y > 0.0);
        }
    }

    #[test]
    fn test_bullets_leave_playfield() {
        let tuning = Tuning::default();
        let mut bullets = vec![
            bullet_at(Vec2::new(500.0, 4.0), Vec2::new(0.0, -8.0)),
            bullet_at(Vec2::new(500.0, 400.0), Vec2::new(0.0, -8.0)),
        ];
        advance_bullets(&mut bullets, &tuning);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos, Vec2::new(500.0, 392.0));
        assert_eq!(bullets[0].trail, vec![Vec2::new(500.0, 400.0)]);
    }
}
