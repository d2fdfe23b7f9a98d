//! Hive Defense - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, weapons, combat, waves)
//! - `tuning`: Data-driven game balance
//! - `session`: Host run flow (start, upgrade selection, game over)

pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Screen, Session};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (world units)
    pub const PLAYFIELD_WIDTH: f32 = 1000.0;
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_MAX_PROOF_METER: f32 = 100.0;
    /// Units per tick before upgrades
    pub const BASE_PLAYER_SPEED: f32 = 3.0;

    /// Weapon defaults
    pub const BASE_FIRE_RATE_MS: f32 = 250.0;
    pub const BASE_BULLET_DAMAGE: f32 = 20.0;
    /// Cooldown never drops below this, however many throughput levels are bought
    pub const MIN_FIRE_COOLDOWN_MS: f32 = 16.0;

    /// Per-level upgrade effects
    pub const PROOF_POWER_DAMAGE_BONUS: f32 = 5.0;
    pub const DATA_THROUGHPUT_COOLDOWN_REDUCTION_MS: f32 = 25.0;
    pub const REPLICATION_SPEED_BONUS: f32 = 0.5;

    /// Core (the defended objective), fixed at the playfield center
    pub const CORE_RADIUS: f32 = 40.0;
    pub const CORE_MAX_HEALTH: f32 = 200.0;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 8.0;
    pub const BULLET_TRAIL_LENGTH: usize = 5;

    /// Enemies spawn this far outside the playfield edge
    pub const ENEMY_SPAWN_PADDING: f32 = 100.0;
    /// Chance an enemy chases the player (otherwise the core) on a given tick
    pub const ENEMY_PLAYER_TARGET_CHANCE: f64 = 0.7;
    pub const ENEMY_PLAYER_CONTACT_DAMAGE: f32 = 10.0;
    pub const ENEMY_CORE_CONTACT_DAMAGE: f32 = 20.0;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 8.0;
    pub const PICKUP_DROP_CHANCE: f64 = 0.2;
    /// Share of drops that are Verified Orbs (the rest are Power-Up Shards)
    pub const PICKUP_ORB_SHARE: f64 = 0.7;
    pub const ORB_HEALTH_RESTORE: f32 = 5.0;
    pub const ORB_PROOF_RESTORE: f32 = 10.0;

    /// Power-ups
    pub const POWER_UP_DURATION_MS: f32 = 10_000.0;
    pub const SPREAD_SHOT_BULLETS: u32 = 3;
    pub const SPREAD_SHOT_ANGLE_DEG: f32 = 15.0;
    /// 4x faster fire rate
    pub const BEAM_FIRE_RATE_MULTIPLIER: f32 = 0.25;
    /// Half damage per shot
    pub const BEAM_DAMAGE_MULTIPLIER: f32 = 0.5;
    pub const BEAM_RADIUS_MULTIPLIER: f32 = 0.8;

    /// Waves
    pub const WAVE_START_DELAY_MS: f32 = 3000.0;
    pub const WAVE_MESSAGE_DURATION_MS: f32 = 2000.0;
    pub const WAVE_BASE_ENEMIES: u32 = 5;
    pub const WAVE_INCREMENT: u32 = 2;
    /// Per-tick spawn chance is this times the wave number
    pub const WAVE_SPAWN_CHANCE_PER_WAVE: f64 = 0.01;
    /// Every Nth cleared wave opens the upgrade screen
    pub const UPGRADE_WAVE_INTERVAL: u32 = 3;

    /// Nominal frame time for hosts without a real clock (~60 Hz)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Unit vector from `from` toward `to`, or zero when the points coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of a direction in degrees, as presentation expects it
#[inline]
pub fn angle_deg(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}
