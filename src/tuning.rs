//! Data-driven game balance
//!
//! Every number the simulation reads lives here. The defaults reproduce
//! [`crate::consts`]; hosts may override any subset from JSON.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::state::EnemyKind;

/// Errors raised while loading or validating a tuning table
#[derive(thiserror::Error, Debug)]
pub enum TuningError {
    /// Tuning file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document is not valid tuning JSON
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("Invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Per-kind enemy stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub radius: f32,
    pub health: f32,
    /// Units per tick on wave 1
    pub base_speed: f32,
    /// Extra units per tick for each wave after the first
    pub speed_growth: f32,
    pub score: u64,
    /// Presentation tag (sprite/emoji lookup)
    pub visual: Cow<'static, str>,
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_max_health: f32,
    pub player_max_proof_meter: f32,
    pub base_player_speed: f32,

    // === Weapon ===
    pub base_fire_rate_ms: f32,
    pub base_bullet_damage: f32,
    pub min_fire_cooldown_ms: f32,
    pub bullet_radius: f32,
    pub bullet_speed: f32,
    pub bullet_trail_length: usize,
    pub spread_shot_bullets: u32,
    pub spread_shot_angle_deg: f32,
    pub beam_fire_rate_multiplier: f32,
    pub beam_damage_multiplier: f32,
    pub beam_radius_multiplier: f32,

    // === Upgrades (per level) ===
    pub proof_power_damage_bonus: f32,
    pub data_throughput_cooldown_reduction_ms: f32,
    pub replication_speed_bonus: f32,

    // === Core ===
    pub core_radius: f32,
    pub core_max_health: f32,

    // === Enemies ===
    pub enemies: BTreeMap<EnemyKind, EnemyStats>,
    pub enemy_spawn_padding: f32,
    pub enemy_player_target_chance: f64,
    pub enemy_player_contact_damage: f32,
    pub enemy_core_contact_damage: f32,

    // === Pickups ===
    pub pickup_radius: f32,
    pub pickup_drop_chance: f64,
    pub pickup_orb_share: f64,
    pub orb_health_restore: f32,
    pub orb_proof_restore: f32,
    pub power_up_duration_ms: f32,

    // === Waves ===
    pub wave_start_delay_ms: f32,
    pub wave_message_duration_ms: f32,
    pub wave_base_enemies: u32,
    pub wave_increment: u32,
    pub wave_spawn_chance_per_wave: f64,
    pub upgrade_wave_interval: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            player_radius: PLAYER_RADIUS,
            player_max_health: PLAYER_MAX_HEALTH,
            player_max_proof_meter: PLAYER_MAX_PROOF_METER,
            base_player_speed: BASE_PLAYER_SPEED,

            base_fire_rate_ms: BASE_FIRE_RATE_MS,
            base_bullet_damage: BASE_BULLET_DAMAGE,
            min_fire_cooldown_ms: MIN_FIRE_COOLDOWN_MS,
            bullet_radius: BULLET_RADIUS,
            bullet_speed: BULLET_SPEED,
            bullet_trail_length: BULLET_TRAIL_LENGTH,
            spread_shot_bullets: SPREAD_SHOT_BULLETS,
            spread_shot_angle_deg: SPREAD_SHOT_ANGLE_DEG,
            beam_fire_rate_multiplier: BEAM_FIRE_RATE_MULTIPLIER,
            beam_damage_multiplier: BEAM_DAMAGE_MULTIPLIER,
            beam_radius_multiplier: BEAM_RADIUS_MULTIPLIER,

            proof_power_damage_bonus: PROOF_POWER_DAMAGE_BONUS,
            data_throughput_cooldown_reduction_ms: DATA_THROUGHPUT_COOLDOWN_REDUCTION_MS,
            replication_speed_bonus: REPLICATION_SPEED_BONUS,

            core_radius: CORE_RADIUS,
            core_max_health: CORE_MAX_HEALTH,

            enemies: EnemyKind::ALL
                .iter()
                .map(|&kind| (kind, kind.builtin_stats().clone()))
                .collect(),
            enemy_spawn_padding: ENEMY_SPAWN_PADDING,
            enemy_player_target_chance: ENEMY_PLAYER_TARGET_CHANCE,
            enemy_player_contact_damage: ENEMY_PLAYER_CONTACT_DAMAGE,
            enemy_core_contact_damage: ENEMY_CORE_CONTACT_DAMAGE,

            pickup_radius: PICKUP_RADIUS,
            pickup_drop_chance: PICKUP_DROP_CHANCE,
            pickup_orb_share: PICKUP_ORB_SHARE,
            orb_health_restore: ORB_HEALTH_RESTORE,
            orb_proof_restore: ORB_PROOF_RESTORE,
            power_up_duration_ms: POWER_UP_DURATION_MS,

            wave_start_delay_ms: WAVE_START_DELAY_MS,
            wave_message_duration_ms: WAVE_MESSAGE_DURATION_MS,
            wave_base_enemies: WAVE_BASE_ENEMIES,
            wave_increment: WAVE_INCREMENT,
            wave_spawn_chance_per_wave: WAVE_SPAWN_CHANCE_PER_WAVE,
            upgrade_wave_interval: UPGRADE_WAVE_INTERVAL,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning ({} enemy kinds)", tuning.enemies.len());
        Ok(tuning)
    }

    /// Stats for an enemy kind (built-in defaults if the table lacks a row)
    pub fn enemy_stats(&self, kind: EnemyKind) -> &EnemyStats {
        self.enemies
            .get(&kind)
            .unwrap_or_else(|| kind.builtin_stats())
    }

    /// Maximum number of live enemies while a wave is spawning
    pub fn wave_spawn_cap(&self, wave: u32) -> usize {
        (self.wave_base_enemies + wave * self.wave_increment) as usize
    }

    /// Check every value is inside its allowed range
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("playfield_width", self.playfield_width)?;
        positive("playfield_height", self.playfield_height)?;
        positive("player_radius", self.player_radius)?;
        positive("player_max_health", self.player_max_health)?;
        positive("player_max_proof_meter", self.player_max_proof_meter)?;
        positive("base_player_speed", self.base_player_speed)?;
        positive("base_fire_rate_ms", self.base_fire_rate_ms)?;
        positive("base_bullet_damage", self.base_bullet_damage)?;
        positive("min_fire_cooldown_ms", self.min_fire_cooldown_ms)?;
        positive("bullet_radius", self.bullet_radius)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("core_radius", self.core_radius)?;
        positive("core_max_health", self.core_max_health)?;
        positive("pickup_radius", self.pickup_radius)?;

        if 2.0 * self.player_radius >= self.playfield_width.min(self.playfield_height) {
            return Err(invalid("player_radius", "player does not fit the playfield"));
        }
        if self.spread_shot_bullets == 0 || self.spread_shot_bullets % 2 == 0 {
            return Err(invalid(
                "spread_shot_bullets",
                format!("must be odd, got {}", self.spread_shot_bullets),
            ));
        }
        multiplier("beam_fire_rate_multiplier", self.beam_fire_rate_multiplier)?;
        multiplier("beam_damage_multiplier", self.beam_damage_multiplier)?;
        multiplier("beam_radius_multiplier", self.beam_radius_multiplier)?;
        probability("enemy_player_target_chance", self.enemy_player_target_chance)?;
        probability("pickup_drop_chance", self.pickup_drop_chance)?;
        probability("pickup_orb_share", self.pickup_orb_share)?;
        probability("wave_spawn_chance_per_wave", self.wave_spawn_chance_per_wave)?;

        if self.upgrade_wave_interval == 0 {
            return Err(invalid("upgrade_wave_interval", "must be at least 1"));
        }
        for stats in self.enemies.values() {
            positive("enemies.radius", stats.radius)?;
            positive("enemies.health", stats.health)?;
            positive("enemies.base_speed", stats.base_speed)?;
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

fn multiplier(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in (0, 1], got {value}")))
    }
}

fn probability(field: &'static str, value: f64) -> Result<(), TuningError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, format!("must be in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        tuning.validate().unwrap();
        assert_eq!(tuning.wave_spawn_cap(1), 7);
        assert_eq!(tuning.enemy_stats(EnemyKind::Bee).score, 10);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bullet_speed": 12.0, "wave_base_enemies": 2 }"#).unwrap();
        assert_eq!(tuning.bullet_speed, 12.0);
        assert_eq!(tuning.wave_spawn_cap(1), 4);
        assert_eq!(tuning.core_max_health, CORE_MAX_HEALTH);
    }

    #[test]
    fn test_rejects_even_spread() {
        let err = Tuning::from_json(r#"{ "spread_shot_bullets": 4 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "spread_shot_bullets",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "pickup_drop_chance": 1.5 }"#).unwrap_err();
        assert!(err.to_string().contains("pickup_drop_chance"));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_enemy_table_round_trips_through_json() {
        let json = serde_json::to_string(&Tuning::default()).unwrap();
        assert!(json.contains("\"Bee\""));
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.enemy_stats(EnemyKind::Bee), EnemyKind::Bee.builtin_stats());
    }
}
