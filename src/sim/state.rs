//! World state and core simulation types
//!
//! Everything a tick reads or writes lives in [`WorldState`]; the
//! orchestrator owns it and lends it to each sub-step.

use std::borrow::Cow;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::{EnemyStats, Tuning};

/// Shape shared by everything that takes part in circular collision
pub trait Body {
    fn pos(&self) -> Vec2;
    fn radius(&self) -> f32;
}

/// Lifecycle of a run as seen by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Ticks advance the world
    Playing,
    /// A wave divisible by the upgrade interval was cleared; waiting for the host
    UpgradePending,
    /// Player or core destroyed
    GameOver,
    /// Host tore the loop down
    Stopped,
}

/// Wave director state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WaveStatus {
    /// Idle until the scheduled wave start fires
    #[default]
    Waiting,
    /// Enemies trickle in until the cap is reached
    Spawning,
    /// No more spawns; the wave ends when every enemy is gone
    Active,
}

/// Weapon behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FiringMode {
    #[default]
    Normal,
    /// Fan of bullets around the aim angle
    Spread,
    /// Faster fire, weaker bullets
    Beam,
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Bee,
}

static BEE_STATS: EnemyStats = EnemyStats {
    radius: 15.0,
    health: 20.0,
    base_speed: 1.0,
    speed_growth: 0.05,
    score: 10,
    visual: Cow::Borrowed("bee"),
};

impl EnemyKind {
    pub const ALL: [EnemyKind; 1] = [EnemyKind::Bee];

    /// Stats used when a tuning table has no row for this kind
    pub fn builtin_stats(self) -> &'static EnemyStats {
        match self {
            EnemyKind::Bee => &BEE_STATS,
        }
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health and proof meter
    VerifiedOrb,
    /// Temporary Spread or Beam firing mode
    PowerUpShard,
}

/// Which upgrade track the player picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// Bullet damage
    ProofPower,
    /// Fire rate
    DataThroughput,
    /// Move speed
    ReplicationSpeed,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 3] = [
        UpgradeKind::ProofPower,
        UpgradeKind::DataThroughput,
        UpgradeKind::ReplicationSpeed,
    ];
}

/// Upgrade levels bought during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Upgrade {
    pub proof_power: u32,
    pub data_throughput: u32,
    pub replication_speed: u32,
}

impl Upgrade {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::ProofPower => self.proof_power,
            UpgradeKind::DataThroughput => self.data_throughput,
            UpgradeKind::ReplicationSpeed => self.replication_speed,
        }
    }

    pub fn increment(&mut self, kind: UpgradeKind) {
        match kind {
            UpgradeKind::ProofPower => self.proof_power += 1,
            UpgradeKind::DataThroughput => self.data_throughput += 1,
            UpgradeKind::ReplicationSpeed => self.replication_speed += 1,
        }
    }
}

/// Entity ID reserved for the player; allocated IDs start above it
pub const PLAYER_ID: u32 = 0;

/// The player-controlled unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Facing in degrees, recomputed from the aim every tick
    pub angle_deg: f32,
    pub health: f32,
    pub max_health: f32,
    pub proof_meter: f32,
    pub max_proof_meter: f32,
    pub firing_mode: FiringMode,
    /// Milliseconds of power-up left (0 = inactive)
    pub power_up_ms: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            id: PLAYER_ID,
            pos: playfield_center(tuning),
            vel: Vec2::ZERO,
            radius: tuning.player_radius,
            angle_deg: 0.0,
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            proof_meter: 0.0,
            max_proof_meter: tuning.player_max_proof_meter,
            firing_mode: FiringMode::Normal,
            power_up_ms: 0.0,
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    /// Restore health and proof meter, clamped to their caps
    pub fn restore(&mut self, health: f32, proof: f32) {
        self.health = (self.health + health).clamp(0.0, self.max_health);
        self.proof_meter = (self.proof_meter + proof).clamp(0.0, self.max_proof_meter);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }
}

impl Body for Player {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// The stationary objective
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Core {
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
}

impl Core {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: playfield_center(tuning),
            radius: tuning.core_radius,
            health: tuning.core_max_health,
            max_health: tuning.core_max_health,
        }
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).clamp(0.0, self.max_health);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }
}

impl Body for Core {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A hostile unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, stats: &EnemyStats) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius: stats.radius,
            health: stats.health,
            max_health: stats.health,
        }
    }
}

impl Body for Enemy {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Previous positions for rendering (newest first)
    pub trail: Vec<Vec2>,
}

impl Bullet {
    /// Record current position to trail (call before moving)
    pub fn record_trail(&mut self, max_len: usize) {
        self.trail.insert(0, self.pos);
        self.trail.truncate(max_len);
    }
}

impl Body for Bullet {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A collectible dropped by a destroyed enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    /// Pickups stay where they dropped
    pub vel: Vec2,
    pub radius: f32,
}

impl Body for Pickup {
    fn pos(&self) -> Vec2 {
        self.pos
    }
    fn radius(&self) -> f32 {
        self.radius
    }
}

/// Things that happened during a tick, for presentation and the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ShotFired { mode: FiringMode, bullets: u32 },
    EnemySpawned { id: u32, kind: EnemyKind },
    EnemyHit { id: u32, damage: f32 },
    EnemyDestroyed { id: u32, kind: EnemyKind, score: u64 },
    PlayerHit { damage: f32 },
    CoreHit { damage: f32 },
    PickupDropped { id: u32, kind: PickupKind },
    PickupCollected { id: u32, kind: PickupKind },
    PowerUpStarted { mode: FiringMode },
    PowerUpExpired,
    WaveStarted { wave: u32 },
    WaveCleared { wave: u32 },
    UpgradeReady { score: u64, wave: u32 },
    GameOver { score: u64, wave: u32 },
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    /// Run clock in milliseconds (sum of tick deltas)
    pub clock_ms: f64,
    pub phase: RunPhase,
    pub score: u64,
    /// Current wave number (0 before the first wave starts)
    pub wave: u32,
    pub wave_status: WaveStatus,
    /// Banner shown while a wave is starting
    pub wave_message: Option<String>,
    pub player: Player,
    pub core: Core,
    /// Live enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Live bullets, in firing order
    pub bullets: Vec<Bullet>,
    pub pickups: Vec<Pickup>,
    /// Clock time of the last shot (None = weapon ready)
    pub last_shot_ms: Option<f64>,
    /// Events emitted by the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl WorldState {
    /// Fresh world: full-health player and core at the center, no entities
    pub fn new(tuning: &Tuning, score: u64, wave: u32) -> Self {
        Self {
            clock_ms: 0.0,
            phase: RunPhase::Playing,
            score,
            wave,
            wave_status: WaveStatus::Waiting,
            wave_message: None,
            player: Player::new(tuning),
            core: Core::new(tuning),
            enemies: Vec::new(),
            bullets: Vec::new(),
            pickups: Vec::new(),
            last_shot_ms: None,
            events: Vec::new(),
            next_id: PLAYER_ID + 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Playing
    }

    /// JSON snapshot for hosts that render out of process
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Center of the playfield (where the core sits and the player starts)
pub fn playfield_center(tuning: &Tuning) -> Vec2 {
    Vec2::new(tuning.playfield_width / 2.0, tuning.playfield_height / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_layout() {
        let tuning = Tuning::default();
        let state = WorldState::new(&tuning, 0, 0);
        assert_eq!(state.player.pos, Vec2::new(500.0, 400.0));
        assert_eq!(state.core.pos, state.player.pos);
        assert_eq!(state.player.health, 100.0);
        assert_eq!(state.core.health, 200.0);
        assert_eq!(state.wave_status, WaveStatus::Waiting);
        assert!(state.enemies.is_empty() && state.bullets.is_empty() && state.pickups.is_empty());
    }

    #[test]
    fn test_player_health_clamped() {
        let mut player = Player::new(&Tuning::default());
        player.take_damage(250.0);
        assert_eq!(player.health, 0.0);
        assert!(player.is_destroyed());
        player.restore(500.0, 500.0);
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.proof_meter, player.max_proof_meter);
    }

    #[test]
    fn test_trail_bounded_newest_first() {
        let mut bullet = Bullet {
            id: 1,
            pos: Vec2::ZERO,
            vel: Vec2::X,
            radius: 5.0,
            damage: 20.0,
            trail: Vec::new(),
        };
        for i in 0..8 {
            bullet.pos = Vec2::new(i as f32, 0.0);
            bullet.record_trail(5);
        }
        assert_eq!(bullet.trail.len(), 5);
        assert_eq!(bullet.trail[0], Vec2::new(7.0, 0.0));
        assert_eq!(bullet.trail[4], Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_upgrade_levels() {
        let mut upgrade = Upgrade::default();
        upgrade.increment(UpgradeKind::DataThroughput);
        upgrade.increment(UpgradeKind::DataThroughput);
        assert_eq!(upgrade.level(UpgradeKind::DataThroughput), 2);
        assert_eq!(upgrade.level(UpgradeKind::ProofPower), 0);
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = WorldState::new(&Tuning::default(), 0, 0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
        assert_ne!(a, state.player.id);
        assert_eq!(state.player.id, PLAYER_ID);
    }
}
