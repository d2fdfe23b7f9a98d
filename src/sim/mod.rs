//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only from the tick's `dt_ms`
//! - Stable iteration order (spawn/fire order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod kinematics;
pub mod state;
pub mod tick;
pub mod timer;
pub mod wave;
pub mod weapon;

pub use collision::circles_overlap;
pub use input::{Aim, DirectionKeys, RawInput, TickInput, normalize};
pub use state::{
    Body, Bullet, Core, Enemy, EnemyKind, FiringMode, GameEvent, PLAYER_ID, Pickup, PickupKind, Player,
    RunPhase, Upgrade, UpgradeKind, WaveStatus, WorldState,
};
pub use tick::{Simulation, TickOutcome};
pub use timer::TimerQueue;
pub use wave::{WaveDirector, WaveSignal, WaveTimer};
