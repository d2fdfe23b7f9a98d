//! Wave director
//!
//! `Waiting -> Spawning -> Active -> (Waiting | upgrade)`. Wave starts and
//! banner clears are scheduled on the director's own timer queue so a run
//! that ends early can purge them.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EnemyKind, GameEvent, WaveStatus, WorldState};
use super::timer::TimerQueue;
use crate::tuning::Tuning;

/// Deferred wave actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveTimer {
    /// Advance to `wave` and begin spawning
    StartWave { wave: u32 },
    /// Hide the "Wave N" banner
    ClearMessage { wave: u32 },
}

/// What the director wants the orchestrator to know after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveSignal {
    /// Cleared a wave on the upgrade interval; the host should offer upgrades
    UpgradeReady { score: u64, wave: u32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveDirector {
    timers: TimerQueue<WaveTimer>,
}

impl WaveDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the start of the next wave after the start delay.
    ///
    /// Does nothing (returns false) if the director isn't waiting or the
    /// same wave start is already pending.
    pub fn schedule_next_wave(&mut self, state: &WorldState, tuning: &Tuning) -> bool {
        if !state.is_running() || state.wave_status != WaveStatus::Waiting {
            return false;
        }
        let event = WaveTimer::StartWave {
            wave: state.wave + 1,
        };
        if self.timers.contains(&event) {
            return false;
        }
        let due = state.clock_ms + tuning.wave_start_delay_ms as f64;
        log::trace!("Scheduled {event:?} at {due}ms");
        self.timers.schedule(due, event);
        true
    }

    /// Fire every timer that has come due on the run clock
    pub fn run_timers(&mut self, state: &mut WorldState, tuning: &Tuning) {
        for event in self.timers.drain_due(state.clock_ms) {
            match event {
                WaveTimer::StartWave { wave } => self.start_wave(state, tuning, wave),
                WaveTimer::ClearMessage { wave } => {
                    if state.wave == wave {
                        state.wave_message = None;
                    }
                }
            }
        }
    }

    fn start_wave(&mut self, state: &mut WorldState, tuning: &Tuning, wave: u32) {
        // Stale or duplicate triggers must not advance the counter
        if !state.is_running() || state.wave_status != WaveStatus::Waiting || state.wave + 1 != wave
        {
            log::trace!("Ignoring stale start of wave {wave}");
            return;
        }
        state.wave = wave;
        state.wave_status = WaveStatus::Spawning;
        state.wave_message = Some(format!("Wave {wave}"));
        state.events.push(GameEvent::WaveStarted { wave });
        self.timers.schedule(
            state.clock_ms + tuning.wave_message_duration_ms as f64,
            WaveTimer::ClearMessage { wave },
        );
        log::info!("Wave {wave} started (cap {})", tuning.wave_spawn_cap(wave));
    }

    /// Per-tick spawning and wave-completion logic
    pub fn update(
        &mut self,
        state: &mut WorldState,
        tuning: &Tuning,
        rng: &mut impl Rng,
    ) -> Option<WaveSignal> {
        match state.wave_status {
            WaveStatus::Waiting => None,
            WaveStatus::Spawning => {
                let chance = (state.wave as f64 * tuning.wave_spawn_chance_per_wave).clamp(0.0, 1.0);
                if rng.random_bool(chance) {
                    if state.enemies.len() < tuning.wave_spawn_cap(state.wave) {
                        spawn_enemy(state, tuning, rng);
                    } else {
                        state.wave_status = WaveStatus::Active;
                        log::debug!("Wave {} fully spawned", state.wave);
                    }
                }
                None
            }
            WaveStatus::Active => {
                if !state.enemies.is_empty() {
                    return None;
                }
                let wave = state.wave;
                state.events.push(GameEvent::WaveCleared { wave });
                if wave > 0 && wave % tuning.upgrade_wave_interval == 0 {
                    Some(WaveSignal::UpgradeReady {
                        score: state.score,
                        wave,
                    })
                } else {
                    state.wave_status = WaveStatus::Waiting;
                    self.schedule_next_wave(state, tuning);
                    None
                }
            }
        }
    }

    /// Purge every pending timer
    pub fn cancel_all(&mut self) {
        self.timers.cancel_all();
    }

    /// Number of timers waiting to fire
    pub fn pending(&self) -> usize {
        self.timers.len()
    }
}

/// Random point just outside one of the four playfield edges
pub fn spawn_position(tuning: &Tuning, rng: &mut impl Rng) -> Vec2 {
    let (w, h, pad) = (
        tuning.playfield_width,
        tuning.playfield_height,
        tuning.enemy_spawn_padding,
    );
    if rng.random_bool(0.5) {
        let x = if rng.random_bool(0.5) { -pad } else { w + pad };
        Vec2::new(x, rng.random::<f32>() * h)
    } else {
        let y = if rng.random_bool(0.5) { -pad } else { h + pad };
        Vec2::new(rng.random::<f32>() * w, y)
    }
}

fn spawn_enemy(state: &mut WorldState, tuning: &Tuning, rng: &mut impl Rng) {
    let kind = EnemyKind::Bee;
    let pos = spawn_position(tuning, rng);
    let id = state.next_entity_id();
    state
        .enemies
        .push(Enemy::new(id, kind, pos, tuning.enemy_stats(kind)));
    state.events.push(GameEvent::EnemySpawned { id, kind });
    log::debug!("Spawned {kind:?} {id} at ({:.0}, {:.0})", pos.x, pos.y);
}
