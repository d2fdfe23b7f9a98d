//! Per-frame simulation tick
//!
//! Sequences input, movement, weapons, collisions and the wave director,
//! then checks for the end of the run.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision;
use super::input::TickInput;
use super::kinematics;
use super::state::{GameEvent, RunPhase, Upgrade, WorldState};
use super::wave::{WaveDirector, WaveSignal};
use super::weapon;
use crate::tuning::{Tuning, TuningError};

/// What a tick means for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Run continues
    Continue,
    /// Nothing happened: the run is over, stopped or waiting on an upgrade
    Idle,
    /// Upgrade screen should open
    UpgradeReady { score: u64, wave: u32 },
    /// Player or core destroyed
    GameOver { score: u64, wave: u32 },
}

/// Owns the world, the wave director and the seeded RNG for one run
#[derive(Debug, Clone)]
pub struct Simulation {
    state: WorldState,
    tuning: Tuning,
    upgrades: Upgrade,
    director: WaveDirector,
    rng: Pcg32,
}

impl Simulation {
    /// Create an idle simulation; call [`Simulation::start_run`] to play.
    ///
    /// The tuning is validated first: out-of-range probabilities or a
    /// playfield too small for the player would otherwise fail mid-tick.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut state = WorldState::new(&tuning, 0, 0);
        state.phase = RunPhase::Stopped;
        Ok(Self {
            state,
            tuning,
            upgrades: Upgrade::default(),
            director: WaveDirector::new(),
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    /// Fresh run: score, wave and every entity collection reset
    pub fn start_run(&mut self, upgrades: Upgrade) {
        self.begin(upgrades, 0, 0);
    }

    /// Continue after an upgrade choice: fresh player, core and entities,
    /// keeping score and wave. The next wave is `wave + 1`.
    ///
    /// Returns false unless an upgrade choice is pending.
    pub fn resume(&mut self, upgrades: Upgrade, score: u64, wave: u32) -> bool {
        if self.state.phase != RunPhase::UpgradePending {
            return false;
        }
        self.begin(upgrades, score, wave);
        true
    }

    fn begin(&mut self, upgrades: Upgrade, score: u64, wave: u32) {
        self.director.cancel_all();
        self.upgrades = upgrades;
        self.state = WorldState::new(&self.tuning, score, wave);
        self.director.schedule_next_wave(&self.state, &self.tuning);
        log::info!(
            "Run started at wave {} (score {score}, upgrades {:?})",
            wave + 1,
            upgrades
        );
    }

    /// Tear the loop down; pending wave timers are discarded
    pub fn stop(&mut self) {
        self.director.cancel_all();
        if self.state.phase == RunPhase::Playing {
            self.state.phase = RunPhase::Stopped;
        }
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn upgrades(&self) -> &Upgrade {
        &self.upgrades
    }

    /// Wave timers still waiting to fire
    pub fn pending_timers(&self) -> usize {
        self.director.pending()
    }

    /// Advance the world by one frame of `dt_ms` real milliseconds
    pub fn tick(&mut self, input: &TickInput, dt_ms: f32) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Idle;
        }

        let Self {
            state,
            tuning,
            upgrades,
            director,
            rng,
        } = self;

        state.events.clear();
        state.clock_ms += dt_ms as f64;
        director.run_timers(state, tuning);

        if weapon::tick_power_up(&mut state.player, dt_ms) {
            state.events.push(GameEvent::PowerUpExpired);
            log::debug!("Power-up expired");
        }

        // Movement and aim
        let speed = kinematics::player_speed(tuning, upgrades);
        kinematics::move_player(&mut state.player, input.move_dir, speed, tuning);
        let aim_angle = kinematics::face(&mut state.player, &input.aim);

        weapon::try_fire(state, input.firing, aim_angle, tuning, upgrades);

        kinematics::advance_bullets(&mut state.bullets, tuning);
        kinematics::advance_enemies(
            &mut state.enemies,
            state.player.pos,
            state.core.pos,
            state.wave,
            tuning,
            rng,
        );

        collision::resolve(state, tuning, rng);

        if state.player.is_destroyed() || state.core.is_destroyed() {
            let (score, wave) = (state.score, state.wave);
            state.phase = RunPhase::GameOver;
            state.events.push(GameEvent::GameOver { score, wave });
            director.cancel_all();
            log::info!("Game over at wave {wave} with score {score}");
            return TickOutcome::GameOver { score, wave };
        }

        if let Some(WaveSignal::UpgradeReady { score, wave }) = director.update(state, tuning, rng)
        {
            state.phase = RunPhase::UpgradePending;
            state.events.push(GameEvent::UpgradeReady { score, wave });
            director.cancel_all();
            log::info!("Wave {wave} cleared, upgrade ready (score {score})");
            return TickOutcome::UpgradeReady { score, wave };
        }

        TickOutcome::Continue
    }
}
