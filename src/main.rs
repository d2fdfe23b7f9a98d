//! Hive Defense entry point
//!
//! Headless native runner: plays a seeded run with a simple autopilot and
//! logs what happens. Rendering hosts embed the library instead.

use std::env;

use anyhow::{Context, Result, bail};
use glam::Vec2;

use hive_defense::consts::FRAME_MS;
use hive_defense::sim::{GameEvent, RawInput, TickOutcome, UpgradeKind, WorldState};
use hive_defense::{Screen, Session, Tuning};

/// Parsed command-line arguments
#[derive(Debug)]
struct CliArgs {
    seed: u64,
    max_ticks: u64,
    config: Option<String>,
    snapshot: bool,
    show_help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            seed: 1,
            max_ticks: 60 * 60 * 10,
            config: None,
            snapshot: false,
            show_help: false,
        }
    }
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = Self::default();
        let mut iter = env::args().skip(1);

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = iter.next().context("--seed needs a value")?;
                    args.seed = value.parse().context("--seed must be an integer")?;
                }
                "--ticks" => {
                    let value = iter.next().context("--ticks needs a value")?;
                    args.max_ticks = value.parse().context("--ticks must be an integer")?;
                }
                "--config" => {
                    args.config = Some(iter.next().context("--config needs a path")?);
                }
                "--snapshot" => args.snapshot = true,
                "--help" | "-h" => args.show_help = true,
                other => bail!("Unknown argument: {other}"),
            }
        }
        Ok(args)
    }
}

fn print_help() {
    println!("Usage: hive-defense [--seed N] [--ticks N] [--config tuning.json] [--snapshot]");
    println!();
    println!("Plays one run headlessly with an autopilot and prints the result.");
    println!("  --seed N       RNG seed (default 1)");
    println!("  --ticks N      Frame limit at 60 Hz (default 36000)");
    println!("  --config PATH  JSON tuning overrides");
    println!("  --snapshot     Print the final world state as JSON");
}

/// Hover beside the core and shoot the nearest bee
fn autopilot(world: &WorldState) -> RawInput {
    let player = world.player.pos;
    let guard_post = world.core.pos + Vec2::new(0.0, 90.0);
    let to_post = guard_post - player;
    let move_stick = if to_post.length() > 4.0 {
        to_post
    } else {
        Vec2::ZERO
    };

    let aim_stick = world
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(player)
                .total_cmp(&b.pos.distance_squared(player))
        })
        .map(|enemy| enemy.pos - player)
        .unwrap_or(Vec2::ZERO);

    RawInput {
        move_stick,
        aim_stick,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = CliArgs::parse()?;
    if args.show_help {
        print_help();
        return Ok(());
    }

    let tuning = match &args.config {
        Some(path) => {
            Tuning::load(path).with_context(|| format!("Failed to load tuning from {path}"))?
        }
        None => Tuning::default(),
    };

    log::info!("Hive Defense (headless) starting with seed {}", args.seed);
    let mut session = Session::new(tuning, args.seed).context("Invalid tuning")?;
    session.start();

    let mut kills = 0u32;
    let mut pickups = 0u32;
    let mut next_upgrade = 0usize;
    let mut ticks = 0u64;

    while ticks < args.max_ticks {
        let input = autopilot(session.world());
        let outcome = session.tick(&input, FRAME_MS);
        ticks += 1;

        for event in &session.world().events {
            match event {
                GameEvent::EnemyDestroyed { .. } => kills += 1,
                GameEvent::PickupCollected { .. } => pickups += 1,
                _ => {}
            }
        }

        match outcome {
            TickOutcome::UpgradeReady { .. } => {
                let kind = UpgradeKind::ALL[next_upgrade % UpgradeKind::ALL.len()];
                next_upgrade += 1;
                session.choose_upgrade(kind);
            }
            TickOutcome::GameOver { .. } => break,
            TickOutcome::Continue | TickOutcome::Idle => {}
        }
    }

    if session.screen() == Screen::Playing {
        session.teardown();
        println!("Stopped after {ticks} ticks");
    }

    let world = session.world();
    println!("Score: {}", world.score);
    println!("Wave:  {}", world.wave);
    println!("Kills: {kills}, pickups: {pickups}");
    println!(
        "Player {:.0}/{:.0}, core {:.0}/{:.0}",
        world.player.health, world.player.max_health, world.core.health, world.core.max_health
    );
    println!("Upgrades: {:?}", session.upgrades());

    if args.snapshot {
        println!("{}", world.to_json().context("Failed to serialize world")?);
    }

    Ok(())
}
