//! Serpent headless runner
//!
//! Plays one autopilot run at the fixed timestep and prints the final stats.
//!
//! Usage: `serpent [settings.json] [seed]`

use serpent::Settings;
use serpent::consts::SIM_DT;
use serpent::game::{GamePhase, GameState, TickInput, tick};

/// Stop a run that never ends (five minutes of simulated play)
const MAX_TICKS: u64 = 5 * 60 * 64;

const DEFAULT_SEED: u64 = 0x5EED;

/// Seed from the command line, warning when the argument is not a number
fn parse_seed(arg: Option<&str>) -> u64 {
    match arg {
        Some(arg) => arg.parse().unwrap_or_else(|e| {
            log::warn!("Ignoring seed {arg:?} ({e}), using default {DEFAULT_SEED}");
            DEFAULT_SEED
        }),
        None => DEFAULT_SEED,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seed = parse_seed(args.next().as_deref());

    log::info!("Serpent starting with seed: {}", seed);
    let mut state = GameState::new(seed, settings);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    while state.phase == GamePhase::Playing && state.time_ticks < MAX_TICKS {
        tick(&mut state, &input, SIM_DT);
    }
    if state.phase == GamePhase::Playing {
        log::info!("Tick limit reached");
    }

    println!("Game Over!\n");
    println!("Final Stats:");
    println!("--------------------");
    println!("Score: {}", state.stats.score());
    println!("Time Alive: {}", state.stats.time_alive());
    println!("Length: {}", state.snake.particle_count());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed() {
        assert_eq!(parse_seed(None), DEFAULT_SEED);
        assert_eq!(parse_seed(Some("42")), 42);
        assert_eq!(parse_seed(Some("forty-two")), DEFAULT_SEED);
        assert_eq!(parse_seed(Some("-1")), DEFAULT_SEED);
    }
}
