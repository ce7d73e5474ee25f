//! holdgrounds: headless match runner.
//!
//! Usage:
//!   holdgrounds run [--config match.json] [--seed N] [--ticks N] [--realtime]
//!   holdgrounds validate --config match.json
//!
//! `run` plays a match with red driven by the wave director and prints the
//! final snapshot as JSON on stdout. Logging goes to stderr, filtered by
//! RUST_LOG.

use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use holdgrounds_core::commands::PlayerCommand;
use holdgrounds_core::config::MatchConfig;
use holdgrounds_core::constants::TICK_RATE;
use holdgrounds_core::enums::MatchPhase;
use holdgrounds_core::events::MatchEvent;
use holdgrounds_sim::MatchEngine;

/// Nominal duration of one tick at 1x speed.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "validate" => cmd_validate(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "holdgrounds: headless match runner\n\
         \n\
         Commands:\n\
         \n\
         run       Play a match and print the final snapshot as JSON\n\
         \n\
           --config <path>  Match config JSON (default: built-in skirmish)\n\
           --seed <N>       Override the config's RNG seed\n\
           --ticks <N>      Stop after N ticks (default: run until the match ends)\n\
           --realtime       Pace ticks at 30Hz instead of running flat out\n\
         \n\
         validate  Parse and validate a config, then exit\n\
         \n\
           --config <path>  Match config JSON (required)\n\
         \n\
         Examples:\n\
         \n\
           holdgrounds run --seed 7 --ticks 18000\n\
           holdgrounds validate --config match.json\n"
    );
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn load_config(args: &[String]) -> MatchConfig {
    let mut config = match parse_flag_value(args, "--config").map(PathBuf::from) {
        Some(path) => {
            let json = match std::fs::read_to_string(&path) {
                Ok(json) => json,
                Err(err) => {
                    error!(path = %path.display(), %err, "cannot read config");
                    process::exit(1);
                }
            };
            match MatchConfig::from_json_str(&json) {
                Ok(config) => config,
                Err(err) => {
                    error!(path = %path.display(), %err, "invalid config");
                    process::exit(1);
                }
            }
        }
        None => MatchConfig::default_match(),
    };

    if let Some(seed) = parse_flag_value(args, "--seed") {
        match seed.parse() {
            Ok(seed) => config.seed = seed,
            Err(_) => {
                eprintln!("--seed expects an integer, got '{seed}'");
                process::exit(1);
            }
        }
    }
    config
}

fn cmd_validate(args: &[String]) {
    let Some(path) = parse_flag_value(args, "--config").map(PathBuf::from) else {
        eprintln!("validate requires --config <path>");
        process::exit(1);
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            eprintln!("cannot read {}: {err}", path.display());
            process::exit(1);
        }
    };
    match MatchConfig::from_json_str(&json) {
        Ok(config) => {
            println!(
                "ok: {} units, {} buildings, {} effects",
                config.units.len(),
                config.buildings.len(),
                config.effects.len()
            );
        }
        Err(err) => {
            eprintln!("invalid: {err}");
            process::exit(1);
        }
    }
}

fn cmd_run(args: &[String]) {
    let config = load_config(args);
    let max_ticks: Option<u64> = parse_flag_value(args, "--ticks").map(|t| {
        t.parse().unwrap_or_else(|_| {
            eprintln!("--ticks expects an integer, got '{t}'");
            process::exit(1);
        })
    });
    let realtime = has_flag(args, "--realtime");

    let mut engine = MatchEngine::new(config);
    engine.queue_command(PlayerCommand::StartMatch);
    info!(realtime, "starting match");

    let mut next_tick_time = Instant::now();
    let last_snapshot = loop {
        let snapshot = engine.tick();
        log_events(&snapshot.events);

        let done = !matches!(snapshot.phase, MatchPhase::Playing | MatchPhase::Paused)
            && snapshot.time.tick > 0;
        let tick_limit = max_ticks.is_some_and(|max| snapshot.time.tick >= max);
        if done || tick_limit {
            break snapshot;
        }

        if realtime {
            let time_scale = engine.time_scale();
            let effective = if time_scale > 0.001 {
                TICK_DURATION.div_f64(time_scale)
            } else {
                TICK_DURATION
            };
            next_tick_time += effective;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > effective * 2 {
                // Too far behind, reset to avoid a catch-up spiral.
                next_tick_time = now;
            }
        }
    };

    match serde_json::to_string_pretty(&last_snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            error!(%err, "cannot serialize final snapshot");
            process::exit(1);
        }
    }
}

fn log_events(events: &[MatchEvent]) {
    for event in events {
        match event {
            MatchEvent::WaveLaunched {
                wave_number,
                next_interval_secs,
            } => info!(wave_number, next_interval_secs, "wave launched"),
            MatchEvent::UnitTrained {
                object_id, kind, ..
            } => info!(object = object_id.0, ?kind, "unit trained"),
            MatchEvent::BuildingPlaced {
                object_id, kind, ..
            } => info!(object = object_id.0, ?kind, "building placed"),
            MatchEvent::Destroyed {
                object_id,
                team,
                category,
            } => info!(object = object_id.0, ?team, ?category, "destroyed"),
            MatchEvent::MatchOver { winner } => info!(?winner, "match over"),
            MatchEvent::Warning { message } => info!(%message, "warning"),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flag_parsing() {
        let a = args(&["--seed", "7", "--realtime", "--ticks", "100"]);
        assert_eq!(parse_flag_value(&a, "--seed").as_deref(), Some("7"));
        assert_eq!(parse_flag_value(&a, "--ticks").as_deref(), Some("100"));
        assert_eq!(parse_flag_value(&a, "--config"), None);
        assert!(has_flag(&a, "--realtime"));
        assert!(!has_flag(&a, "--verbose"));
    }

    #[test]
    fn test_load_config_seed_override() {
        let a = args(&["--seed", "99"]);
        let config = load_config(&a);
        assert_eq!(config.seed, 99);
    }

    #[test]
    fn test_tick_duration_constant() {
        let expected_nanos = 1_000_000_000u64 / 30;
        assert_eq!(TICK_DURATION.as_nanos(), expected_nanos as u128);
    }
}
