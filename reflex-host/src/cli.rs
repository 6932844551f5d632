//! Command-line flags

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reflex_core::config::{GameConfig, DEFAULT_LIVES, DEFAULT_PAUSE_MS};
use reflex_protocol::BAUD_RATE;

/// Shortest and longest accepted reaction window, in seconds
const REACTION_RANGE_SECS: (f64, f64) = (0.1, 30.0);

fn parse_reaction_time(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("Invalid reaction time '{}': {}", s, e))?;
    let (min, max) = REACTION_RANGE_SECS;
    if !(min..=max).contains(&secs) {
        return Err(format!(
            "Reaction time must be between {} and {} seconds, got {}",
            min, max, secs
        ));
    }
    Ok(secs)
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "reflex",
    author,
    version,
    about = "Reaction game: press the shown direction before the timer runs out",
    long_about = None
)]
pub struct Args {
    /// Serial device of the button controller (e.g. /dev/ttyACM0).
    /// Without it only the arrow keys are used.
    #[arg(short, long)]
    pub port: Option<String>,

    /// Serial baud rate
    #[arg(short, long, default_value_t = BAUD_RATE)]
    pub baudrate: u32,

    /// Reaction window per round, in seconds
    #[arg(short, long, default_value = "1.5", value_parser = parse_reaction_time)]
    pub reaction_time: f64,

    /// Pause after each verdict before the next round, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PAUSE_MS, value_parser = clap::value_parser!(u32).range(0..=10_000))]
    pub pause_ms: u32,

    /// Starting lives
    #[arg(short, long, default_value_t = DEFAULT_LIVES, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub lives: u8,

    /// Main loop interval, in milliseconds
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(5..=100))]
    pub tick_ms: u64,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Debug-level logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Round engine settings from the flags
    pub fn game_config(&self) -> GameConfig {
        let reaction_ms = (self.reaction_time * 1000.0).round() as u32;
        GameConfig::default()
            .with_lives(self.lives)
            .with_reaction_ms(reaction_ms)
            .with_pause_ms(self.pause_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
