use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use snake_arcade::game::{Difficulty, GameConfig, GameEngine};
use snake_arcade::modes::PlayMode;
use snake_arcade::persistence::{self, DataPaths};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snake_arcade")]
#[command(version, about = "Terminal Snake with power-ups, obstacles and high scores")]
struct Cli {
    /// Grid width (overrides saved settings)
    #[arg(long)]
    width: Option<usize>,

    /// Grid height (overrides saved settings)
    #[arg(long)]
    height: Option<usize>,

    #[arg(long, value_enum)]
    difficulty: Option<DifficultyArg>,

    /// Wrap around the edges instead of dying at the walls
    #[arg(long)]
    wrap: bool,

    /// Scatter obstacles over the board
    #[arg(long)]
    obstacles: bool,

    /// Seed for food and obstacle placement (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Name recorded with high scores
    #[arg(long)]
    name: Option<String>,

    /// Directory holding settings.json and high_scores.json
    #[arg(long, default_value = persistence::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Log file (the terminal is owned by the game)
    #[arg(long, default_value = "snake_arcade.log")]
    log_file: PathBuf,

    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Layers command-line flags over the saved settings
fn apply_overrides(cli: &Cli, mut config: GameConfig) -> GameConfig {
    if let Some(width) = cli.width {
        config.grid_width = width;
    }
    if let Some(height) = cli.height {
        config.grid_height = height;
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty.into();
    }
    if cli.wrap {
        config.wrap_mode = true;
    }
    if cli.obstacles {
        config.obstacles_enabled = true;
    }
    if let Some(name) = &cli.name {
        config.player_name = name.clone();
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging before anything else
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {:?}", cli.log_file))?;
    WriteLogger::init(cli.log_level.into(), Config::default(), log_file)
        .context("Failed to initialize logger")?;

    let paths = DataPaths::in_dir(&cli.data_dir);
    let saved = persistence::load_settings(&paths.settings)?;
    let config = apply_overrides(&cli, saved);
    let high_scores = persistence::load_high_scores(&paths.high_scores)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(
        "Starting snake_arcade: {}x{} {:?}, seed {}",
        config.grid_width, config.grid_height, config.difficulty, seed
    );

    let mut engine = GameEngine::new(config, seed).context("Invalid game settings")?;
    engine.import_high_scores(high_scores);

    let mut play_mode = PlayMode::new(engine, paths);
    play_mode.run().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_saved_settings() {
        let cli = Cli::try_parse_from([
            "snake_arcade",
            "--width",
            "30",
            "--difficulty",
            "hard",
            "--wrap",
            "--name",
            "ada",
        ])
        .unwrap();
        let saved = GameConfig {
            grid_height: 15,
            obstacles_enabled: true,
            ..GameConfig::default()
        };

        let config = apply_overrides(&cli, saved);
        assert_eq!(config.grid_width, 30);
        assert_eq!(config.grid_height, 15);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert!(config.wrap_mode);
        assert!(config.obstacles_enabled);
        assert_eq!(config.player_name, "ada");
    }

    #[test]
    fn test_no_flags_keep_saved_settings() {
        let cli = Cli::try_parse_from(["snake_arcade"]).unwrap();
        let saved = GameConfig::small();
        assert_eq!(apply_overrides(&cli, saved.clone()), saved);
    }
}
